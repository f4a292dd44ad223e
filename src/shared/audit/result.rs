//! Audit Result Data Structure
//!
//! Represents the finding an auditor records against a checklist item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status recorded for a checklist requirement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    /// Not yet assessed
    Pending,
    /// Requirement satisfied
    Passed,
    /// Requirement not satisfied
    Failed,
    /// Requirement does not apply to this project
    NotApplicable,
}

impl Default for AuditStatus {
    fn default() -> Self {
        AuditStatus::Pending
    }
}

impl AuditStatus {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Pending => "pending",
            AuditStatus::Passed => "passed",
            AuditStatus::Failed => "failed",
            AuditStatus::NotApplicable => "not_applicable",
        }
    }

    /// Parse from string (database)
    pub fn from_str(s: &str) -> Self {
        match s {
            "passed" => AuditStatus::Passed,
            "failed" => AuditStatus::Failed,
            "not_applicable" => AuditStatus::NotApplicable,
            _ => AuditStatus::Pending,
        }
    }
}

/// Represents the finding recorded against a checklist item
///
/// Local writes are the source of truth until overwritten by hydration:
/// the UI mutates status/comment/photos through the engine, which persists
/// locally before anything is queued for the remote system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditResult {
    /// Result ID, shared with the remote system
    pub id: Uuid,
    /// Owning project ID
    pub project_id: Uuid,
    /// Owning checklist ID
    pub checklist_id: Uuid,
    /// Checklist item this finding is recorded against
    pub item_id: Uuid,
    /// Recorded status
    pub status: AuditStatus,
    /// Free-form auditor comment
    pub comment: Option<String>,
    /// Permanent URLs of uploaded evidence photos
    pub photos: Vec<String>,
    /// Last local write timestamp
    pub updated_at: DateTime<Utc>,
}

impl AuditResult {
    /// Create a new pending result for a checklist item
    pub fn new(project_id: Uuid, checklist_id: Uuid, item_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            checklist_id,
            item_id,
            status: AuditStatus::Pending,
            comment: None,
            photos: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}
