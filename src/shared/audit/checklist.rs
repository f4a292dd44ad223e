//! Checklist Data Structures
//!
//! A checklist is the unit an auditor works through in the field. Items are
//! denormalized into the checklist so it renders offline without joins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A requirement checklist within a project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Checklist {
    /// Checklist ID, shared with the remote system
    pub id: Uuid,
    /// Owning project ID
    pub project_id: Uuid,
    /// Checklist name
    pub name: String,
    /// Denormalized requirement items
    pub items: Vec<ChecklistItem>,
    /// Last local write timestamp
    pub updated_at: DateTime<Utc>,
}

/// A single requirement within a checklist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecklistItem {
    /// Item ID, shared with the remote system
    pub id: Uuid,
    /// Requirement text shown to the auditor
    pub requirement: String,
    /// Optional grouping category
    pub category: Option<String>,
}

impl Checklist {
    /// Create a new checklist
    pub fn new(project_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            name: name.into(),
            items: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}
