//! Sync Operation Data Structures
//!
//! A `SyncOperation` is a mutation intent that must eventually reach the
//! remote system. Operations are appended to a durable queue and drained in
//! strict insertion order; the queue row ID assigned by the store is the
//! authoritative order, the creation timestamp is diagnostics only.

use crate::shared::audit::AuditStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A queued mutation intent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncOperation {
    /// Push an audit result's recorded state to the remote system
    UpdateResult {
        result_id: Uuid,
        status: AuditStatus,
        comment: Option<String>,
        photos: Vec<String>,
    },
    /// Upload a captured evidence image and attach its URL to the result
    UploadImage { image_id: String, result_id: Uuid },
}

impl SyncOperation {
    /// Kind tag for database storage
    pub fn kind(&self) -> &'static str {
        match self {
            SyncOperation::UpdateResult { .. } => "update_result",
            SyncOperation::UploadImage { .. } => "upload_image",
        }
    }

    /// ID of the entity this operation acts on
    pub fn target_id(&self) -> String {
        match self {
            SyncOperation::UpdateResult { result_id, .. } => result_id.to_string(),
            SyncOperation::UploadImage { image_id, .. } => image_id.clone(),
        }
    }
}

/// A sync queue row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedOperation {
    /// Store-assigned, monotonically increasing queue ID
    pub id: i64,
    /// The queued mutation intent
    pub operation: SyncOperation,
    /// When the operation was enqueued (diagnostics only, never ordering)
    pub created_at: DateTime<Utc>,
    /// Number of failed delivery attempts so far
    pub retry_count: i32,
    /// Timestamp of the most recent failed attempt
    pub last_attempt: Option<DateTime<Utc>>,
    /// Error message from the most recent failed attempt
    pub error_message: Option<String>,
}

/// An operation the remote system permanently rejected
///
/// Dead letters are kept out of the active queue so one malformed operation
/// cannot block everything behind it. They are never retried; an explicit
/// cleanup call is the only thing that removes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadLetter {
    /// Dead letter row ID
    pub id: i64,
    /// Queue ID the operation had while pending
    pub queue_id: i64,
    /// The rejected mutation intent
    pub operation: SyncOperation,
    /// When the operation was originally enqueued
    pub created_at: DateTime<Utc>,
    /// When the rejection was recorded
    pub failed_at: DateTime<Utc>,
    /// Rejection reason reported by the remote system
    pub error_message: String,
}
