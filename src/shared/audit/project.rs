//! Audit Project Data Structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An audit project cached for offline display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    /// Project ID, shared with the remote system
    pub id: Uuid,
    /// Project name
    pub name: String,
    /// Customer the project is audited for
    pub customer: Option<String>,
    /// Last local write timestamp
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new project
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            customer: None,
            updated_at: Utc::now(),
        }
    }
}
