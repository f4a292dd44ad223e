//! Evidence Image Data Structure
//!
//! A photographic attachment captured on the device. The ID is generated
//! locally from the owning result ID and the capture timestamp, which keeps
//! it unique per device without coordinating with the remote system. After
//! creation only the sync processor touches an image, to set the uploaded
//! flag and permanent URL once the remote upload confirms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A locally captured evidence photo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvidenceImage {
    /// Locally generated ID: `{result_id}-{capture millis}`
    pub id: String,
    /// Owning audit result ID
    pub result_id: Uuid,
    /// Owning project ID, used to build the remote storage path
    pub project_id: Uuid,
    /// Raw image bytes
    pub bytes: Vec<u8>,
    /// Whether the remote upload has been confirmed
    pub uploaded: bool,
    /// Permanent remote URL, set once uploaded
    pub remote_url: Option<String>,
    /// Capture timestamp
    pub created_at: DateTime<Utc>,
}

impl EvidenceImage {
    /// Create a new, not-yet-uploaded evidence image
    pub fn new(result_id: Uuid, project_id: Uuid, bytes: Vec<u8>) -> Self {
        let created_at = Utc::now();
        Self {
            id: format!("{}-{}", result_id, created_at.timestamp_millis()),
            result_id,
            project_id,
            bytes,
            uploaded: false,
            remote_url: None,
            created_at,
        }
    }

    /// Remote storage path for this image
    pub fn storage_path(&self) -> String {
        format!(
            "projects/{}/results/{}/{}.jpg",
            self.project_id, self.result_id, self.id
        )
    }
}
