//! Remote Collaborator Contracts
//!
//! Abstract contracts for the remote system of record. The engine only
//! talks to these traits; concrete transport lives in [`http`]. Tests
//! substitute scripted implementations to simulate outages, rejections
//! and slow calls.

pub mod http;

use crate::shared::audit::{AuditResult, AuditStatus, Checklist, Project};
use crate::shared::error::RemoteError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use http::HttpRemoteApi;

/// Payload of the remote "save audit result" mutation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditResultPayload {
    /// Result ID, shared with the remote system
    pub result_id: Uuid,
    /// Recorded status
    pub status: AuditStatus,
    /// Free-form auditor comment
    pub comment: Option<String>,
    /// Permanent URLs of uploaded evidence photos
    pub photos: Vec<String>,
}

impl From<&AuditResult> for AuditResultPayload {
    fn from(result: &AuditResult) -> Self {
        Self {
            result_id: result.id,
            status: result.status,
            comment: result.comment.clone(),
            photos: result.photos.clone(),
        }
    }
}

/// Confirmation returned by the remote binary upload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedEvidence {
    /// Stable, permanent URL of the uploaded blob
    pub public_url: String,
}

/// A checklist with its audit results, as returned by the bulk read
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecklistSnapshot {
    pub checklist: Checklist,
    pub results: Vec<AuditResult>,
}

/// Full project snapshot returned by the bulk read
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectSnapshot {
    pub project: Project,
    pub checklists: Vec<ChecklistSnapshot>,
}

/// Remote mutation and bulk-read operations consumed by the engine
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Save an audit result's recorded state
    ///
    /// Must be idempotent under retry: the engine may deliver the same
    /// logical update more than once when a prior attempt's success was
    /// not observed.
    async fn save_audit_result(&self, payload: &AuditResultPayload) -> Result<(), RemoteError>;

    /// Upload an evidence blob to the given storage path
    ///
    /// Returns the stable, permanent URL of the stored object.
    async fn upload_evidence(
        &self,
        bytes: &[u8],
        path: &str,
    ) -> Result<UploadedEvidence, RemoteError>;

    /// Bulk read of a project with its checklists and audit results
    ///
    /// Used only by hydration.
    async fn get_project_full_audit_data(
        &self,
        project_id: Uuid,
    ) -> Result<ProjectSnapshot, RemoteError>;
}
