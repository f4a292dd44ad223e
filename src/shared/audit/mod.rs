//! Audit Domain Types
//!
//! This module contains the data structures mirrored between the field
//! device and the remote system of record:
//!
//! - `Project` - An audit project
//! - `Checklist` - A requirement checklist within a project
//! - `AuditResult` - The finding recorded against a checklist item
//! - `EvidenceImage` - A locally captured photographic attachment
//! - `SyncOperation` - A queued mutation intent awaiting remote delivery
//!
//! # Usage
//!
//! ```rust
//! use auditsync::shared::audit::{AuditResult, AuditStatus, EvidenceImage};
//! ```

pub mod checklist;
pub mod evidence;
pub mod operation;
pub mod project;
pub mod result;

// Re-export all types
pub use checklist::{Checklist, ChecklistItem};
pub use evidence::EvidenceImage;
pub use operation::{DeadLetter, QueuedOperation, SyncOperation};
pub use project::Project;
pub use result::{AuditResult, AuditStatus};
