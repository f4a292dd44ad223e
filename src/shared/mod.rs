//! Shared Module
//!
//! This module contains types and data structures shared between the engine
//! and its callers. All types are designed for serialization, both into the
//! local SQLite mirror and over HTTP to the remote system of record.

/// Audit domain types
pub mod audit;

/// Engine configuration
pub mod config;

/// Engine error types
pub mod error;

/// Re-export commonly used types for convenience
pub use audit::{
    AuditResult, AuditStatus, Checklist, ChecklistItem, DeadLetter, EvidenceImage, Project,
    QueuedOperation, SyncOperation,
};
pub use config::{ConfigError, SyncConfig, SyncConfigBuilder};
pub use error::{RemoteError, SyncError};
