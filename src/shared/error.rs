//! Engine Error Types
//!
//! This module defines the error taxonomy of the sync engine. Local-store
//! failures are fatal to the triggering call and surfaced immediately;
//! remote failures are classified so the processor can tell a retryable
//! outage from a rejection that will never succeed.
//!
//! # Error Categories
//!
//! - `SyncError` - Errors surfaced by the engine's public entry points
//! - `RemoteError` - Failures reported by remote collaborators
//!
//! # Usage
//!
//! ```rust
//! use auditsync::shared::error::RemoteError;
//!
//! let error = RemoteError::rejected("status must be one of pass/fail/na");
//! assert!(error.is_permanent());
//! ```
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the sync engine's public entry points
///
/// The engine never throws past these: remote failures inside a drain are
/// converted into queue state, so `Remote` only ever reaches callers of
/// hydration.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Local durable store failure (database unavailable, disk full)
    #[error("local store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Payload serialization or deserialization failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The operation requires connectivity and the device is offline
    #[error("no connectivity")]
    Offline,

    /// A drain or hydration already holds the sync gate
    #[error("sync already in progress")]
    Busy,

    /// The targeted audit result is not present in the local store
    #[error("unknown audit result: {0}")]
    UnknownResult(Uuid),

    /// Remote collaborator failure, surfaced only from hydration
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),
}

/// Failures reported by remote collaborators
#[derive(Debug, Error, Clone)]
pub enum RemoteError {
    /// The request never produced a server response
    #[error("network error: {message}")]
    Network {
        /// Human-readable error message
        message: String,
    },

    /// The server responded with a retryable error status
    #[error("server error: status {status}")]
    Server {
        /// HTTP status code
        status: u16,
    },

    /// The server rejected the request; retrying can never succeed
    #[error("rejected by server: {message}")]
    Rejected {
        /// Human-readable rejection reason
        message: String,
    },

    /// The call exceeded the configured remote timeout
    #[error("remote call timed out after {0:?}")]
    Timeout(Duration),
}

impl RemoteError {
    /// Create a new network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new rejection error
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Whether retrying this failure can never succeed
    ///
    /// Permanent failures are dead-lettered by the processor instead of
    /// blocking the head of the queue forever.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Server {
                status: status.as_u16(),
            },
            None => Self::network(err.to_string()),
        }
    }
}
