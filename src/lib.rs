//! auditsync - Offline-First Audit Synchronization Engine
//!
//! auditsync lets a field device capture audit findings and photographic
//! evidence while disconnected from the network, and reconcile that work
//! with the remote system of record once connectivity returns.
//!
//! # Overview
//!
//! Local mutations write synchronously to an on-device SQLite store and
//! append a mutation intent to a durable queue; they return immediately
//! regardless of connectivity. Connectivity transitions, timers, and
//! manual triggers invoke a single-flight processor that drains the queue
//! in strict insertion order against the remote system, records confirmed
//! state (such as a photo's permanent URL) back into the local store, and
//! prunes completed entries.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between the engine and its callers
//!   - Audit domain types, configuration, error taxonomy
//!
//! - **`engine`** - The synchronization engine
//!   - `local_db`: durable SQLite store (entities, blobs, queue)
//!   - `network`: connectivity monitor with edge-triggered events
//!   - `processor`: single-flight queue drain
//!   - `hydration`: one-shot bulk download for offline use
//!   - `remote`: remote collaborator contracts + HTTP client
//!
//! # Usage
//!
//! ```rust,no_run
//! use auditsync::{SyncConfig, SyncEngine};
//!
//! # async fn example() -> Result<(), auditsync::SyncError> {
//! let config = SyncConfig::builder()
//!     .server_url("https://audits.example.com")
//!     .build()
//!     .expect("valid config");
//!
//! let engine = SyncEngine::connect(config).await?;
//! engine.spawn_connectivity_listener();
//!
//! // Pre-field download, then the device can go offline
//! let project_id = uuid::Uuid::new_v4();
//! engine.hydrate_project(project_id).await?;
//! # Ok(())
//! # }
//! ```

/// The synchronization engine
pub mod engine;

/// Shared types and configuration
pub mod shared;

/// Re-export the main engine surface for convenience
pub use engine::{
    DrainOutcome, DrainReport, HttpRemoteApi, HydrationReport, LocalStore, NetworkEvent,
    NetworkMonitor, RemoteApi, StoreStats, SyncEngine,
};
pub use shared::{
    AuditResult, AuditStatus, Checklist, ChecklistItem, EvidenceImage, Project, QueuedOperation,
    RemoteError, SyncConfig, SyncError, SyncOperation,
};
