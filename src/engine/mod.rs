//! # Sync Engine
//!
//! The offline-first synchronization engine. UI actions write to the
//! local store and append to the durable sync queue synchronously, so
//! they succeed regardless of connectivity; the processor drains the
//! queue against the remote system when connectivity allows.
//!
//! ## Key Components
//!
//! - [`SyncEngine`]: the per-device coordinator owning store, monitor,
//!   remote client and the sync gate
//! - [`local_db::LocalStore`]: SQLite-backed durable store
//! - [`network::NetworkMonitor`]: connectivity state and edge events
//! - [`processor`]: single-flight queue drain
//! - [`hydration`]: one-shot bulk download for offline use
//! - [`remote::RemoteApi`]: abstract remote collaborators
//!
//! ## Usage
//!
//! ```rust,no_run
//! use auditsync::engine::SyncEngine;
//! use auditsync::shared::audit::AuditStatus;
//! use auditsync::shared::config::SyncConfig;
//! # use uuid::Uuid;
//!
//! # async fn example(result_id: Uuid, project_id: Uuid) -> Result<(), auditsync::shared::error::SyncError> {
//! let engine = SyncEngine::connect(SyncConfig::new()).await?;
//! engine.spawn_connectivity_listener();
//!
//! // Works offline: persisted locally, queued for the remote system
//! engine
//!     .update_result(result_id, AuditStatus::Failed, Some("seal damaged".into()), None)
//!     .await?;
//! engine.save_photo(result_id, project_id, vec![0xFF, 0xD8]).await?;
//! # Ok(())
//! # }
//! ```

pub mod hydration;
pub mod local_db;
pub mod network;
pub mod processor;
pub mod remote;

use crate::shared::audit::{AuditStatus, EvidenceImage, SyncOperation};
use crate::shared::config::SyncConfig;
use crate::shared::error::SyncError;
use chrono::{DateTime, Utc};
use processor::SyncGate;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use uuid::Uuid;

pub use hydration::HydrationReport;
pub use local_db::{LocalStore, StoreStats};
pub use network::{NetworkEvent, NetworkMonitor};
pub use processor::{DrainOutcome, DrainReport};
pub use remote::{HttpRemoteApi, RemoteApi};

/// Per-device sync coordinator
///
/// One instance per work session owns all engine state; there is no
/// ambient global state, so isolated instances can run side by side
/// (which is also how the tests exercise the engine). Cloning is cheap
/// and shares state, allowing non-blocking drains to be spawned onto
/// the runtime.
#[derive(Clone)]
pub struct SyncEngine {
    config: SyncConfig,
    store: LocalStore,
    remote: Arc<dyn RemoteApi>,
    network: NetworkMonitor,
    gate: Arc<SyncGate>,
}

impl SyncEngine {
    /// Create an engine from its parts
    ///
    /// Callers that need a scripted remote or a pre-seeded store use
    /// this; production code goes through [`SyncEngine::connect`].
    pub fn new(
        config: SyncConfig,
        store: LocalStore,
        remote: Arc<dyn RemoteApi>,
        network: NetworkMonitor,
    ) -> Self {
        Self {
            config,
            store,
            remote,
            network,
            gate: Arc::new(SyncGate::default()),
        }
    }

    /// Open the configured local store and connect the HTTP remote client
    pub async fn connect(config: SyncConfig) -> Result<Self, SyncError> {
        let store = LocalStore::open(config.database_path()).await?;
        let remote = Arc::new(HttpRemoteApi::new(config.clone()));
        Ok(Self::new(config, store, remote, NetworkMonitor::default()))
    }

    /// Engine configuration
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The local durable store
    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// The network monitor
    pub fn network(&self) -> &NetworkMonitor {
        &self.network
    }

    pub(crate) fn remote(&self) -> &dyn RemoteApi {
        self.remote.as_ref()
    }

    pub(crate) fn gate(&self) -> &SyncGate {
        &self.gate
    }

    /// Current connectivity
    pub fn is_online(&self) -> bool {
        self.network.is_online()
    }

    /// Whether a drain or hydration is currently in flight
    pub fn is_syncing(&self) -> bool {
        self.gate.is_busy()
    }

    /// Timestamp of the last fully attempted sync pass
    pub async fn last_sync_time(&self) -> Result<Option<DateTime<Utc>>, SyncError> {
        Ok(self.store.get_last_sync_time().await?)
    }

    /// Store statistics, including the pending-operation count
    pub async fn stats(&self) -> Result<StoreStats, SyncError> {
        Ok(self.store.stats().await?)
    }

    /// Record an auditor's finding for a checklist item
    ///
    /// Writes the new state to the local store, queues it for the remote
    /// system, and triggers a non-blocking drain when online. Always
    /// succeeds locally regardless of connectivity. `None` for comment
    /// or photos leaves the current value unchanged.
    pub async fn update_result(
        &self,
        result_id: Uuid,
        status: AuditStatus,
        comment: Option<String>,
        photos: Option<Vec<String>>,
    ) -> Result<(), SyncError> {
        let mut result = self
            .store
            .get_result(result_id)
            .await?
            .ok_or(SyncError::UnknownResult(result_id))?;

        result.status = status;
        if comment.is_some() {
            result.comment = comment;
        }
        if let Some(photos) = photos {
            result.photos = photos;
        }
        result.updated_at = Utc::now();

        // Local write must succeed before anything is queued
        self.store.put_result(&result).await?;
        self.store
            .enqueue_operation(&SyncOperation::UpdateResult {
                result_id: result.id,
                status: result.status,
                comment: result.comment.clone(),
                photos: result.photos.clone(),
            })
            .await?;

        tracing::debug!("result {} updated locally and queued", result_id);
        self.spawn_drain();
        Ok(())
    }

    /// Capture an evidence photo for an audit result
    ///
    /// Stores the bytes locally with `uploaded=false`, queues the upload,
    /// and triggers a non-blocking drain when online. Returns the locally
    /// generated image ID.
    pub async fn save_photo(
        &self,
        result_id: Uuid,
        project_id: Uuid,
        bytes: Vec<u8>,
    ) -> Result<String, SyncError> {
        let image = EvidenceImage::new(result_id, project_id, bytes);

        self.store.put_image(&image).await?;
        self.store
            .enqueue_operation(&SyncOperation::UploadImage {
                image_id: image.id.clone(),
                result_id,
            })
            .await?;

        tracing::debug!("image {} captured and queued for upload", image.id);
        self.spawn_drain();
        Ok(image.id)
    }

    /// Spawn a background drain attempt when online
    ///
    /// Fire and forget: concurrent spawns collapse into the single
    /// in-flight drain via the sync gate.
    fn spawn_drain(&self) {
        if !self.network.is_online() {
            return;
        }
        let engine = self.clone();
        tokio::spawn(async move {
            if let Err(error) = engine.process_sync_queue().await {
                tracing::error!("background drain failed: {}", error);
            }
        });
    }

    /// Spawn the coordinator loop consuming connectivity events
    ///
    /// `BecameOnline` is the sole connectivity-driven drain trigger.
    pub fn spawn_connectivity_listener(&self) -> JoinHandle<()> {
        let mut events = self.network.subscribe();
        let engine = self.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if event == NetworkEvent::BecameOnline {
                    if let Err(error) = engine.process_sync_queue().await {
                        tracing::error!("drain after reconnect failed: {}", error);
                    }
                }
            }
        })
    }

    /// Spawn a periodic drain trigger at the given interval
    pub fn spawn_periodic_drain(&self, period: Duration) -> JoinHandle<()> {
        let engine = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately; skip it
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(error) = engine.process_sync_queue().await {
                    tracing::error!("periodic drain failed: {}", error);
                }
            }
        })
    }
}
