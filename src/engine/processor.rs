//! Sync Processor
//!
//! Drains the sync queue against the remote collaborators, exactly one
//! drain in flight at a time. Operations run strictly sequentially in
//! queue order; the next operation is not started until the previous
//! one's remote call has resolved.
//!
//! A transient failure halts the pass: because ordering is global FIFO
//! and later operations may depend on state produced by earlier ones
//! (an upload produces the URL a later result update references),
//! skipping past a retryable failure risks desynchronizing dependent
//! state. A permanent rejection instead moves the operation to the dead
//! letter table and the pass continues: a mutation the server refused
//! can never be depended on by anything queued after it, and leaving it
//! at the head would block the queue forever.

use crate::engine::SyncEngine;
use crate::shared::audit::{QueuedOperation, SyncOperation};
use crate::shared::error::{RemoteError, SyncError};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

/// Outcome of a drain attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainOutcome {
    /// The device was offline; nothing was attempted
    Offline,
    /// A drain or hydration already held the sync gate
    AlreadyRunning,
    /// A pass over the queue snapshot ran
    Completed(DrainReport),
}

/// What a drain pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Operations confirmed remotely and removed
    pub completed: usize,
    /// Stale upload operations removed without a remote call
    pub skipped_stale: usize,
    /// Operations moved to the dead letter table
    pub dead_lettered: usize,
    /// Queue ID at which a transient failure halted the pass
    pub halted_at: Option<i64>,
}

/// Mutual exclusion token shared by the processor and hydration
///
/// An atomic flag rather than a lock: concurrent triggers collapse into
/// the single in-flight pass instead of waiting behind it.
#[derive(Debug, Default)]
pub(crate) struct SyncGate {
    busy: AtomicBool,
}

impl SyncGate {
    /// Try to acquire the gate; `None` when a pass is already in flight
    pub(crate) fn try_acquire(&self) -> Option<GateGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| GateGuard { gate: self })
    }

    /// Whether a drain or hydration currently holds the gate
    pub(crate) fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

/// Releases the gate on drop, whatever path the pass exits through
pub(crate) struct GateGuard<'a> {
    gate: &'a SyncGate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::SeqCst);
    }
}

impl SyncEngine {
    /// Drain the sync queue against the remote system
    ///
    /// No-ops (not errors) when offline or when a pass is already in
    /// flight. Returns what the pass did; remote failures never
    /// propagate out of here, they become queue state.
    pub async fn process_sync_queue(&self) -> Result<DrainOutcome, SyncError> {
        if !self.network().is_online() {
            return Ok(DrainOutcome::Offline);
        }
        let Some(_guard) = self.gate().try_acquire() else {
            return Ok(DrainOutcome::AlreadyRunning);
        };

        let snapshot = self.store().pending_operations().await?;
        if snapshot.is_empty() {
            self.store().set_last_sync_time().await?;
            return Ok(DrainOutcome::Completed(DrainReport::default()));
        }

        tracing::info!("draining {} pending operations", snapshot.len());
        let mut report = DrainReport::default();

        for queued in &snapshot {
            let halt = match &queued.operation {
                SyncOperation::UpdateResult { .. } => {
                    self.push_result_update(queued, &mut report).await?
                }
                SyncOperation::UploadImage { image_id, .. } => {
                    self.push_image_upload(queued, image_id, &mut report).await?
                }
            };
            if halt {
                break;
            }
        }

        if report.halted_at.is_none() {
            self.store().set_last_sync_time().await?;
        }

        tracing::info!(
            "drain finished: {} completed, {} stale, {} dead-lettered, halted_at={:?}",
            report.completed,
            report.skipped_stale,
            report.dead_lettered,
            report.halted_at
        );
        Ok(DrainOutcome::Completed(report))
    }

    /// Deliver an `UpdateResult` operation; returns true when the pass must halt
    async fn push_result_update(
        &self,
        queued: &QueuedOperation,
        report: &mut DrainReport,
    ) -> Result<bool, SyncError> {
        let SyncOperation::UpdateResult {
            result_id,
            status,
            comment,
            photos,
        } = &queued.operation
        else {
            return Ok(false);
        };

        let payload = crate::engine::remote::AuditResultPayload {
            result_id: *result_id,
            status: *status,
            comment: comment.clone(),
            photos: photos.clone(),
        };

        match self
            .remote_call(self.remote().save_audit_result(&payload))
            .await
        {
            Ok(()) => {
                self.store().remove_operation(queued.id).await?;
                report.completed += 1;
                Ok(false)
            }
            Err(error) => self.handle_remote_failure(queued, error, report).await,
        }
    }

    /// Deliver an `UploadImage` operation; returns true when the pass must halt
    ///
    /// A missing or already-uploaded image means the operation is stale:
    /// it is removed without a remote call. On a confirmed upload the
    /// image row gets its URL first, then the URL is appended to the
    /// owning result's photo list, then a derived `UpdateResult` is
    /// enqueued so the append itself propagates.
    async fn push_image_upload(
        &self,
        queued: &QueuedOperation,
        image_id: &str,
        report: &mut DrainReport,
    ) -> Result<bool, SyncError> {
        let image = match self.store().get_image(image_id).await? {
            None => {
                tracing::warn!("upload operation {} targets missing image, removing", queued.id);
                self.store().remove_operation(queued.id).await?;
                report.skipped_stale += 1;
                return Ok(false);
            }
            Some(image) if image.uploaded => {
                tracing::debug!("image {} already uploaded, removing operation", image.id);
                self.store().remove_operation(queued.id).await?;
                report.skipped_stale += 1;
                return Ok(false);
            }
            Some(image) => image,
        };

        match self
            .remote_call(
                self.remote()
                    .upload_evidence(&image.bytes, &image.storage_path()),
            )
            .await
        {
            Ok(uploaded) => {
                self.store()
                    .mark_image_uploaded(&image.id, &uploaded.public_url)
                    .await?;

                match self.store().get_result(image.result_id).await? {
                    Some(mut result) => {
                        result.photos.push(uploaded.public_url);
                        result.updated_at = chrono::Utc::now();
                        self.store().put_result(&result).await?;
                        self.store()
                            .enqueue_operation(&SyncOperation::UpdateResult {
                                result_id: result.id,
                                status: result.status,
                                comment: result.comment.clone(),
                                photos: result.photos.clone(),
                            })
                            .await?;
                    }
                    None => {
                        tracing::warn!(
                            "uploaded image {} has no local result {}",
                            image.id,
                            image.result_id
                        );
                    }
                }

                self.store().remove_operation(queued.id).await?;
                report.completed += 1;
                Ok(false)
            }
            Err(error) => self.handle_remote_failure(queued, error, report).await,
        }
    }

    /// Classify a remote failure; returns true when the pass must halt
    async fn handle_remote_failure(
        &self,
        queued: &QueuedOperation,
        error: RemoteError,
        report: &mut DrainReport,
    ) -> Result<bool, SyncError> {
        if error.is_permanent() {
            tracing::warn!(
                "operation {} permanently rejected, dead-lettering: {}",
                queued.id,
                error
            );
            self.store()
                .dead_letter_operation(queued.id, &error.to_string())
                .await?;
            report.dead_lettered += 1;
            Ok(false)
        } else {
            tracing::warn!("drain halted at operation {}: {}", queued.id, error);
            self.store()
                .record_operation_failure(queued.id, &error.to_string())
                .await?;
            report.halted_at = Some(queued.id);
            Ok(true)
        }
    }

    /// Wrap a remote call with the configured timeout
    ///
    /// A timed-out call is a transient failure; the response may still
    /// land on the server, which is why remote mutations must be
    /// idempotent under retry.
    pub(crate) async fn remote_call<T>(
        &self,
        call: impl Future<Output = Result<T, RemoteError>>,
    ) -> Result<T, RemoteError> {
        let limit = self.config().remote_timeout();
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(RemoteError::Timeout(limit)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_single_flight() {
        let gate = SyncGate::default();
        let guard = gate.try_acquire().unwrap();
        assert!(gate.is_busy());
        assert!(gate.try_acquire().is_none());
        drop(guard);
        assert!(!gate.is_busy());
        assert!(gate.try_acquire().is_some());
    }
}
