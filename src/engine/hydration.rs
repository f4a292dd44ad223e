//! Hydration Service
//!
//! One-shot bulk download of a project's remote state into the local
//! store, run before a device goes to the field. Remote state is
//! authoritative at hydration time: entries are overwritten by put, not
//! merged. The overwrite is not transactional across entities; a failed
//! hydration may leave a partial snapshot, which the next successful run
//! repairs.

use crate::engine::SyncEngine;
use crate::shared::error::SyncError;
use uuid::Uuid;

/// What a hydration run downloaded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HydrationReport {
    /// Checklists written to the local store
    pub checklists: usize,
    /// Audit results written to the local store
    pub results: usize,
}

impl SyncEngine {
    /// Download a project's full audit data for offline use
    ///
    /// Requires connectivity (`SyncError::Offline` otherwise, nothing is
    /// queued) and the sync gate (`SyncError::Busy` while a drain or
    /// another hydration is in flight).
    pub async fn hydrate_project(&self, project_id: Uuid) -> Result<HydrationReport, SyncError> {
        if !self.network().is_online() {
            return Err(SyncError::Offline);
        }
        let Some(_guard) = self.gate().try_acquire() else {
            return Err(SyncError::Busy);
        };

        tracing::info!("hydrating project {}", project_id);
        let snapshot = self
            .remote_call(self.remote().get_project_full_audit_data(project_id))
            .await?;

        self.store().put_project(&snapshot.project).await?;

        let mut report = HydrationReport::default();
        for entry in &snapshot.checklists {
            self.store().put_checklist(&entry.checklist).await?;
            report.checklists += 1;
            for result in &entry.results {
                self.store().put_result(result).await?;
                report.results += 1;
            }
        }

        tracing::info!(
            "hydrated project {}: {} checklists, {} results",
            project_id,
            report.checklists,
            report.results
        );
        Ok(report)
    }
}
