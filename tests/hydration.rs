//! Integration tests for hydration: fail-fast offline behavior,
//! overwrite-by-put semantics, and mutual exclusion with the processor.

mod common;

use auditsync::shared::audit::AuditStatus;
use auditsync::shared::error::{RemoteError, SyncError};
use common::{sample_snapshot, TestHarness};
use pretty_assertions::assert_eq;
use std::time::Duration;
use uuid::Uuid;

#[tokio::test]
async fn hydrate_requires_connectivity() {
    let h = TestHarness::new(false).await;
    let project_id = Uuid::new_v4();
    h.remote.set_snapshot(sample_snapshot(project_id));

    let err = h.engine.hydrate_project(project_id).await.unwrap_err();
    assert!(matches!(err, SyncError::Offline));

    // Nothing was queued or written
    let stats = h.engine.stats().await.unwrap();
    assert_eq!(stats.project_count, 0);
    assert_eq!(stats.pending_operations, 0);
}

#[tokio::test]
async fn hydrate_writes_full_snapshot() {
    let h = TestHarness::new(true).await;
    let project_id = Uuid::new_v4();
    let snapshot = sample_snapshot(project_id);
    h.remote.set_snapshot(snapshot.clone());

    let report = h.engine.hydrate_project(project_id).await.unwrap();
    assert_eq!(report.checklists, 1);
    assert_eq!(report.results, 1);

    let project = h.engine.store().get_project(project_id).await.unwrap().unwrap();
    assert_eq!(project, snapshot.project);

    let checklists = h
        .engine
        .store()
        .list_project_checklists(project_id)
        .await
        .unwrap();
    assert_eq!(checklists, vec![snapshot.checklists[0].checklist.clone()]);
}

#[tokio::test]
async fn hydrate_overwrites_local_state() {
    let h = TestHarness::new(true).await;
    let project_id = Uuid::new_v4();
    let snapshot = sample_snapshot(project_id);
    let remote_result = snapshot.checklists[0].results[0].clone();

    // Local copy has drifted from what the server holds
    let mut local = remote_result.clone();
    local.status = AuditStatus::Failed;
    local.comment = Some("stale local edit".to_string());
    h.engine.store().put_result(&local).await.unwrap();

    h.remote.set_snapshot(snapshot);
    h.engine.hydrate_project(project_id).await.unwrap();

    // Remote is authoritative at hydration time
    let stored = h
        .engine
        .store()
        .get_result(remote_result.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, remote_result);
}

#[tokio::test]
async fn hydrate_surfaces_remote_failure() {
    let h = TestHarness::new(true).await;

    // No snapshot scripted: the mock rejects
    let err = h.engine.hydrate_project(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Remote(RemoteError::Rejected { .. })
    ));
}

#[tokio::test]
async fn hydrate_is_excluded_while_a_drain_runs() {
    let h = TestHarness::new(false).await;
    let seeded = h.seed_result().await;
    h.engine
        .update_result(seeded.id, AuditStatus::Passed, None, None)
        .await
        .unwrap();

    h.remote.set_delay(Duration::from_millis(400));
    h.network.set_online(true);
    h.remote.set_snapshot(sample_snapshot(seeded.project_id));

    let engine = h.engine.clone();
    let drain = tokio::spawn(async move { engine.process_sync_queue().await });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let err = h
        .engine
        .hydrate_project(seeded.project_id)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Busy));

    drain.await.unwrap().unwrap();

    // Once the gate frees, hydration goes through
    h.engine.hydrate_project(seeded.project_id).await.unwrap();
}
