//! Common test utilities and helpers
//!
//! Provides shared fixtures for the integration tests: a temp-dir backed
//! engine harness and a scripted remote that can simulate outages,
//! rejections and slow calls.

#![allow(dead_code)]

use async_trait::async_trait;
use auditsync::engine::remote::{
    AuditResultPayload, ChecklistSnapshot, ProjectSnapshot, RemoteApi, UploadedEvidence,
};
use auditsync::shared::audit::{AuditResult, Checklist};
use auditsync::shared::config::SyncConfig;
use auditsync::shared::error::RemoteError;
use auditsync::{LocalStore, NetworkMonitor, SyncEngine};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use uuid::Uuid;

/// Scripted stand-in for the remote system of record
///
/// Responses are popped from per-call scripts; an empty script means
/// success. Every call is appended to `call_log` so tests can assert
/// side-effect ordering.
#[derive(Default)]
pub struct MockRemote {
    save_script: Mutex<VecDeque<Result<(), RemoteError>>>,
    upload_script: Mutex<VecDeque<Result<UploadedEvidence, RemoteError>>>,
    snapshot: Mutex<Option<ProjectSnapshot>>,
    delay: Mutex<Option<Duration>>,
    /// Payloads received by save_audit_result, in order
    pub save_calls: Mutex<Vec<AuditResultPayload>>,
    /// Storage paths received by upload_evidence, in order
    pub upload_calls: Mutex<Vec<String>>,
    /// Every remote call in arrival order, e.g. "upload:projects/..".
    pub call_log: Mutex<Vec<String>>,
}

impl MockRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue the outcome of the next save_audit_result call
    pub fn script_save(&self, outcome: Result<(), RemoteError>) {
        self.save_script.lock().unwrap().push_back(outcome);
    }

    /// Queue the outcome of the next upload_evidence call
    pub fn script_upload(&self, outcome: Result<UploadedEvidence, RemoteError>) {
        self.upload_script.lock().unwrap().push_back(outcome);
    }

    /// Set the snapshot returned by get_project_full_audit_data
    pub fn set_snapshot(&self, snapshot: ProjectSnapshot) {
        *self.snapshot.lock().unwrap() = Some(snapshot);
    }

    /// Delay every remote call by the given duration
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn save_call_count(&self) -> usize {
        self.save_calls.lock().unwrap().len()
    }

    pub fn upload_call_count(&self) -> usize {
        self.upload_calls.lock().unwrap().len()
    }

    async fn apply_delay(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl RemoteApi for MockRemote {
    async fn save_audit_result(&self, payload: &AuditResultPayload) -> Result<(), RemoteError> {
        self.apply_delay().await;
        self.call_log
            .lock()
            .unwrap()
            .push(format!("save:{}", payload.result_id));
        self.save_calls.lock().unwrap().push(payload.clone());
        self.save_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn upload_evidence(
        &self,
        _bytes: &[u8],
        path: &str,
    ) -> Result<UploadedEvidence, RemoteError> {
        self.apply_delay().await;
        self.call_log.lock().unwrap().push(format!("upload:{}", path));
        self.upload_calls.lock().unwrap().push(path.to_string());
        self.upload_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(UploadedEvidence {
                    public_url: format!("https://storage.example.com/{}", path),
                })
            })
    }

    async fn get_project_full_audit_data(
        &self,
        project_id: Uuid,
    ) -> Result<ProjectSnapshot, RemoteError> {
        self.apply_delay().await;
        self.call_log
            .lock()
            .unwrap()
            .push(format!("hydrate:{}", project_id));
        self.snapshot
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| RemoteError::rejected("unknown project"))
    }
}

/// An engine wired to a temp-dir store and a scripted remote
pub struct TestHarness {
    pub engine: SyncEngine,
    pub remote: Arc<MockRemote>,
    pub network: NetworkMonitor,
    pub dir: TempDir,
}

impl TestHarness {
    /// Build a harness with the given initial connectivity
    pub async fn new(initially_online: bool) -> Self {
        Self::with_config(initially_online, SyncConfig::builder().build().unwrap()).await
    }

    /// Build a harness with a custom configuration
    pub async fn with_config(initially_online: bool, config: SyncConfig) -> Self {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("local.db")).await.unwrap();
        let remote = MockRemote::new();
        let network = NetworkMonitor::new(initially_online);
        let engine = SyncEngine::new(config, store, remote.clone(), network.clone());
        Self {
            engine,
            remote,
            network,
            dir,
        }
    }

    /// Seed a pending audit result into the local store
    pub async fn seed_result(&self) -> AuditResult {
        let result = AuditResult::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        self.engine.store().put_result(&result).await.unwrap();
        result
    }
}

/// Install the test log subscriber once; RUST_LOG controls verbosity
fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A one-checklist, one-result snapshot for hydration tests
pub fn sample_snapshot(project_id: Uuid) -> ProjectSnapshot {
    let mut project = auditsync::Project::new("Remote project");
    project.id = project_id;

    let mut checklist = Checklist::new(project_id, "Remote checklist");
    checklist.items.push(auditsync::ChecklistItem {
        id: Uuid::new_v4(),
        requirement: "Emergency exits unobstructed".to_string(),
        category: None,
    });

    let result = AuditResult::new(project_id, checklist.id, checklist.items[0].id);

    ProjectSnapshot {
        project,
        checklists: vec![ChecklistSnapshot {
            checklist,
            results: vec![result],
        }],
    }
}
