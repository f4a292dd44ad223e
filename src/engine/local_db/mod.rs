//! # Local Durable Store
//!
//! This module provides the on-device SQLite store for offline-first
//! operation. It holds cached copies of remote entities, raw evidence
//! blobs, the durable sync queue, dead letters, and sync metadata, all of
//! which survive a process restart: an interrupted sync resumes from
//! exactly where the queue says it stopped.
//!
//! ## Key Components
//!
//! - `LocalStore`: connection pool and schema management
//! - `schema.rs`: schema version constants
//! - `projects.rs` / `checklists.rs` / `results.rs`: cached entity CRUD
//! - `images.rs`: evidence blob storage
//! - `queue.rs`: sync queue, dead letters, and sync metadata
//!
//! Nothing in this component garbage-collects entities on its own;
//! lifecycle decisions belong to callers.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use auditsync::engine::local_db::LocalStore;
//!
//! # async fn example() -> sqlx::Result<()> {
//! let store = LocalStore::open("audit/local.db").await?;
//! let stats = store.stats().await?;
//! println!("{} operations pending", stats.pending_operations);
//! # Ok(())
//! # }
//! ```

pub mod checklists;
pub mod images;
pub mod projects;
pub mod queue;
pub mod results;
pub mod schema;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Result as SqlxResult, SqlitePool};
use std::path::Path;

/// Result type for local store operations
pub type Result<T> = SqlxResult<T>;

/// Local durable store backed by SQLite
///
/// Manages the connection pool and provides the per-collection operations
/// implemented in the sibling modules. Cloning is cheap (the pool is
/// internally reference-counted).
#[derive(Debug, Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    /// Open or create the local database at the given path
    ///
    /// Creates the file and parent directories if missing and initializes
    /// the schema. Uses WAL mode for better concurrency.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let store = Self { pool };
        store.init_schema().await?;

        Ok(store)
    }

    /// Initialize database schema
    ///
    /// Creates all tables and runs any pending migrations.
    async fn init_schema(&self) -> Result<()> {
        sqlx::raw_sql(include_str!("schema.sql"))
            .execute(&self.pool)
            .await?;

        self.run_migrations().await?;

        Ok(())
    }

    /// Run database migrations
    ///
    /// Checks the current schema version and applies any pending migrations.
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        let current_version: (i32,) =
            sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
                .fetch_one(&self.pool)
                .await
                .unwrap_or((0,));

        if schema::needs_migration(current_version.0) {
            for version in schema::get_pending_migrations(current_version.0) {
                self.apply_migration(version).await?;
            }
        }

        Ok(())
    }

    /// Record a migration as applied
    ///
    /// Version 1 is the baseline schema created by `schema.sql`; later
    /// versions would alter tables here before recording themselves.
    async fn apply_migration(&self, version: i32) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO schema_migrations (version, applied_at) VALUES (?, ?)")
            .bind(version)
            .bind(chrono::Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Get connection pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get store statistics
    ///
    /// Returns entity counts and the pending-operation count, which the UI
    /// surfaces as the "waiting to sync" badge.
    pub async fn stats(&self) -> Result<StoreStats> {
        let project_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;

        let checklist_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM checklists")
            .fetch_one(&self.pool)
            .await?;

        let result_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM audit_results")
            .fetch_one(&self.pool)
            .await?;

        let pending_images: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM evidence_images WHERE uploaded = 0")
                .fetch_one(&self.pool)
                .await?;

        let pending_operations: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sync_queue")
            .fetch_one(&self.pool)
            .await?;

        let dead_letters: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM dead_letters")
            .fetch_one(&self.pool)
            .await?;

        Ok(StoreStats {
            project_count: project_count.0 as u64,
            checklist_count: checklist_count.0 as u64,
            result_count: result_count.0 as u64,
            pending_images: pending_images.0 as u64,
            pending_operations: pending_operations.0 as u64,
            dead_letters: dead_letters.0 as u64,
        })
    }
}

/// Store statistics
#[derive(Debug, Clone)]
pub struct StoreStats {
    /// Cached projects
    pub project_count: u64,
    /// Cached checklists
    pub checklist_count: u64,
    /// Cached audit results
    pub result_count: u64,
    /// Evidence images not yet uploaded
    pub pending_images: u64,
    /// Operations waiting in the sync queue
    pub pending_operations: u64,
    /// Permanently rejected operations
    pub dead_letters: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> (LocalStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("local.db")).await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn test_store_creation() {
        let (store, _dir) = temp_store().await;
        let stats = store.stats().await.unwrap();
        assert_eq!(stats.project_count, 0);
        assert_eq!(stats.pending_operations, 0);
        assert_eq!(stats.dead_letters, 0);
    }

    #[tokio::test]
    async fn test_reopen_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.db");
        LocalStore::open(&path).await.unwrap();
        let store = LocalStore::open(&path).await.unwrap();
        assert_eq!(store.stats().await.unwrap().result_count, 0);
    }
}
