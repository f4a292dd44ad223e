//! # Sync Queue Operations
//!
//! The durable log of pending mutation intents, plus dead letters and sync
//! metadata. Insertion order is the only order: the AUTOINCREMENT row ID is
//! authoritative, the creation timestamp is diagnostics only.
//!
//! ## Features
//!
//! - **Durable Queue**: operations survive a process restart
//! - **Failure Tracking**: retry count and last error per operation
//! - **Dead Letters**: permanently rejected operations moved aside
//! - **Sync Metadata**: last-sync timestamp and friends
//!
//! ## Usage
//!
//! ```rust,no_run
//! use auditsync::engine::local_db::LocalStore;
//! use auditsync::shared::audit::SyncOperation;
//! # use uuid::Uuid;
//!
//! # async fn example(store: LocalStore) -> sqlx::Result<()> {
//! let operation = SyncOperation::UploadImage {
//!     image_id: "r42-1700000000000".to_string(),
//!     result_id: Uuid::new_v4(),
//! };
//! let id = store.enqueue_operation(&operation).await?;
//!
//! for op in store.pending_operations().await? {
//!     // deliver remotely, then:
//!     store.remove_operation(op.id).await?;
//! }
//! # Ok(())
//! # }
//! ```

use crate::engine::local_db::LocalStore;
use crate::shared::audit::{DeadLetter, QueuedOperation, SyncOperation};
use chrono::{DateTime, Utc};
use sqlx::{Result as SqlxResult, Row};

/// Result type alias for queue operations
pub type Result<T> = SqlxResult<T>;

/// Metadata key for the last fully attempted sync pass
const LAST_SYNC_TIME_KEY: &str = "last_sync_time";

impl LocalStore {
    /// Append an operation to the sync queue
    ///
    /// Returns the store-assigned queue ID. IDs increase monotonically and
    /// define the processing order.
    pub async fn enqueue_operation(&self, operation: &SyncOperation) -> Result<i64> {
        let data = serde_json::to_string(operation)
            .map_err(|e| sqlx::Error::Protocol(format!("operation encode: {}", e)))?;

        let result = sqlx::query(
            "INSERT INTO sync_queue (operation_type, target_id, data, created_at, retry_count)
             VALUES (?, ?, ?, ?, 0)",
        )
        .bind(operation.kind())
        .bind(operation.target_id())
        .bind(data)
        .bind(Utc::now())
        .execute(self.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Get a stable snapshot of pending operations in queue order
    pub async fn pending_operations(&self) -> Result<Vec<QueuedOperation>> {
        let rows = sqlx::query(
            "SELECT id, operation_type, data, created_at, retry_count, last_attempt, error_message
             FROM sync_queue
             ORDER BY id ASC",
        )
        .fetch_all(self.pool())
        .await?;

        let mut operations = Vec::new();
        for row in rows {
            let data: String = row.try_get("data")?;

            // Skip rows a newer schema may have written
            let operation = match serde_json::from_str::<SyncOperation>(&data) {
                Ok(op) => op,
                Err(_) => continue,
            };

            operations.push(QueuedOperation {
                id: row.try_get("id")?,
                operation,
                created_at: row.try_get("created_at")?,
                retry_count: row.try_get("retry_count")?,
                last_attempt: row.try_get("last_attempt")?,
                error_message: row.try_get("error_message")?,
            });
        }

        Ok(operations)
    }

    /// Remove a completed operation
    ///
    /// Removing an absent ID is a no-op, not an error.
    pub async fn remove_operation(&self, operation_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM sync_queue WHERE id = ?")
            .bind(operation_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Record a failed delivery attempt for an operation
    pub async fn record_operation_failure(
        &self,
        operation_id: i64,
        error_message: &str,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE sync_queue SET
                retry_count = retry_count + 1,
                last_attempt = ?,
                error_message = ?
             WHERE id = ?",
        )
        .bind(Utc::now())
        .bind(error_message)
        .bind(operation_id)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Move a permanently rejected operation to the dead letter table
    ///
    /// The move is a single transaction, so a crash cannot lose the
    /// operation or leave it in both places. Dead-lettering an absent ID
    /// is a no-op.
    pub async fn dead_letter_operation(&self, operation_id: i64, error_message: &str) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        let row = sqlx::query(
            "SELECT operation_type, target_id, data, created_at FROM sync_queue WHERE id = ?",
        )
        .bind(operation_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(());
        };

        let operation_type: String = row.try_get("operation_type")?;
        let target_id: String = row.try_get("target_id")?;
        let data: String = row.try_get("data")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;

        sqlx::query(
            "INSERT INTO dead_letters (
                queue_id, operation_type, target_id, data, created_at, failed_at, error_message
            ) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(operation_id)
        .bind(operation_type)
        .bind(target_id)
        .bind(data)
        .bind(created_at)
        .bind(Utc::now())
        .bind(error_message)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM sync_queue WHERE id = ?")
            .bind(operation_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Get all dead letters, oldest first
    pub async fn dead_letters(&self) -> Result<Vec<DeadLetter>> {
        let rows = sqlx::query(
            "SELECT id, queue_id, data, created_at, failed_at, error_message
             FROM dead_letters
             ORDER BY id ASC",
        )
        .fetch_all(self.pool())
        .await?;

        let mut letters = Vec::new();
        for row in rows {
            let data: String = row.try_get("data")?;
            let operation = match serde_json::from_str::<SyncOperation>(&data) {
                Ok(op) => op,
                Err(_) => continue,
            };

            letters.push(DeadLetter {
                id: row.try_get("id")?,
                queue_id: row.try_get("queue_id")?,
                operation,
                created_at: row.try_get("created_at")?,
                failed_at: row.try_get("failed_at")?,
                error_message: row.try_get("error_message")?,
            });
        }

        Ok(letters)
    }

    /// Remove dead letters older than the given age
    pub async fn cleanup_dead_letters(&self, max_age_days: i64) -> Result<u64> {
        let cutoff = Utc::now() - chrono::Duration::days(max_age_days);

        let result = sqlx::query("DELETE FROM dead_letters WHERE failed_at < ?")
            .bind(cutoff)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected())
    }

    /// Set sync metadata
    pub async fn set_sync_metadata(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO sync_metadata (key, value, updated_at)
             VALUES (?, ?, ?)",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Get sync metadata
    pub async fn get_sync_metadata(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM sync_metadata WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool())
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    /// Get the last fully attempted sync pass timestamp
    pub async fn get_last_sync_time(&self) -> Result<Option<DateTime<Utc>>> {
        let value = self.get_sync_metadata(LAST_SYNC_TIME_KEY).await?;
        Ok(value.and_then(|v| v.parse().ok()))
    }

    /// Record the current time as the last sync pass
    pub async fn set_last_sync_time(&self) -> Result<()> {
        self.set_sync_metadata(LAST_SYNC_TIME_KEY, &Utc::now().to_rfc3339())
            .await
    }
}
