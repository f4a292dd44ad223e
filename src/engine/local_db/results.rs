//! Local Audit Result Operations
//!
//! CRUD for the findings an auditor records offline. The photo list is a
//! JSON column of permanent URLs; URLs only appear there after the owning
//! evidence image has been confirmed uploaded.

use crate::engine::local_db::LocalStore;
use crate::shared::audit::{AuditResult, AuditStatus};
use sqlx::{Result as SqlxResult, Row};
use uuid::Uuid;

/// Result type alias for audit result operations
pub type Result<T> = SqlxResult<T>;

impl LocalStore {
    /// Store an audit result, replacing any existing row
    pub async fn put_result(&self, result: &AuditResult) -> Result<()> {
        let photos = serde_json::to_string(&result.photos)
            .map_err(|e| sqlx::Error::Protocol(format!("photo list encode: {}", e)))?;

        sqlx::query(
            "INSERT OR REPLACE INTO audit_results (
                id, project_id, checklist_id, item_id, status, comment, photos, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(result.id.to_string())
        .bind(result.project_id.to_string())
        .bind(result.checklist_id.to_string())
        .bind(result.item_id.to_string())
        .bind(result.status.as_str())
        .bind(&result.comment)
        .bind(photos)
        .bind(result.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Get an audit result by ID
    pub async fn get_result(&self, result_id: Uuid) -> Result<Option<AuditResult>> {
        let row = sqlx::query(
            "SELECT id, project_id, checklist_id, item_id, status, comment, photos, updated_at
             FROM audit_results
             WHERE id = ?",
        )
        .bind(result_id.to_string())
        .fetch_optional(self.pool())
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_result(&row)?)),
            None => Ok(None),
        }
    }

    /// Get all results for a checklist
    pub async fn list_checklist_results(&self, checklist_id: Uuid) -> Result<Vec<AuditResult>> {
        let rows = sqlx::query(
            "SELECT id, project_id, checklist_id, item_id, status, comment, photos, updated_at
             FROM audit_results
             WHERE checklist_id = ?
             ORDER BY updated_at ASC",
        )
        .bind(checklist_id.to_string())
        .fetch_all(self.pool())
        .await?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row_to_result(&row)?);
        }

        Ok(results)
    }

    /// Delete an audit result (explicit eviction only)
    pub async fn delete_result(&self, result_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM audit_results WHERE id = ?")
            .bind(result_id.to_string())
            .execute(self.pool())
            .await?;
        Ok(())
    }
}

fn row_to_result(row: &sqlx::sqlite::SqliteRow) -> Result<AuditResult> {
    let parse = |field: &str, value: String| {
        Uuid::parse_str(&value)
            .map_err(|e| sqlx::Error::Protocol(format!("invalid {}: {}", field, e)))
    };

    let status: String = row.try_get("status")?;
    let photos: String = row.try_get("photos")?;
    let photos: Vec<String> = serde_json::from_str(&photos)
        .map_err(|e| sqlx::Error::Protocol(format!("photo list decode: {}", e)))?;

    Ok(AuditResult {
        id: parse("result id", row.try_get("id")?)?,
        project_id: parse("project id", row.try_get("project_id")?)?,
        checklist_id: parse("checklist id", row.try_get("checklist_id")?)?,
        item_id: parse("item id", row.try_get("item_id")?)?,
        status: AuditStatus::from_str(&status),
        comment: row.try_get("comment")?,
        photos,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_result_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("local.db")).await.unwrap();

        let mut result = AuditResult::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        result.status = AuditStatus::Failed;
        result.comment = Some("guard rail missing".to_string());
        result.photos = vec!["https://storage/audit/1.jpg".to_string()];
        store.put_result(&result).await.unwrap();

        let loaded = store.get_result(result.id).await.unwrap().unwrap();
        assert_eq!(loaded, result);
    }

    #[tokio::test]
    async fn test_list_checklist_results() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("local.db")).await.unwrap();

        let checklist_id = Uuid::new_v4();
        for _ in 0..3 {
            let result = AuditResult::new(Uuid::new_v4(), checklist_id, Uuid::new_v4());
            store.put_result(&result).await.unwrap();
        }
        store
            .put_result(&AuditResult::new(
                Uuid::new_v4(),
                Uuid::new_v4(),
                Uuid::new_v4(),
            ))
            .await
            .unwrap();

        let listed = store.list_checklist_results(checklist_id).await.unwrap();
        assert_eq!(listed.len(), 3);
    }
}
