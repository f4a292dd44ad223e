//! Local Checklist Operations
//!
//! Checklists are stored with their items denormalized into a JSON column
//! so a field device can render them without joins while offline.

use crate::engine::local_db::LocalStore;
use crate::shared::audit::{Checklist, ChecklistItem};
use sqlx::{Result as SqlxResult, Row};
use uuid::Uuid;

/// Result type alias for checklist operations
pub type Result<T> = SqlxResult<T>;

impl LocalStore {
    /// Store a checklist, replacing any existing row
    pub async fn put_checklist(&self, checklist: &Checklist) -> Result<()> {
        let items = serde_json::to_string(&checklist.items)
            .map_err(|e| sqlx::Error::Protocol(format!("checklist items encode: {}", e)))?;

        sqlx::query(
            "INSERT OR REPLACE INTO checklists (id, project_id, name, items, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(checklist.id.to_string())
        .bind(checklist.project_id.to_string())
        .bind(&checklist.name)
        .bind(items)
        .bind(checklist.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Get a checklist by ID
    pub async fn get_checklist(&self, checklist_id: Uuid) -> Result<Option<Checklist>> {
        let row = sqlx::query(
            "SELECT id, project_id, name, items, updated_at FROM checklists WHERE id = ?",
        )
        .bind(checklist_id.to_string())
        .fetch_optional(self.pool())
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_checklist(&row)?)),
            None => Ok(None),
        }
    }

    /// Get all checklists for a project
    pub async fn list_project_checklists(&self, project_id: Uuid) -> Result<Vec<Checklist>> {
        let rows = sqlx::query(
            "SELECT id, project_id, name, items, updated_at
             FROM checklists
             WHERE project_id = ?
             ORDER BY name ASC",
        )
        .bind(project_id.to_string())
        .fetch_all(self.pool())
        .await?;

        let mut checklists = Vec::new();
        for row in rows {
            checklists.push(row_to_checklist(&row)?);
        }

        Ok(checklists)
    }

    /// Delete a checklist (explicit eviction only)
    pub async fn delete_checklist(&self, checklist_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM checklists WHERE id = ?")
            .bind(checklist_id.to_string())
            .execute(self.pool())
            .await?;
        Ok(())
    }
}

fn row_to_checklist(row: &sqlx::sqlite::SqliteRow) -> Result<Checklist> {
    let id: String = row.try_get("id")?;
    let project_id: String = row.try_get("project_id")?;
    let items: String = row.try_get("items")?;
    let items: Vec<ChecklistItem> = serde_json::from_str(&items)
        .map_err(|e| sqlx::Error::Protocol(format!("checklist items decode: {}", e)))?;

    Ok(Checklist {
        id: Uuid::parse_str(&id)
            .map_err(|e| sqlx::Error::Protocol(format!("invalid checklist id: {}", e)))?,
        project_id: Uuid::parse_str(&project_id)
            .map_err(|e| sqlx::Error::Protocol(format!("invalid project id: {}", e)))?,
        name: row.try_get("name")?,
        items,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_checklist_roundtrip_with_items() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("local.db")).await.unwrap();

        let mut checklist = Checklist::new(Uuid::new_v4(), "Fire safety");
        checklist.items.push(ChecklistItem {
            id: Uuid::new_v4(),
            requirement: "Extinguishers inspected within 12 months".to_string(),
            category: Some("equipment".to_string()),
        });
        store.put_checklist(&checklist).await.unwrap();

        let loaded = store.get_checklist(checklist.id).await.unwrap().unwrap();
        assert_eq!(loaded, checklist);
    }

    #[tokio::test]
    async fn test_list_by_project() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("local.db")).await.unwrap();

        let project_id = Uuid::new_v4();
        store
            .put_checklist(&Checklist::new(project_id, "B list"))
            .await
            .unwrap();
        store
            .put_checklist(&Checklist::new(project_id, "A list"))
            .await
            .unwrap();
        store
            .put_checklist(&Checklist::new(Uuid::new_v4(), "Other project"))
            .await
            .unwrap();

        let listed = store.list_project_checklists(project_id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "A list");
    }
}
