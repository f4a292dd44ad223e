//! Local Project Operations
//!
//! Cached project records mirrored from the remote system. Puts overwrite
//! whole rows; hydration relies on that to make remote state authoritative
//! at download time.

use crate::engine::local_db::LocalStore;
use crate::shared::audit::Project;
use sqlx::{Result as SqlxResult, Row};
use uuid::Uuid;

/// Result type alias for project operations
pub type Result<T> = SqlxResult<T>;

impl LocalStore {
    /// Store a project, replacing any existing row
    pub async fn put_project(&self, project: &Project) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO projects (id, name, customer, updated_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(project.id.to_string())
        .bind(&project.name)
        .bind(&project.customer)
        .bind(project.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Get a project by ID
    pub async fn get_project(&self, project_id: Uuid) -> Result<Option<Project>> {
        let row = sqlx::query("SELECT id, name, customer, updated_at FROM projects WHERE id = ?")
            .bind(project_id.to_string())
            .fetch_optional(self.pool())
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_project(&row)?)),
            None => Ok(None),
        }
    }

    /// Delete a project (explicit eviction only)
    pub async fn delete_project(&self, project_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(project_id.to_string())
            .execute(self.pool())
            .await?;
        Ok(())
    }
}

fn row_to_project(row: &sqlx::sqlite::SqliteRow) -> Result<Project> {
    let id: String = row.try_get("id")?;
    Ok(Project {
        id: Uuid::parse_str(&id)
            .map_err(|e| sqlx::Error::Protocol(format!("invalid project id: {}", e)))?,
        name: row.try_get("name")?,
        customer: row.try_get("customer")?,
        updated_at: row.try_get("updated_at")?,
    })
}
