//! Local Evidence Image Operations
//!
//! Raw captured photo bytes live here until the sync processor confirms
//! the remote upload, at which point the row is marked uploaded and gets
//! its permanent URL. The UI never mutates an image after capture.

use crate::engine::local_db::LocalStore;
use crate::shared::audit::EvidenceImage;
use sqlx::{Result as SqlxResult, Row};
use uuid::Uuid;

/// Result type alias for evidence image operations
pub type Result<T> = SqlxResult<T>;

impl LocalStore {
    /// Store a captured evidence image
    pub async fn put_image(&self, image: &EvidenceImage) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO evidence_images (
                id, result_id, project_id, bytes, uploaded, remote_url, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&image.id)
        .bind(image.result_id.to_string())
        .bind(image.project_id.to_string())
        .bind(&image.bytes)
        .bind(image.uploaded)
        .bind(&image.remote_url)
        .bind(image.created_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Get an evidence image by ID
    pub async fn get_image(&self, image_id: &str) -> Result<Option<EvidenceImage>> {
        let row = sqlx::query(
            "SELECT id, result_id, project_id, bytes, uploaded, remote_url, created_at
             FROM evidence_images
             WHERE id = ?",
        )
        .bind(image_id)
        .fetch_optional(self.pool())
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_image(&row)?)),
            None => Ok(None),
        }
    }

    /// Mark an image as uploaded with its permanent URL
    pub async fn mark_image_uploaded(&self, image_id: &str, remote_url: &str) -> Result<()> {
        sqlx::query("UPDATE evidence_images SET uploaded = 1, remote_url = ? WHERE id = ?")
            .bind(remote_url)
            .bind(image_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Get all images not yet uploaded, oldest first
    pub async fn list_pending_images(&self) -> Result<Vec<EvidenceImage>> {
        let rows = sqlx::query(
            "SELECT id, result_id, project_id, bytes, uploaded, remote_url, created_at
             FROM evidence_images
             WHERE uploaded = 0
             ORDER BY created_at ASC",
        )
        .fetch_all(self.pool())
        .await?;

        let mut images = Vec::new();
        for row in rows {
            images.push(row_to_image(&row)?);
        }

        Ok(images)
    }
}

fn row_to_image(row: &sqlx::sqlite::SqliteRow) -> Result<EvidenceImage> {
    let result_id: String = row.try_get("result_id")?;
    let project_id: String = row.try_get("project_id")?;

    Ok(EvidenceImage {
        id: row.try_get("id")?,
        result_id: Uuid::parse_str(&result_id)
            .map_err(|e| sqlx::Error::Protocol(format!("invalid result id: {}", e)))?,
        project_id: Uuid::parse_str(&project_id)
            .map_err(|e| sqlx::Error::Protocol(format!("invalid project id: {}", e)))?,
        bytes: row.try_get("bytes")?,
        uploaded: row.try_get("uploaded")?,
        remote_url: row.try_get("remote_url")?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_image_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("local.db")).await.unwrap();

        let image = EvidenceImage::new(Uuid::new_v4(), Uuid::new_v4(), vec![0xFF, 0xD8, 0xFF]);
        store.put_image(&image).await.unwrap();

        let loaded = store.get_image(&image.id).await.unwrap().unwrap();
        assert_eq!(loaded, image);
        assert!(store.get_image("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mark_uploaded() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("local.db")).await.unwrap();

        let image = EvidenceImage::new(Uuid::new_v4(), Uuid::new_v4(), vec![1, 2, 3]);
        store.put_image(&image).await.unwrap();
        assert_eq!(store.list_pending_images().await.unwrap().len(), 1);

        store
            .mark_image_uploaded(&image.id, "https://storage/x.jpg")
            .await
            .unwrap();

        let loaded = store.get_image(&image.id).await.unwrap().unwrap();
        assert!(loaded.uploaded);
        assert_eq!(loaded.remote_url.as_deref(), Some("https://storage/x.jpg"));
        assert!(store.list_pending_images().await.unwrap().is_empty());
    }
}
