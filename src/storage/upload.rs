use uuid::Uuid;

use crate::models::Upload;
use crate::{AppError, Result};

use super::{Storage, MAX_UPLOADS};

impl Storage {
    /// Keeps the newest uploads, the oldest one goes when full
    pub async fn save_upload(&self, upload: Upload) -> Result<Upload> {
        let mut uploads = self.uploads.write().await;
        while uploads.len() >= MAX_UPLOADS {
            uploads.pop_front();
        }
        tracing::info!(
            "Upload {} for trade {} ({} bytes)",
            upload.id,
            upload.trade_id,
            upload.bytes.len()
        );
        uploads.push_back(upload.clone());
        Ok(upload)
    }
    pub async fn get_upload(&self, trade_id: &str, id: Uuid) -> Result<Upload> {
        self.uploads
            .read()
            .await
            .iter()
            .find(|u| u.id == id && u.trade_id == trade_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Upload".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn upload(trade_id: &str) -> Upload {
        Upload::new(trade_id, "image/png", Bytes::from_static(b"png")).unwrap()
    }

    #[tokio::test]
    async fn uploads_are_bounded_and_scoped_to_trade() {
        let storage = Storage::new();
        let first = storage.save_upload(upload("XCX-1")).await.unwrap();
        assert!(storage.get_upload("XCX-1", first.id).await.is_ok());
        assert!(storage.get_upload("XCX-2", first.id).await.is_err());

        for _ in 0..MAX_UPLOADS {
            storage.save_upload(upload("XCX-1")).await.unwrap();
        }
        assert_eq!(storage.uploads.read().await.len(), MAX_UPLOADS);
        assert!(storage.get_upload("XCX-1", first.id).await.is_err());
    }
}
