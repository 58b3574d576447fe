use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{AppError, Result};

pub const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

/// Payment screenshot attached to a trade chat
#[derive(Debug, Clone)]
pub struct Upload {
    pub id: Uuid,
    pub trade_id: String,
    pub content_type: String,
    pub bytes: Bytes,
    pub created: DateTime<Utc>,
}

impl Upload {
    pub fn new(trade_id: &str, content_type: &str, bytes: Bytes) -> Result<Self> {
        let content_type = content_type.trim().to_lowercase();
        if !content_type.starts_with("image/") || content_type.len() == "image/".len() {
            return Err(AppError::Validation(
                "Only image files can be uploaded.".to_string(),
            ));
        }
        if bytes.is_empty() {
            return Err(AppError::Validation("The uploaded file is empty.".to_string()));
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::Validation(format!(
                "Images can be at most {} MB.",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            trade_id: trade_id.to_string(),
            content_type,
            bytes,
            created: Utc::now(),
        })
    }

    /// Where the chat finds the image
    pub fn url(&self) -> String {
        format!("/api/trades/{}/uploads/{}", self.trade_id, self.id)
    }
}
