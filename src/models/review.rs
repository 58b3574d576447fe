use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppError, Result};

#[derive(Debug, Clone, Serialize)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub comment: String,
    pub rating: u8,
    pub published: bool,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewInput {
    #[serde(rename = "_id")]
    pub id: Option<Uuid>,
    pub name: String,
    pub comment: String,
    pub rating: u8,
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishInput {
    pub published: bool,
}

impl ReviewInput {
    pub fn into_review(self) -> Result<Review> {
        let name = self.name.trim().to_string();
        let comment = self.comment.trim().to_string();
        if name.is_empty() || comment.is_empty() {
            return Err(AppError::Validation("Name and comment are required".to_string()));
        }
        if !(1..=5).contains(&self.rating) {
            return Err(AppError::Validation("Rating must be between 1 and 5".to_string()));
        }
        Ok(Review {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            name,
            comment,
            rating: self.rating,
            published: self.published,
            created: Utc::now(),
        })
    }
}
