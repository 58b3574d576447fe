use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppError, Result};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub order: i32,
    pub is_active: bool,
}

/// Create when `_id` is missing, update otherwise
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqInput {
    #[serde(rename = "_id")]
    pub id: Option<Uuid>,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

impl FaqInput {
    pub fn into_faq(self) -> Result<Faq> {
        let question = self.question.trim().to_string();
        let answer = self.answer.trim().to_string();
        if question.is_empty() || answer.is_empty() {
            return Err(AppError::Validation(
                "Question and answer are required".to_string(),
            ));
        }
        Ok(Faq {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            question,
            answer,
            order: self.order,
            is_active: self.is_active,
        })
    }
}
