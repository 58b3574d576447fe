use uuid::Uuid;

use crate::models::Faq;
use crate::{AppError, Result};

use super::Storage;

impl Storage {
    pub async fn upsert_faq(&self, faq: Faq) -> Result<Faq> {
        self.faqs.write().await.insert(faq.id, faq.clone());
        Ok(faq)
    }
    /// All entries ordered for display, `active_only` for the public page
    pub async fn get_faqs(&self, active_only: bool) -> Result<Vec<Faq>> {
        let mut result: Vec<Faq> = self
            .faqs
            .read()
            .await
            .values()
            .filter(|f| !active_only || f.is_active)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.question.cmp(&b.question)));
        Ok(result)
    }
    pub async fn delete_faq(&self, id: Uuid) -> Result<()> {
        match self.faqs.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("FAQ".to_string())),
        }
    }
}
