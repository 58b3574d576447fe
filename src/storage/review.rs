use uuid::Uuid;

use crate::models::Review;
use crate::{AppError, Result};

use super::Storage;

impl Storage {
    /// Keeps the original creation time when an existing review is edited
    pub async fn upsert_review(&self, mut review: Review) -> Result<Review> {
        let mut reviews = self.reviews.write().await;
        if let Some(existing) = reviews.get(&review.id) {
            review.created = existing.created;
        }
        reviews.insert(review.id, review.clone());
        Ok(review)
    }
    /// Newest first
    pub async fn get_reviews(&self, published_only: bool) -> Result<Vec<Review>> {
        let mut result: Vec<Review> = self
            .reviews
            .read()
            .await
            .values()
            .filter(|r| !published_only || r.published)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created.cmp(&a.created));
        Ok(result)
    }
    pub async fn delete_review(&self, id: Uuid) -> Result<()> {
        match self.reviews.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("Review".to_string())),
        }
    }
    pub async fn publish_review(&self, id: Uuid, published: bool) -> Result<Review> {
        let mut reviews = self.reviews.write().await;
        let review = reviews
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Review".to_string()))?;
        review.published = published;
        Ok(review.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn review(name: &str, published: bool, age_days: i64) -> Review {
        Review {
            id: Uuid::new_v4(),
            name: name.into(),
            comment: "Best rates".into(),
            rating: 5,
            published,
            created: Utc::now() - Duration::days(age_days),
        }
    }

    #[tokio::test]
    async fn publishing_controls_public_listing() {
        let storage = Storage::new();
        let draft = storage.upsert_review(review("Kamal", false, 0)).await.unwrap();
        storage.upsert_review(review("Sadia", true, 5)).await.unwrap();
        assert_eq!(storage.get_reviews(true).await.unwrap().len(), 1);

        storage.publish_review(draft.id, true).await.unwrap();
        let public = storage.get_reviews(true).await.unwrap();
        assert_eq!(public.len(), 2);
        assert_eq!(public[0].name, "Kamal");
    }

    #[tokio::test]
    async fn edit_keeps_created() {
        let storage = Storage::new();
        let original = storage.upsert_review(review("Rahim", true, 3)).await.unwrap();
        let mut edited = original.clone();
        edited.comment = "Changed".into();
        edited.created = Utc::now();
        let saved = storage.upsert_review(edited).await.unwrap();
        assert_eq!(saved.created, original.created);
    }
}
