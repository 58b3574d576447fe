use chrono::Utc;
use uuid::Uuid;

use crate::models::AdminSession;
use crate::{AppError, Result};

use super::Storage;

impl Storage {
    pub async fn create_session(&self, email: &str, ttl: std::time::Duration) -> Result<AdminSession> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AppError::ConfigError(format!("session ttl: {e}")))?;
        let session = AdminSession {
            id: Uuid::new_v4(),
            email: email.to_string(),
            expires_at: Utc::now() + ttl,
        };
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        sessions.retain(|_, s| !s.is_expired(now));
        sessions.insert(session.id, session.clone());
        Ok(session)
    }
    /// Live session for the id, expired ones are dropped on the way
    pub async fn get_session(&self, id: Uuid) -> Option<AdminSession> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get(&id) {
            Some(s) if !s.is_expired(now) => Some(s.clone()),
            Some(_) => {
                sessions.remove(&id);
                None
            }
            None => None,
        }
    }
    pub async fn delete_session(&self, id: Uuid) {
        self.sessions.write().await.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn session_lifecycle() {
        let storage = Storage::new();
        let session = storage
            .create_session("admin@example.com", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(storage.get_session(session.id).await.is_some());
        storage.delete_session(session.id).await;
        assert!(storage.get_session(session.id).await.is_none());
    }

    #[tokio::test]
    async fn expired_session_is_gone() {
        let storage = Storage::new();
        let session = storage
            .create_session("admin@example.com", Duration::ZERO)
            .await
            .unwrap();
        assert!(storage.get_session(session.id).await.is_none());
    }

    #[tokio::test]
    async fn unrepresentable_ttl_is_an_error() {
        let storage = Storage::new();
        let result = storage
            .create_session("admin@example.com", Duration::from_secs(u64::MAX))
            .await;
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
