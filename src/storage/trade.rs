use crate::models::{ChatMessage, ReceiveDetails, Trade, TradeStatus, LATEST_MAX_ROWS};
use crate::{AppError, Result};

use super::{Storage, TradeRecord, TradeStore, MAX_MESSAGES_PER_TRADE, MAX_TRADES};

fn not_found() -> AppError {
    AppError::NotFound("Trade".to_string())
}

#[async_trait::async_trait]
impl TradeStore for Storage {
    async fn create_trade(&self, trade: Trade) -> Result<Trade> {
        let mut trades = self.trades.write().await;
        if trades.contains_key(&trade.id) {
            return Err(AppError::Conflict(format!("Trade {} already exists", trade.id)));
        }
        while trades.len() >= MAX_TRADES {
            let Some(oldest) = trades
                .values()
                .min_by_key(|r| r.trade.created_at)
                .map(|r| r.trade.id.clone())
            else {
                break;
            };
            trades.remove(&oldest);
            self.uploads.write().await.retain(|u| u.trade_id != oldest);
            tracing::debug!("Trade {oldest} evicted");
        }
        trades.insert(
            trade.id.clone(),
            TradeRecord {
                trade: trade.clone(),
                messages: Vec::new(),
            },
        );
        tracing::info!("Trade {} started: {} -> {}", trade.id, trade.send, trade.recv);
        Ok(trade)
    }
    async fn get_trade(&self, id: &str) -> Result<Trade> {
        self.trades
            .read()
            .await
            .get(id)
            .map(|r| r.trade.clone())
            .ok_or_else(not_found)
    }
    async fn set_status(&self, id: &str, status: TradeStatus) -> Result<Trade> {
        let mut trades = self.trades.write().await;
        let record = trades.get_mut(id).ok_or_else(not_found)?;
        let current = record.trade.status;
        if !current.can_move_to(status) {
            return Err(AppError::Conflict(format!(
                "Trade {id} can not move from {current} to {status}"
            )));
        }
        record.trade.status = status;
        tracing::info!("Trade {id}: {current} -> {status}");
        Ok(record.trade.clone())
    }
    async fn save_details(&self, id: &str, details: ReceiveDetails) -> Result<Trade> {
        let mut trades = self.trades.write().await;
        let record = trades.get_mut(id).ok_or_else(not_found)?;
        record.trade.receive_details = Some(details);
        Ok(record.trade.clone())
    }
    async fn append_message(&self, id: &str, message: ChatMessage) -> Result<ChatMessage> {
        let mut trades = self.trades.write().await;
        let record = trades.get_mut(id).ok_or_else(not_found)?;
        if record.messages.len() >= MAX_MESSAGES_PER_TRADE {
            return Err(AppError::Conflict(format!(
                "Trade {id} reached its chat limit of {MAX_MESSAGES_PER_TRADE} messages"
            )));
        }
        record.messages.push(message.clone());
        Ok(message)
    }
    async fn messages(&self, id: &str) -> Result<Vec<ChatMessage>> {
        self.trades
            .read()
            .await
            .get(id)
            .map(|r| r.messages.clone())
            .ok_or_else(not_found)
    }
    async fn latest(&self) -> Result<Vec<Trade>> {
        let trades = self.trades.read().await;
        let mut newest: Vec<&Trade> = trades.values().map(|r| &r.trade).collect();
        newest.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(newest.into_iter().take(LATEST_MAX_ROWS).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChatInput, ChatRole, Currency, Platform};
    use chrono::{DateTime, Duration, Utc};

    fn trade(id: &str) -> Trade {
        trade_at(id, Utc::now())
    }

    fn trade_at(id: &str, created_at: DateTime<Utc>) -> Trade {
        Trade {
            id: id.into(),
            send: Platform::Payoneer,
            recv: Platform::Bkash,
            amount: 100.0,
            ccy: Currency::Usd,
            username: "guest".into(),
            created_at,
            status: TradeStatus::Started,
            quote: None,
            receive_details: None,
        }
    }

    #[tokio::test]
    async fn status_walks_forward_only() {
        let storage = Storage::new();
        storage.create_trade(trade("XCX-1")).await.unwrap();
        let t = storage.set_status("XCX-1", TradeStatus::Pending).await.unwrap();
        assert_eq!(t.status, TradeStatus::Pending);
        let err = storage.set_status("XCX-1", TradeStatus::Started).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        storage.set_status("XCX-1", TradeStatus::Completed).await.unwrap();
    }

    #[tokio::test]
    async fn chat_is_kept_per_trade() {
        let storage = Storage::new();
        storage.create_trade(trade("XCX-1")).await.unwrap();
        storage.create_trade(trade("XCX-2")).await.unwrap();
        let message = ChatInput {
            text: Some("hello".into()),
            image_url: None,
        }
        .into_message(ChatRole::User)
        .unwrap();
        storage.append_message("XCX-1", message).await.unwrap();
        assert_eq!(storage.messages("XCX-1").await.unwrap().len(), 1);
        assert!(storage.messages("XCX-2").await.unwrap().is_empty());
        assert!(storage.messages("XCX-3").await.is_err());
    }

    #[tokio::test]
    async fn duplicate_id_conflicts() {
        let storage = Storage::new();
        storage.create_trade(trade("XCX-1")).await.unwrap();
        assert!(storage.create_trade(trade("XCX-1")).await.is_err());
    }

    #[tokio::test]
    async fn oldest_trades_are_evicted() {
        let storage = Storage::new();
        let start = Utc::now() - Duration::days(1);
        for i in 0..MAX_TRADES + 5 {
            let id = format!("XCX-{i}");
            storage
                .create_trade(trade_at(&id, start + Duration::seconds(i as i64)))
                .await
                .unwrap();
        }
        assert_eq!(storage.trades.read().await.len(), MAX_TRADES);
        assert!(storage.get_trade("XCX-0").await.is_err());
        assert!(storage.get_trade("XCX-4").await.is_err());
        assert!(storage.get_trade("XCX-5").await.is_ok());

        let latest = storage.latest().await.unwrap();
        assert_eq!(latest.len(), LATEST_MAX_ROWS);
        assert_eq!(latest[0].id, format!("XCX-{}", MAX_TRADES + 4));
    }

    #[tokio::test]
    async fn chat_is_capped_per_trade() {
        let storage = Storage::new();
        storage.create_trade(trade("XCX-1")).await.unwrap();
        for _ in 0..MAX_MESSAGES_PER_TRADE {
            let message = ChatInput {
                text: Some("ping".into()),
                image_url: None,
            }
            .into_message(ChatRole::User)
            .unwrap();
            storage.append_message("XCX-1", message).await.unwrap();
        }
        let one_more = ChatInput {
            text: Some("ping".into()),
            image_url: None,
        }
        .into_message(ChatRole::User)
        .unwrap();
        let err = storage.append_message("XCX-1", one_more).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
