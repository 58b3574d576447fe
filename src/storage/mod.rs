mod faq;
mod reserve;
mod review;
mod seed;
mod session;
mod support;
mod trade;
mod upload;

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    AdminSession, ChatMessage, Faq, ReceiveDetails, Reserve, Review, SupportTicket, Trade,
    TradeStatus, Upload,
};
use crate::Result;

/// Trade records and their chat. Kept behind a trait so the exchange flow does
/// not care whether trades live in this process or in another service.
#[async_trait::async_trait]
pub trait TradeStore: Send + Sync {
    async fn create_trade(&self, trade: Trade) -> Result<Trade>;
    async fn get_trade(&self, id: &str) -> Result<Trade>;
    /// Fails with a conflict when the current status can not move to `status`
    async fn set_status(&self, id: &str, status: TradeStatus) -> Result<Trade>;
    async fn save_details(&self, id: &str, details: ReceiveDetails) -> Result<Trade>;
    async fn append_message(&self, id: &str, message: ChatMessage) -> Result<ChatMessage>;
    async fn messages(&self, id: &str) -> Result<Vec<ChatMessage>>;
    /// Newest first, at most `LATEST_MAX_ROWS`
    async fn latest(&self) -> Result<Vec<Trade>>;
}

/// Oldest trades are evicted past this many
pub const MAX_TRADES: usize = 2_000;
pub const MAX_MESSAGES_PER_TRADE: usize = 200;
pub const MAX_UPLOADS: usize = 100;
pub const MAX_TICKETS: usize = 1_000;

struct TradeRecord {
    trade: Trade,
    messages: Vec<ChatMessage>,
}

/// In-process store for everything the site persists
#[derive(Default)]
pub struct Storage {
    reserves: RwLock<HashMap<String, Reserve>>,
    faqs: RwLock<HashMap<Uuid, Faq>>,
    reviews: RwLock<HashMap<Uuid, Review>>,
    trades: RwLock<HashMap<String, TradeRecord>>,
    tickets: RwLock<Vec<SupportTicket>>,
    sessions: RwLock<HashMap<Uuid, AdminSession>>,
    uploads: RwLock<VecDeque<Upload>>,
}

impl Storage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Storage filled with the marketing site's demo content
    pub async fn seeded() -> Arc<Self> {
        let storage = Self::default();
        seed::fill(&storage).await;
        Arc::new(storage)
    }
}
