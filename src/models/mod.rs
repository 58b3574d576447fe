mod admin;
mod currency;
mod faq;
mod platform;
mod quote;
mod rates;
mod reserve;
mod review;
mod support;
mod trade;
mod upload;
pub use admin::*;
pub use currency::*;
pub use faq::*;
pub use platform::*;
pub use quote::*;
pub use rates::*;
pub use reserve::*;
pub use review::*;
pub use support::*;
pub use trade::*;
pub use upload::*;

use std::sync::Arc;

use serde::Serialize;

use crate::config::Config;
use crate::currency_service::RateCache;
use crate::quote_service::QuoteService;
use crate::storage::{Storage, TradeStore};

/// Envelope every endpoint answers with
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<T>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn items(items: Vec<T>) -> Self {
        Self {
            ok: true,
            items: Some(items),
            item: None,
            error: None,
        }
    }
    pub fn item(item: T) -> Self {
        Self {
            ok: true,
            items: None,
            item: Some(item),
            error: None,
        }
    }
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: None,
            item: None,
            error: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    pub fn ok() -> Self {
        Self {
            ok: true,
            items: None,
            item: None,
            error: None,
        }
    }
}

/// Shared data for the handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub storage: Arc<Storage>,
    pub trades: Arc<dyn TradeStore>,
    pub rates: RateCache,
    pub quotes: QuoteService,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<Storage>, rates: RateCache) -> Self {
        Self {
            config: Arc::new(config),
            trades: storage.clone(),
            storage,
            quotes: QuoteService::new(rates.clone()),
            rates,
        }
    }
}
