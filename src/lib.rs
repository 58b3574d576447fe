pub mod auth;
pub mod config;
pub mod currency_service;
mod error;
pub mod models;
pub mod quote_service;
pub mod routes;
pub mod storage;
pub mod utils;

pub use error::{AppError, Result};

use config::Config;
use currency_service::{CurrencyService, RateCache};
use models::AppState;
use storage::Storage;

pub struct Application {
    config: Config,
}
impl Application {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
    /// Serves the API until ctrl-c, the rate refresher lives exactly as long
    pub async fn run(self) -> Result<()> {
        let addr = self.config.bind_addr;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::Custom(format!("can not bind {addr}: {e}")))?;
        let storage = if self.config.seed_demo_data {
            Storage::seeded().await
        } else {
            Storage::new()
        };
        let rates = RateCache::default();
        let refresher = CurrencyService::from_config(&self.config, rates.clone())?.spawn();
        tracing::info!("Rate refresher started");

        let state = AppState::new(self.config, storage, rates);
        let app = routes::init(state);
        tracing::info!("Listening on {addr}");
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        refresher.stop().await;
        served.map_err(|e| AppError::Custom(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {e}");
        return;
    }
    tracing::info!("Shutting down");
}
