use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::{oneshot, RwLock};
use tokio::task::JoinHandle;
use tracing::instrument;

use crate::config::Config;
use crate::models::{Currency, RateSnapshot, RateSource, RateTable};
use crate::{AppError, Result};

pub const FALLBACK_WARNING: &str = "Live rates unavailable. Using fallback.";
pub const STALE_WARNING: &str = "Live rates unavailable. Showing last known rates.";

/// Source of USD based exchange rates
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync {
    fn name(&self) -> &str;
    /// Whatever supported rates the provider knows, possibly not all of them
    async fn fetch(&self) -> Result<HashMap<Currency, f64>>;
}

#[derive(Deserialize)]
struct OpenErResponse {
    rates: HashMap<String, f64>,
}

/// open.er-api.com, answers `{ "rates": { "EUR": 0.92, ... } }`
pub struct OpenErApi {
    client: reqwest::Client,
    uri: String,
}
impl OpenErApi {
    pub fn new(client: reqwest::Client, uri: impl Into<String>) -> Self {
        Self {
            client,
            uri: uri.into(),
        }
    }
}

#[async_trait::async_trait]
impl RateProvider for OpenErApi {
    fn name(&self) -> &str {
        "open.er-api"
    }
    async fn fetch(&self) -> Result<HashMap<Currency, f64>> {
        let response: OpenErResponse = self
            .client
            .get(&self.uri)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(supported(response.rates))
    }
}

#[derive(Deserialize)]
struct FawazResponse {
    usd: HashMap<String, f64>,
}

/// fawazahmed0 currency-api over jsDelivr, answers `{ "usd": { "eur": 0.92, ... } }`
pub struct FawazCurrencyApi {
    client: reqwest::Client,
    uri: String,
}
impl FawazCurrencyApi {
    pub fn new(client: reqwest::Client, uri: impl Into<String>) -> Self {
        Self {
            client,
            uri: uri.into(),
        }
    }
}

#[async_trait::async_trait]
impl RateProvider for FawazCurrencyApi {
    fn name(&self) -> &str {
        "fawazahmed0"
    }
    async fn fetch(&self) -> Result<HashMap<Currency, f64>> {
        let response: FawazResponse = self
            .client
            .get(&self.uri)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(supported(response.usd))
    }
}

// keeps known codes with usable values
fn supported(raw: HashMap<String, f64>) -> HashMap<Currency, f64> {
    raw.into_iter()
        .filter(|(_, rate)| rate.is_finite() && *rate > 0.0)
        .filter_map(|(code, rate)| code.parse::<Currency>().ok().map(|c| (c, rate)))
        .collect()
}

/// Shared handle to the current rate snapshot. `None` until the first refresh
/// finished. The snapshot is swapped whole, readers always get a consistent copy.
#[derive(Clone, Default)]
pub struct RateCache {
    inner: Arc<RwLock<Option<RateSnapshot>>>,
}

impl RateCache {
    pub fn with_snapshot(snapshot: RateSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(snapshot))),
        }
    }
    pub async fn snapshot(&self) -> Option<RateSnapshot> {
        self.inner.read().await.clone()
    }
    pub async fn set_live(&self, table: RateTable) {
        *self.inner.write().await = Some(RateSnapshot::live(table));
    }
    /// Applies a failed refresh: a previously live table is kept and marked
    /// stale, with nothing to keep the static table is installed.
    pub async fn degrade(&self) -> RateSource {
        let mut guard = self.inner.write().await;
        let next = match guard.take() {
            Some(mut snapshot) if snapshot.source != RateSource::Fallback => {
                snapshot.source = RateSource::Stale;
                snapshot.warning = Some(STALE_WARNING.to_string());
                snapshot
            }
            _ => RateSnapshot::fallback(FALLBACK_WARNING),
        };
        let source = next.source;
        *guard = Some(next);
        source
    }
}

/// Periodically pulls rates from the providers into a [`RateCache`]
pub struct CurrencyService {
    providers: Vec<Arc<dyn RateProvider>>,
    cache: RateCache,
    interval: Duration,
}

impl CurrencyService {
    pub fn new(providers: Vec<Arc<dyn RateProvider>>, cache: RateCache, interval: Duration) -> Self {
        Self {
            providers,
            cache,
            interval,
        }
    }

    /// Primary and fallback provider from the config
    pub fn from_config(config: &Config, cache: RateCache) -> Result<Self> {
        let client = reqwest::Client::builder()
            .gzip(true)
            .timeout(config.rate_timeout)
            .build()?;
        let providers: Vec<Arc<dyn RateProvider>> = vec![
            Arc::new(OpenErApi::new(client.clone(), &config.primary_rate_uri)),
            Arc::new(FawazCurrencyApi::new(client, &config.fallback_rate_uri)),
        ];
        Ok(Self::new(providers, cache, config.rate_refresh))
    }

    /// Asks providers in order, later ones only fill currencies still missing
    pub async fn fetch_table(&self) -> Result<RateTable> {
        let mut merged: HashMap<Currency, f64> = HashMap::new();
        for provider in &self.providers {
            if complete(&merged) {
                break;
            }
            match provider.fetch().await {
                Ok(rates) => {
                    tracing::debug!("{} returned {} rates", provider.name(), rates.len());
                    for (currency, rate) in rates {
                        merged.entry(currency).or_insert(rate);
                    }
                }
                Err(e) => tracing::error!("Rate provider {} failed: {e}", provider.name()),
            }
        }
        if merged.is_empty() {
            return Err(AppError::RateError("no provider answered".to_string()));
        }
        RateTable::from_rates(&merged)
    }

    #[instrument(name = "refreshing rates", skip_all)]
    pub async fn refresh(&self) {
        let result = self.fetch_table().await;
        apply(&self.cache, result).await;
    }

    /// Starts the refresh loop: one fetch right away, then one per interval
    pub fn spawn(self) -> RateRefresher {
        let (stop_tx, stop_rx) = oneshot::channel();
        let (tx, rx) = unbounded_channel::<Result<RateTable>>();
        let cache = self.cache.clone();
        let generator = tokio::spawn(generator(self, tx, stop_rx));
        let saver = tokio::spawn(saver(rx, cache));
        RateRefresher {
            stop: Some(stop_tx),
            generator,
            saver,
        }
    }
}

fn complete(rates: &HashMap<Currency, f64>) -> bool {
    Currency::ALL
        .iter()
        .all(|c| *c == Currency::Usd || rates.contains_key(c))
}

async fn apply(cache: &RateCache, result: Result<RateTable>) {
    match result {
        Ok(table) => {
            tracing::info!(
                "Rates updated: EUR {} BDT {}",
                table.rate(Currency::Eur),
                table.rate(Currency::Bdt)
            );
            cache.set_live(table).await;
        }
        Err(e) => {
            let source = cache.degrade().await;
            tracing::warn!("Rate refresh failed ({e}), serving {source:?} rates");
        }
    }
}

async fn generator(
    service: CurrencyService,
    tx: UnboundedSender<Result<RateTable>>,
    mut stop: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(service.interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = &mut stop => break,
            _ = ticker.tick() => {
                let result = service.fetch_table().await;
                if tx.send(result).is_err() {
                    tracing::error!("Rate saver is gone, stopping refresh");
                    break;
                }
            }
        }
    }
    tracing::info!("Rate refresh stopped");
}

async fn saver(mut rx: UnboundedReceiver<Result<RateTable>>, cache: RateCache) {
    while let Some(result) = rx.recv().await {
        apply(&cache, result).await;
    }
}

/// Owned handle of the running refresh loop
pub struct RateRefresher {
    stop: Option<oneshot::Sender<()>>,
    generator: JoinHandle<()>,
    saver: JoinHandle<()>,
}

impl RateRefresher {
    /// Stops the loop and waits for the last result to be applied
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Err(e) = (&mut self.generator).await {
            tracing::error!("Rate generator ended abnormally: {e:?}");
        }
        if let Err(e) = (&mut self.saver).await {
            tracing::error!("Rate saver ended abnormally: {e:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        rates: Option<HashMap<Currency, f64>>,
        calls: AtomicUsize,
    }
    impl Fixed {
        fn ok(rates: &[(Currency, f64)]) -> Arc<Self> {
            Arc::new(Self {
                rates: Some(rates.iter().copied().collect()),
                calls: AtomicUsize::new(0),
            })
        }
        fn failing() -> Arc<Self> {
            Arc::new(Self {
                rates: None,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl RateProvider for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }
        async fn fetch(&self) -> Result<HashMap<Currency, f64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rates
                .clone()
                .ok_or_else(|| AppError::ReqwestError("connection refused".to_string()))
        }
    }

    fn service(providers: Vec<Arc<Fixed>>, cache: RateCache) -> CurrencyService {
        let providers = providers
            .into_iter()
            .map(|p| p as Arc<dyn RateProvider>)
            .collect();
        CurrencyService::new(providers, cache, Duration::from_secs(60))
    }

    #[test]
    fn keeps_only_supported_positive_rates() {
        let raw = HashMap::from([
            ("EUR".to_string(), 0.9),
            ("bdt".to_string(), 120.0),
            ("GBP".to_string(), 0.8),
            ("USD".to_string(), -1.0),
        ]);
        let rates = supported(raw);
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[&Currency::Bdt], 120.0);
    }

    #[tokio::test]
    async fn fallback_provider_only_fills_gaps() {
        let primary = Fixed::ok(&[(Currency::Eur, 0.9)]);
        let secondary = Fixed::ok(&[(Currency::Eur, 0.5), (Currency::Bdt, 121.0)]);
        let s = service(vec![primary, secondary], RateCache::default());
        let table = s.fetch_table().await.unwrap();
        assert_eq!(table.rate(Currency::Eur), 0.9);
        assert_eq!(table.rate(Currency::Bdt), 121.0);
    }

    #[tokio::test]
    async fn complete_primary_skips_fallback() {
        let primary = Fixed::ok(&[(Currency::Eur, 0.9), (Currency::Bdt, 119.0)]);
        let secondary = Fixed::ok(&[(Currency::Eur, 0.5), (Currency::Bdt, 121.0)]);
        let s = service(vec![primary, secondary.clone()], RateCache::default());
        s.fetch_table().await.unwrap();
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn first_failure_installs_static_table() {
        let cache = RateCache::default();
        let s = service(vec![Fixed::failing(), Fixed::failing()], cache.clone());
        s.refresh().await;
        let snapshot = cache.snapshot().await.unwrap();
        assert_eq!(snapshot.source, RateSource::Fallback);
        assert_eq!(snapshot.rates, RateTable::fallback());
        assert_eq!(snapshot.warning.as_deref(), Some(FALLBACK_WARNING));
    }

    #[tokio::test]
    async fn failure_after_success_keeps_last_known() {
        let cache = RateCache::default();
        let good = Fixed::ok(&[(Currency::Eur, 0.95), (Currency::Bdt, 122.0)]);
        service(vec![good], cache.clone()).refresh().await;
        service(vec![Fixed::failing()], cache.clone()).refresh().await;
        let snapshot = cache.snapshot().await.unwrap();
        assert_eq!(snapshot.source, RateSource::Stale);
        assert_eq!(snapshot.rates.rate(Currency::Bdt), 122.0);
        assert_eq!(snapshot.warning.as_deref(), Some(STALE_WARNING));
    }

    #[tokio::test]
    async fn incomplete_data_is_a_failure() {
        let cache = RateCache::default();
        let s = service(vec![Fixed::ok(&[(Currency::Eur, 0.9)])], cache.clone());
        assert!(s.fetch_table().await.is_err());
        s.refresh().await;
        assert_eq!(cache.snapshot().await.unwrap().source, RateSource::Fallback);
    }

    #[tokio::test(start_paused = true)]
    async fn refresher_fetches_on_start_and_stops() {
        let cache = RateCache::default();
        let provider = Fixed::ok(&[(Currency::Eur, 0.9), (Currency::Bdt, 119.0)]);
        let refresher = service(vec![provider.clone()], cache.clone()).spawn();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(cache.snapshot().await.unwrap().source, RateSource::Live);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        refresher.stop().await;
    }
}
