use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use derive_builder::Builder;

use crate::{AppError, Result};

// USD based rate providers
pub const OPEN_ER_API_URI: &str = "https://open.er-api.com/v6/latest/USD";
pub const FAWAZ_CURRENCY_API_URI: &str =
    "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies/usd.json";

pub const MAX_SESSION_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Runtime settings of the service
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct Config {
    #[builder(default = "SocketAddr::from(([0, 0, 0, 0], 4000))")]
    pub bind_addr: SocketAddr,
    #[builder(default = "OPEN_ER_API_URI.to_string()")]
    pub primary_rate_uri: String,
    #[builder(default = "FAWAZ_CURRENCY_API_URI.to_string()")]
    pub fallback_rate_uri: String,
    /// pause between two rate refreshes
    #[builder(default = "Duration::from_secs(60)")]
    pub rate_refresh: Duration,
    #[builder(default = "Duration::from_secs(8)")]
    pub rate_timeout: Duration,
    #[builder(default = "Duration::from_secs(10)")]
    pub request_timeout: Duration,
    #[builder(default, setter(into, strip_option))]
    pub admin_email: Option<String>,
    /// hex encoded sha256 of the admin password
    #[builder(default, setter(into, strip_option))]
    pub admin_password_sha256: Option<String>,
    #[builder(default = "Duration::from_secs(12 * 60 * 60)")]
    pub session_ttl: Duration,
    #[builder(default, setter(into, strip_option))]
    pub cors_origin: Option<String>,
    #[builder(default = "true")]
    pub seed_demo_data: bool,
}

impl ConfigBuilder {
    fn validate(&self) -> core::result::Result<(), String> {
        if self.rate_refresh.is_some_and(|d| d.is_zero()) {
            return Err("RATE_REFRESH_SECS must be greater than zero".to_string());
        }
        if let Some(ttl) = self.session_ttl {
            if ttl.is_zero() || ttl > MAX_SESSION_TTL {
                return Err("SESSION_TTL_HOURS must be between 1 and 720".to_string());
            }
        }
        if let Some(Some(hash)) = &self.admin_password_sha256 {
            if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err("ADMIN_PASSWORD_SHA256 must be 64 hex characters".to_string());
            }
        }
        Ok(())
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reads settings from the process environment, missing keys keep their defaults
    pub fn from_env() -> Result<Self> {
        let mut builder = ConfigBuilder::default();
        if let Some(addr) = env_var("BIND_ADDR") {
            builder.bind_addr(addr.parse::<SocketAddr>()?);
        }
        if let Some(uri) = env_var("RATE_PRIMARY_URI") {
            builder.primary_rate_uri(uri);
        }
        if let Some(uri) = env_var("RATE_FALLBACK_URI") {
            builder.fallback_rate_uri(uri);
        }
        if let Some(secs) = env_parse::<u64>("RATE_REFRESH_SECS")? {
            builder.rate_refresh(Duration::from_secs(secs));
        }
        if let Some(secs) = env_parse::<u64>("RATE_TIMEOUT_SECS")? {
            builder.rate_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = env_parse::<u64>("REQUEST_TIMEOUT_SECS")? {
            builder.request_timeout(Duration::from_secs(secs));
        }
        if let Some(email) = env_var("ADMIN_EMAIL") {
            builder.admin_email(email);
        }
        if let Some(hash) = env_var("ADMIN_PASSWORD_SHA256") {
            builder.admin_password_sha256(hash.to_lowercase());
        }
        if let Some(hours) = env_parse::<u64>("SESSION_TTL_HOURS")? {
            let secs = hours.checked_mul(60 * 60).ok_or_else(|| {
                AppError::ConfigError(format!("SESSION_TTL_HOURS is too large: {hours}"))
            })?;
            builder.session_ttl(Duration::from_secs(secs));
        }
        if let Some(origin) = env_var("CORS_ORIGIN") {
            builder.cors_origin(origin);
        }
        if let Some(seed) = env_parse::<bool>("SEED_DEMO_DATA")? {
            builder.seed_demo_data(seed);
        }
        Ok(builder.build()?)
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>> {
    match env_var(key) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::ConfigError(format!("{key} has invalid value '{raw}'"))),
        None => Ok(None),
    }
}
