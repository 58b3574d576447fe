use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Currency;
use crate::utils::{format_reserve, round_to};
use crate::{AppError, Result};

/// Funds available for payouts on a platform, kept in USD
#[derive(Debug, Clone, Serialize)]
pub struct Reserve {
    pub id: String,
    pub label: String,
    #[serde(rename = "amountUSD")]
    pub amount_usd: f64,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReserveInput {
    pub id: String,
    pub label: String,
    #[serde(rename = "amountUSD")]
    pub amount_usd: f64,
}

impl TryFrom<ReserveInput> for Reserve {
    type Error = AppError;

    fn try_from(value: ReserveInput) -> Result<Self> {
        let id = value.id.trim().to_lowercase();
        let label = value.label.trim().to_string();
        if id.is_empty() {
            return Err(AppError::Validation("Reserve id is required".to_string()));
        }
        if label.is_empty() {
            return Err(AppError::Validation("Reserve label is required".to_string()));
        }
        if !value.amount_usd.is_finite() || value.amount_usd < 0.0 {
            return Err(AppError::Validation(
                "amountUSD must be a non-negative number".to_string(),
            ));
        }
        Ok(Self {
            id,
            label,
            amount_usd: value.amount_usd,
            updated: Utc::now(),
        })
    }
}

/// Currency bucket a reserve is grouped under
pub fn reserve_category(id: &str) -> &'static str {
    match id {
        "usdt" => "USDT",
        "paypal" | "payoneer" | "skrill" | "wise" | "cashapp" | "zelle" | "chime" | "venmo" => "USD",
        "monzo" | "atom" => "GBP",
        "lamiabanca" | "unicredit" => "EUR",
        "scotiabank" | "rbc" | "etransfer" => "CAD",
        "bkash" | "nagad" | "bank" => "BDT",
        _ => "OTHER",
    }
}

// taka wallets are always shown in taka
fn always_bdt(id: &str) -> bool {
    matches!(id, "bkash" | "nagad" | "bank")
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveView {
    pub id: String,
    pub label: String,
    pub category: &'static str,
    #[serde(rename = "amountUSD")]
    pub amount_usd: f64,
    pub currency: Currency,
    pub display: String,
    pub live_fx: bool,
    pub usd_to_bdt: f64,
}

impl ReserveView {
    pub fn render(reserve: &Reserve, currency: Currency, usd_to_bdt: f64) -> Self {
        let (currency, live_fx) = if always_bdt(&reserve.id) {
            (Currency::Bdt, true)
        } else {
            (currency, false)
        };
        let value = match currency {
            Currency::Bdt => reserve.amount_usd * usd_to_bdt,
            _ => reserve.amount_usd,
        };
        Self {
            id: reserve.id.clone(),
            label: reserve.label.clone(),
            category: reserve_category(&reserve.id),
            amount_usd: reserve.amount_usd,
            currency,
            display: format_reserve(value, currency),
            live_fx,
            usd_to_bdt: round_to(usd_to_bdt, 4),
        }
    }
}

/// Public reserves listing, biggest first
pub fn render_reserves(
    mut reserves: Vec<Reserve>,
    currency: Currency,
    usd_to_bdt: f64,
    limit: Option<usize>,
) -> Result<Vec<ReserveView>> {
    if currency == Currency::Eur {
        return Err(AppError::InvalidRequest(
            "reserves are shown in USD or BDT".to_string(),
        ));
    }
    reserves.sort_by(|a, b| b.amount_usd.total_cmp(&a.amount_usd));
    Ok(reserves
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|r| ReserveView::render(r, currency, usd_to_bdt))
        .collect())
}
