use serde::{Deserialize, Serialize};

use super::{Currency, Platform, RateSource};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteRequest {
    pub amount: f64,
    pub amount_currency: Currency,
    pub from: Platform,
    pub to: Platform,
}

/// Computed exchange amounts, `send_amount` is in the source platform's
/// currency and both receive amounts are in the destination's
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub send_amount: f64,
    pub send_currency: Currency,
    pub receive_before_fee: f64,
    pub receive_after_fee: f64,
    pub receive_currency: Currency,
    pub cross_rate: f64,
    pub fee_percent: f64,
}

/// Raw widget input, everything arrives as text
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteQuery {
    #[serde(default)]
    pub amount: String,
    pub amount_ccy: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Amounts formatted for display, placeholders when there is no quote
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDisplay {
    pub you_give: String,
    pub you_get_before_fee: String,
    pub you_get: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_line: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteView {
    pub amount: f64,
    pub amount_ccy: Currency,
    pub from: Platform,
    /// destination after same-platform resolution
    pub to: Platform,
    pub quote: Option<Quote>,
    pub display: QuoteDisplay,
    pub loading_rates: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_source: Option<RateSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
