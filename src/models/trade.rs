use std::fmt::Display;

use chrono::{DateTime, Utc};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Currency, PayoutKind, Platform, Quote, ReceivingAccount};
use crate::utils::relative_time;
use crate::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeStatus {
    Started,
    Pending,
    Completed,
    Refunded,
}

impl TradeStatus {
    /// Maps legacy and mixed-case status strings onto the current set
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "started" => TradeStatus::Started,
            "accepted" | "complete" | "completed" => TradeStatus::Completed,
            "rejected" | "refund" | "refunded" | "cancelled" | "canceled" => TradeStatus::Refunded,
            _ => TradeStatus::Pending,
        }
    }

    /// Started -> Pending -> Completed, refunds from any open state
    pub fn can_move_to(&self, next: TradeStatus) -> bool {
        matches!(
            (self, next),
            (TradeStatus::Started, TradeStatus::Pending)
                | (TradeStatus::Pending, TradeStatus::Completed)
                | (TradeStatus::Started, TradeStatus::Refunded)
                | (TradeStatus::Pending, TradeStatus::Refunded)
        )
    }
}

impl Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// `XCX-<unix millis>-<0..9999>`
pub fn new_trade_id() -> String {
    let suffix = rand::thread_rng().gen_range(0..9999);
    format!("XCX-{}-{suffix}", Utc::now().timestamp_millis())
}

/// Where the customer wants to be paid, fields depend on the destination
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceiveDetails {
    pub email: String,
    pub usdt_address: String,
    pub bkash_number: String,
    pub nagad_number: String,
    pub bank_account_name: String,
    pub bank_account_no: String,
    pub bank_name: String,
    pub bank_routing: String,
    pub note: String,
}

fn required(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(AppError::Validation(message.to_string()))
    } else {
        Ok(())
    }
}

impl ReceiveDetails {
    pub fn validate(&self, destination: Platform) -> Result<()> {
        match destination.payout_kind() {
            PayoutKind::Email => {
                let email = Regex::new(r"^\S+@\S+\.\S+$").map_err(|e| AppError::Custom(e.to_string()))?;
                if !email.is_match(self.email.trim()) {
                    return Err(AppError::Validation(format!(
                        "Please enter a valid {} email.",
                        destination.label()
                    )));
                }
                Ok(())
            }
            PayoutKind::UsdtAddress => {
                let address = self.usdt_address.trim();
                // TRON addresses are base58, 34 chars starting with T
                if address.len() != 34 || !address.starts_with('T') {
                    return Err(AppError::Validation(
                        "Please enter a valid USDT (TRC20) address.".to_string(),
                    ));
                }
                Ok(())
            }
            PayoutKind::MobileWallet => {
                let number = match destination {
                    Platform::Nagad => &self.nagad_number,
                    _ => &self.bkash_number,
                };
                required(number, &format!("Please enter your {} number.", destination.label()))
            }
            PayoutKind::BankAccount => {
                required(&self.bank_account_name, "Please enter the account name.")?;
                required(&self.bank_account_no, "Please enter the account number.")?;
                required(&self.bank_name, "Please enter the bank name.")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub role: ChatRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// unix millis
    pub ts: i64,
}

pub const MAX_MESSAGE_CHARS: usize = 2_000;
const MAX_IMAGE_URL_LEN: usize = 2_048;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatInput {
    pub text: Option<String>,
    pub image_url: Option<String>,
}

impl ChatInput {
    pub fn into_message(self, role: ChatRole) -> Result<ChatMessage> {
        let text = self.text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        let image_url = self
            .image_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        if text.is_none() && image_url.is_none() {
            return Err(AppError::Validation("Message is empty".to_string()));
        }
        if text.as_ref().is_some_and(|t| t.chars().count() > MAX_MESSAGE_CHARS) {
            return Err(AppError::Validation(format!(
                "Messages can be at most {MAX_MESSAGE_CHARS} characters."
            )));
        }
        if image_url.as_ref().is_some_and(|u| u.len() > MAX_IMAGE_URL_LEN) {
            return Err(AppError::Validation("Image link is too long.".to_string()));
        }
        Ok(ChatMessage {
            id: Uuid::new_v4(),
            role,
            text,
            image_url,
            ts: Utc::now().timestamp_millis(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub send: Platform,
    pub recv: Platform,
    pub amount: f64,
    pub ccy: Currency,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub status: TradeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<Quote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receive_details: Option<ReceiveDetails>,
}

/// Exchange form submission, raw text like the quote widget
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeInput {
    pub amount: String,
    pub amount_ccy: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusInput {
    pub status: String,
}

/// Trade as the exchange page needs it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeView {
    #[serde(flatten)]
    pub trade: Trade,
    pub pay_to: ReceivingAccount,
    pub payout_kind: PayoutKind,
}

impl From<Trade> for TradeView {
    fn from(trade: Trade) -> Self {
        Self {
            pay_to: trade.send.receiving_account(),
            payout_kind: trade.recv.payout_kind(),
            trade,
        }
    }
}

/// Row of the latest trades table
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRow {
    pub id: String,
    pub send: Platform,
    pub recv: Platform,
    pub amount: f64,
    pub ccy: Currency,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub age: String,
    pub status: TradeStatus,
}

impl TradeRow {
    pub fn from_trade(trade: &Trade, now: DateTime<Utc>) -> Self {
        Self {
            id: trade.id.clone(),
            send: trade.send,
            recv: trade.recv,
            amount: trade.amount,
            ccy: trade.ccy,
            username: trade.username.clone(),
            created_at: trade.created_at,
            age: relative_time(now, trade.created_at),
            status: trade.status,
        }
    }
}

pub const LATEST_PAGE_SIZE: usize = 10;
pub const LATEST_MAX_ROWS: usize = 500;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePage {
    pub items: Vec<TradeRow>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

/// Newest first, fixed page size, page clamped into range
pub fn paginate(mut trades: Vec<Trade>, page: usize, now: DateTime<Utc>) -> TradePage {
    trades.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    trades.truncate(LATEST_MAX_ROWS);
    let total = trades.len();
    let total_pages = total.div_ceil(LATEST_PAGE_SIZE).max(1);
    let page = page.clamp(1, total_pages);
    let items = trades
        .iter()
        .skip((page - 1) * LATEST_PAGE_SIZE)
        .take(LATEST_PAGE_SIZE)
        .map(|t| TradeRow::from_trade(t, now))
        .collect();
    TradePage {
        items,
        page,
        total_pages,
        total,
    }
}
