use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Currency;
use crate::AppError;

/// Payment platforms a customer can exchange between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Paypal,
    Payoneer,
    Skrill,
    Wise,
    Usdt,
    Bkash,
    Nagad,
    Bank,
}

/// What the customer has to tell us to get paid out on a platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PayoutKind {
    Email,
    UsdtAddress,
    MobileWallet,
    BankAccount,
}

/// Our account on a platform the customer sends funds to
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivingAccount {
    pub field_label: &'static str,
    pub value: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper: Option<&'static str>,
}

impl Platform {
    pub const ALL: [Platform; 8] = [
        Platform::Paypal,
        Platform::Payoneer,
        Platform::Skrill,
        Platform::Wise,
        Platform::Usdt,
        Platform::Bkash,
        Platform::Nagad,
        Platform::Bank,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Platform::Paypal => "paypal",
            Platform::Payoneer => "payoneer",
            Platform::Skrill => "skrill",
            Platform::Wise => "wise",
            Platform::Usdt => "usdt",
            Platform::Bkash => "bkash",
            Platform::Nagad => "nagad",
            Platform::Bank => "bank",
        }
    }
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Paypal => "PayPal",
            Platform::Payoneer => "Payoneer",
            Platform::Skrill => "Skrill",
            Platform::Wise => "Wise",
            Platform::Usdt => "USDT (TRC20)",
            Platform::Bkash => "bKash",
            Platform::Nagad => "Nagad",
            Platform::Bank => "Bank Transfer (BDT)",
        }
    }
    /// Currency the platform holds funds in, USDT is treated as pegged to USD
    pub fn currency(&self) -> Currency {
        match self {
            Platform::Paypal
            | Platform::Payoneer
            | Platform::Skrill
            | Platform::Wise
            | Platform::Usdt => Currency::Usd,
            Platform::Bkash | Platform::Nagad | Platform::Bank => Currency::Bdt,
        }
    }
    /// Percentage taken from the receivable amount when paying out on this platform
    pub fn dest_fee_percent(&self) -> f64 {
        match self {
            Platform::Paypal => 0.9,
            Platform::Payoneer => 0.6,
            Platform::Skrill => 0.9,
            Platform::Wise => 0.4,
            Platform::Usdt => 0.2,
            Platform::Bkash => 0.8,
            Platform::Nagad => 0.8,
            Platform::Bank => 0.4,
        }
    }
    pub fn payout_kind(&self) -> PayoutKind {
        match self {
            Platform::Paypal | Platform::Payoneer | Platform::Skrill | Platform::Wise => {
                PayoutKind::Email
            }
            Platform::Usdt => PayoutKind::UsdtAddress,
            Platform::Bkash | Platform::Nagad => PayoutKind::MobileWallet,
            Platform::Bank => PayoutKind::BankAccount,
        }
    }
    pub fn receiving_account(&self) -> ReceivingAccount {
        let (field_label, value, helper) = match self {
            Platform::Paypal => (
                "PayPal Email",
                "example@gmail.com",
                Some("Send as Friends & Family if available."),
            ),
            Platform::Payoneer => ("Payoneer Email", "example@domain.com", None),
            Platform::Skrill => ("Skrill Email", "skrillexample@mail.com", None),
            Platform::Wise => (
                "Wise Email",
                "wiseaccount@mail.com",
                Some("If bank details are required, contact support."),
            ),
            Platform::Usdt => (
                "USDT (TRC20) Address",
                "TN1ExampleTRC20WalletAddress12345",
                Some("Send only USDT on TRON (TRC20)."),
            ),
            Platform::Bkash => (
                "bKash Number",
                "01XXXXXXXXX",
                Some("Send via Personal bKash (Send Money)."),
            ),
            Platform::Nagad => ("Nagad Number", "01XXXXXXXXX", None),
            Platform::Bank => (
                "Bank Account",
                "Account Name: Your Company\nAccount No: 01234567890\nBank: ABC Bank, Banani Branch\nRouting: 0123456",
                Some("Use the exact reference shown below."),
            ),
        };
        ReceivingAccount {
            field_label,
            value,
            helper,
        }
    }
    /// First platform in display order that is not `self`
    pub fn alternative(&self) -> Platform {
        Platform::ALL
            .into_iter()
            .find(|p| p != self)
            .unwrap_or(Platform::Bkash)
    }
}

/// The same platform on both sides is not an exchange, the destination gets swapped out
pub fn resolve_destination(from: Platform, to: Platform) -> Platform {
    if from == to {
        from.alternative()
    } else {
        to
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Platform {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.id() == wanted)
            .ok_or_else(|| AppError::InvalidRequest(format!("unknown platform '{wanted}'")))
    }
}

/// Row of the public platform table
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformInfo {
    pub id: Platform,
    pub label: &'static str,
    pub currency: Currency,
    pub dest_fee_percent: f64,
    pub payout_kind: PayoutKind,
}

impl From<Platform> for PlatformInfo {
    fn from(p: Platform) -> Self {
        Self {
            id: p,
            label: p.label(),
            currency: p.currency(),
            dest_fee_percent: p.dest_fee_percent(),
            payout_kind: p.payout_kind(),
        }
    }
}
