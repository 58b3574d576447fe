use chrono::{DateTime, Utc};

use crate::models::Currency;

/// Shown instead of an amount that can not be computed
pub const PLACEHOLDER: &str = "—";

/// Cleans what a user typed into the amount box: digits and the first dot
/// survive, later dots are dropped. Empty input stays empty.
pub fn sanitize_amount_input(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    let mut seen_dot = false;
    input
        .chars()
        .filter(|c| {
            if *c == '.' {
                let first = !seen_dot;
                seen_dot = true;
                first
            } else {
                c.is_ascii_digit()
            }
        })
        .collect()
}

/// Parsed positive amount, anything else becomes 0
pub fn parse_amount(input: &str) -> f64 {
    sanitize_amount_input(input)
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n > 0.0)
        .unwrap_or(0.0)
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// `1234567.891, 2` -> `1,234,567.89`
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Quote amount with its currency code, `11705.60 BDT`
pub fn format_amount(value: f64, currency: Currency) -> String {
    format!("{:.*} {currency}", currency.display_decimals(), value)
}

/// Reserve amount: dollars keep cents, taka is shown whole
pub fn format_reserve(value: f64, currency: Currency) -> String {
    match currency {
        Currency::Bdt => format!("BDT {}", group_thousands(value.round(), 0)),
        Currency::Usd => format!("${}", group_thousands(value, 2)),
        Currency::Eur => format!("€{}", group_thousands(value, 2)),
    }
}

/// `42s ago`, `5m ago`, `3h ago`, `2d ago`; future timestamps count as now
pub fn relative_time(now: DateTime<Utc>, ts: DateTime<Utc>) -> String {
    let s = (now - ts).num_seconds().max(0);
    let m = s / 60;
    let h = m / 60;
    let d = h / 24;
    if d > 0 {
        format!("{d}d ago")
    } else if h > 0 {
        format!("{h}h ago")
    } else if m > 0 {
        format!("{m}m ago")
    } else {
        format!("{s}s ago")
    }
}
