use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Currency;
use crate::{AppError, Result};

/// Units of each currency per 1 USD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateTable {
    #[serde(flatten)]
    rates: BTreeMap<Currency, f64>,
}

impl RateTable {
    /// Builds a table out of provider data. USD is pinned to 1, every other
    /// supported currency has to be present with a finite positive rate.
    pub fn from_rates(input: &HashMap<Currency, f64>) -> Result<Self> {
        let mut rates = BTreeMap::new();
        rates.insert(Currency::Usd, 1.0);
        for currency in Currency::ALL.into_iter().filter(|c| *c != Currency::Usd) {
            match input.get(&currency) {
                Some(rate) if rate.is_finite() && *rate > 0.0 => {
                    rates.insert(currency, *rate);
                }
                Some(rate) => {
                    return Err(AppError::RateError(format!("bad {currency} rate {rate}")))
                }
                None => return Err(AppError::RateError(format!("missing {currency} rate"))),
            }
        }
        Ok(Self { rates })
    }

    /// Static table used when no provider has answered yet
    pub fn fallback() -> Self {
        let rates = BTreeMap::from([
            (Currency::Usd, 1.0),
            (Currency::Eur, 0.92),
            (Currency::Bdt, 118.0),
        ]);
        Self { rates }
    }

    pub fn rate(&self, currency: Currency) -> f64 {
        self.rates.get(&currency).copied().unwrap_or(1.0)
    }
    pub fn to_usd(&self, amount: f64, currency: Currency) -> f64 {
        if currency == Currency::Usd {
            amount
        } else {
            amount / self.rate(currency)
        }
    }
    pub fn from_usd(&self, amount: f64, currency: Currency) -> f64 {
        amount * self.rate(currency)
    }
    /// `from` -> USD -> `to`
    pub fn cross_rate(&self, from: Currency, to: Currency) -> f64 {
        (1.0 / self.rate(from)) * self.rate(to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    Live,
    /// last live table kept after a failed refresh
    Stale,
    Fallback,
}

/// Rate table together with where and when it came from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSnapshot {
    pub rates: RateTable,
    pub source: RateSource,
    pub updated: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl RateSnapshot {
    pub fn live(rates: RateTable) -> Self {
        Self {
            rates,
            source: RateSource::Live,
            updated: Utc::now(),
            warning: None,
        }
    }
    pub fn fallback(warning: impl Into<String>) -> Self {
        Self {
            rates: RateTable::fallback(),
            source: RateSource::Fallback,
            updated: Utc::now(),
            warning: Some(warning.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(eur: f64, bdt: f64) -> Result<RateTable> {
        RateTable::from_rates(&HashMap::from([(Currency::Eur, eur), (Currency::Bdt, bdt)]))
    }

    #[test]
    fn usd_is_always_one() {
        let input = HashMap::from([
            (Currency::Usd, 3.0),
            (Currency::Eur, 0.9),
            (Currency::Bdt, 120.0),
        ]);
        let t = RateTable::from_rates(&input).unwrap();
        assert_eq!(t.rate(Currency::Usd), 1.0);
        assert_eq!(RateTable::fallback().rate(Currency::Usd), 1.0);
    }

    #[test]
    fn rejects_missing_or_non_positive_rates() {
        assert!(table(0.0, 118.0).is_err());
        assert!(table(0.9, f64::NAN).is_err());
        let only_eur = HashMap::from([(Currency::Eur, 0.9)]);
        assert!(RateTable::from_rates(&only_eur).is_err());
    }

    #[test]
    fn usd_round_trip_keeps_amount() {
        let t = table(0.92, 118.0).unwrap();
        for currency in Currency::ALL {
            let back = t.from_usd(t.to_usd(250.75, currency), currency);
            assert!((back - 250.75).abs() < 1e-9);
        }
    }

    #[test]
    fn cross_rate_pivots_through_usd() {
        let t = table(0.5, 100.0).unwrap();
        assert!((t.cross_rate(Currency::Eur, Currency::Bdt) - 200.0).abs() < 1e-9);
        assert!((t.cross_rate(Currency::Bdt, Currency::Bdt) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn serializes_as_flat_map() {
        let json = serde_json::to_value(RateTable::fallback()).unwrap();
        assert_eq!(json["USD"], 1.0);
        assert_eq!(json["BDT"], 118.0);
    }
}
