use crate::currency_service::RateCache;
use crate::models::{
    resolve_destination, Currency, Platform, Quote, QuoteDisplay, QuoteQuery, QuoteRequest,
    QuoteView, RateTable,
};
use crate::utils::{format_amount, parse_amount, PLACEHOLDER};
use crate::Result;

/// Turns an amount in any supported currency into what the customer sends on
/// the source platform and what arrives on the destination after its fee.
///
/// There is no quote for a non-positive amount, for the same platform on
/// both sides, or while no rate table is known.
pub fn estimate(request: &QuoteRequest, rates: Option<&RateTable>) -> Option<Quote> {
    let rates = rates?;
    if !request.amount.is_finite() || request.amount <= 0.0 || request.from == request.to {
        return None;
    }
    let send_currency = request.from.currency();
    let receive_currency = request.to.currency();

    let amount_usd = rates.to_usd(request.amount, request.amount_currency);
    // no fee on the sending side
    let send_amount = rates.from_usd(amount_usd, send_currency);
    let cross_rate = rates.cross_rate(send_currency, receive_currency);
    let receive_before_fee = send_amount * cross_rate;
    let fee_percent = request.to.dest_fee_percent();
    let receive_after_fee = receive_before_fee * (1.0 - fee_percent / 100.0);

    Some(Quote {
        send_amount,
        send_currency,
        receive_before_fee,
        receive_after_fee,
        receive_currency,
        cross_rate,
        fee_percent,
    })
}

// effective rate, independent of amount precision
const RATE_LINE_DECIMALS: usize = 4;

/// Quote widget backend: parses raw input and prices it against the current rates
#[derive(Clone)]
pub struct QuoteService {
    rates: RateCache,
}

impl QuoteService {
    pub fn new(rates: RateCache) -> Self {
        Self { rates }
    }

    pub async fn quote(&self, query: &QuoteQuery) -> Result<QuoteView> {
        let amount_ccy = match query.amount_ccy.as_deref() {
            Some(code) => code.parse::<Currency>()?,
            None => Currency::Usd,
        };
        let from = match query.from.as_deref() {
            Some(id) => id.parse::<Platform>()?,
            None => Platform::Payoneer,
        };
        let to = match query.to.as_deref() {
            Some(id) => id.parse::<Platform>()?,
            None => Platform::Bkash,
        };
        let request = QuoteRequest {
            amount: parse_amount(&query.amount),
            amount_currency: amount_ccy,
            from,
            to: resolve_destination(from, to),
        };
        Ok(self.price(request).await)
    }

    /// Prices an already validated request against one snapshot of the cache
    pub async fn price(&self, request: QuoteRequest) -> QuoteView {
        let snapshot = self.rates.snapshot().await;
        let quote = estimate(&request, snapshot.as_ref().map(|s| &s.rates));
        let rate_line = snapshot.as_ref().map(|s| {
            let from = request.from.currency();
            let to = request.to.currency();
            format!(
                "1 {from} ≈ {:.*} {to}",
                RATE_LINE_DECIMALS,
                s.rates.cross_rate(from, to)
            )
        });
        let display = match &quote {
            Some(q) => QuoteDisplay {
                you_give: format_amount(q.send_amount, q.send_currency),
                you_get_before_fee: format_amount(q.receive_before_fee, q.receive_currency),
                you_get: format_amount(q.receive_after_fee, q.receive_currency),
                rate_line,
            },
            None => QuoteDisplay {
                you_give: PLACEHOLDER.to_string(),
                you_get_before_fee: PLACEHOLDER.to_string(),
                you_get: PLACEHOLDER.to_string(),
                rate_line,
            },
        };
        QuoteView {
            amount: request.amount,
            amount_ccy: request.amount_currency,
            from: request.from,
            to: request.to,
            quote,
            display,
            loading_rates: snapshot.is_none(),
            rate_source: snapshot.as_ref().map(|s| s.source),
            updated: snapshot.as_ref().map(|s| s.updated),
            warning: snapshot.and_then(|s| s.warning),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency_service::{FALLBACK_WARNING, STALE_WARNING};
    use crate::models::{RateSnapshot, RateSource};
    use std::collections::HashMap;

    fn rates(eur: f64, bdt: f64) -> RateTable {
        RateTable::from_rates(&HashMap::from([(Currency::Eur, eur), (Currency::Bdt, bdt)])).unwrap()
    }

    fn request(amount: f64, ccy: Currency, from: Platform, to: Platform) -> QuoteRequest {
        QuoteRequest {
            amount,
            amount_currency: ccy,
            from,
            to,
        }
    }

    #[test]
    fn payoneer_to_bkash_example() {
        let table = rates(0.92, 118.0);
        let q = estimate(
            &request(100.0, Currency::Usd, Platform::Payoneer, Platform::Bkash),
            Some(&table),
        )
        .unwrap();
        assert_eq!(q.send_currency, Currency::Usd);
        assert_eq!(q.receive_currency, Currency::Bdt);
        assert!((q.send_amount - 100.0).abs() < 1e-9);
        assert!((q.receive_before_fee - 11800.0).abs() < 1e-9);
        assert!((q.receive_after_fee - 11705.6).abs() < 1e-6);
    }

    #[test]
    fn fee_is_applied_to_receivable_exactly() {
        let table = rates(0.87, 121.35);
        for from in Platform::ALL {
            for to in Platform::ALL.into_iter().filter(|p| *p != from) {
                for ccy in Currency::ALL {
                    let q = estimate(&request(37.5, ccy, from, to), Some(&table)).unwrap();
                    let expected = q.receive_before_fee * (1.0 - to.dest_fee_percent() / 100.0);
                    assert_eq!(q.receive_after_fee, expected);
                }
            }
        }
    }

    #[test]
    fn same_settlement_currency_has_unit_cross_rate() {
        let table = rates(0.91, 117.2);
        let q = estimate(
            &request(50.0, Currency::Eur, Platform::Bkash, Platform::Nagad),
            Some(&table),
        )
        .unwrap();
        assert!((q.cross_rate - 1.0).abs() < 1e-12);
        assert!((q.receive_before_fee - q.send_amount).abs() < 1e-9);
        assert!(q.receive_after_fee < q.receive_before_fee);
    }

    #[test]
    fn input_currency_is_converted_to_source_currency() {
        let table = rates(0.5, 100.0);
        let q = estimate(
            &request(10.0, Currency::Eur, Platform::Bkash, Platform::Paypal),
            Some(&table),
        )
        .unwrap();
        // 10 EUR = 20 USD = 2000 BDT, back to 20 USD before the paypal fee
        assert!((q.send_amount - 2000.0).abs() < 1e-9);
        assert!((q.receive_before_fee - 20.0).abs() < 1e-9);
    }

    #[test]
    fn no_quote_for_non_positive_amount() {
        let table = rates(0.92, 118.0);
        for amount in [0.0, -5.0, f64::NAN] {
            let r = request(amount, Currency::Usd, Platform::Paypal, Platform::Bkash);
            assert!(estimate(&r, Some(&table)).is_none());
        }
    }

    #[test]
    fn no_quote_for_same_platform_or_missing_rates() {
        let table = rates(0.92, 118.0);
        let same = request(10.0, Currency::Usd, Platform::Wise, Platform::Wise);
        assert!(estimate(&same, Some(&table)).is_none());
        let fine = request(10.0, Currency::Usd, Platform::Wise, Platform::Bank);
        assert!(estimate(&fine, None).is_none());
    }

    #[tokio::test]
    async fn view_uses_placeholder_while_loading() {
        let service = QuoteService::new(RateCache::default());
        let query = QuoteQuery {
            amount: "100".to_string(),
            amount_ccy: None,
            from: None,
            to: None,
        };
        let view = service.quote(&query).await.unwrap();
        assert!(view.loading_rates);
        assert!(view.quote.is_none());
        assert_eq!(view.display.you_get, PLACEHOLDER);
    }

    #[tokio::test]
    async fn view_forces_other_destination_and_formats() {
        let cache = RateCache::with_snapshot(RateSnapshot::live(rates(0.92, 118.0)));
        let service = QuoteService::new(cache);
        let query = QuoteQuery {
            amount: "100".to_string(),
            amount_ccy: Some("usd".to_string()),
            from: Some("bkash".to_string()),
            to: Some("bkash".to_string()),
        };
        let view = service.quote(&query).await.unwrap();
        assert_eq!(view.to, Platform::Paypal);
        assert_eq!(view.display.rate_line.as_deref(), Some("1 BDT ≈ 0.0085 USD"));
        assert_eq!(view.display.you_give, "11800.00 BDT");
        assert!(view.quote.is_some());
    }

    #[tokio::test]
    async fn view_carries_fallback_warning() {
        let service = QuoteService::new(RateCache::with_snapshot(RateSnapshot::fallback(
            FALLBACK_WARNING,
        )));
        let view = service
            .price(request(100.0, Currency::Usd, Platform::Payoneer, Platform::Bkash))
            .await;
        assert_eq!(view.rate_source, Some(RateSource::Fallback));
        assert_eq!(view.warning.as_deref(), Some(FALLBACK_WARNING));
        assert_eq!(view.display.you_get, "11705.60 BDT");
        assert!(!view.loading_rates);
    }

    #[tokio::test]
    async fn view_keeps_quoting_on_stale_rates() {
        let cache = RateCache::default();
        cache.set_live(rates(0.9, 120.0)).await;
        assert_eq!(cache.degrade().await, RateSource::Stale);
        let view = QuoteService::new(cache)
            .price(request(10.0, Currency::Usd, Platform::Wise, Platform::Nagad))
            .await;
        assert_eq!(view.rate_source, Some(RateSource::Stale));
        assert_eq!(view.warning.as_deref(), Some(STALE_WARNING));
        assert_eq!(view.display.rate_line.as_deref(), Some("1 USD ≈ 120.0000 BDT"));
        assert!(view.quote.is_some());
    }

    #[tokio::test]
    async fn view_rejects_unknown_platform() {
        let service = QuoteService::new(RateCache::default());
        let query = QuoteQuery {
            amount: "1".to_string(),
            amount_ccy: None,
            from: Some("venmo".to_string()),
            to: None,
        };
        assert!(service.quote(&query).await.is_err());
    }
}
