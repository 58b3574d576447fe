use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::models::{Currency, Faq, Platform, Reserve, Review, Trade, TradeStatus};

use super::{Storage, TradeRecord};

const RESERVES: [(Platform, f64); 8] = [
    (Platform::Paypal, 2450.0),
    (Platform::Payoneer, 1820.0),
    (Platform::Skrill, 640.0),
    (Platform::Wise, 1275.0),
    (Platform::Usdt, 5300.0),
    (Platform::Bkash, 3100.0),
    (Platform::Nagad, 1480.0),
    (Platform::Bank, 4200.0),
];

const FAQS: [(&str, &str); 3] = [
    (
        "How long does exchange take?",
        "Most exchanges complete within 5–10 minutes depending on network speed.",
    ),
    (
        "What are your fees?",
        "We charge a small destination fee (0.2%–0.9%) which is shown upfront before you confirm.",
    ),
    (
        "Is KYC required?",
        "Basic exchanges don’t need KYC, but larger amounts may require verification for security.",
    ),
];

const REVIEWS: [(&str, &str, u8, i64); 3] = [
    (
        "Rahim U.",
        "Super fast exchange, my PayPal to bKash completed within minutes!",
        5,
        2,
    ),
    ("Sadia A.", "Best rates compared to other exchangers I used before.", 4, 5),
    ("Kamal R.", "Very reliable, I trust them for all my crypto cashouts.", 5, 7),
];

// (send, recv, amount, ccy, username, minutes ago, status)
const TRADES: [(Platform, Platform, f64, Currency, &str, i64, TradeStatus); 4] = [
    (Platform::Usdt, Platform::Nagad, 10.55, Currency::Usd, "SAYONBISWAS100", 60, TradeStatus::Completed),
    (Platform::Wise, Platform::Paypal, 10.0, Currency::Usd, "MEHRAB", 45, TradeStatus::Completed),
    (Platform::Nagad, Platform::Paypal, 826.0, Currency::Bdt, "Ahnaf", 30, TradeStatus::Completed),
    (Platform::Nagad, Platform::Skrill, 670.0, Currency::Bdt, "Bayazid783", 5, TradeStatus::Pending),
];

pub(super) async fn fill(storage: &Storage) {
    let now = Utc::now();
    {
        let mut reserves = storage.reserves.write().await;
        for (platform, amount_usd) in RESERVES {
            reserves.insert(
                platform.id().to_string(),
                Reserve {
                    id: platform.id().to_string(),
                    label: platform.label().to_string(),
                    amount_usd,
                    updated: now,
                },
            );
        }
    }
    {
        let mut faqs = storage.faqs.write().await;
        for (order, (question, answer)) in FAQS.into_iter().enumerate() {
            let faq = Faq {
                id: Uuid::new_v4(),
                question: question.to_string(),
                answer: answer.to_string(),
                order: order as i32,
                is_active: true,
            };
            faqs.insert(faq.id, faq);
        }
    }
    {
        let mut reviews = storage.reviews.write().await;
        for (name, comment, rating, days_ago) in REVIEWS {
            let review = Review {
                id: Uuid::new_v4(),
                name: name.to_string(),
                comment: comment.to_string(),
                rating,
                published: true,
                created: now - Duration::days(days_ago),
            };
            reviews.insert(review.id, review);
        }
    }
    let mut trades = storage.trades.write().await;
    for (i, (send, recv, amount, ccy, username, minutes_ago, status)) in TRADES.into_iter().enumerate() {
        let created_at = now - Duration::minutes(minutes_ago);
        let trade = Trade {
            id: format!("XCX-{}-{}", created_at.timestamp_millis(), i + 1),
            send,
            recv,
            amount,
            ccy,
            username: username.to_string(),
            created_at,
            status,
            quote: None,
            receive_details: None,
        };
        trades.insert(
            trade.id.clone(),
            TradeRecord {
                trade,
                messages: Vec::new(),
            },
        );
    }
    tracing::info!("Demo content loaded");
}
