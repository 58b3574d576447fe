use crate::models::{render_reserves, ApiResponse, AppState, Currency, RateTable};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct ReservesQuery {
    currency: Option<String>,
    limit: Option<usize>,
}

pub async fn reserves(
    State(state): State<AppState>,
    Query(query): Query<ReservesQuery>,
) -> crate::Result<impl IntoResponse> {
    let currency = match query.currency.as_deref() {
        Some(code) => code.parse::<Currency>()?,
        None => Currency::Usd,
    };
    let usd_to_bdt = state
        .rates
        .snapshot()
        .await
        .map(|s| s.rates)
        .unwrap_or_else(RateTable::fallback)
        .rate(Currency::Bdt);
    let reserves = state.storage.get_reserves().await?;
    let items = render_reserves(reserves, currency, usd_to_bdt, query.limit)?;
    Ok((StatusCode::OK, Json(ApiResponse::items(items))))
}

pub async fn faqs(State(state): State<AppState>) -> impl IntoResponse {
    match state.storage.get_faqs(true).await {
        Ok(faqs) => (StatusCode::OK, Json(ApiResponse::items(faqs))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn reviews(State(state): State<AppState>) -> impl IntoResponse {
    match state.storage.get_reviews(true).await {
        Ok(reviews) => (StatusCode::OK, Json(ApiResponse::items(reviews))).into_response(),
        Err(err) => err.into_response(),
    }
}
