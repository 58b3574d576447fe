use crate::models::{ApiResponse, AppState, QuoteQuery};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;

pub async fn quote(
    State(state): State<AppState>,
    Query(query): Query<QuoteQuery>,
) -> impl IntoResponse {
    match state.quotes.quote(&query).await {
        Ok(view) => (StatusCode::OK, Json(ApiResponse::item(view))).into_response(),
        Err(err) => err.into_response(),
    }
}
