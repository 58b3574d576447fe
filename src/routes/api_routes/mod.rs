use crate::models::{ApiResponse, AppState, PlatformInfo, Platform, RateSnapshot, MAX_UPLOAD_BYTES};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Serialize;

mod admin;
mod content;
mod quote;
mod support;
mod trades;

pub fn init(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/platforms", get(platforms))
        .route("/settings/fx", get(fx))
        .route("/quote", get(quote::quote))
        .route("/reserves", get(content::reserves))
        .route("/faqs", get(content::faqs))
        .route("/reviews", get(content::reviews))
        .route("/trades", get(trades::latest).post(trades::start))
        .route("/trades/{id}", get(trades::trade))
        .route("/trades/{id}/paid", post(trades::paid))
        .route("/trades/{id}/details", put(trades::details))
        .route("/trades/{id}/messages", get(trades::messages).post(trades::send_message))
        .route(
            "/trades/{id}/upload",
            post(trades::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024)),
        )
        .route("/trades/{id}/uploads/{upload_id}", get(trades::uploaded))
        .route("/support", post(support::submit))
        .route("/admin/login", post(admin::login))
        .route("/admin/logout", post(admin::logout))
        .route("/admin/me", get(admin::me))
        .route("/admin/reserves", get(admin::reserves).post(admin::upsert_reserve))
        .route("/admin/faqs", get(admin::faqs).post(admin::upsert_faq))
        .route("/admin/faqs/{id}", delete(admin::delete_faq))
        .route("/admin/reviews", get(admin::reviews).post(admin::upsert_review))
        .route("/admin/reviews/{id}", delete(admin::delete_review))
        .route("/admin/reviews/{id}/publish", post(admin::publish_review))
        .route("/admin/trades/{id}/status", post(admin::trade_status))
        .route("/admin/trades/{id}/messages", post(admin::send_message))
        .route("/admin/support", get(admin::support))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::ok())).into_response()
}

async fn platforms() -> impl IntoResponse {
    let items = Platform::ALL.into_iter().map(PlatformInfo::from).collect();
    (StatusCode::OK, Json(ApiResponse::items(items))).into_response()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FxSettings {
    loading_rates: bool,
    #[serde(flatten)]
    snapshot: Option<RateSnapshot>,
}

async fn fx(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.rates.snapshot().await;
    let settings = FxSettings {
        loading_rates: snapshot.is_none(),
        snapshot,
    };
    (StatusCode::OK, Json(ApiResponse::item(settings))).into_response()
}
