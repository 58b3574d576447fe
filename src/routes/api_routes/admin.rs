use crate::auth::{check_credentials, removal_cookie, session_cookie, session_id, Admin};
use crate::models::{
    ApiResponse, AppState, ChatInput, ChatRole, FaqInput, LoginRequest, PublishInput, Reserve,
    ReserveInput, ReviewInput, StatusInput, TradeStatus, TradeView,
};
use crate::AppError;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use http::StatusCode;
use serde::Serialize;
use uuid::Uuid;

#[derive(Serialize)]
struct Me {
    email: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> crate::Result<impl IntoResponse> {
    if !check_credentials(&state.config, &request.email, &request.password) {
        tracing::warn!("Rejected admin login for {}", request.email);
        return Err(AppError::Unauthorized);
    }
    let session = state
        .storage
        .create_session(request.email.trim(), state.config.session_ttl)
        .await?;
    tracing::info!("Admin {} logged in", session.email);
    let jar = jar.add(session_cookie(session.id, state.config.session_ttl));
    Ok((StatusCode::OK, jar, Json(ApiResponse::item(session))))
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(id) = session_id(&jar) {
        state.storage.delete_session(id).await;
    }
    let jar = jar.remove(removal_cookie());
    (StatusCode::OK, jar, Json(ApiResponse::ok())).into_response()
}

pub async fn me(Admin(session): Admin) -> impl IntoResponse {
    let me = Me {
        email: session.email,
    };
    (StatusCode::OK, Json(ApiResponse::item(me))).into_response()
}

pub async fn reserves(_admin: Admin, State(state): State<AppState>) -> impl IntoResponse {
    match state.storage.get_reserves().await {
        Ok(reserves) => (StatusCode::OK, Json(ApiResponse::items(reserves))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn upsert_reserve(
    _admin: Admin,
    State(state): State<AppState>,
    Json(input): Json<ReserveInput>,
) -> crate::Result<impl IntoResponse> {
    let reserve = state.storage.upsert_reserve(Reserve::try_from(input)?).await?;
    Ok((StatusCode::OK, Json(ApiResponse::item(reserve))))
}

pub async fn faqs(_admin: Admin, State(state): State<AppState>) -> impl IntoResponse {
    match state.storage.get_faqs(false).await {
        Ok(faqs) => (StatusCode::OK, Json(ApiResponse::items(faqs))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn upsert_faq(
    _admin: Admin,
    State(state): State<AppState>,
    Json(input): Json<FaqInput>,
) -> crate::Result<impl IntoResponse> {
    let faq = state.storage.upsert_faq(input.into_faq()?).await?;
    Ok((StatusCode::OK, Json(ApiResponse::item(faq))))
}

pub async fn delete_faq(
    _admin: Admin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> crate::Result<impl IntoResponse> {
    state.storage.delete_faq(id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok())))
}

pub async fn reviews(_admin: Admin, State(state): State<AppState>) -> impl IntoResponse {
    match state.storage.get_reviews(false).await {
        Ok(reviews) => (StatusCode::OK, Json(ApiResponse::items(reviews))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn upsert_review(
    _admin: Admin,
    State(state): State<AppState>,
    Json(input): Json<ReviewInput>,
) -> crate::Result<impl IntoResponse> {
    let review = state.storage.upsert_review(input.into_review()?).await?;
    Ok((StatusCode::OK, Json(ApiResponse::item(review))))
}

pub async fn delete_review(
    _admin: Admin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> crate::Result<impl IntoResponse> {
    state.storage.delete_review(id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok())))
}

pub async fn publish_review(
    _admin: Admin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<PublishInput>,
) -> crate::Result<impl IntoResponse> {
    let review = state.storage.publish_review(id, input.published).await?;
    Ok((StatusCode::OK, Json(ApiResponse::item(review))))
}

pub async fn trade_status(
    Admin(session): Admin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<StatusInput>,
) -> crate::Result<impl IntoResponse> {
    let status = TradeStatus::normalize(&input.status);
    let trade = state.trades.set_status(&id, status).await?;
    tracing::info!("{} set trade {id} to {status}", session.email);
    Ok((StatusCode::OK, Json(ApiResponse::item(TradeView::from(trade)))))
}

pub async fn send_message(
    _admin: Admin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ChatInput>,
) -> crate::Result<impl IntoResponse> {
    let message = input.into_message(ChatRole::Admin)?;
    let message = state.trades.append_message(&id, message).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::item(message))))
}

pub async fn support(_admin: Admin, State(state): State<AppState>) -> impl IntoResponse {
    match state.storage.get_tickets().await {
        Ok(tickets) => (StatusCode::OK, Json(ApiResponse::items(tickets))).into_response(),
        Err(err) => err.into_response(),
    }
}
