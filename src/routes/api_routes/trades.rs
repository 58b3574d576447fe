use crate::models::{
    new_trade_id, paginate, ApiResponse, AppState, ChatInput, ChatRole, QuoteQuery,
    ReceiveDetails, Trade, TradeInput, TradeStatus, TradeView, Upload,
};
use crate::AppError;
use axum::extract::{Multipart, Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use http::{header, StatusCode};
use uuid::Uuid;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct PageQuery {
    page: Option<usize>,
}

pub async fn latest(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    match state.trades.latest().await {
        Ok(trades) => {
            let page = paginate(trades, query.page.unwrap_or(1), Utc::now());
            (StatusCode::OK, Json(ApiResponse::item(page))).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn start(
    State(state): State<AppState>,
    Json(input): Json<TradeInput>,
) -> crate::Result<impl IntoResponse> {
    if input.from.is_none() || input.to.is_none() {
        return Err(AppError::InvalidRequest(
            "both platforms are required".to_string(),
        ));
    }
    let query = QuoteQuery {
        amount: input.amount,
        amount_ccy: input.amount_ccy,
        from: input.from,
        to: input.to,
    };
    let view = state.quotes.quote(&query).await?;
    if view.amount <= 0.0 {
        return Err(AppError::Validation("Please enter an amount.".to_string()));
    }
    let username = input
        .username
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| "Guest".to_string());
    let trade = Trade {
        id: new_trade_id(),
        send: view.from,
        recv: view.to,
        amount: view.amount,
        ccy: view.amount_ccy,
        username,
        created_at: Utc::now(),
        status: TradeStatus::Started,
        quote: view.quote,
        receive_details: None,
    };
    let trade = state.trades.create_trade(trade).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::item(TradeView::from(trade)))))
}

pub async fn trade(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.trades.get_trade(&id).await {
        Ok(trade) => (StatusCode::OK, Json(ApiResponse::item(TradeView::from(trade)))).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Customer says the money was sent
pub async fn paid(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> crate::Result<impl IntoResponse> {
    let trade = state.trades.set_status(&id, TradeStatus::Pending).await?;
    Ok((StatusCode::OK, Json(ApiResponse::item(TradeView::from(trade)))))
}

pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(details): Json<ReceiveDetails>,
) -> crate::Result<impl IntoResponse> {
    let trade = state.trades.get_trade(&id).await?;
    details.validate(trade.recv)?;
    let trade = state.trades.save_details(&id, details).await?;
    Ok((StatusCode::OK, Json(ApiResponse::item(TradeView::from(trade)))))
}

pub async fn messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.trades.messages(&id).await {
        Ok(messages) => (StatusCode::OK, Json(ApiResponse::items(messages))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ChatInput>,
) -> crate::Result<impl IntoResponse> {
    let message = input.into_message(ChatRole::User)?;
    let message = state.trades.append_message(&id, message).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::item(message))))
}

/// Screenshot for the trade chat, sent as the multipart field `file`
pub async fn upload(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> crate::Result<impl IntoResponse> {
    state.trades.get_trade(&id).await?;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        let upload = state
            .storage
            .save_upload(Upload::new(&id, &content_type, bytes)?)
            .await?;
        let message = ChatInput {
            text: None,
            image_url: Some(upload.url()),
        }
        .into_message(ChatRole::User)?;
        let message = state.trades.append_message(&id, message).await?;
        return Ok((StatusCode::CREATED, Json(ApiResponse::item(message))));
    }
    Err(AppError::Validation("Please attach an image.".to_string()))
}

pub async fn uploaded(
    State(state): State<AppState>,
    Path((id, upload_id)): Path<(String, Uuid)>,
) -> crate::Result<impl IntoResponse> {
    let upload = state.storage.get_upload(&id, upload_id).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, upload.content_type)],
        upload.bytes,
    ))
}
