use crate::models::{ApiResponse, AppState, SupportRequest};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;

pub async fn submit(
    State(state): State<AppState>,
    Json(request): Json<SupportRequest>,
) -> crate::Result<impl IntoResponse> {
    let ticket = state.storage.save_ticket(request.into_ticket()?).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::item(ticket))))
}
