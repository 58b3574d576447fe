use std::{error::Error, fmt::Display};

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::Serialize;

use crate::models::ApiResponse;

#[derive(Debug, Serialize)]
pub enum AppError {
    ReqwestError(String),
    RateError(String),
    InvalidRequest(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Unauthorized,
    ConfigError(String),
    Custom(String),
}

pub type Result<T> = core::result::Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ReqwestError(_) | AppError::RateError(_) => StatusCode::BAD_GATEWAY,
            AppError::ConfigError(_) | AppError::Custom(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::ReqwestError(e) => write!(f, "Upstream request failed: {e}"),
            AppError::RateError(e) => write!(f, "Rates unavailable: {e}"),
            AppError::InvalidRequest(e) => write!(f, "Invalid Request: {e}"),
            AppError::Validation(e) => write!(f, "{e}"),
            AppError::NotFound(e) => write!(f, "{e} not found"),
            AppError::Conflict(e) => write!(f, "{e}"),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::ConfigError(e) => write!(f, "Configuration error: {e}"),
            AppError::Custom(e) => write!(f, "{e}"),
        }
    }
}
impl Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self:?}");
        }
        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(value: reqwest::Error) -> Self {
        Self::ReqwestError(value.to_string())
    }
}
impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Custom(value.to_string())
    }
}
impl From<crate::config::ConfigBuilderError> for AppError {
    fn from(value: crate::config::ConfigBuilderError) -> Self {
        Self::ConfigError(value.to_string())
    }
}
impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(value: axum::extract::multipart::MultipartError) -> Self {
        Self::InvalidRequest(value.body_text())
    }
}
impl From<std::net::AddrParseError> for AppError {
    fn from(value: std::net::AddrParseError) -> Self {
        Self::ConfigError(value.to_string())
    }
}
