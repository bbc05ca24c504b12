use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unknown token symbol: {0}")]
    UnknownToken(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Upstream unavailable: {0}")]
    Upstream(String),
    #[error("Event decode failed: {0}")]
    Decode(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<crate::datasource::SourceError> for AppError {
    fn from(err: crate::datasource::SourceError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl From<crate::datasource::DecodeError> for AppError {
    fn from(err: crate::datasource::DecodeError) -> Self {
        AppError::Decode(err.to_string())
    }
}

impl From<crate::engine::EngineError> for AppError {
    fn from(err: crate::engine::EngineError) -> Self {
        // The only engine failure is an upstream valuation lookup.
        AppError::Upstream(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::UnknownToken(sym) => (
                StatusCode::BAD_REQUEST,
                format!("Unknown token symbol: {}", sym),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Decode(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
