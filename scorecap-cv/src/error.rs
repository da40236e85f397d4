//! Error types for scorecap-cv

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use scorecap_common::SniffError;
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or unreadable `image` field (400)
    #[error("{0}")]
    BadRequest(String),

    /// Image content rejected by the sniffer (415)
    #[error("{0}")]
    UnsupportedMediaType(String),

    /// Image stream could not be read (500)
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<SniffError> for ApiError {
    fn from(err: SniffError) -> Self {
        match err {
            SniffError::UnsupportedMediaType(_) => ApiError::UnsupportedMediaType(err.to_string()),
            io => ApiError::Internal(io.to_string()),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
