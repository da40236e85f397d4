//! Error types for scorecap-gateway
//!
//! Every failure reaches the client as `{"error": "<message>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::StorageError;
use crate::services::IngestError;
use scorecap_common::SniffError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing upload field, bad id, malformed body (400)
    #[error("{0}")]
    BadRequest(String),

    /// Content sniffed as a type outside the allow-list (415)
    #[error("{0}")]
    UnsupportedMediaType(String),

    /// Scoring service unreachable or misbehaving (500)
    #[error("{0}")]
    Upstream(String),

    /// Persistence failure (500)
    #[error("{0}")]
    Storage(String),

    /// Upload stream could not be read (500)
    #[error("{0}")]
    Io(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Upstream(_) | ApiError::Storage(_) | ApiError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::MissingFile => ApiError::BadRequest(err.to_string()),
            IngestError::Sniff(SniffError::UnsupportedMediaType(detected)) => {
                ApiError::UnsupportedMediaType(format!("File type {} is not allowed", detected))
            }
            IngestError::Sniff(io) => ApiError::Io(io.to_string()),
            IngestError::Upstream(_) => {
                ApiError::Upstream("Failed to process image with CV service".to_string())
            }
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Invalid(msg) => ApiError::BadRequest(msg),
            StorageError::Database(e) => ApiError::Storage(format!("Database error: {}", e)),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
