//! Image scoring endpoint

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use scorecap_common::wire::{ScoringResponse, IMAGE_FIELD};
use std::io::Cursor;

use crate::error::{ApiError, ApiResult};
use crate::scoring::score_image;
use crate::AppState;

/// POST /process
///
/// Scores the image in multipart field `image`.
pub async fn process_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ScoringResponse>> {
    let mut multipart =
        multipart.map_err(|_| ApiError::BadRequest("Image file not found".to_string()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Could not read image: {}", e)))?;

        tracing::debug!(filename = %filename, size = content.len(), "Image received");

        let scores = score_image(&state.sniffer, &mut Cursor::new(content)).map_err(|e| {
            tracing::warn!(filename = %filename, "Image rejected: {}", e);
            ApiError::from(e)
        })?;

        return Ok(Json(ScoringResponse { scores }));
    }

    Err(ApiError::BadRequest("Image file not found".to_string()))
}
