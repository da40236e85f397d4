//! Screenshot upload endpoint

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::services::UploadedImage;
use crate::AppState;

/// Multipart field the client puts the screenshot in
pub const SCREENSHOT_FIELD: &str = "screenshot";

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub scores_found: usize,
    pub scores_saved: usize,
}

/// POST /upload
///
/// Validates the screenshot, relays it for scoring and stores the result.
pub async fn upload_screenshot(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<UploadResponse>> {
    let multipart = multipart.map_err(|e| {
        tracing::debug!("Rejected upload body: {}", e);
        ApiError::BadRequest("Could not get file from form".to_string())
    })?;
    let upload = read_screenshot(multipart).await?;
    let summary = state.ingestion.ingest(upload).await?;

    Ok(Json(UploadResponse {
        message: "File processed successfully".to_string(),
        scores_found: summary.scores_found,
        scores_saved: summary.scores_saved,
    }))
}

/// Pull the screenshot field out of the form; other fields are ignored
async fn read_screenshot(mut multipart: Multipart) -> ApiResult<Option<UploadedImage>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some(SCREENSHOT_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or(SCREENSHOT_FIELD).to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Could not read uploaded file: {}", e)))?;

        return Ok(Some(UploadedImage { filename, content }));
    }

    Ok(None)
}
