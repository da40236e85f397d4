//! Score listing and correction endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::Score;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Score list response
#[derive(Debug, Serialize)]
pub struct ScoresResponse {
    pub scores: Vec<Score>,
}

/// Correction payload for PUT /scores/:id
#[derive(Debug, Deserialize)]
pub struct UpdateScoreRequest {
    pub scenario: String,
    pub score: i64,
}

/// Generic confirmation response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /scores
///
/// All stored scores, newest first.
pub async fn list_scores(State(state): State<AppState>) -> ApiResult<Json<ScoresResponse>> {
    let scores = state.ingestion.list_scores().await.map_err(|e| {
        tracing::error!("Failed to retrieve scores: {}", e);
        ApiError::Storage("Failed to retrieve scores".to_string())
    })?;

    Ok(Json(ScoresResponse { scores }))
}

/// PUT /scores/:id
///
/// Answers 200 even when no row has that id; the miss is only logged.
pub async fn update_score(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateScoreRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid score ID".to_string()))?;

    let Json(payload) = payload.map_err(|e| {
        tracing::debug!("Rejected update body: {}", e);
        ApiError::BadRequest("Invalid request body".to_string())
    })?;

    state
        .ingestion
        .update_score(id, &payload.scenario, payload.score)
        .await
        .map_err(|e| {
            tracing::error!("Error updating score ID {}: {}", id, e);
            ApiError::from(e)
        })?;

    Ok(Json(MessageResponse {
        message: "Score updated successfully".to_string(),
    }))
}
