//! Upload ingestion: sniff → relay → persist
//!
//! One upload walks `Received → TypeValidated → Relayed → Persisting →
//! Completed`. A bad or missing file ends in `Rejected`, a scoring failure in
//! `Failed`; neither has a retry path.
//!
//! Scores in a batch are saved one by one. A failed insert is logged and the
//! rest of the batch is still attempted, so a batch can end up partially
//! saved.

use axum::body::Bytes;
use scorecap_common::{SniffError, TypeSniffer};
use serde::Serialize;
use std::io::Cursor;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::db::{Score, ScoreStore, StorageError};
use crate::services::scoring_client::{ScoringClient, UpstreamError};

/// Uploaded file, alive only for the duration of one request
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Client-declared filename; forwarded as a hint, never trusted for type
    pub filename: String,
    pub content: Bytes,
}

/// Progress of one upload request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Received,
    TypeValidated,
    Relayed,
    Persisting,
    Completed,
    Rejected,
    Failed,
}

/// Upload failures that abort the request
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Could not get file from form")]
    MissingFile,

    #[error(transparent)]
    Sniff(#[from] SniffError),

    #[error("Failed to process image with scoring service: {0}")]
    Upstream(#[from] UpstreamError),
}

/// Outcome of a completed upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    /// Scores in the batch returned by the scoring service
    pub scores_found: usize,
    /// Scores actually written to the store
    pub scores_saved: usize,
}

/// Composes the sniffer, the scoring relay and the score store
#[derive(Debug, Clone)]
pub struct IngestionService {
    sniffer: TypeSniffer,
    scorer: ScoringClient,
    store: ScoreStore,
}

impl IngestionService {
    pub fn new(sniffer: TypeSniffer, scorer: ScoringClient, store: ScoreStore) -> Self {
        Self {
            sniffer,
            scorer,
            store,
        }
    }

    pub fn store(&self) -> &ScoreStore {
        &self.store
    }

    /// Run one upload through the pipeline
    pub async fn ingest(&self, upload: Option<UploadedImage>) -> Result<UploadSummary, IngestError> {
        let mut stage = UploadStage::Received;

        let Some(upload) = upload else {
            advance(&mut stage, UploadStage::Rejected);
            return Err(IngestError::MissingFile);
        };

        let mut stream = Cursor::new(upload.content);
        let mime = match self.sniffer.sniff(&mut stream) {
            Ok(mime) => mime,
            Err(e) => {
                advance(&mut stage, UploadStage::Rejected);
                warn!(filename = %upload.filename, "Upload rejected: {}", e);
                return Err(e.into());
            }
        };
        advance(&mut stage, UploadStage::TypeValidated);

        let batch = match self
            .scorer
            .score(stream.into_inner(), &upload.filename, mime)
            .await
        {
            Ok(batch) => batch,
            Err(e) => {
                advance(&mut stage, UploadStage::Failed);
                error!(filename = %upload.filename, "Scoring relay failed: {}", e);
                return Err(e.into());
            }
        };
        advance(&mut stage, UploadStage::Relayed);

        advance(&mut stage, UploadStage::Persisting);
        let mut scores_saved = 0;
        for entry in &batch {
            match self.store.create(&entry.scenario, entry.score).await {
                Ok(id) => {
                    scores_saved += 1;
                    debug!(id, scenario = %entry.scenario, score = entry.score, "Score saved");
                }
                Err(e) => {
                    warn!("Error saving score for {}: {}", entry.scenario, e);
                }
            }
        }
        advance(&mut stage, UploadStage::Completed);

        let summary = UploadSummary {
            scores_found: batch.len(),
            scores_saved,
        };
        info!(
            filename = %upload.filename,
            mime,
            scores_found = summary.scores_found,
            scores_saved = summary.scores_saved,
            "Upload processed"
        );

        Ok(summary)
    }

    /// All scores, newest first
    pub async fn list_scores(&self) -> Result<Vec<Score>, StorageError> {
        self.store.list().await
    }

    /// Correct a score; returns rows changed (0 when `id` is unknown)
    pub async fn update_score(&self, id: i64, scenario: &str, score: i64) -> Result<u64, StorageError> {
        let changed = self.store.update(id, scenario, score).await?;
        if changed == 0 {
            warn!(id, "Score update matched no row");
        }
        Ok(changed)
    }
}

fn advance(stage: &mut UploadStage, next: UploadStage) {
    debug!(from = ?*stage, to = ?next, "Upload stage");
    *stage = next;
}
