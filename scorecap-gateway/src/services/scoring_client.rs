//! Scoring service client
//!
//! Relays one validated image to `POST <base>/process` as multipart field
//! `image` and parses the returned score batch. No retries at this layer.

use axum::body::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use scorecap_common::wire::{ScoringResponse, IMAGE_FIELD, PROCESS_PATH};
use scorecap_common::ScoreEntry;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("scorecap-gateway/", env!("CARGO_PKG_VERSION"));

/// Scoring relay errors
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection refused, reset, or deadline exceeded
    #[error("Network error: {0}")]
    Network(String),

    /// Scoring service answered with something other than 200
    #[error("Scoring service returned status {0}: {1}")]
    Status(u16, String),

    /// Response body was not a valid score batch
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Client for the scoring service
#[derive(Debug, Clone)]
pub struct ScoringClient {
    http_client: reqwest::Client,
    process_url: String,
}

impl ScoringClient {
    /// `base_url` is the scoring service root, e.g. `http://cv-service:8081`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            process_url: format!("{}{}", base_url.trim_end_matches('/'), PROCESS_PATH),
        })
    }

    pub fn process_url(&self) -> &str {
        &self.process_url
    }

    /// Send the image and return the scoring service's batch
    ///
    /// The call runs inline in the caller's task: dropping the returned
    /// future aborts the in-flight request.
    pub async fn score(
        &self,
        image: Bytes,
        filename: &str,
        mime: &str,
    ) -> Result<Vec<ScoreEntry>, UpstreamError> {
        let size = image.len() as u64;
        let part = Part::stream_with_length(reqwest::Body::from(image), size)
            .file_name(filename.to_string())
            .mime_str(mime)
            .map_err(|e| UpstreamError::Network(e.to_string()))?;
        let form = Form::new().part(IMAGE_FIELD, part);

        tracing::debug!(url = %self.process_url, filename, size, "Relaying image to scoring service");

        let response = self
            .http_client
            .post(&self.process_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let error_text = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status(status.as_u16(), error_text));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;
        let parsed: ScoringResponse =
            serde_json::from_slice(&body).map_err(|e| UpstreamError::Parse(e.to_string()))?;

        tracing::info!(scores = parsed.scores.len(), "Scoring service returned batch");

        Ok(parsed.scores)
    }
}
