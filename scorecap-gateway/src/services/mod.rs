//! Upload pipeline services

pub mod ingestion;
pub mod scoring_client;

pub use ingestion::{IngestError, IngestionService, UploadStage, UploadSummary, UploadedImage};
pub use scoring_client::{ScoringClient, UpstreamError};
