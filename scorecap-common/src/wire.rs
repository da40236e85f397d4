//! Relay wire types between the gateway and the scoring service
//!
//! `POST /process` carries the image in multipart field [`IMAGE_FIELD`] and
//! answers `200` with a [`ScoringResponse`] body.

use serde::{Deserialize, Serialize};

/// Path of the scoring endpoint on the scoring service
pub const PROCESS_PATH: &str = "/process";

/// Multipart field holding the image on the relay call
pub const IMAGE_FIELD: &str = "image";

/// One scenario/score pair produced by the scoring service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub scenario: String,
    pub score: i64,
}

impl ScoreEntry {
    pub fn new(scenario: impl Into<String>, score: i64) -> Self {
        Self {
            scenario: scenario.into(),
            score,
        }
    }
}

/// Body of a successful `/process` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringResponse {
    /// Score batch for one image; absent is treated as empty
    #[serde(default)]
    pub scores: Vec<ScoreEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scoring_response() {
        let body = r#"{"scores":[{"scenario":"VT Adjustshot VALORANT","score":805}]}"#;
        let parsed: ScoringResponse = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.scores, vec![ScoreEntry::new("VT Adjustshot VALORANT", 805)]);
    }

    #[test]
    fn test_missing_scores_field_is_empty_batch() {
        let parsed: ScoringResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.scores.is_empty());
    }

    #[test]
    fn test_wrong_score_type_rejected() {
        let body = r#"{"scores":[{"scenario":"VT Flickspeed VALORANT","score":"high"}]}"#;
        assert!(serde_json::from_str::<ScoringResponse>(body).is_err());
    }
}
