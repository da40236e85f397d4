//! Image scoring
//!
//! Screen reading is not implemented yet: every accepted image yields the
//! same fixed batch.

use scorecap_common::{ScoreEntry, SniffError, TypeSniffer};
use std::io::{Read, Seek};

/// Batch returned for every accepted image
pub fn mock_scores() -> Vec<ScoreEntry> {
    vec![
        ScoreEntry::new("VT Adjustshot VALORANT", 805),
        ScoreEntry::new("VT Flickspeed VALORANT", 825),
        ScoreEntry::new("VT Angleshot VALORANT", 677),
    ]
}

/// Check the image content and score it
pub fn score_image<R: Read + Seek>(
    sniffer: &TypeSniffer,
    image: &mut R,
) -> Result<Vec<ScoreEntry>, SniffError> {
    let mime = sniffer.sniff(image)?;
    tracing::info!(mime, "Received image for processing. Returning mock data.");
    Ok(mock_scores())
}
