//! Magic-byte content sniffing
//!
//! Classifies an uploaded stream by its leading bytes, never by the
//! client-supplied filename or declared content type. Used identically by the
//! gateway (before relaying) and by the scoring service (on receipt).

use std::collections::BTreeSet;
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};
use std::str::FromStr;
use thiserror::Error;

/// Number of leading bytes inspected; covers the longest image signature
pub const SNIFF_LEN: usize = 261;

/// Reported media type when no signature matches
pub const UNKNOWN_MEDIA_TYPE: &str = "unknown";

/// Sniffing failures
#[derive(Debug, Error)]
pub enum SniffError {
    /// Header could not be read from the stream
    #[error("failed to read file header: {0}")]
    Read(#[source] io::Error),

    /// Stream could not be returned to its starting position
    #[error("failed to reset file reader: {0}")]
    Rewind(#[source] io::Error),

    /// Detected type is unknown or not in the allow-list
    #[error("file type {0} is not allowed")]
    UnsupportedMediaType(String),
}

impl SniffError {
    /// True for stream failures (as opposed to a content rejection)
    pub fn is_io(&self) -> bool {
        matches!(self, SniffError::Read(_) | SniffError::Rewind(_))
    }
}

/// Immutable set of accepted MIME types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    types: BTreeSet<String>,
}

impl AllowList {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            types: types
                .into_iter()
                .map(|t| t.into().trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, mime: &str) -> bool {
        self.types.contains(mime)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(["image/jpeg", "image/png"])
    }
}

/// Parses a comma-separated list, e.g. `image/jpeg,image/png`
impl FromStr for AllowList {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let list = Self::new(s.split(','));
        if list.is_empty() {
            return Err(crate::Error::InvalidInput(
                "allow-list must name at least one media type".to_string(),
            ));
        }
        Ok(list)
    }
}

impl fmt::Display for AllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(","))
    }
}

/// Content-type gate backed by an allow-list
#[derive(Debug, Clone, Default)]
pub struct TypeSniffer {
    allow_list: AllowList,
}

impl TypeSniffer {
    pub fn new(allow_list: AllowList) -> Self {
        Self { allow_list }
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// Classify the stream from its current position and return the MIME type
    ///
    /// The stream is seeked back to where it started before returning, so
    /// the caller can read the full content afterwards.
    pub fn sniff<R: Read + Seek>(&self, reader: &mut R) -> Result<&'static str, SniffError> {
        let start = reader.stream_position().map_err(SniffError::Rewind)?;

        let mut head = Vec::with_capacity(SNIFF_LEN);
        reader
            .by_ref()
            .take(SNIFF_LEN as u64)
            .read_to_end(&mut head)
            .map_err(SniffError::Read)?;

        reader
            .seek(SeekFrom::Start(start))
            .map_err(SniffError::Rewind)?;

        self.classify(&head)
    }

    /// Classify an in-memory header
    pub fn classify(&self, head: &[u8]) -> Result<&'static str, SniffError> {
        match infer::get(head).map(|kind| kind.mime_type()) {
            Some(mime) if self.allow_list.contains(mime) => {
                tracing::debug!(mime, "Content type accepted");
                Ok(mime)
            }
            detected => {
                let detected = detected.unwrap_or(UNKNOWN_MEDIA_TYPE);
                tracing::debug!(detected, "Content type rejected");
                Err(SniffError::UnsupportedMediaType(detected.to_string()))
            }
        }
    }
}
