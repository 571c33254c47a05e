//! Transcript error types.

use std::time::Duration;

use thiserror::Error;

pub type TranscriptResult<T> = Result<T, TranscriptError>;

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {status}")]
    Status { status: u16 },

    #[error("Video is not playable: {0}")]
    Unplayable(String),

    #[error("No captions available: {0}")]
    NoCaptions(String),

    #[error("Failed to decode captions: {0}")]
    Decode(String),

    #[error("Extractor failed: {0}")]
    Extractor(String),

    #[error("Transcript text was empty")]
    Empty,

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Strategy panicked: {0}")]
    Panicked(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranscriptError {
    pub fn no_captions(msg: impl Into<String>) -> Self {
        Self::NoCaptions(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn extractor(msg: impl Into<String>) -> Self {
        Self::Extractor(msg.into())
    }
}

impl From<serde_json::Error> for TranscriptError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
