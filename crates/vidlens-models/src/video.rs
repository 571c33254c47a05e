//! Video identifiers and URL parsing.
//!
//! Extraction is plain string splitting rather than full URL parsing. The
//! recognized shapes are checked in a fixed priority order and the first
//! marker found in the input decides the shape, even when a later shape
//! would have produced a "better" identifier:
//!
//! 1. `youtu.be`  - last `/` segment, cut at `?`
//! 2. `/live/`    - text after the marker, cut at `?`
//! 3. `v=`        - text after the marker, cut at `&`
//! 4. `/shorts/`  - text after the marker, cut at `?`
//!
//! Fragments and unrelated query parameters are not removed beyond those
//! delimiters, so `watch?v=ID#t=30` yields `ID#t=30`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during video ID extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum YoutubeIdError {
    /// Input was empty or whitespace only
    #[error("URL is empty")]
    EmptyInput,
    /// None of the known URL shapes matched
    #[error("URL does not match any known YouTube URL shape")]
    UnrecognizedUrl,
    /// A URL shape matched but left nothing to use as the ID
    #[error("Video ID not found in URL")]
    EmptyVideoId,
}

/// Result type for video ID extraction.
pub type YoutubeIdResult<T> = Result<T, YoutubeIdError>;

/// A bare video identifier. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Wrap an already-extracted identifier.
    pub fn new(id: impl Into<String>) -> YoutubeIdResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(YoutubeIdError::EmptyVideoId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extract a video ID from a user-pasted reference.
pub fn extract_video_id(url: &str) -> YoutubeIdResult<VideoId> {
    let url = url.trim();
    if url.is_empty() {
        return Err(YoutubeIdError::EmptyInput);
    }

    let raw = if url.contains("youtu.be") {
        let last = url.rsplit('/').next().unwrap_or(url);
        cut_at(last, '?')
    } else if let Some(rest) = segment_after(url, "/live/") {
        cut_at(rest, '?')
    } else if let Some(rest) = segment_after(url, "v=") {
        cut_at(rest, '&')
    } else if let Some(rest) = segment_after(url, "/shorts/") {
        cut_at(rest, '?')
    } else {
        return Err(YoutubeIdError::UnrecognizedUrl);
    };

    VideoId::new(raw)
}

/// Text between the first occurrence of `marker` and the next one (or the end).
fn segment_after<'a>(url: &'a str, marker: &str) -> Option<&'a str> {
    let (_, rest) = url.split_once(marker)?;
    Some(match rest.find(marker) {
        Some(end) => &rest[..end],
        None => rest,
    })
}

fn cut_at(segment: &str, delimiter: char) -> &str {
    segment.split(delimiter).next().unwrap_or(segment)
}
