//! Caption collaborators consumed by the strategies.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use vidlens_models::VideoId;

use crate::error::{TranscriptError, TranscriptResult};
use crate::track::{CaptionTrack, TrackFormat};

pub(crate) const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Primary caption source: fetch-by-id and list-by-id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Fetch the default transcript for a video as flat text.
    async fn fetch_default(&self, video_id: &VideoId) -> TranscriptResult<String>;

    /// List every caption track the source offers for a video.
    async fn list_tracks(&self, video_id: &VideoId) -> TranscriptResult<Vec<CaptionTrack>>;

    /// Fetch and decode one track as flat text.
    async fn fetch_track(&self, track: &CaptionTrack) -> TranscriptResult<String>;
}

/// Independent metadata backend that lists caption URLs directly.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    /// Manual and automatic caption tracks for a video.
    async fn caption_tracks(&self, video_id: &VideoId) -> TranscriptResult<Vec<CaptionTrack>>;
}

/// Download a track format with a plain GET and decode it.
pub async fn fetch_and_decode(client: &Client, format: &TrackFormat) -> TranscriptResult<String> {
    debug!(format = %format.format, "Fetching caption content");

    let response = client
        .get(&format.url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(TranscriptError::Status {
            status: response.status().as_u16(),
        });
    }

    let body = response.text().await?;
    format.format.decode(&body)
}
