//! Transcript acquisition strategies.
//!
//! Each strategy is one independent way of turning a video ID into transcript
//! text. Strategies never retry internally; the chain decides what happens
//! after a failure.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use vidlens_models::VideoId;

use crate::error::{TranscriptError, TranscriptResult};
use crate::source::{fetch_and_decode, CaptionSource, MetadataExtractor};
use crate::track::{rank_tracks, select_english_candidate};

/// One way of acquiring a transcript.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptStrategy: Send + Sync {
    /// Stable name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Produce transcript text for a video.
    async fn fetch(&self, video_id: &VideoId) -> TranscriptResult<String>;
}

/// Ask the primary source for its default transcript.
pub struct DirectFetchStrategy {
    source: Arc<dyn CaptionSource>,
}

impl DirectFetchStrategy {
    pub fn new(source: Arc<dyn CaptionSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl TranscriptStrategy for DirectFetchStrategy {
    fn name(&self) -> &'static str {
        "direct_fetch"
    }

    async fn fetch(&self, video_id: &VideoId) -> TranscriptResult<String> {
        self.source.fetch_default(video_id).await
    }
}

/// Enumerate every track from the primary source and fetch the best ranked.
pub struct ListAndPickStrategy {
    source: Arc<dyn CaptionSource>,
}

impl ListAndPickStrategy {
    pub fn new(source: Arc<dyn CaptionSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl TranscriptStrategy for ListAndPickStrategy {
    fn name(&self) -> &'static str {
        "list_and_pick"
    }

    async fn fetch(&self, video_id: &VideoId) -> TranscriptResult<String> {
        let tracks = self.source.list_tracks(video_id).await?;
        let track = rank_tracks(&tracks)
            .into_iter()
            .next()
            .ok_or_else(|| TranscriptError::no_captions("source listed no tracks"))?;

        debug!(video_id = %video_id, track = %track, "Picked caption track");
        self.source.fetch_track(track).await
    }
}

/// Use an independent metadata extractor to find an English caption URL and
/// download it directly.
pub struct SecondarySourceStrategy {
    extractor: Arc<dyn MetadataExtractor>,
    client: Client,
}

impl SecondarySourceStrategy {
    pub fn new(extractor: Arc<dyn MetadataExtractor>, client: Client) -> Self {
        Self { extractor, client }
    }
}

#[async_trait]
impl TranscriptStrategy for SecondarySourceStrategy {
    fn name(&self) -> &'static str {
        "secondary_source"
    }

    async fn fetch(&self, video_id: &VideoId) -> TranscriptResult<String> {
        let tracks = self.extractor.caption_tracks(video_id).await?;
        let (track, format) = select_english_candidate(&tracks)
            .ok_or_else(|| TranscriptError::no_captions("no English track from metadata extractor"))?;

        debug!(
            video_id = %video_id,
            track = %track,
            format = %format.format,
            "Selected secondary caption track"
        );
        fetch_and_decode(&self.client, format).await
    }
}
