//! Primary caption source backed by YouTube's InnerTube player API.
//!
//! The watch page is scraped for the InnerTube API key, the player endpoint
//! returns the caption track list, and track content is downloaded as
//! timed-event JSON.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use vidlens_models::VideoId;

use crate::error::{TranscriptError, TranscriptResult};
use crate::source::{fetch_and_decode, CaptionSource, USER_AGENT};
use crate::track::{select_by_language, CaptionFormat, CaptionKind, CaptionTrack};

pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

const ANDROID_CLIENT_VERSION: &str = "20.10.38";

static API_KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#).expect("valid api key pattern")
});

static API_KEY_FALLBACK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#).expect("valid api key pattern")
});

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<PlayerCaptionTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerCaptionTrack {
    base_url: String,
    language_code: String,
    /// "asr" for generated tracks
    kind: Option<String>,
}

impl PlayerCaptionTrack {
    fn into_track(self) -> CaptionTrack {
        let kind = match self.kind.as_deref() {
            Some("asr") => CaptionKind::Automatic,
            _ => CaptionKind::Manual,
        };
        let base = self.base_url.replace("&fmt=srv3", "");
        CaptionTrack::new(kind, self.language_code)
            .with_format(CaptionFormat::TimedJson, format!("{}&fmt=json3", base))
            .with_format(CaptionFormat::SubtitleCue, format!("{}&fmt=vtt", base))
    }
}

/// InnerTube caption client.
#[derive(Clone)]
pub struct InnerTubeClient {
    client: Client,
    base_url: String,
    languages: Vec<String>,
}

impl InnerTubeClient {
    /// Create a client that fetches `languages` by default.
    pub fn new(client: Client, languages: Vec<String>) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            languages,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    async fn player_response(&self, video_id: &VideoId) -> TranscriptResult<PlayerResponse> {
        debug!(video_id = %video_id, "Fetching watch page");

        let page = self
            .client
            .get(format!("{}/watch", self.base_url))
            .query(&[("v", video_id.as_str())])
            .header("User-Agent", USER_AGENT)
            .header("Accept-Language", "en-US")
            .send()
            .await?;
        if !page.status().is_success() {
            return Err(TranscriptError::Status {
                status: page.status().as_u16(),
            });
        }
        let html = page.text().await?;
        let api_key = extract_api_key(&html)?;

        let player_url = format!(
            "{}/youtubei/v1/player?key={}&prettyPrint=false",
            self.base_url, api_key
        );
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": ANDROID_CLIENT_VERSION
                }
            },
            "videoId": video_id.as_str()
        });

        let response = self
            .client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(TranscriptError::Status {
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CaptionSource for InnerTubeClient {
    async fn fetch_default(&self, video_id: &VideoId) -> TranscriptResult<String> {
        let tracks = self.list_tracks(video_id).await?;
        let track = select_by_language(&tracks, &self.languages).ok_or_else(|| {
            TranscriptError::no_captions(format!(
                "no track in requested languages {:?}",
                self.languages
            ))
        })?;
        debug!(video_id = %video_id, track = %track, "Selected default caption track");
        self.fetch_track(track).await
    }

    async fn list_tracks(&self, video_id: &VideoId) -> TranscriptResult<Vec<CaptionTrack>> {
        let response = self.player_response(video_id).await?;
        tracks_from_player(response)
    }

    async fn fetch_track(&self, track: &CaptionTrack) -> TranscriptResult<String> {
        let format = track
            .preferred_format()
            .ok_or_else(|| TranscriptError::no_captions(format!("track {} has no usable format", track)))?;
        fetch_and_decode(&self.client, format).await
    }
}

fn tracks_from_player(response: PlayerResponse) -> TranscriptResult<Vec<CaptionTrack>> {
    if let Some(status) = response.playability_status {
        if status.status != "OK" {
            return Err(TranscriptError::Unplayable(
                status.reason.unwrap_or(status.status),
            ));
        }
    }

    let tracks: Vec<CaptionTrack> = response
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .map(|r| r.caption_tracks)
        .unwrap_or_default()
        .into_iter()
        .map(PlayerCaptionTrack::into_track)
        .collect();

    if tracks.is_empty() {
        return Err(TranscriptError::no_captions("captions are disabled for this video"));
    }
    Ok(tracks)
}

fn extract_api_key(html: &str) -> TranscriptResult<String> {
    API_KEY_PATTERN
        .captures(html)
        .or_else(|| API_KEY_FALLBACK_PATTERN.captures(html))
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| TranscriptError::extractor("could not extract InnerTube API key from watch page"))
}
