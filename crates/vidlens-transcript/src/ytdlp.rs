//! yt-dlp metadata extractor.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};
use vidlens_models::VideoId;

use crate::error::{TranscriptError, TranscriptResult};
use crate::source::MetadataExtractor;
use crate::track::{CaptionFormat, CaptionKind, CaptionTrack};

const WATCH_URL: &str = "https://www.youtube.com/watch";

type CaptionMap = BTreeMap<String, Vec<CaptionEntry>>;

#[derive(Debug, Deserialize)]
struct VideoMetadata {
    #[serde(default)]
    subtitles: Option<CaptionMap>,
    #[serde(default)]
    automatic_captions: Option<CaptionMap>,
}

#[derive(Debug, Deserialize)]
struct CaptionEntry {
    ext: String,
    url: String,
}

/// Lists caption URLs by shelling out to `yt-dlp --dump-json`.
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    binary: String,
}

impl YtDlpExtractor {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl MetadataExtractor for YtDlpExtractor {
    async fn caption_tracks(&self, video_id: &VideoId) -> TranscriptResult<Vec<CaptionTrack>> {
        let url = watch_url(video_id)?;
        debug!(video_id = %video_id, binary = %self.binary, "Dumping video metadata");

        let output = Command::new(&self.binary)
            .args([
                "--dump-json",
                "--skip-download",
                "--no-warnings",
                "--no-playlist",
                url.as_str(),
            ])
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                video_id = %video_id,
                status = ?output.status.code(),
                error = %stderr.trim(),
                "yt-dlp failed"
            );
            return Err(TranscriptError::extractor(format!(
                "yt-dlp exited with {:?}: {}",
                output.status.code(),
                stderr.trim()
            )));
        }

        parse_caption_tracks(&String::from_utf8_lossy(&output.stdout))
    }
}

fn watch_url(video_id: &VideoId) -> TranscriptResult<String> {
    Url::parse_with_params(WATCH_URL, [("v", video_id.as_str())])
        .map(String::from)
        .map_err(|e| TranscriptError::extractor(format!("invalid watch URL: {}", e)))
}

/// Build caption tracks from a yt-dlp metadata document. Manual subtitles
/// come first, then automatic captions, each ordered by language code.
/// Entries in formats we cannot decode are dropped.
fn parse_caption_tracks(raw: &str) -> TranscriptResult<Vec<CaptionTrack>> {
    let metadata: VideoMetadata = serde_json::from_str(raw)?;

    let groups = [
        (CaptionKind::Manual, metadata.subtitles),
        (CaptionKind::Automatic, metadata.automatic_captions),
    ];

    let tracks = groups
        .into_iter()
        .flat_map(|(kind, map)| {
            map.unwrap_or_default()
                .into_iter()
                .map(move |(language, entries)| {
                    entries
                        .into_iter()
                        .filter_map(|e| CaptionFormat::from_extension(&e.ext).map(|f| (f, e.url)))
                        .fold(CaptionTrack::new(kind, language), |track, (format, url)| {
                            track.with_format(format, url)
                        })
                })
        })
        .collect();

    Ok(tracks)
}
