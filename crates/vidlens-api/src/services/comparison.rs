//! Request orchestration for a two-video comparison.

use std::sync::Arc;

use tracing::{debug, info, warn};
use vidlens_models::{extract_video_id, AnalysisResult, VideoId};
use vidlens_transcript::{TranscriptProvider, TranscriptUnavailable};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::services::gemini::Analyzer;

pub const INVALID_URLS_MESSAGE: &str = "Invalid YouTube URLs";

/// Runs one comparison: identifiers, transcripts, then analysis.
#[derive(Clone)]
pub struct ComparisonService {
    transcripts: Arc<dyn TranscriptProvider>,
    analyzer: Arc<dyn Analyzer>,
}

impl ComparisonService {
    pub fn new(transcripts: Arc<dyn TranscriptProvider>, analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            transcripts,
            analyzer,
        }
    }

    /// Compare two videos.
    ///
    /// Only unparseable input is an error. Transcript and analysis failures
    /// produce a degraded [`AnalysisResult`].
    pub async fn compare(&self, url1: Option<&str>, url2: Option<&str>) -> ApiResult<AnalysisResult> {
        let (id1, id2) = match (parse_id(url1), parse_id(url2)) {
            (Some(id1), Some(id2)) => (id1, id2),
            _ => return Err(ApiError::bad_request(INVALID_URLS_MESSAGE)),
        };

        info!(video1 = %id1, video2 = %id2, "Processing comparison");

        let (transcript1, transcript2) = tokio::join!(
            self.transcripts.transcript(&id1),
            self.transcripts.transcript(&id2)
        );

        let (transcript1, transcript2) = match (transcript1, transcript2) {
            (Ok(t1), Ok(t2)) => (t1, t2),
            (r1, r2) => {
                let diagnostic = failure_diagnostic(&[(&id1, r1.err()), (&id2, r2.err())]);
                warn!(diagnostic = %diagnostic, "Transcript acquisition failed, returning fallback");
                metrics::record_analysis("transcript_failure");
                return Ok(AnalysisResult::transcript_fallback(&diagnostic));
            }
        };

        match self
            .analyzer
            .analyze(&transcript1.text, &transcript2.text)
            .await
        {
            Ok(result) => {
                metrics::record_analysis("success");
                Ok(result)
            }
            Err(e) => {
                warn!(error = %e, "AI generation failed");
                metrics::record_analysis("analysis_failure");
                Ok(AnalysisResult::generation_failed(&e.to_string()))
            }
        }
    }
}

fn parse_id(url: Option<&str>) -> Option<VideoId> {
    let url = url?;
    extract_video_id(url)
        .map_err(|e| debug!(url = %url, error = %e, "Rejected video URL"))
        .ok()
}

/// `Video N ({id}): {message} ({reasons}) ` for every failed video, in order.
/// The reasons are omitted when no strategy ran.
fn failure_diagnostic(videos: &[(&VideoId, Option<TranscriptUnavailable>)]) -> String {
    videos
        .iter()
        .enumerate()
        .filter_map(|(i, (id, failure))| {
            failure.as_ref().map(|f| {
                if f.attempts.is_empty() {
                    format!("Video {} ({}): {} ", i + 1, id, f)
                } else {
                    format!("Video {} ({}): {} ({}) ", i + 1, id, f, f.reasons())
                }
            })
        })
        .collect()
}
