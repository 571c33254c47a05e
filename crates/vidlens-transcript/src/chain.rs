//! The transcript fallback chain.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures_util::FutureExt;
use reqwest::Client;
use thiserror::Error;
use tracing::{info, warn};
use vidlens_models::VideoId;

use crate::config::TranscriptConfig;
use crate::error::{TranscriptError, TranscriptResult};
use crate::innertube::InnerTubeClient;
use crate::source::CaptionSource;
use crate::strategy::{
    DirectFetchStrategy, ListAndPickStrategy, SecondarySourceStrategy, TranscriptStrategy,
};
use crate::ytdlp::YtDlpExtractor;

/// Message carried by the terminal chain failure. Callers detect failure by
/// this prefix.
pub const NO_TRANSCRIPT_MESSAGE: &str = "ERROR: No transcript found for this video.";

const STRATEGY_METRIC: &str = "vidlens_transcript_strategy_total";

/// Transcript text together with the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub video_id: VideoId,
    pub text: String,
    pub strategy: &'static str,
}

/// Why a single strategy did not produce a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyFailure {
    pub strategy: &'static str,
    pub reason: String,
}

impl fmt::Display for StrategyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.strategy, self.reason)
    }
}

/// Every strategy in the chain failed.
#[derive(Debug, Clone, Error)]
#[error("{}", NO_TRANSCRIPT_MESSAGE)]
pub struct TranscriptUnavailable {
    pub video_id: VideoId,
    pub attempts: Vec<StrategyFailure>,
}

impl TranscriptUnavailable {
    /// Per-strategy reasons, `name: reason` joined with `; `.
    pub fn reasons(&self) -> String {
        self.attempts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Anything that can turn a video ID into a transcript.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    async fn transcript(&self, video_id: &VideoId) -> Result<Transcript, TranscriptUnavailable>;
}

/// Ordered list of strategies tried until one yields non-blank text.
#[derive(Clone)]
pub struct TranscriptChain {
    strategies: Vec<Arc<dyn TranscriptStrategy>>,
    strategy_timeout: Duration,
}

impl TranscriptChain {
    pub fn new(strategies: Vec<Arc<dyn TranscriptStrategy>>) -> Self {
        Self {
            strategies,
            strategy_timeout: TranscriptConfig::default().strategy_timeout,
        }
    }

    pub fn with_strategy_timeout(mut self, timeout: Duration) -> Self {
        self.strategy_timeout = timeout;
        self
    }

    /// Build the standard chain: direct fetch, list-and-pick, then the
    /// secondary source when enabled.
    pub fn from_config(config: &TranscriptConfig) -> TranscriptResult<Self> {
        let client = Client::builder().timeout(config.http_timeout).build()?;

        let primary: Arc<dyn CaptionSource> = Arc::new(
            InnerTubeClient::new(client.clone(), config.preferred_languages.clone())
                .with_base_url(&config.innertube_base_url),
        );

        let mut strategies: Vec<Arc<dyn TranscriptStrategy>> = vec![
            Arc::new(DirectFetchStrategy::new(primary.clone())),
            Arc::new(ListAndPickStrategy::new(primary)),
        ];
        if config.enable_secondary_source {
            strategies.push(Arc::new(SecondarySourceStrategy::new(
                Arc::new(YtDlpExtractor::new(&config.ytdlp_path)),
                client,
            )));
        }

        Ok(Self::new(strategies).with_strategy_timeout(config.strategy_timeout))
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    async fn attempt(
        &self,
        strategy: &dyn TranscriptStrategy,
        video_id: &VideoId,
    ) -> TranscriptResult<String> {
        let call = AssertUnwindSafe(strategy.fetch(video_id)).catch_unwind();

        let text = match tokio::time::timeout(self.strategy_timeout, call).await {
            Err(_) => return Err(TranscriptError::Timeout(self.strategy_timeout)),
            Ok(Err(panic)) => return Err(TranscriptError::Panicked(panic_message(panic))),
            Ok(Ok(result)) => result?,
        };

        if text.trim().is_empty() {
            return Err(TranscriptError::Empty);
        }
        Ok(text)
    }
}

#[async_trait]
impl TranscriptProvider for TranscriptChain {
    async fn transcript(&self, video_id: &VideoId) -> Result<Transcript, TranscriptUnavailable> {
        let mut attempts = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            let name = strategy.name();
            let start = Instant::now();

            match self.attempt(strategy.as_ref(), video_id).await {
                Ok(text) => {
                    metrics::counter!(STRATEGY_METRIC, "strategy" => name, "outcome" => "success")
                        .increment(1);
                    info!(
                        video_id = %video_id,
                        strategy = name,
                        chars = text.chars().count(),
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Transcript acquired"
                    );
                    return Ok(Transcript {
                        video_id: video_id.clone(),
                        text,
                        strategy: name,
                    });
                }
                Err(e) => {
                    metrics::counter!(STRATEGY_METRIC, "strategy" => name, "outcome" => "failure")
                        .increment(1);
                    warn!(
                        video_id = %video_id,
                        strategy = name,
                        error = %e,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Transcript strategy failed, falling through"
                    );
                    attempts.push(StrategyFailure {
                        strategy: name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        warn!(video_id = %video_id, attempts = attempts.len(), "No transcript found");
        Err(TranscriptUnavailable {
            video_id: video_id.clone(),
            attempts,
        })
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
