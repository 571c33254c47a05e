//! Application state.

use std::sync::Arc;

use vidlens_transcript::{TranscriptChain, TranscriptProvider};

use crate::config::ApiConfig;
use crate::services::{Analyzer, ComparisonService, GeminiClient};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub comparison: ComparisonService,
}

impl AppState {
    /// Create application state with the standard transcript chain and the
    /// Gemini analyzer.
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let chain = TranscriptChain::from_config(&config.transcript)?;
        let gemini = GeminiClient::new(config.gemini.clone())?;

        Ok(Self::with_services(config, Arc::new(chain), Arc::new(gemini)))
    }

    /// Create application state from explicit collaborators.
    pub fn with_services(
        config: ApiConfig,
        transcripts: Arc<dyn TranscriptProvider>,
        analyzer: Arc<dyn Analyzer>,
    ) -> Self {
        Self {
            config,
            comparison: ComparisonService::new(transcripts, analyzer),
        }
    }
}
