//! Transcript acquisition configuration.

use std::time::Duration;

/// Settings for the caption sources and the fallback chain.
#[derive(Debug, Clone)]
pub struct TranscriptConfig {
    /// Languages the direct-fetch strategy asks for, in order
    pub preferred_languages: Vec<String>,
    /// Timeout applied to every caption HTTP call
    pub http_timeout: Duration,
    /// Upper bound for a single strategy attempt
    pub strategy_timeout: Duration,
    /// Include the yt-dlp strategy at the end of the chain
    pub enable_secondary_source: bool,
    /// yt-dlp binary
    pub ytdlp_path: String,
    /// Base URL of the primary caption source
    pub innertube_base_url: String,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            preferred_languages: vec!["en".to_string()],
            http_timeout: Duration::from_secs(20),
            strategy_timeout: Duration::from_secs(30),
            enable_secondary_source: true,
            ytdlp_path: "yt-dlp".to_string(),
            innertube_base_url: crate::innertube::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl TranscriptConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            preferred_languages: std::env::var("CAPTION_LANGUAGES")
                .map(|s| parse_languages(&s))
                .ok()
                .filter(|langs| !langs.is_empty())
                .unwrap_or(defaults.preferred_languages),
            http_timeout: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            strategy_timeout: std::env::var("TRANSCRIPT_STRATEGY_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.strategy_timeout),
            enable_secondary_source: std::env::var("ENABLE_SECONDARY_SOURCE")
                .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(defaults.enable_secondary_source),
            ytdlp_path: std::env::var("YTDLP_PATH").unwrap_or(defaults.ytdlp_path),
            innertube_base_url: std::env::var("INNERTUBE_BASE_URL")
                .unwrap_or(defaults.innertube_base_url),
        }
    }
}

fn parse_languages(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
