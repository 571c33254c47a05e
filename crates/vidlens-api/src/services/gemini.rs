//! Gemini client for comparative transcript analysis.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use vidlens_models::AnalysisResult;

use crate::config::GeminiConfig;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("GEMINI_API_KEY is not configured")]
    Unavailable,

    #[error("Gemini API request failed: {0}")]
    Request(reqwest::Error),

    #[error("Gemini API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("No content in Gemini response")]
    EmptyResponse,

    #[error("Failed to parse analysis JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

// The request URL never reaches the error text.
impl From<reqwest::Error> for AnalysisError {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e.without_url())
    }
}

/// Produces a comparative analysis of two transcripts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(
        &self,
        transcript1: &str,
        transcript2: &str,
    ) -> Result<AnalysisResult, AnalysisError>;
}

/// Gemini API request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
    response_mime_type: String,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiResponse {
    fn text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Gemini API client. One call per analysis, no retries.
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn request_body(&self, prompt: String) -> GeminiRequest {
        GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                top_p: 0.95,
                top_k: 64,
                max_output_tokens: self.config.max_output_tokens,
                response_mime_type: "application/json".to_string(),
            },
        }
    }
}

#[async_trait]
impl Analyzer for GeminiClient {
    async fn analyze(
        &self,
        transcript1: &str,
        transcript2: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let api_key = self.config.api_key.as_deref().ok_or(AnalysisError::Unavailable)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let prompt =
            build_comparison_prompt(transcript1, transcript2, self.config.max_transcript_chars);

        info!(model = %self.config.model, prompt_chars = prompt.len(), "Calling Gemini");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api { status, message });
        }

        let gemini_response: GeminiResponse = response.json().await?;
        let text = gemini_response.text().ok_or(AnalysisError::EmptyResponse)?;

        Ok(serde_json::from_str(strip_code_fences(&text))?)
    }
}

/// Remove a surrounding markdown code fence (```json ... ```), if any.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

/// Keep at most `max_chars` characters, cutting on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    }
}

/// Build the comparison prompt for two transcripts.
pub fn build_comparison_prompt(transcript1: &str, transcript2: &str, max_chars: usize) -> String {
    let section = |text: &str| {
        let (kept, truncated) = truncate_chars(text, max_chars);
        if truncated {
            format!("{}... (truncated)", kept)
        } else {
            kept.to_string()
        }
    };

    format!(
        r#"Analyze these two video transcripts and generate a structured JSON response.

INSTRUCTIONS FOR A DEEP-DIVE ANALYSIS:
1. Completeness is critical. Capture every nuance, technical detail and sub-point.
2. Language: if the transcripts are in Hindi, write the output strictly in Hindi (Devanagari). If they are in English, write in English.
3. Long videos: break the content into as many distinct topics as needed to be exhaustive.
4. Coverage: do not skip any section of either video.

Transcript 1: {}

Transcript 2: {}

Output MUST be valid JSON with exactly this structure:
{{
    "summary": [
        {{
            "title": "Comprehensive topic name",
            "content": "Detailed, in-depth explanation of this topic. Do not be brief.",
            "subtopics": [
                {{
                    "heading": "Sub-concept",
                    "points": ["Detailed point 1", "Detailed point 2", "Examples mentioned"]
                }}
            ]
        }}
    ],
    "comparativeInsights": {{
        "video1Better": ["Detailed strength 1", "Detailed strength 2"],
        "video2Better": ["Detailed strength 1", "Detailed strength 2"],
        "agreement": ["Detailed point of agreement"]
    }},
    "keyTakeaways": ["Takeaway 1", "Takeaway 2", "Takeaway 3", "Takeaway 4"],
    "quiz": [
        {{ "id": 1, "type": "mcq", "question": "Deep technical question", "options": ["A", "B", "C", "D"], "answer": "A" }}
    ],
    "difficultyQuestions": {{
        "easy": ["Fundamental question 1", "Fundamental question 2"],
        "medium": ["Application question 1", "Application question 2"],
        "hard": ["Analytical question 1", "Analytical question 2"]
    }},
    "notes": "Extensive revision notes covering all major concepts"
}}"#,
        section(transcript1),
        section(transcript2)
    )
}
