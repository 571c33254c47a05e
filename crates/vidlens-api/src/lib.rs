//! Axum HTTP API for comparing two videos.
//!
//! This crate provides:
//! - `POST /api/analyze`: transcripts for two YouTube videos, compared by Gemini
//! - Degraded responses when transcripts or the AI are unavailable
//! - Rate limiting, request IDs and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{ApiConfig, GeminiConfig};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{AnalysisError, Analyzer, ComparisonService, GeminiClient};
pub use state::AppState;
