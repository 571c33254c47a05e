//! Business logic services.

pub mod comparison;
pub mod gemini;

pub use comparison::ComparisonService;
pub use gemini::{AnalysisError, Analyzer, GeminiClient};
