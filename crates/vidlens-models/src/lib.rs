//! Shared data models for vidlens.
//!
//! This crate provides:
//! - Video identifier extraction from user-pasted URLs
//! - The comparative analysis schema returned by the API, including the
//!   degraded payloads served when the pipeline cannot complete

pub mod analysis;
pub mod video;

// Re-export common types
pub use analysis::{
    AnalysisResult, ComparativeInsights, DifficultyQuestions, QuizItem, Subtopic, TopicSummary,
};
pub use video::{extract_video_id, VideoId, YoutubeIdError, YoutubeIdResult};
