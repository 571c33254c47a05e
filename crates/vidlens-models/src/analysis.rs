//! Comparative analysis schema.
//!
//! Field names are serialized in camelCase to match what the frontend and
//! the generative model exchange. Degraded payloads share this schema so a
//! caller can always render the response.

use serde::{Deserialize, Serialize};

/// Structured comparison of two video transcripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: Vec<TopicSummary>,
    pub comparative_insights: ComparativeInsights,
    pub key_takeaways: Vec<String>,
    pub quiz: Vec<QuizItem>,
    pub difficulty_questions: DifficultyQuestions,
    pub notes: String,
}

/// One topic covered by the videos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtopics: Vec<Subtopic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtopic {
    pub heading: String,
    #[serde(default)]
    pub points: Vec<String>,
}

/// Where each video is stronger and where they agree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeInsights {
    pub video1_better: Vec<String>,
    pub video2_better: Vec<String>,
    pub agreement: Vec<String>,
}

/// A single quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizItem {
    pub id: u32,
    /// Question kind, e.g. "mcq"
    #[serde(rename = "type")]
    pub kind: String,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub answer: String,
}

/// Open questions grouped by difficulty tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DifficultyQuestions {
    pub easy: Vec<String>,
    pub medium: Vec<String>,
    pub hard: Vec<String>,
}

impl AnalysisResult {
    /// Payload returned when at least one transcript could not be obtained.
    ///
    /// `diagnostic` names the failed video(s) and why.
    pub fn transcript_fallback(diagnostic: &str) -> Self {
        Self {
            summary: vec![TopicSummary {
                title: "Fallback Mode".to_string(),
                content: format!("TRANSCRIPT FAILURE: {} (Check terminal for details)", diagnostic),
                subtopics: Vec::new(),
            }],
            comparative_insights: ComparativeInsights::default(),
            key_takeaways: vec![
                "Check video privacy settings.".to_string(),
                "Ensure videos have CC/Subtitles.".to_string(),
            ],
            quiz: Vec::new(),
            difficulty_questions: DifficultyQuestions::default(),
            notes: "Try different videos.".to_string(),
        }
    }

    /// Payload returned when the generative service could not produce a result.
    pub fn generation_failed(detail: &str) -> Self {
        Self {
            summary: vec![TopicSummary {
                title: "AI generation failed".to_string(),
                content: format!("The AI could not process the request. Error: {}", detail),
                subtopics: Vec::new(),
            }],
            comparative_insights: ComparativeInsights::default(),
            key_takeaways: Vec::new(),
            quiz: Vec::new(),
            difficulty_questions: DifficultyQuestions::default(),
            notes: "Please check backend logs.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_model_output() {
        let value = json!({
            "summary": [{
                "title": "Ownership",
                "content": "Both videos explain ownership.",
                "subtopics": [{"heading": "Moves", "points": ["Values move by default"]}]
            }],
            "comparativeInsights": {
                "video1Better": ["More examples"],
                "video2Better": [],
                "agreement": ["Borrowing is central"]
            },
            "keyTakeaways": ["Learn the borrow checker"],
            "quiz": [{
                "id": 1,
                "type": "mcq",
                "question": "What happens on move?",
                "options": ["A", "B", "C", "D"],
                "answer": "A"
            }],
            "difficultyQuestions": {"easy": ["What is a move?"], "medium": [], "hard": []},
            "notes": "Revise lifetimes."
        });

        let result: AnalysisResult = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(result.summary[0].subtopics[0].points.len(), 1);
        assert_eq!(result.quiz[0].kind, "mcq");
        assert_eq!(serde_json::to_value(&result).unwrap(), value);
    }

    #[test]
    fn test_missing_top_level_field_is_rejected() {
        let value = json!({
            "summary": [],
            "keyTakeaways": [],
            "quiz": [],
            "difficultyQuestions": {"easy": [], "medium": [], "hard": []},
            "notes": ""
        });
        assert!(serde_json::from_value::<AnalysisResult>(value).is_err());
    }

    #[test]
    fn test_transcript_fallback_shape() {
        let payload = AnalysisResult::transcript_fallback("Video 1 (abc): ERROR: nope ");
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["summary"][0]["title"], "Fallback Mode");
        assert_eq!(
            value["summary"][0]["content"],
            "TRANSCRIPT FAILURE: Video 1 (abc): ERROR: nope  (Check terminal for details)"
        );
        assert!(value["summary"][0].get("subtopics").is_none());
        assert_eq!(value["comparativeInsights"]["video1Better"], json!([]));
        assert_eq!(value["keyTakeaways"].as_array().unwrap().len(), 2);
        assert_eq!(value["difficultyQuestions"]["hard"], json!([]));
        assert_eq!(value["notes"], "Try different videos.");
    }

    #[test]
    fn test_generation_failed_shape() {
        let payload = AnalysisResult::generation_failed("timeout");
        assert_eq!(payload.summary[0].title, "AI generation failed");
        assert_eq!(
            payload.summary[0].content,
            "The AI could not process the request. Error: timeout"
        );
        assert!(payload.key_takeaways.is_empty());
        assert_eq!(payload.notes, "Please check backend logs.");
    }
}
