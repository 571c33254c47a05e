//! API integration tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vidlens_api::{create_router, ApiConfig, AppState, GeminiClient, GeminiConfig};
use vidlens_models::VideoId;
use vidlens_transcript::{Transcript, TranscriptProvider, TranscriptUnavailable};

const VIDEO_1: &str = "aaaaaaaaaaa";
const VIDEO_2: &str = "bbbbbbbbbbb";

/// Transcript provider backed by a fixed table; unknown IDs fail.
struct StaticTranscripts(HashMap<String, String>);

impl StaticTranscripts {
    fn with(entries: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self(
            entries
                .iter()
                .map(|(id, text)| (id.to_string(), text.to_string()))
                .collect(),
        ))
    }
}

#[async_trait]
impl TranscriptProvider for StaticTranscripts {
    async fn transcript(&self, video_id: &VideoId) -> Result<Transcript, TranscriptUnavailable> {
        match self.0.get(video_id.as_str()) {
            Some(text) => Ok(Transcript {
                video_id: video_id.clone(),
                text: text.clone(),
                strategy: "static",
            }),
            None => Err(TranscriptUnavailable {
                video_id: video_id.clone(),
                attempts: Vec::new(),
            }),
        }
    }
}

fn analysis_json() -> Value {
    json!({
        "summary": [{
            "title": "Sorting",
            "content": "Both videos explain quicksort.",
            "subtopics": [{"heading": "Partitioning", "points": ["Lomuto", "Hoare"]}]
        }],
        "comparativeInsights": {
            "video1Better": ["Clearer diagrams"],
            "video2Better": ["More examples"],
            "agreement": ["Average case is n log n"]
        },
        "keyTakeaways": ["Pick a good pivot"],
        "quiz": [{
            "id": 1,
            "type": "mcq",
            "question": "Worst case?",
            "options": ["n", "n log n", "n^2", "log n"],
            "answer": "n^2"
        }],
        "difficultyQuestions": {"easy": ["What is a pivot?"], "medium": [], "hard": []},
        "notes": "Revise partition schemes."
    })
}

fn gemini_config(server: Option<&MockServer>, api_key: Option<&str>) -> GeminiConfig {
    GeminiConfig {
        api_key: api_key.map(str::to_string),
        base_url: server
            .map(|s| s.uri())
            .unwrap_or_else(|| "http://127.0.0.1:9".to_string()),
        ..GeminiConfig::default()
    }
}

fn test_router(transcripts: Arc<StaticTranscripts>, gemini: GeminiConfig) -> Router {
    let config = ApiConfig {
        rate_limit_rps: 1000,
        gemini: gemini.clone(),
        ..ApiConfig::default()
    };
    let analyzer = Arc::new(GeminiClient::new(gemini).unwrap());
    create_router(AppState::with_services(config, transcripts, analyzer), None)
}

fn analyze_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn urls() -> Value {
    json!({
        "url1": format!("https://www.youtube.com/watch?v={}", VIDEO_1),
        "url2": format!("https://youtu.be/{}?si=share", VIDEO_2),
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn both_transcripts() -> Arc<StaticTranscripts> {
    StaticTranscripts::with(&[(VIDEO_1, "first transcript"), (VIDEO_2, "second transcript")])
}

#[tokio::test]
async fn test_root_describes_service() {
    let app = test_router(both_transcripts(), gemini_config(None, None));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(
        body_json(response).await,
        json!({
            "status": "Backend is running",
            "service": "YouTube AI Analyzer",
            "endpoints": ["/api/analyze"]
        })
    );
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_router(both_transcripts(), gemini_config(None, None));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = test_router(both_transcripts(), gemini_config(None, None));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("X-Request-ID", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-123");
}

#[tokio::test]
async fn test_invalid_urls_rejected_without_downstream_calls() {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&gemini)
        .await;
    let app = test_router(both_transcripts(), gemini_config(Some(&gemini), Some("key")));

    let response = app
        .oneshot(analyze_request(json!({
            "url1": "https://vimeo.com/12345",
            "url2": format!("https://youtu.be/{}", VIDEO_2),
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "Invalid YouTube URLs"}));
}

#[tokio::test]
async fn test_missing_url_field_rejected() {
    let app = test_router(both_transcripts(), gemini_config(None, None));

    let response = app
        .oneshot(analyze_request(json!({"url1": "https://youtu.be/aaaaaaaaaaa"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid YouTube URLs");
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let app = test_router(both_transcripts(), gemini_config(None, None));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/analyze")
                .header("Content-Type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_transcript_failure_for_video_one_only() {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&gemini)
        .await;
    let transcripts = StaticTranscripts::with(&[(VIDEO_2, "second transcript")]);
    let app = test_router(transcripts, gemini_config(Some(&gemini), Some("key")));

    let response = app.oneshot(analyze_request(urls())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["summary"][0]["title"], "Fallback Mode");

    let content = body["summary"][0]["content"].as_str().unwrap();
    assert!(content.starts_with("TRANSCRIPT FAILURE: Video 1 (aaaaaaaaaaa): ERROR:"));
    assert!(!content.contains(VIDEO_2));
    assert_eq!(
        body["keyTakeaways"],
        json!(["Check video privacy settings.", "Ensure videos have CC/Subtitles."])
    );
    assert_eq!(body["notes"], "Try different videos.");
}

#[tokio::test]
async fn test_fenced_gemini_json_is_returned() {
    let gemini = MockServer::start().await;
    let fenced = format!("```json\n{}\n```", analysis_json());
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": fenced}]}}]
        })))
        .expect(1)
        .mount(&gemini)
        .await;
    let app = test_router(both_transcripts(), gemini_config(Some(&gemini), Some("key")));

    let response = app.oneshot(analyze_request(urls())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, analysis_json());
}

#[tokio::test]
async fn test_malformed_gemini_json_degrades() {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "{\"summary\": [oops"}]}}]
        })))
        .mount(&gemini)
        .await;
    let app = test_router(both_transcripts(), gemini_config(Some(&gemini), Some("key")));

    let response = app.oneshot(analyze_request(urls())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["summary"][0]["title"], "AI generation failed");
    assert!(body["summary"][0]["content"]
        .as_str()
        .unwrap()
        .starts_with("The AI could not process the request. Error:"));
    assert_eq!(body["keyTakeaways"], json!([]));
    assert_eq!(body["notes"], "Please check backend logs.");
}

#[tokio::test]
async fn test_gemini_error_status_degrades() {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .expect(1)
        .mount(&gemini)
        .await;
    let app = test_router(both_transcripts(), gemini_config(Some(&gemini), Some("key")));

    let response = app.oneshot(analyze_request(urls())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["summary"][0]["title"], "AI generation failed");
    assert!(body["summary"][0]["content"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn test_unreachable_gemini_keeps_api_key_out_of_response() {
    let gemini = gemini_config(None, Some("SECRET-KEY-123"));
    let config = ApiConfig {
        rate_limit_rps: 1000,
        environment: "production".to_string(),
        gemini: gemini.clone(),
        ..ApiConfig::default()
    };
    let analyzer = Arc::new(GeminiClient::new(gemini).unwrap());
    let app = create_router(
        AppState::with_services(config, both_transcripts(), analyzer),
        None,
    );

    let response = app.oneshot(analyze_request(urls())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["summary"][0]["title"], "AI generation failed");
    let content = body["summary"][0]["content"].as_str().unwrap();
    assert!(content.contains("Gemini API request failed"));
    assert!(!body.to_string().contains("SECRET-KEY-123"));
}

#[tokio::test]
async fn test_missing_credential_degrades_without_network() {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&gemini)
        .await;
    let app = test_router(both_transcripts(), gemini_config(Some(&gemini), None));

    let response = app.oneshot(analyze_request(urls())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["summary"][0]["title"], "AI generation failed");
}

#[tokio::test]
async fn test_rate_limiting_per_client_ip() {
    let config = ApiConfig {
        rate_limit_rps: 1,
        ..ApiConfig::default()
    };
    let analyzer = Arc::new(GeminiClient::new(gemini_config(None, None)).unwrap());
    let app = create_router(
        AppState::with_services(config, both_transcripts(), analyzer),
        None,
    );

    let request = || {
        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header("Content-Type", "application/json")
            .header("X-Forwarded-For", "192.0.2.50")
            .body(Body::from(json!({"url1": "bad", "url2": "bad"}).to_string()))
            .unwrap()
    };

    let first = app.clone().oneshot(request()).await.unwrap();
    assert_eq!(first.status(), StatusCode::BAD_REQUEST);

    let second = app.oneshot(request()).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(second.headers()["retry-after"], "1");
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = test_router(both_transcripts(), gemini_config(None, None));

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/analyze")
                .header("Origin", "http://localhost:5173")
                .header("Access-Control-Request-Method", "POST")
                .header("Access-Control-Request-Headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
