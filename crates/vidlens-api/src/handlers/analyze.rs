//! Comparison handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;
use vidlens_models::AnalysisResult;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body for `/api/analyze`. Missing URLs are rejected as invalid.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub url1: Option<String>,
    #[serde(default)]
    pub url2: Option<String>,
}

/// Compare two videos and return the structured analysis.
///
/// Transcript and AI failures still answer 200 with a degraded payload;
/// only unusable input is a 400.
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalysisResult>> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    info!(
        url1 = request.url1.as_deref().unwrap_or_default(),
        url2 = request.url2.as_deref().unwrap_or_default(),
        "Processing analyze request"
    );

    let result = state
        .comparison
        .compare(request.url1.as_deref(), request.url2.as_deref())
        .await?;

    Ok(Json(result))
}
