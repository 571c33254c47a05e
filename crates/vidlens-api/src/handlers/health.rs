//! Health check handlers.

use axum::Json;
use chrono::Utc;
use serde::Serialize;

/// Service description served at `/`.
#[derive(Serialize)]
pub struct ServiceInfo {
    pub status: &'static str,
    pub service: &'static str,
    pub endpoints: Vec<&'static str>,
}

/// Root endpoint describing the service.
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "Backend is running",
        service: "YouTube AI Analyzer",
        endpoints: vec!["/api/analyze"],
    })
}

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
