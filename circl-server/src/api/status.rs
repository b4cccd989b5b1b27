//! API status endpoint

use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};

/// Endpoint descriptions, in display order
const ENDPOINTS: [(&str, &str); 9] = [
    ("GET /api/config", "Get feed configuration"),
    ("POST /api/config", "Save feed configuration"),
    ("GET /api/stimuli", "Get stimuli data"),
    ("POST /api/stimuli", "Save stimuli data"),
    ("GET /api/fillers", "Get fillers data"),
    ("POST /api/fillers", "Save fillers data"),
    ("GET /api/images", "List all condition images"),
    ("GET /api/images/<condition_id>", "Get images for specific condition"),
    ("GET /api/status", "This endpoint"),
];

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub endpoints: Map<String, Value>,
}

/// GET /api/status
pub async fn api_status() -> Json<StatusResponse> {
    let endpoints = ENDPOINTS
        .iter()
        .map(|(route, description)| (route.to_string(), Value::String(description.to_string())))
        .collect();

    Json(StatusResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints,
    })
}
