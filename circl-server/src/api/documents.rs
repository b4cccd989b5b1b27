//! Config, stimuli and fillers document endpoints
//!
//! GET returns the stored document verbatim; POST validates and replaces it.

use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;
use serde_json::{Map, Value};

use super::blocking;
use crate::error::{ApiError, ApiResult};
use crate::services::{Document, Resource};
use crate::AppState;

/// Response body of a successful save
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub message: String,
}

/// GET /api/config
pub async fn get_config(State(state): State<AppState>) -> ApiResult<Json<Document>> {
    load_document(state, Resource::Config).await
}

/// POST /api/config
pub async fn save_config(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<SaveResponse>> {
    save_document(state, Resource::Config, body).await
}

/// GET /api/stimuli
pub async fn get_stimuli(State(state): State<AppState>) -> ApiResult<Json<Document>> {
    load_document(state, Resource::Stimuli).await
}

/// POST /api/stimuli
pub async fn save_stimuli(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<SaveResponse>> {
    save_document(state, Resource::Stimuli, body).await
}

/// GET /api/fillers
pub async fn get_fillers(State(state): State<AppState>) -> ApiResult<Json<Document>> {
    load_document(state, Resource::Fillers).await
}

/// POST /api/fillers
pub async fn save_fillers(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<SaveResponse>> {
    save_document(state, Resource::Fillers, body).await
}

async fn load_document(state: AppState, resource: Resource) -> ApiResult<Json<Document>> {
    let store = state.store.clone();
    match blocking(move || store.load(resource)).await {
        Ok(document) => Ok(Json(document)),
        Err(ApiError::NotFound(message)) => Err(match fallback_body(resource) {
            Some(fallback) => ApiError::NotFoundWithFallback { message, fallback },
            None => ApiError::NotFound(message),
        }),
        Err(e) => Err(e),
    }
}

async fn save_document(
    state: AppState,
    resource: Resource,
    body: Bytes,
) -> ApiResult<Json<SaveResponse>> {
    let document = parse_body(&body)?;

    let store = state.store.clone();
    blocking(move || store.save(resource, &document)).await?;

    Ok(Json(SaveResponse {
        success: true,
        message: format!("{} saved successfully", resource.label()),
    }))
}

/// Decode a request body; an empty body is an absent document
fn parse_body(body: &[u8]) -> ApiResult<Document> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Document::new(Value::Null));
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid JSON: {}", e)))
}

/// Default body returned alongside a 404 for list-style resources
fn fallback_body(resource: Resource) -> Option<Map<String, Value>> {
    match resource {
        Resource::Config => None,
        Resource::Stimuli | Resource::Fillers => {
            let mut body = Map::new();
            body.insert("posts".to_string(), Value::Array(Vec::new()));
            Some(body)
        }
    }
}
