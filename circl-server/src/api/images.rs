//! Generated image browsing endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use super::blocking;
use crate::error::ApiResult;
use crate::services::media_index::{ConditionImages, ImageListing};
use crate::AppState;

/// GET /api/images
///
/// Lists every condition directory with its image names and counts.
pub async fn list_images(State(state): State<AppState>) -> ApiResult<Json<ImageListing>> {
    let media = state.media.clone();
    let listing = blocking(move || media.list_all()).await?;
    Ok(Json(listing))
}

/// GET /api/images/:condition_id
pub async fn get_condition_images(
    State(state): State<AppState>,
    Path(condition_id): Path<String>,
) -> ApiResult<Json<ConditionImages>> {
    let media = state.media.clone();
    let images = blocking(move || media.list_one(&condition_id)).await?;
    Ok(Json(images))
}
