//! HTTP API handlers for circl-server

pub mod documents;
pub mod health;
pub mod images;
pub mod status;

pub use documents::{
    get_config, get_fillers, get_stimuli, save_config, save_fillers, save_stimuli,
};
pub use health::health_routes;
pub use images::{get_condition_images, list_images};
pub use status::api_status;

use crate::error::{ApiError, ApiResult};

/// Run filesystem work off the async runtime
pub(crate) async fn blocking<T, F>(work: F) -> ApiResult<T>
where
    F: FnOnce() -> circl_common::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("Worker task failed: {}", e)))?
        .map_err(ApiError::from)
}
