//! circl-server library - data-management API for the Circl feed simulator
//!
//! Serves the feed configuration, stimuli and filler documents for editing,
//! lists generated condition images, and hosts the front-end static assets.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use circl_common::config::ServerConfig;
use circl_common::{DirLister, OsLister};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod cli;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use services::{ConfigStore, MediaIndex};

/// Largest accepted document upload
const MAX_DOCUMENT_BYTES: usize = 32 * 1024 * 1024;

/// Application state shared across HTTP handlers
///
/// Holds no documents; every request goes to the filesystem.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: ConfigStore,
    pub media: MediaIndex,
}

impl AppState {
    /// Create application state backed by the real filesystem
    pub fn new(config: ServerConfig) -> Self {
        Self::with_lister(config, Arc::new(OsLister))
    }

    /// Create application state with a custom directory lister for images
    pub fn with_lister(config: ServerConfig, lister: Arc<dyn DirLister>) -> Self {
        Self {
            store: ConfigStore::new(&config.data_dir),
            media: MediaIndex::new(lister, &config.images_dir),
            config: Arc::new(config),
        }
    }
}

/// Build application router
///
/// API routes first; `/generated_images` maps onto the images root and any
/// other path falls through to the static base directory.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let images = ServeDir::new(&state.config.images_dir);
    let assets = ServeDir::new(&state.config.base_dir);

    Router::new()
        .route("/api/config", get(api::get_config).post(api::save_config))
        .route("/api/stimuli", get(api::get_stimuli).post(api::save_stimuli))
        .route("/api/fillers", get(api::get_fillers).post(api::save_fillers))
        .route("/api/images", get(api::list_images))
        .route("/api/images/:condition_id", get(api::get_condition_images))
        .route("/api/status", get(api::api_status))
        .merge(api::health_routes())
        .with_state(state)
        .nest_service("/generated_images", images)
        .fallback_service(assets)
        .layer(DefaultBodyLimit::max(MAX_DOCUMENT_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
