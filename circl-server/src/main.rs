//! circl-server - data-management API and static host for the Circl feed
//!
//! Serves the admin panel and feeds, the generated condition images, and the
//! JSON document API under /api.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use circl_server::cli::ServerArgs;
use circl_server::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();
    let config = args.resolve().context("Failed to resolve configuration")?;

    init_tracing(&config.log_level);

    info!(
        "Starting Circl server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    info!("Static assets: {}", config.base_dir.display());
    info!("Data directory: {}", config.data_dir.display());
    info!("Images directory: {}", config.images_dir.display());

    let bind_address = config.bind_address();
    let port = config.port;
    let app = build_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_address))?;

    info!("Server running at: http://localhost:{}", port);
    info!("Admin panel: http://localhost:{}/circl/admin.html", port);
    info!("Feed: http://localhost:{}/circl/feed.html?source=json", port);
    info!("API status: http://localhost:{}/api/status", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// RUST_LOG wins over the configured level
fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
