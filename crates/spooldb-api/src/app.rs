//! Application builder: wires router + middleware + state into an Axum app.

use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use spooldb_core::config::AppConfig;
use spooldb_core::{AppError, AppResult};

use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    let max_body = state.config.server.max_body_bytes;

    build_router(state)
        .layer(RequestBodyLimitLayer::new(max_body))
        .layer(build_compression_layer())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Runs the SpoolDB server until Ctrl+C.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    tracing::info!(
        data_root = %config.catalog.data_root,
        stores_root = %config.catalog.stores_root,
        read_only = config.catalog.read_only,
        "Starting SpoolDB server"
    );

    let prime = config.cache.prime_on_startup;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::from_config(config).await?;

    if prime {
        state.cache.prime().await?;
    }

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::io(format!("Failed to bind {addr}"), e))?;

    tracing::info!(%addr, "SpoolDB server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("SpoolDB server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
