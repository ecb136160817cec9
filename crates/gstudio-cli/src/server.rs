//! HTTP shell exposing the collector's output.
//!
//! ```text
//! GET {basePath}/graph         -> GraphSnapshot
//! GET {basePath}/routes        -> { routes, stats }
//! GET {basePath}{healthPath}   -> { status: "ok", timestamp }
//! ```
//!
//! Every request runs a fresh collection. Nothing is mounted when the
//! configuration is disabled, so every path answers 404.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing::get};
use gstudio_config::StudioConfig;
use gstudio_graph::{GraphSnapshot, HealthStatus, MetadataReader, RoutesView, SnapshotCollector};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::error::{CliError, Result};
use crate::ui;

/// Build the router for `collector` under the configured mount points.
pub fn router<R>(collector: Arc<SnapshotCollector<R>>, config: &StudioConfig) -> Router
where
    R: MetadataReader + Send + Sync + 'static,
{
    let mut app = Router::new();

    if config.enabled {
        let studio = Router::new()
            .route("/graph", get(graph::<R>))
            .route("/routes", get(routes::<R>))
            .route(&config.health_path, get(health))
            .with_state(collector);

        let base_path = config.base_path.trim_end_matches('/');
        app = if base_path.is_empty() {
            app.merge(studio)
        } else {
            app.nest(base_path, studio)
        };
    } else {
        tracing::info!("graph studio disabled, no endpoints mounted");
    }

    app.fallback(not_found).layer(CorsLayer::permissive())
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve<R>(collector: Arc<SnapshotCollector<R>>, config: &StudioConfig) -> Result<()>
where
    R: MetadataReader + Send + Sync + 'static,
{
    let app = router(collector, config);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| CliError::Server(format!("failed to bind {}: {}", addr, e)))?;
    let local = listener.local_addr()?;

    ui::success(&format!(
        "Graph Studio available at http://{}{}",
        local,
        config.base_path.trim_end_matches('/')
    ));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CliError::Server(e.to_string()))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn graph<R: MetadataReader>(
    State(collector): State<Arc<SnapshotCollector<R>>>,
) -> Json<GraphSnapshot> {
    Json(collector.collect())
}

async fn routes<R: MetadataReader>(
    State(collector): State<Arc<SnapshotCollector<R>>>,
) -> Json<RoutesView> {
    Json(collector.collect().routes_view())
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::ok())
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}
