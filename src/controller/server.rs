//! # HTTP Server
//!
//! HTTP server for metrics, probes and the published discovery state.
//!
//! Provides endpoints:
//! - `/metrics` - Prometheus metrics in text format
//! - `/healthz` - Liveness probe (always returns 200)
//! - `/readyz` - Readiness probe (200 once the initial cluster list is reconciled)
//! - `/apis` - Fleet-wide API group list
//! - `/clusters/{name}/apis` - Discovery state published for one cluster
//!
//! The server runs on port 5000 by default (configurable via `METRICS_PORT`).

use crate::discovery::InMemoryDiscoveryPublisher;
use crate::observability::metrics::REGISTRY;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub struct ServerState {
    /// Set once the listener is bound
    pub is_listening: Arc<AtomicBool>,
    /// Set once the initial cluster list has been reconciled
    pub is_ready: Arc<AtomicBool>,
    /// Set when a shutdown signal was received
    pub is_shutting_down: Arc<AtomicBool>,
    pub discovery: Arc<InMemoryDiscoveryPublisher>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("is_listening", &self.is_listening.load(Ordering::Relaxed))
            .field("is_ready", &self.is_ready.load(Ordering::Relaxed))
            .field(
                "is_shutting_down",
                &self.is_shutting_down.load(Ordering::Relaxed),
            )
            .finish_non_exhaustive()
    }
}

impl ServerState {
    #[must_use]
    pub fn new(discovery: Arc<InMemoryDiscoveryPublisher>) -> Self {
        Self {
            is_listening: Arc::new(AtomicBool::new(false)),
            is_ready: Arc::new(AtomicBool::new(false)),
            is_shutting_down: Arc::new(AtomicBool::new(false)),
            discovery,
        }
    }
}

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(healthz_handler))
        .route("/readyz", get(readyz_handler))
        .route("/apis", get(apis_handler))
        .route("/clusters/{name}/apis", get(cluster_apis_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(port: u16, state: Arc<ServerState>) -> Result<(), anyhow::Error> {
    let app = router(Arc::clone(&state));

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;
    state.is_listening.store(true, Ordering::Relaxed);

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to encode metrics: {e}"),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        buffer,
    )
        .into_response()
}

async fn healthz_handler() -> StatusCode {
    StatusCode::OK
}

async fn readyz_handler(State(state): State<Arc<ServerState>>) -> StatusCode {
    if state.is_ready.load(Ordering::Relaxed) && !state.is_shutting_down.load(Ordering::Relaxed) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn apis_handler(State(state): State<Arc<ServerState>>) -> Response {
    Json(state.discovery.aggregated()).into_response()
}

async fn cluster_apis_handler(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
) -> Response {
    match state.discovery.cluster(&name) {
        Some(apis) => Json(apis).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            format!("cluster {name} has no published resources"),
        )
            .into_response(),
    }
}
