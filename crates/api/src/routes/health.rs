use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Number of job records held in memory.
    pub jobs: usize,
    /// Jobs spawned on the worker and not yet finished.
    pub in_flight: usize,
    /// Jobs currently rendering.
    pub processing: usize,
    /// Configured cap on concurrently rendering jobs.
    pub max_concurrency: usize,
}

/// GET /health -- returns service status and job counts.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.worker.is_accepting() {
        "ok"
    } else {
        "draining"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        jobs: state.store.len().await,
        in_flight: state.worker.in_flight(),
        processing: state.worker.processing(),
        max_concurrency: state.config.generation.max_concurrency,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
