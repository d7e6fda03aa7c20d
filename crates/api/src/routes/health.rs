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
    /// Whether the scheduled check loop is running.
    pub monitoring_active: bool,
}

/// GET /health -- liveness plus scheduler state. Never contacts the controller.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let monitoring_active = state.monitor.is_monitoring_active();

    Json(HealthResponse {
        status: if monitoring_active { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        monitoring_active,
    })
}

/// Mount health check routes (intended for root level, not under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
