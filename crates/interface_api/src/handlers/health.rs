//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use core_kernel::ports::{AdapterHealth, HealthCheckResult};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: Vec<HealthCheckResult>,
}

/// Readiness check
///
/// Reports every peer breaker and the database. Answers 503 while any of
/// them is unhealthy; a half-open breaker still counts as ready.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let mut checks = Vec::with_capacity(state.probes.len());
    for probe in state.probes.iter() {
        checks.push(probe.health_check().await);
    }

    let ready = checks
        .iter()
        .all(|check| check.status != AdapterHealth::Unhealthy);
    let (status, label) = if ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(ReadinessResponse {
            status: label.to_string(),
            checks,
        }),
    )
}
