//! Health check endpoint handlers.
//!
//! Liveness never touches the store; readiness and the full check ping it
//! through [`StoreHealth`](crate::repositories::StoreHealth).

use std::time::Instant;

use axum::{Json, extract::State, http::StatusCode};
use jiff::Timestamp;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{HealthResponse, HealthStatus, StoreCheck};
use crate::state::AppState;

/// Creates health check routes.
///
/// # Routes
/// - `GET /health` - Full health report
/// - `GET /health/ready` - Readiness check
/// - `GET /health/live` - Liveness check
pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(readiness_check))
        .routes(routes!(liveness_check))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    )
)]
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let store = check_store(&state).await;
    let response = HealthResponse::new(state.version.clone(), store, Timestamp::now());
    (status_code(response.status), Json(response))
}

fn status_code(status: HealthStatus) -> StatusCode {
    if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Readiness: 200 once the store answers.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready")
    )
)]
async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    status_code(check_store(&state).await.status)
}

#[utoipa::path(
    get,
    path = "/health/live",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is alive")
    )
)]
async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

async fn check_store(state: &AppState) -> StoreCheck {
    let start = Instant::now();
    let backend = state.repos.health.backend();
    let result = state.repos.health.ping().await;
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    match result {
        Ok(()) => StoreCheck {
            backend: backend.to_string(),
            status: HealthStatus::Healthy,
            latency_ms,
            error: None,
        },
        Err(e) => {
            tracing::warn!(backend, error = %e, "Store health check failed");
            StoreCheck {
                backend: backend.to_string(),
                status: HealthStatus::Unhealthy,
                latency_ms,
                error: Some(format!("{} unavailable", backend)),
            }
        }
    }
}
