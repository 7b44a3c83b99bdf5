use crate::services::metrics::get_metrics;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is running")),
    tag = "Observability"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": state.config.common.service_name,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness check: the entity store must answer.
#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, description = "Service can take traffic"),
        (status = 503, description = "Entity store unreachable")
    ),
    tag = "Observability"
)]
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let llm = if state.llm.health_check().await.is_ok() {
        "up"
    } else {
        "unconfigured"
    };
    let email = if state.email.is_enabled() {
        "enabled"
    } else {
        "disabled"
    };

    match state.repo.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "checks": { "store": "up", "llm": llm, "email": email }
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Entity store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "checks": { "store": "down", "llm": llm, "email": email }
                })),
            )
        }
    }
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
