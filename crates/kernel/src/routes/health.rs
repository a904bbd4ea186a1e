//! Health check endpoint.
//!
//! Returns 200 OK if the content store answers, 503 Service Unavailable
//! otherwise.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    store: bool,
    loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    postgres: Option<bool>,
}

/// Health check handler.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (store, postgres) = tokio::join!(
        state.content().store_reachable(),
        state.postgres_healthy()
    );
    let healthy = store && postgres.unwrap_or(true);

    let (status, status_code) = if healthy {
        ("healthy", StatusCode::OK)
    } else {
        ("unhealthy", StatusCode::SERVICE_UNAVAILABLE)
    };

    (
        status_code,
        Json(HealthResponse {
            status,
            store,
            loading: state.content().loading(),
            postgres,
        }),
    )
}

/// Create the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
