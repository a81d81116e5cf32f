use axum::{extract::State, response::IntoResponse};
use serde_json::json;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::ApiResponse;

/// GET / - plain text greeting
pub async fn root() -> &'static str {
    "Hello from cook and taste server!"
}

/// GET /health - store liveness
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => ApiResponse::success(json!({ "store": "ok" })).into_response(),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            ApiError::service_unavailable("Store unavailable").into_response()
        }
    }
}

/// Unmatched paths still answer with the JSON error envelope.
pub async fn fallback() -> ApiError {
    ApiError::not_found("Route not found")
}
