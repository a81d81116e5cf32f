use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::handlers::object_body;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /api/v1/auth - sign the posted claims into a one-hour token
///
/// Any JSON object is accepted, including `{}`. Clients normally send
/// `{ "email": "..." }`, which is what owner-scoped routes check against.
pub async fn token_post(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let claims = object_body(body)?;
    let token = state.tokens.issue(claims)?;
    Ok(ApiResponse::success(json!({ "token": token })))
}
