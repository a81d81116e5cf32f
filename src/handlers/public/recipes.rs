use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::DocumentId;
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::handlers::object_body;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/v1/recipes - every recipe, all fields
///
/// Requests carrying `limit` never get here; `middleware::limited_listing`
/// answers them.
pub async fn list(State(state): State<AppState>) -> ApiResult<Value> {
    let recipes = state.recipes.list(FilterData::default()).await?;
    Ok(ApiResponse::success(json!({ "recipes": recipes })))
}

/// GET /api/v1/recipes/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let id: DocumentId = id.parse()?;
    let recipe = state
        .recipes
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe not found"))?;
    Ok(ApiResponse::success(json!({ "recipe": recipe })))
}

/// POST /api/v1/recipes
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let recipe = state.recipes.create(object_body(body)?).await?;
    Ok(ApiResponse::created(json!({ "recipe": recipe })))
}
