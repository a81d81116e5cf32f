use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::DocumentId;
use crate::error::ApiError;
use crate::filter::ID_FIELD;
use crate::handlers::object_body;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /api/v1/reviews
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let review = state.reviews.create(object_body(body)?).await?;
    Ok(ApiResponse::created(json!({ "recipeReview": review })))
}

/// GET /api/v1/review/:reviewId
pub async fn get(State(state): State<AppState>, Path(review_id): Path<String>) -> ApiResult<Value> {
    let id: DocumentId = review_id.parse()?;
    let review = state
        .reviews
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review not found"))?;
    Ok(ApiResponse::success(json!({ "review": review })))
}

/// GET /api/v1/reviews/:productId - newest first
pub async fn list_for_recipe(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> ApiResult<Value> {
    let reviews = state.reviews.list_by_recipe(&product_id).await?;
    Ok(ApiResponse::success(json!({ "recipeReviews": reviews })))
}

/// DELETE /api/v1/reviews/:reviewId - zero deletions is still a success
pub async fn delete(State(state): State<AppState>, Path(review_id): Path<String>) -> ApiResult<Value> {
    let id: DocumentId = review_id.parse()?;
    let result = state.reviews.delete(id).await?;
    Ok(ApiResponse::success(json!({ "result": result })))
}

/// PATCH /api/v1/reviews/:reviewId - set the given top-level fields
pub async fn update(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let id: DocumentId = review_id.parse()?;
    let set = object_body(body)?;
    if set.contains_key(ID_FIELD) {
        return Err(ApiError::bad_request("The _id field cannot be modified"));
    }
    let result = state.reviews.update(id, set).await?;
    Ok(ApiResponse::success(json!({ "result": result })))
}
