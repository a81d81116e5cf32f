use axum::{
    extract::{rejection::QueryRejection, Query, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;
use crate::middleware::{first_query_value, QueryPairs};
use crate::services::ListingShape;

/// Short-circuits `GET /api/v1/recipes?limit=n` with the newest `n` recipe
/// summaries. Without `limit` the request falls through to the full listing.
pub async fn limited_listing(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
    request: Request,
    next: Next,
) -> Response {
    let pairs = match query {
        Ok(Query(pairs)) => pairs,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };
    let Some(raw) = first_query_value(&pairs, "limit") else {
        return next.run(request).await;
    };

    let shape = ListingShape::latest_recipes(coerce_limit(raw));
    tracing::debug!("Limited recipe listing: raw={:?} shape={:?}", raw, shape.limit);

    match state.recipes.list_shaped(&shape).await {
        Ok(recipes) => ApiResponse::success(json!({ "recipes": recipes })).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Numeric coercion of the raw `limit` value, truncated toward zero.
///
/// Non-numeric, non-finite and zero values mean unbounded (`None`); negative
/// values count by magnitude.
pub fn coerce_limit(raw: &str) -> Option<i64> {
    let n: f64 = raw.trim().parse().ok()?;
    if !n.is_finite() {
        return None;
    }
    let n = n.trunc().abs();
    (n >= 1.0).then(|| n as i64)
}
