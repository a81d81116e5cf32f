use axum::extract::{rejection::QueryRejection, Query, State};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{first_query_value, ApiResponse, ApiResult, AuthUser, QueryPairs};

/// GET /api/v1/reviews?email=... - the caller's own reviews
///
/// The email must equal the token's `email` claim; the query string alone
/// never decides whose reviews are returned. A repeated `email` key uses its
/// first value.
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> ApiResult<Value> {
    let Query(pairs) = query?;
    let email = first_query_value(&pairs, "email")
        .ok_or_else(|| ApiError::bad_request("email query parameter is required"))?;
    user.ensure_owner(email)?;

    let reviews = state.reviews.list_by_reviewer_email(email).await?;
    let count = reviews.len();
    Ok(ApiResponse::success(json!({ "userReviews": reviews })).with_result(count))
}
