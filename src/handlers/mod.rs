// Two security tiers:
// public    - no authentication (health, token issuing, recipes, reviews)
// protected - bearer token required (owner-scoped review listing)
pub mod public;
pub mod protected;

use axum::{extract::rejection::JsonRejection, Json};
use serde_json::Value;

use crate::database::Document;
use crate::error::ApiError;

/// Accept only a JSON object body.
pub(crate) fn object_body(body: Result<Json<Value>, JsonRejection>) -> Result<Document, ApiError> {
    match body? {
        Json(Value::Object(doc)) => Ok(doc),
        Json(_) => Err(ApiError::bad_request("Request body must be a JSON object")),
    }
}
