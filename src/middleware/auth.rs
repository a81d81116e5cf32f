use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::auth::{AuthError, Claims, TokenService};
use crate::error::ApiError;

/// Identity proven by a valid bearer token.
///
/// Handlers that take an `AuthUser` can only run for authenticated requests;
/// anything else is rejected with 401 before the handler body.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub claims: Claims,
}

impl AuthUser {
    pub fn email(&self) -> Option<&str> {
        self.claims.email()
    }

    /// The token's email claim must equal `email` exactly.
    pub fn ensure_owner(&self, email: &str) -> Result<(), ApiError> {
        if self.email() == Some(email) {
            Ok(())
        } else {
            Err(ApiError::forbidden("Forbidden access"))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    TokenService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_from_headers(&parts.headers).map_err(|msg| {
            tracing::debug!("Rejected request: {}", msg);
            ApiError::from(AuthError::Unauthorized)
        })?;

        let claims = TokenService::from_ref(state).verify(&token)?;
        Ok(AuthUser { claims })
    }
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
