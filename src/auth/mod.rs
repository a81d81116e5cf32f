use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Signed token payload: caller-supplied claims plus server-set timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    pub fn new(mut extra: Map<String, Value>, ttl: Duration) -> Self {
        extra.remove("exp");
        extra.remove("iat");

        let now = Utc::now();
        Self {
            exp: (now + ttl).timestamp(),
            iat: Some(now.timestamp()),
            extra,
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.extra.get("email").and_then(Value::as_str)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing, malformed, forged or expired token. The cause is deliberately not carried.
    #[error("unauthorized")]
    Unauthorized,

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Issues and verifies HS256 identity tokens against the server secret.
#[derive(Clone)]
pub struct TokenService {
    inner: Arc<TokenKeys>,
}

struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            inner: Arc::new(TokenKeys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
                validation,
                ttl,
            }),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    pub fn issue(&self, claims: Map<String, Value>) -> Result<String, AuthError> {
        let claims = Claims::new(claims, self.inner.ttl);
        encode(&Header::default(), &claims, &self.inner.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.inner.decoding, &self.inner.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected token: {}", e);
                AuthError::Unauthorized
            })
    }
}
