//! Bearer token authentication
//!
//! Tokens are HS256-signed JWTs issued by an external login flow. The
//! subject claim (`sub`, or `id` for tokens minted by older clients) is the
//! identity matched against the configured administrator list.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

/// Payload carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(alias = "id")]
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Verifies HS256 tokens against a shared secret
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    /// Decode and validate `token`, returning its claims if signature and expiry check out
    pub fn verify(&self, token: &str) -> Option<Claims> {
        match decode::<Claims>(token, &self.key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected bearer token");
                None
            }
        }
    }
}

/// Authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub username: Option<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
        }
    }
}

/// Axum extractor that validates the bearer token and returns an [`AuthUser`].
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        bearer_user(state, &parts.headers).ok_or(AppError::Unauthorized)
    }
}

/// Resolve the caller from an `Authorization: Bearer` header, if any
pub fn bearer_user(state: &AppState, headers: &HeaderMap) -> Option<AuthUser> {
    let verifier = state.tokens.as_ref()?;
    let token = bearer_token(headers)?;
    verifier.verify(token).map(AuthUser::from)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    const SECRET: &str = "test-secret";

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    fn sign(payload: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::default(),
            &payload,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_valid_token() {
        let token = sign(
            serde_json::json!({ "sub": "42", "username": "mod", "exp": now() + 3600 }),
            SECRET,
        );
        let claims = TokenVerifier::new(SECRET).verify(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username.as_deref(), Some("mod"));
    }

    #[test]
    fn test_verify_accepts_id_claim() {
        let token = sign(serde_json::json!({ "id": "7", "exp": now() + 3600 }), SECRET);
        let claims = TokenVerifier::new(SECRET).verify(&token).unwrap();
        assert_eq!(claims.sub, "7");
        assert!(claims.username.is_none());
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = sign(
            serde_json::json!({ "sub": "42", "exp": now() + 3600 }),
            "other-secret",
        );
        assert!(TokenVerifier::new(SECRET).verify(&token).is_none());
    }

    #[test]
    fn test_verify_rejects_expired() {
        let token = sign(serde_json::json!({ "sub": "42", "exp": now() - 3600 }), SECRET);
        assert!(TokenVerifier::new(SECRET).verify(&token).is_none());
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer xyz"));
        assert_eq!(bearer_token(&headers), Some("xyz"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert!(bearer_token(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(bearer_token(&headers).is_none());
    }
}
