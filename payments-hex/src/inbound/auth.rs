//! Bearer-token authentication middleware.
//!
//! Enabled only when the server is given a JWT secret. Tokens are HS256 JWTs
//! carrying [`Claims`]; verified claims are stored in the request extensions.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use payments_types::Claims;

use super::handlers::error_response;

/// Authentication failures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing or invalid Authorization header")]
    MissingToken,

    #[error("token expired")]
    TokenExpired,

    #[error("invalid token")]
    InvalidToken,
}

/// Verifies HS256 bearer tokens against a shared secret.
pub struct JwtAuth {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuth {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Decodes and validates a token, including its expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

/// Signs `claims` with `secret` using HS256.
pub fn issue_token(secret: &str, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Extracts the token from a `Bearer <token>` Authorization header value.
fn extract_bearer(auth_header: Option<&str>) -> Option<&str> {
    auth_header?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Paths reachable without a token.
fn is_public(path: &str) -> bool {
    path == "/health" || path.starts_with("/swagger-ui") || path.starts_with("/api-docs")
}

/// Authentication middleware.
///
/// Rejects requests without a valid bearer token with 401, except for the
/// health check and the API docs.
pub async fn auth_middleware(
    State(auth): State<Arc<JwtAuth>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if is_public(request.uri().path()) {
        return next.run(request).await;
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let Some(token) = extract_bearer(auth_header) else {
        return unauthorized(AuthError::MissingToken);
    };

    match auth.verify(token) {
        Ok(claims) => {
            tracing::debug!(user_id = claims.user_id, role = %claims.role, "Authenticated request");
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rejected bearer token");
            unauthorized(e)
        }
    }
}

fn unauthorized(err: AuthError) -> Response {
    error_response(StatusCode::UNAUTHORIZED, err.to_string())
}
