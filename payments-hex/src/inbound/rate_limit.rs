//! Rate limiting middleware using Governor.
//!
//! Implements per-client rate limiting with a token bucket algorithm. Clients
//! are keyed on the `user_id` of their verified claims when authentication is
//! enabled, otherwise on their peer IP address. The `Authorization` header is
//! never trusted on its own. Requests with neither share the `anonymous`
//! bucket.

use axum::{
    Json,
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde_json::json;
use std::{net::SocketAddr, num::NonZeroU32, sync::Arc};

use payments_types::Claims;

pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 100;

const ANONYMOUS: &str = "anonymous";

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    /// Per-client rate limiters
    limiters: DashMap<String, Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>>,
    /// Quota for new clients
    quota: Quota,
    /// Seconds until one more request is replenished
    retry_after_secs: u64,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::per_minute(DEFAULT_REQUESTS_PER_MINUTE)
    }
}

impl RateLimiterState {
    /// Allows `requests` per minute per client, all of them usable as a burst.
    ///
    /// A quota of zero is treated as one.
    pub fn per_minute(requests: u32) -> Self {
        let requests = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);

        Self {
            limiters: DashMap::new(),
            quota: Quota::per_minute(requests),
            retry_after_secs: (60 / u64::from(requests.get())).max(1),
        }
    }

    /// Checks if a request should be rate limited.
    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, key: &str) -> bool {
        let limiter = self
            .limiters
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(RateLimiter::direct(self.quota)))
            .clone();

        limiter.check().is_ok()
    }

    pub fn retry_after_secs(&self) -> u64 {
        self.retry_after_secs
    }
}

/// Bucket key for a request. Claims are only present once `auth_middleware`
/// has verified the token, so this layer must sit inside the auth layer.
fn client_key(request: &Request<Body>) -> String {
    if let Some(claims) = request.extensions().get::<Claims>() {
        return format!("user:{}", claims.user_id);
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| format!("ip:{}", addr.ip()))
        .unwrap_or_else(|| ANONYMOUS.to_string())
}

/// Rate limiting middleware.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Skip rate limiting for health endpoint
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let key = client_key(&request);

    if !limiter.check(&key) {
        tracing::warn!(path = %request.uri().path(), "Rate limit exceeded");
        let status = StatusCode::TOO_MANY_REQUESTS;
        return (
            status,
            Json(json!({
                "error": status.canonical_reason().unwrap_or("Too Many Requests"),
                "message": "Rate limit exceeded. Please try again later.",
                "code": format!("ERR_{}", status.as_u16()),
                "retry_after_seconds": limiter.retry_after_secs(),
            })),
        )
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_is_per_client() {
        let limiter = RateLimiterState::per_minute(2);

        assert!(limiter.check("a"));
        assert!(limiter.check("a"));
        assert!(!limiter.check("a"));

        assert!(limiter.check("b"));
    }

    #[test]
    fn test_zero_quota_allows_one() {
        let limiter = RateLimiterState::per_minute(0);

        assert!(limiter.check(ANONYMOUS));
        assert!(!limiter.check(ANONYMOUS));
        assert_eq!(limiter.retry_after_secs(), 60);
    }

    #[test]
    fn test_client_key_ignores_unverified_bearer() {
        let bare = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_key(&bare), ANONYMOUS);

        let with_token = Request::builder()
            .header(axum::http::header::AUTHORIZATION, "Bearer tok_1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&with_token), ANONYMOUS);
    }

    #[test]
    fn test_client_key_prefers_claims_over_peer() {
        let peer: SocketAddr = "10.0.0.7:51000".parse().unwrap();

        let from_peer = Request::builder()
            .extension(ConnectInfo(peer))
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&from_peer), "ip:10.0.0.7");

        let authenticated = Request::builder()
            .extension(ConnectInfo(peer))
            .extension(Claims {
                sub: None,
                user_id: 42,
                role: "user".into(),
                exp: 0,
            })
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&authenticated), "user:42");
    }
}
