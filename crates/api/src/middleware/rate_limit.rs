//! Per-client rate limiting for the auth and webhook endpoints.
//!
//! A single keyed limiter tracks every client; the key is the user id for
//! authenticated traffic and the forwarded IP for anonymous traffic.

use std::num::NonZeroU32;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter as GovRateLimiter};
use serde_json::json;

use crate::app::AppState;
use crate::middleware::user_auth::UserAuthData;

type KeyedLimiter = GovRateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Shared limiter state, one quota bucket per client key.
pub struct RateLimiterState {
    limiter: KeyedLimiter,
    clock: DefaultClock,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// Builds a limiter allowing `rate_limit_per_minute` requests per client.
    ///
    /// A configured limit of zero is treated as one request per minute so
    /// the quota stays well-formed.
    pub fn new(rate_limit_per_minute: u32) -> Self {
        let per_minute =
            NonZeroU32::new(rate_limit_per_minute.max(1)).unwrap_or(NonZeroU32::MIN);

        Self {
            limiter: GovRateLimiter::keyed(Quota::per_minute(per_minute)),
            clock: DefaultClock::default(),
            rate_limit_per_minute,
        }
    }

    /// Checks whether a request from `client_key` fits the quota.
    ///
    /// Returns the number of seconds to wait before retrying when the
    /// quota is exhausted, never less than one.
    pub fn check(&self, client_key: &str) -> Result<(), u64> {
        match self.limiter.check_key(&client_key.to_string()) {
            Ok(()) => Ok(()),
            Err(not_until) => {
                let wait = not_until.wait_time_from(self.clock.now());
                Err(wait.as_secs().max(1))
            }
        }
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish_non_exhaustive()
    }
}

/// Derives the limiter key for a request.
///
/// Authenticated requests are keyed by user id; anonymous requests fall
/// back to the first hop in `X-Forwarded-For`.
fn client_key(req: &Request<Body>) -> String {
    if let Some(auth) = req.extensions().get::<UserAuthData>() {
        return format!("user:{}", auth.user_id);
    }

    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| format!("ip:{}", ip.trim()))
        .unwrap_or_else(|| "ip:unknown".to_string())
}

/// Rejects requests that exceed the per-client quota with a 429.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(ref rate_limiter) = state.rate_limiter {
        let key = client_key(&req);
        if let Err(retry_after) = rate_limiter.check(&key) {
            tracing::warn!(client = %key, retry_after, "rate limit exceeded");
            return rate_limited_response(state.config.security.rate_limit_per_minute, retry_after);
        }
    }

    next.run(req).await
}

fn rate_limited_response(limit: u32, retry_after: u64) -> Response {
    let body = json!({
        "error": "rate_limit_exceeded",
        "message": format!("Rate limit of {} requests/minute exceeded", limit),
        "retryAfter": retry_after
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

    if let Ok(value) = retry_after.to_string().parse() {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn burst_within_quota_is_allowed() {
        let state = RateLimiterState::new(5);

        for n in 0..5 {
            assert!(state.check("user:42").is_ok(), "request {} rejected", n);
        }

        assert!(state.check("user:42").is_err());
    }

    #[test]
    fn exhausted_key_reports_retry_seconds() {
        let state = RateLimiterState::new(1);

        assert!(state.check("user:1").is_ok());

        let retry_after = state.check("user:1").unwrap_err();
        assert!(retry_after >= 1);
    }

    #[test]
    fn keys_are_limited_independently() {
        let state = RateLimiterState::new(1);

        assert!(state.check("user:1").is_ok());
        assert!(state.check("user:2").is_ok());
        assert!(state.check("ip:10.0.0.1").is_ok());

        assert!(state.check("user:1").is_err());
        assert!(state.check("user:2").is_err());
        assert!(state.check("ip:10.0.0.1").is_err());
    }

    #[test]
    fn zero_limit_still_admits_one_request() {
        let state = RateLimiterState::new(0);

        assert!(state.check("user:1").is_ok());
        assert!(state.check("user:1").is_err());
    }

    #[test]
    fn authenticated_requests_key_on_user_id() {
        let user_id = Uuid::new_v4();
        let mut req = Request::builder().body(Body::empty()).unwrap();
        req.extensions_mut().insert(UserAuthData {
            user_id,
            jti: "jti".to_string(),
        });

        assert_eq!(client_key(&req), format!("user:{}", user_id));
    }

    #[test]
    fn anonymous_requests_key_on_first_forwarded_hop() {
        let req = Request::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(Body::empty())
            .unwrap();

        assert_eq!(client_key(&req), "ip:203.0.113.9");
    }

    #[test]
    fn missing_forwarded_header_collapses_to_unknown() {
        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_key(&req), "ip:unknown");
    }

    #[test]
    fn rate_limited_response_carries_retry_after() {
        let response = rate_limited_response(100, 60);

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "60");
    }
}
