//! # Rate Limiting
//!
//! A single global token bucket in front of every endpoint.
//!
//! - `TERRARIUM_RATE_LIMIT`: requests per second (default: 100, 0 disables)

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Requests per second when nothing is configured.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

/// Global rate limiter type alias.
pub type GlobalRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Create a limiter allowing `requests_per_second`, or `None` when zero.
pub fn create_rate_limiter(requests_per_second: u32) -> Option<GlobalRateLimiter> {
    let rps = NonZeroU32::new(requests_per_second)?;
    Some(Arc::new(RateLimiter::direct(Quota::per_second(rps))))
}

/// Parse a `TERRARIUM_RATE_LIMIT` value, falling back to the default.
pub fn parse_rate_limit(value: Option<&str>) -> u32 {
    match value.map(str::trim) {
        None | Some("") => DEFAULT_RATE_LIMIT,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid TERRARIUM_RATE_LIMIT '{}'; using {}",
                raw,
                DEFAULT_RATE_LIMIT
            );
            DEFAULT_RATE_LIMIT
        }),
    }
}

/// Returns 429 Too Many Requests once the bucket is empty.
pub async fn rate_limit_middleware(
    State(limiter): State<GlobalRateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    match limiter.check() {
        Ok(_) => Ok(next.run(request).await),
        Err(_) => {
            tracing::warn!("Rate limit exceeded");
            Err((StatusCode::TOO_MANY_REQUESTS, "Too Many Requests"))
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter_admits_first_request() {
        let limiter = create_rate_limiter(50).expect("limiter");
        assert!(limiter.check().is_ok());
    }

    #[test]
    fn zero_disables_limiting() {
        assert!(create_rate_limiter(0).is_none());
    }

    #[test]
    fn single_token_bucket_rejects_burst() {
        let limiter = create_rate_limiter(1).expect("limiter");
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());
    }

    #[test]
    fn rate_limit_parsing() {
        assert_eq!(parse_rate_limit(None), DEFAULT_RATE_LIMIT);
        assert_eq!(parse_rate_limit(Some("25")), 25);
        assert_eq!(parse_rate_limit(Some("0")), 0);
        assert_eq!(parse_rate_limit(Some("lots")), DEFAULT_RATE_LIMIT);
    }
}
