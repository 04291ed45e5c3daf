//! # Authentication Module
//!
//! Optional API key authentication for the Terrarium HTTP API.
//!
//! ## Configuration
//!
//! - `TERRARIUM_API_KEY`: if set, every request except `GET /health` must
//!   carry this key
//!
//! ## Usage
//!
//! ```text
//! Authorization: Bearer <your-api-key>
//! ```
//!
//! The raw key without the `Bearer ` prefix is accepted as well.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Paths reachable without a key.
const PUBLIC_PATHS: &[&str] = &["/health"];

/// The configured API key, shared by the middleware.
#[derive(Clone)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    pub fn new(key: &str) -> Self {
        Self(Arc::from(key))
    }

    /// Compare `provided` against the key in constant time.
    ///
    /// Both sides are padded to the same length so the comparison always
    /// covers the same number of bytes.
    pub fn matches(&self, provided: &str) -> bool {
        let provided = provided.as_bytes();
        let expected = self.0.as_bytes();

        let len = provided.len().max(expected.len());
        let mut lhs = vec![0u8; len];
        let mut rhs = vec![0u8; len];
        lhs[..provided.len()].copy_from_slice(provided);
        rhs[..expected.len()].copy_from_slice(expected);

        let bytes_match: bool = lhs.ct_eq(&rhs).into();
        bytes_match && provided.len() == expected.len()
    }
}

/// Read `TERRARIUM_API_KEY`; unset or empty disables authentication.
pub fn get_api_key_from_env() -> Option<String> {
    std::env::var("TERRARIUM_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
}

/// Reject requests without a matching key, except on public paths.
pub async fn api_key_auth_middleware(
    State(key): State<ApiKey>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    if PUBLIC_PATHS.contains(&request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.strip_prefix("Bearer ").unwrap_or(v));

    match provided {
        Some(provided) if key.matches(provided) => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!(
                event = "auth_failure",
                reason = "invalid_api_key",
                "Authentication failed: invalid API key"
            );
            Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
        }
        None => {
            tracing::warn!(
                event = "auth_failure",
                reason = "missing_authorization_header",
                "Missing Authorization header"
            );
            Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
