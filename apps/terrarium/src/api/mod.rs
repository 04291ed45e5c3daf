//! # Terrarium HTTP API Module
//!
//! This module exposes the composed shell over HTTP using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /features` - Registered features in registration order
//! - `GET /routes` - Composed route table
//! - `GET /navigation?admin=bool` - Navigation menu
//! - `GET /resolve?path=..&authenticated=bool&admin=bool` - Route resolution
//! - `GET /dashboard/{user_id}/widgets` - Dashboard widgets
//! - `POST /dashboard/{user_id}/preload` - Dashboard preload (502 on failure)
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `TERRARIUM_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `TERRARIUM_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `TERRARIUM_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::{ApiKey, get_api_key_from_env};
pub use middleware::{DEFAULT_RATE_LIMIT, create_rate_limiter, parse_rate_limit};
pub use types::{
    FeatureSummary, FeaturesResponse, HealthResponse, NavigationResponse, PreloadResponse,
    ResolveResponse, RoutesResponse, WidgetsResponse,
};

use crate::error::AppError;
use crate::shell::Shell;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Maximum accepted request body (1 MiB).
const MAX_BODY_BYTES: usize = 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the composed shell, read-only.
#[derive(Clone)]
pub struct AppState {
    pub shell: Arc<Shell>,
}

impl AppState {
    #[must_use]
    pub fn new(shell: Shell) -> Self {
        Self {
            shell: Arc::new(shell),
        }
    }
}

// =============================================================================
// HTTP SETTINGS
// =============================================================================

/// Security settings of the HTTP surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpSettings {
    /// Required API key; `None` leaves the API open.
    pub api_key: Option<String>,
    /// Requests per second; 0 disables limiting.
    pub rate_limit: u32,
    /// Raw `TERRARIUM_CORS_ORIGINS` value.
    pub cors_origins: Option<String>,
}

impl HttpSettings {
    /// Read `TERRARIUM_API_KEY`, `TERRARIUM_RATE_LIMIT` and
    /// `TERRARIUM_CORS_ORIGINS`.
    pub fn from_env() -> Self {
        Self {
            api_key: get_api_key_from_env(),
            rate_limit: parse_rate_limit(std::env::var("TERRARIUM_RATE_LIMIT").ok().as_deref()),
            cors_origins: std::env::var("TERRARIUM_CORS_ORIGINS").ok(),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from the configured origins.
///
/// - `"*"` allows every origin
/// - unset, or no valid origin in the list, allows localhost only
/// - otherwise the comma-separated origins are allowed
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (TERRARIUM_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(hv) => {
                        tracing::info!("CORS: Allowing origin: {}", origin);
                        Some(hv)
                    }
                    Err(e) => {
                        tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                        None
                    }
                })
                .collect();

            if allowed.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in TERRARIUM_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                restricted_cors(allowed)
            }
        }
        None => {
            tracing::info!("CORS: No TERRARIUM_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Localhost origins of the usual front-end dev servers.
fn build_localhost_cors() -> CorsLayer {
    let origins = [
        "http://localhost:4200",
        "http://localhost:8080",
        "http://127.0.0.1:4200",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect::<Vec<_>>();

    restricted_cors(origins)
}

fn restricted_cors(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the router using settings from the environment.
pub fn create_router(state: AppState) -> Router {
    create_router_with(state, &HttpSettings::from_env())
}

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting (if enabled)
/// 5. Authentication (if configured)
pub fn create_router_with(state: AppState, settings: &HttpSettings) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/features", get(handlers::features_handler))
        .route("/routes", get(handlers::routes_handler))
        .route("/navigation", get(handlers::navigation_handler))
        .route("/resolve", get(handlers::resolve_handler))
        .route(
            "/dashboard/{user_id}/widgets",
            get(handlers::widgets_handler),
        )
        .route(
            "/dashboard/{user_id}/preload",
            post(handlers::preload_handler),
        );

    match settings.api_key.as_deref() {
        Some(key) => {
            tracing::info!("API key authentication enabled");
            router = router.layer(axum_middleware::from_fn_with_state(
                ApiKey::new(key),
                auth::api_key_auth_middleware,
            ));
        }
        None => tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set TERRARIUM_API_KEY to enable authentication."
        ),
    }

    match create_rate_limiter(settings.rate_limit) {
        Some(limiter) => {
            tracing::info!("Rate limiting enabled: {} requests/second", settings.rate_limit);
            router = router.layer(axum_middleware::from_fn_with_state(
                limiter,
                middleware::rate_limit_middleware,
            ));
        }
        None => tracing::info!("Rate limiting disabled"),
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(build_cors_layer(settings.cors_origins.as_deref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Serve the shell over HTTP on `addr` until the process stops.
pub async fn run_server(addr: &str, shell: Shell) -> Result<(), AppError> {
    let router = create_router(AppState::new(shell));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("Terrarium HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| AppError::Io(format!("Server error: {}", e)))
}
