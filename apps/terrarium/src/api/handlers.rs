//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{
        FeatureSummary, FeaturesResponse, HealthResponse, NavigationQuery, NavigationResponse,
        PreloadResponse, ResolveQuery, ResolveResponse, RoutesResponse, WidgetsResponse,
    },
};
use crate::shell::Viewer;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use terrarium_core::SubjectId;

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// REGISTRY HANDLERS
// =============================================================================

/// List registered features in registration order.
pub async fn features_handler(State(state): State<AppState>) -> impl IntoResponse {
    let features = state
        .shell
        .registry()
        .descriptors()
        .map(FeatureSummary::from)
        .collect();

    (StatusCode::OK, Json(FeaturesResponse { features }))
}

/// The composed route table.
pub async fn routes_handler(State(state): State<AppState>) -> impl IntoResponse {
    let routes = state.shell.routes().routes().to_vec();
    (StatusCode::OK, Json(RoutesResponse { routes }))
}

/// Navigation menu, admin entries only when `admin=true`.
pub async fn navigation_handler(
    State(state): State<AppState>,
    Query(query): Query<NavigationQuery>,
) -> impl IntoResponse {
    let viewer = if query.admin {
        Viewer::administrator()
    } else {
        Viewer::member()
    };
    let entries = state.shell.navigation_for(&viewer);
    (StatusCode::OK, Json(NavigationResponse { entries }))
}

/// Resolve a path against the route table for the described viewer.
pub async fn resolve_handler(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> impl IntoResponse {
    let resolution = state.shell.routes().resolve(&query.path, &query.viewer());
    (
        StatusCode::OK,
        Json(ResolveResponse {
            path: query.path,
            resolution,
        }),
    )
}

// =============================================================================
// DASHBOARD HANDLERS
// =============================================================================

/// Collect the dashboard widgets for a user.
///
/// Never fails; providers that failed are named in `failed`.
pub async fn widgets_handler(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
) -> impl IntoResponse {
    let report = state
        .shell
        .dashboard()
        .widgets_report(SubjectId(user_id))
        .await;

    (
        StatusCode::OK,
        Json(WidgetsResponse {
            user_id,
            widgets: report.widgets,
            failed: report.failed,
        }),
    )
}

/// Run every preload-capable provider for a user.
pub async fn preload_handler(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
) -> impl IntoResponse {
    match state.shell.dashboard().preload(SubjectId(user_id)).await {
        Ok(()) => (StatusCode::OK, Json(PreloadResponse::success(user_id))),
        Err(e) => {
            tracing::warn!(user_id, error = %e, "Dashboard preload failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(PreloadResponse::error(user_id, format!("Preload failed: {e}"))),
            )
        }
    }
}
