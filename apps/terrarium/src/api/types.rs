//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use crate::shell::{Resolution, ShellRoute, Viewer};
use serde::{Deserialize, Serialize};
use terrarium_core::{DashboardWidget, FeatureDescriptor, NavigationEntry};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// FEATURES RESPONSE
// =============================================================================

/// One registered feature, as listed by `GET /features`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub name: String,
    pub enabled: bool,
    pub routes: Vec<String>,
    pub navigation: Vec<String>,
}

impl From<&FeatureDescriptor> for FeatureSummary {
    fn from(descriptor: &FeatureDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            enabled: descriptor.enabled,
            routes: descriptor.routes.iter().map(|r| r.path.clone()).collect(),
            navigation: descriptor.navigation.iter().map(|n| n.label.clone()).collect(),
        }
    }
}

/// Registered features in registration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesResponse {
    pub features: Vec<FeatureSummary>,
}

// =============================================================================
// ROUTES / NAVIGATION
// =============================================================================

/// The composed route table in match order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesResponse {
    pub routes: Vec<ShellRoute>,
}

/// Query string of `GET /navigation`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct NavigationQuery {
    #[serde(default)]
    pub admin: bool,
}

/// Navigation menu for a viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationResponse {
    pub entries: Vec<NavigationEntry>,
}

// =============================================================================
// RESOLVE
// =============================================================================

/// Query string of `GET /resolve`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveQuery {
    pub path: String,
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub admin: bool,
}

impl ResolveQuery {
    /// The viewer described by the query flags.
    ///
    /// The admin role implies being signed in.
    pub fn viewer(&self) -> Viewer {
        Viewer {
            authenticated: self.authenticated || self.admin,
            admin: self.admin,
        }
    }
}

/// Route resolution result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub path: String,
    #[serde(flatten)]
    pub resolution: Resolution,
}

// =============================================================================
// DASHBOARD
// =============================================================================

/// Dashboard widgets for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetsResponse {
    pub user_id: u64,
    pub widgets: Vec<DashboardWidget>,
    /// Features whose provider failed; their widgets are missing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,
}

/// Result of a dashboard preload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreloadResponse {
    pub success: bool,
    pub user_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PreloadResponse {
    pub fn success(user_id: u64) -> Self {
        Self {
            success: true,
            user_id,
            error: None,
        }
    }

    pub fn error(user_id: u64, msg: impl Into<String>) -> Self {
        Self {
            success: false,
            user_id,
            error: Some(msg.into()),
        }
    }
}
