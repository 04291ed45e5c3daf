//! # Core Type Definitions
//!
//! This module contains the value types shared by every part of the
//! feature composition layer:
//! - Subject and view identifiers (`SubjectId`, `ViewRef`, `GuardId`)
//! - Feature contents (`RouteDefinition`, `NavigationEntry`, `FeatureDescriptor`)
//! - Dashboard output (`DashboardWidget`)
//! - Error types (`CoreError`, `ProviderError`)
//!
//! ## Immutability
//!
//! Descriptors are built once while configuration is loaded and are never
//! mutated afterwards. The registry hands out shared references only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identity of the acting user, supplied by the authentication collaborator.
/// Providers use it to scope their summary computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub u64);

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deferred reference to a view.
///
/// The view itself is resolved by the rendering collaborator only when the
/// route is activated; the registry never instantiates anything.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ViewRef(pub String);

impl ViewRef {
    /// Create a new view reference from its key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the view key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of an access predicate evaluated before a route activates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GuardId(pub String);

impl GuardId {
    /// Key of the "signed in" guard.
    pub const AUTHENTICATED: &'static str = "authenticated";
    /// Key of the "administrator role" guard.
    pub const ADMIN: &'static str = "admin";

    /// Create a guard identifier from its key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Guard requiring a signed-in user.
    #[must_use]
    pub fn authenticated() -> Self {
        Self::new(Self::AUTHENTICATED)
    }

    /// Guard requiring the administrator role.
    #[must_use]
    pub fn admin() -> Self {
        Self::new(Self::ADMIN)
    }

    /// Get the guard key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// ROUTES & NAVIGATION
// =============================================================================

/// A routable path contributed by a feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// Path pattern, relative to the application root (e.g. `reptiles/:id`).
    pub path: String,
    /// View to instantiate when the route activates.
    pub view: ViewRef,
    /// Guards evaluated in order before activation.
    #[serde(default)]
    pub guards: Vec<GuardId>,
}

impl RouteDefinition {
    /// Create an unguarded route.
    #[must_use]
    pub fn new(path: impl Into<String>, view: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            view: ViewRef::new(view),
            guards: Vec::new(),
        }
    }

    /// Append a guard to the route.
    #[must_use]
    pub fn guarded_by(mut self, guard: GuardId) -> Self {
        self.guards.push(guard);
        self
    }
}

/// A navigation menu entry contributed by a feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEntry {
    pub label: String,
    /// Absolute target path (e.g. `/admin/users`).
    pub path: String,
    /// Icon reference, rendered verbatim by the view layer.
    pub icon: String,
    /// Admin-only entries are always listed after every other entry.
    #[serde(default)]
    pub admin_only: bool,
    /// Name of the owning feature, if the entry carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
}

impl NavigationEntry {
    /// Create a navigation entry visible to every user.
    #[must_use]
    pub fn new(label: impl Into<String>, path: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            icon: icon.into(),
            admin_only: false,
            feature: None,
        }
    }

    /// Mark the entry as admin-only.
    #[must_use]
    pub fn admin_only(mut self) -> Self {
        self.admin_only = true;
        self
    }

    /// Tag the entry with its owning feature.
    #[must_use]
    pub fn owned_by(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }
}

// =============================================================================
// FEATURE DESCRIPTOR
// =============================================================================

/// Static, declarative bundle describing one feature.
///
/// `enabled` is resolved once from static configuration and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    /// Unique feature name; the registry key.
    pub name: String,
    pub enabled: bool,
    #[serde(default)]
    pub routes: Vec<RouteDefinition>,
    #[serde(default)]
    pub navigation: Vec<NavigationEntry>,
}

impl FeatureDescriptor {
    /// Create a descriptor with no routes and no navigation.
    #[must_use]
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
            routes: Vec::new(),
            navigation: Vec::new(),
        }
    }

    /// Append a route.
    #[must_use]
    pub fn with_route(mut self, route: RouteDefinition) -> Self {
        self.routes.push(route);
        self
    }

    /// Append a navigation entry.
    #[must_use]
    pub fn with_navigation(mut self, entry: NavigationEntry) -> Self {
        self.navigation.push(entry);
        self
    }
}

// =============================================================================
// DASHBOARD WIDGET
// =============================================================================

/// A small titled numeric summary shown on the landing view.
///
/// Produced fresh by every aggregation call; never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardWidget {
    pub title: String,
    pub value: i64,
    pub icon: String,
    /// Route the widget links to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Feature that produced the widget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
}

impl DashboardWidget {
    /// Create a widget without a link target.
    #[must_use]
    pub fn new(title: impl Into<String>, value: i64, icon: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value,
            icon: icon.into(),
            route: None,
            feature: None,
        }
    }

    /// Link the widget to a route.
    #[must_use]
    pub fn linked_to(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Failure reported by a capability provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider could not produce its result.
    #[error("provider failed: {0}")]
    Failed(String),

    /// The provider did not answer within its time budget.
    #[error("provider timed out after {0} ms")]
    Timeout(u64),
}

/// Errors surfaced by the composition layer.
///
/// Lookups never produce errors; unknown names degrade to `false`/empty.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A feature with this name is already registered (strict registration only).
    #[error("feature already registered: {0}")]
    DuplicateFeature(String),

    /// A provider call failed under a strict join.
    #[error("provider for feature '{feature}' failed: {source}")]
    Provider {
        feature: String,
        #[source]
        source: ProviderError,
    },
}

// =============================================================================
// TESTS
// =============================================================================
