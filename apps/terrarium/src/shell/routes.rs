//! # Route Table
//!
//! The application route table: fixed shell routes, then every enabled
//! feature route in registration order, then a catch-all.
//!
//! Resolution walks the table in order; the first pattern matching the
//! path wins. Guards are evaluated in declaration order and the first one
//! that denies decides the redirect.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use terrarium_core::{FeatureRegistry, GuardId, RouteDefinition, ViewRef};

/// Where unauthenticated users are sent.
pub const LOGIN_PATH: &str = "/login";
/// Where signed-in users lacking a role are sent.
pub const DASHBOARD_PATH: &str = "/dashboard";

const WILDCARD: &str = "**";

/// What a matched route does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteTarget {
    /// Instantiate a view.
    View(ViewRef),
    /// Send the user elsewhere.
    Redirect(String),
}

/// One entry of the composed route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellRoute {
    pub path: String,
    pub target: RouteTarget,
    pub guards: Vec<GuardId>,
}

impl ShellRoute {
    fn view(path: &str, view: &str, guards: Vec<GuardId>) -> Self {
        Self {
            path: path.to_string(),
            target: RouteTarget::View(ViewRef::new(view)),
            guards,
        }
    }

    fn redirect(path: &str, to: &str) -> Self {
        Self {
            path: path.to_string(),
            target: RouteTarget::Redirect(to.to_string()),
            guards: Vec::new(),
        }
    }
}

impl From<RouteDefinition> for ShellRoute {
    fn from(route: RouteDefinition) -> Self {
        Self {
            path: route.path,
            target: RouteTarget::View(route.view),
            guards: route.guards,
        }
    }
}

/// The acting user, as seen by route guards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub authenticated: bool,
    pub admin: bool,
}

impl Viewer {
    /// Nobody signed in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A signed-in user without the admin role.
    pub fn member() -> Self {
        Self {
            authenticated: true,
            admin: false,
        }
    }

    /// A signed-in administrator.
    pub fn administrator() -> Self {
        Self {
            authenticated: true,
            admin: true,
        }
    }

    /// Whether `guard` lets this viewer through.
    ///
    /// Unknown guards deny.
    fn passes(&self, guard: &GuardId) -> bool {
        match guard.as_str() {
            GuardId::AUTHENTICATED => self.authenticated,
            GuardId::ADMIN => self.admin,
            other => {
                tracing::warn!(guard = other, "Unknown route guard; denying");
                false
            }
        }
    }
}

/// Outcome of resolving a path for a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    /// Render `view` for the route `pattern`, with captured parameters.
    Activate {
        pattern: String,
        view: ViewRef,
        params: BTreeMap<String, String>,
    },
    /// Navigate to `to` instead.
    Redirect { to: String },
}

impl Resolution {
    fn redirect(to: &str) -> Self {
        Self::Redirect { to: to.to_string() }
    }
}

/// Composed, ordered route table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteTable {
    routes: Vec<ShellRoute>,
}

impl RouteTable {
    /// Shell routes, then enabled feature routes, then the catch-all.
    pub fn compose(registry: &FeatureRegistry) -> Self {
        let mut routes = vec![
            ShellRoute::redirect("", LOGIN_PATH),
            ShellRoute::view("login", "login", Vec::new()),
            ShellRoute::view("dashboard", "dashboard", vec![GuardId::authenticated()]),
            ShellRoute::view(
                "profile-settings",
                "profile-settings",
                vec![GuardId::authenticated()],
            ),
        ];
        routes.extend(registry.enabled_routes().into_iter().map(ShellRoute::from));
        routes.push(ShellRoute::redirect(WILDCARD, LOGIN_PATH));

        tracing::debug!(routes = routes.len(), "Route table composed");
        Self { routes }
    }

    /// All routes in match order.
    pub fn routes(&self) -> &[ShellRoute] {
        &self.routes
    }

    /// Resolve `path` for `viewer`.
    ///
    /// Falls back to the login page when nothing matches.
    pub fn resolve(&self, path: &str, viewer: &Viewer) -> Resolution {
        let segments = split(path);

        for route in &self.routes {
            let Some(params) = match_pattern(&route.path, &segments) else {
                continue;
            };

            if let Some(guard) = route.guards.iter().find(|g| !viewer.passes(g)) {
                let to = if guard.as_str() == GuardId::ADMIN {
                    DASHBOARD_PATH
                } else {
                    LOGIN_PATH
                };
                return Resolution::redirect(to);
            }

            return match &route.target {
                RouteTarget::Redirect(to) => Resolution::redirect(to),
                RouteTarget::View(view) => Resolution::Activate {
                    pattern: route.path.clone(),
                    view: view.clone(),
                    params,
                },
            };
        }

        Resolution::redirect(LOGIN_PATH)
    }
}

fn split(path: &str) -> Vec<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Match `pattern` against path segments, capturing `:name` parameters.
fn match_pattern(pattern: &str, segments: &[&str]) -> Option<BTreeMap<String, String>> {
    let pattern = split(pattern);
    let mut params = BTreeMap::new();

    for (i, part) in pattern.iter().enumerate() {
        if *part == WILDCARD {
            return Some(params);
        }
        let segment = segments.get(i)?;
        match part.strip_prefix(':') {
            Some(name) => {
                params.insert(name.to_string(), (*segment).to_string());
            }
            None if part == segment => {}
            None => return None,
        }
    }

    (pattern.len() == segments.len()).then_some(params)
}

// =============================================================================
// TESTS
// =============================================================================
