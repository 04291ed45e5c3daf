//! # Application Shell
//!
//! Bootstraps the composition layer from configuration and holds the
//! results for the lifetime of the process:
//! - the `FeatureRegistry` built from the built-in catalog and flags
//! - the `DashboardAggregator` over the shell's provider candidates
//! - the composed `RouteTable`
//!
//! Everything here is immutable after `Shell::bootstrap`; consumers share
//! it through an `Arc`.

mod routes;

pub use routes::{
    DASHBOARD_PATH, LOGIN_PATH, Resolution, RouteTable, RouteTarget, ShellRoute, Viewer,
};

use crate::config::AppConfig;
use crate::providers::Candidate;
use std::sync::Arc;
use terrarium_core::{
    CapabilityProvider, CoreError, DashboardAggregator, FeatureRegistry, NavigationEntry,
    TimeoutProvider, builtin_features,
};

/// The composed application: registry, dashboard and routes.
pub struct Shell {
    registry: Arc<FeatureRegistry>,
    dashboard: Arc<DashboardAggregator>,
    routes: RouteTable,
}

impl Shell {
    /// Build the shell from configuration and the available providers.
    ///
    /// Every candidate is bounded by the configured provider timeout.
    pub fn bootstrap(config: &AppConfig, candidates: Vec<Candidate>) -> Result<Self, CoreError> {
        let registry = Arc::new(FeatureRegistry::build(
            builtin_features(&config.features),
            config.duplicate_policy,
        )?);

        let limit = config.provider_timeout();
        let bounded = candidates.into_iter().map(|(feature, provider)| {
            let provider: Arc<dyn CapabilityProvider> =
                Arc::new(TimeoutProvider::new(provider, limit));
            (feature, provider)
        });
        let dashboard = Arc::new(
            DashboardAggregator::new(&registry, bounded)
                .with_preload_policy(config.preload_policy),
        );

        let routes = RouteTable::compose(&registry);

        tracing::info!(
            features = registry.len(),
            enabled = registry.descriptors().filter(|d| d.enabled).count(),
            providers = dashboard.len(),
            routes = routes.routes().len(),
            "Shell composed"
        );

        Ok(Self {
            registry,
            dashboard,
            routes,
        })
    }

    pub fn registry(&self) -> &Arc<FeatureRegistry> {
        &self.registry
    }

    pub fn dashboard(&self) -> &Arc<DashboardAggregator> {
        &self.dashboard
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Navigation menu for `viewer`: admin-only entries are hidden from
    /// non-administrators.
    pub fn navigation_for(&self, viewer: &Viewer) -> Vec<NavigationEntry> {
        self.registry
            .enabled_navigation()
            .into_iter()
            .filter(|entry| !entry.admin_only || viewer.admin)
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
