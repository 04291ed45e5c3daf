//! # Registry Module
//!
//! The feature registry: the set of registered feature descriptors, the
//! enablement lookup, and the aggregation of enabled routes and navigation.
//!
//! - Registration order drives every aggregation
//! - Re-registering a name overwrites the descriptor in place (it keeps its
//!   original slot in registration order)
//! - Lookups never fail; unknown names read as disabled/empty
//! - Aggregations are recomputed on every call; nothing is cached

use crate::{CoreError, FeatureDescriptor, NavigationEntry, RouteDefinition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What to do when a descriptor is registered under a name already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Last registration wins.
    #[default]
    Overwrite,
    /// Duplicate registration is a startup error.
    Reject,
}

/// Registry of feature descriptors.
///
/// Built once at startup, then shared read-only (typically behind an `Arc`)
/// with the shell and the dashboard aggregator.
#[derive(Debug, Clone, Default)]
pub struct FeatureRegistry {
    /// Descriptors in registration order.
    features: Vec<FeatureDescriptor>,
    /// Name to slot in `features`.
    index: BTreeMap<String, usize>,
}

impl FeatureRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry by registering each descriptor in turn.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = FeatureDescriptor>) -> Self {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor);
        }
        registry
    }

    /// Build a registry under the given duplicate policy.
    pub fn build(
        descriptors: impl IntoIterator<Item = FeatureDescriptor>,
        policy: DuplicatePolicy,
    ) -> Result<Self, CoreError> {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register_with(descriptor, policy)?;
        }
        Ok(registry)
    }

    /// Insert or overwrite a descriptor under its name. Always succeeds.
    pub fn register(&mut self, descriptor: FeatureDescriptor) {
        if let Some(&slot) = self.index.get(&descriptor.name) {
            tracing::warn!(
                feature = %descriptor.name,
                "Feature registered twice; replacing previous descriptor"
            );
            self.features[slot] = descriptor;
            return;
        }

        tracing::debug!(
            feature = %descriptor.name,
            enabled = descriptor.enabled,
            routes = descriptor.routes.len(),
            navigation = descriptor.navigation.len(),
            "Feature registered"
        );
        self.index
            .insert(descriptor.name.clone(), self.features.len());
        self.features.push(descriptor);
    }

    /// Insert a descriptor, rejecting a name that is already registered.
    pub fn try_register(&mut self, descriptor: FeatureDescriptor) -> Result<(), CoreError> {
        if self.index.contains_key(&descriptor.name) {
            return Err(CoreError::DuplicateFeature(descriptor.name));
        }
        self.register(descriptor);
        Ok(())
    }

    /// Register according to `policy`.
    pub fn register_with(
        &mut self,
        descriptor: FeatureDescriptor,
        policy: DuplicatePolicy,
    ) -> Result<(), CoreError> {
        match policy {
            DuplicatePolicy::Overwrite => {
                self.register(descriptor);
                Ok(())
            }
            DuplicatePolicy::Reject => self.try_register(descriptor),
        }
    }

    /// Whether the named feature is registered and enabled.
    ///
    /// Unknown names are reported as disabled.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.descriptor(name).is_some_and(|d| d.enabled)
    }

    /// Routes of all enabled features, in registration order.
    #[must_use]
    pub fn enabled_routes(&self) -> Vec<RouteDefinition> {
        self.enabled()
            .flat_map(|d| d.routes.iter().cloned())
            .collect()
    }

    /// Navigation entries of all enabled features.
    ///
    /// Admin-only entries come after every other entry; within each group
    /// registration order is preserved.
    #[must_use]
    pub fn enabled_navigation(&self) -> Vec<NavigationEntry> {
        let mut navigation: Vec<NavigationEntry> = self
            .enabled()
            .flat_map(|d| d.navigation.iter().cloned())
            .collect();
        // sort_by_key is stable
        navigation.sort_by_key(|entry| entry.admin_only);
        navigation
    }

    /// The feature's own routes, whether or not it is enabled.
    #[must_use]
    pub fn routes_for(&self, name: &str) -> Vec<RouteDefinition> {
        self.descriptor(name)
            .map(|d| d.routes.clone())
            .unwrap_or_default()
    }

    /// The feature's own navigation entries, whether or not it is enabled.
    #[must_use]
    pub fn navigation_for(&self, name: &str) -> Vec<NavigationEntry> {
        self.descriptor(name)
            .map(|d| d.navigation.clone())
            .unwrap_or_default()
    }

    /// Look up a descriptor by name.
    #[must_use]
    pub fn descriptor(&self, name: &str) -> Option<&FeatureDescriptor> {
        self.index.get(name).and_then(|&slot| self.features.get(slot))
    }

    /// All descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &FeatureDescriptor> {
        self.features.iter()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|d| d.name.as_str())
    }

    /// Number of registered features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    fn enabled(&self) -> impl Iterator<Item = &FeatureDescriptor> {
        self.features.iter().filter(|d| d.enabled)
    }
}

// =============================================================================
// TESTS
// =============================================================================
