//! # terrarium-core
//!
//! The feature composition layer for Terrarium - THE LOGIC.
//!
//! Features are independently developed bundles of routes, navigation
//! entries and dashboard widgets. This crate lets them register once, be
//! toggled by static flags, and be aggregated into the route table,
//! navigation menu and dashboard without the shell knowing their concrete
//! types.
//!
//! ## Components
//!
//! - `registry` - the `FeatureRegistry` of descriptors and its aggregations
//! - `provider` - the `CapabilityProvider` contract and its adapters
//! - `aggregator` - the `DashboardAggregator` fan-out over providers
//! - `flags` / `catalog` - static flags and the built-in feature descriptors
//!
//! ## Architectural Constraints
//!
//! - No network, no file I/O: the app hands in flags and providers
//! - Registry and aggregator are immutable once built; share them by `Arc`
//! - Lookups never fail: unknown names degrade to `false` or empty

// =============================================================================
// MODULES
// =============================================================================

pub mod aggregator;
pub mod catalog;
pub mod flags;
pub mod provider;
pub mod registry;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    CoreError, DashboardWidget, FeatureDescriptor, GuardId, NavigationEntry, ProviderError,
    RouteDefinition, SubjectId, ViewRef,
};

// =============================================================================
// RE-EXPORTS: Composition
// =============================================================================

pub use aggregator::{DashboardAggregator, JoinPolicy, WidgetReport};
pub use catalog::builtin_features;
pub use flags::FeatureFlags;
pub use provider::{CapabilityProvider, StaticProvider, TimeoutProvider};
pub use registry::{DuplicatePolicy, FeatureRegistry};
