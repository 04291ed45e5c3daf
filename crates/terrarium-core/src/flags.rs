//! # Feature Flags
//!
//! Static `name -> bool` switches, read once at process start.
//!
//! Flags are deserialized transparently from a map, so a TOML table such as
//!
//! ```toml
//! [features]
//! todos = false
//! reptile-management = true
//! ```
//!
//! becomes a `FeatureFlags` directly. A flag that is absent falls back to
//! the default supplied by whoever asks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named boolean switches controlling which features are enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlags(BTreeMap<String, bool>);

impl FeatureFlags {
    /// Create an empty flag set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a flag, replacing any previous value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.set(name, enabled);
        self
    }

    /// Set a flag, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, enabled: bool) {
        self.0.insert(name.into(), enabled);
    }

    /// Explicit value of a flag, if configured.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<bool> {
        self.0.get(name).copied()
    }

    /// Value of a flag, or `default` when it is not configured.
    #[must_use]
    pub fn resolve(&self, name: &str, default: bool) -> bool {
        self.get(name).unwrap_or(default)
    }

    /// Configured flag names not present in `known`, in name order.
    pub fn unknown<'a>(&'a self, known: &'a [&'a str]) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .keys()
            .map(String::as_str)
            .filter(move |name| !known.contains(name))
    }

    /// Iterate over configured flags in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(name, &enabled)| (name.as_str(), enabled))
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for FeatureFlags {
    fn from_iter<T: IntoIterator<Item = (S, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
