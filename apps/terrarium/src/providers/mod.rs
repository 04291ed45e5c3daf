//! # Dashboard Providers
//!
//! The concrete capability providers this shell knows how to build, keyed
//! by the feature they belong to. The aggregator decides which of them are
//! actually bound.

mod reptile;

pub use reptile::ReptileStatsProvider;

use crate::client::{RecordsClient, ReptileStats};
use crate::config::AppConfig;
use std::sync::Arc;
use terrarium_core::catalog::REPTILE_MANAGEMENT;
use terrarium_core::{CapabilityProvider, StaticProvider};

/// A provider offered to the aggregator for one feature.
pub type Candidate = (String, Arc<dyn CapabilityProvider>);

/// Providers backed by the records API.
pub fn live_candidates(config: &AppConfig) -> Vec<Candidate> {
    let client = RecordsClient::new(&config.records.base_url, config.records.token.clone());
    tracing::info!("Records API: {}", client.base_url());

    let reptiles: Arc<dyn CapabilityProvider> = Arc::new(ReptileStatsProvider::new(client));
    vec![(REPTILE_MANAGEMENT.to_string(), reptiles)]
}

/// Providers answering with zeroed counters, for use without a records API.
pub fn offline_candidates() -> Vec<Candidate> {
    let reptiles: Arc<dyn CapabilityProvider> =
        Arc::new(StaticProvider::new(ReptileStats::default().widgets()));
    vec![(REPTILE_MANAGEMENT.to_string(), reptiles)]
}
