//! Reptile-management stat-summary provider.

use crate::client::{ReptileStats, StatsSource};
use async_trait::async_trait;
use terrarium_core::catalog::{CLEANING_ICON, FEEDING_ICON, REPTILE_ICON};
use terrarium_core::{CapabilityProvider, DashboardWidget, ProviderError, SubjectId};

/// Route every reptile widget links to.
const REPTILES_ROUTE: &str = "/reptiles";

impl ReptileStats {
    /// The four dashboard widgets for these counters.
    pub fn widgets(&self) -> Vec<DashboardWidget> {
        vec![
            DashboardWidget::new("Total Reptiles", self.total_reptiles, REPTILE_ICON)
                .linked_to(REPTILES_ROUTE),
            DashboardWidget::new("Active Reptiles", self.active_reptiles, REPTILE_ICON)
                .linked_to(REPTILES_ROUTE),
            DashboardWidget::new("Need Feeding", self.needs_feeding, FEEDING_ICON)
                .linked_to(REPTILES_ROUTE),
            DashboardWidget::new("Enclosures Need Cleaning", self.needs_cleaning, CLEANING_ICON)
                .linked_to(REPTILES_ROUTE),
        ]
    }
}

/// Summarizes the keeper's collection from the records API statistics.
///
/// Errors from the records API are logged and swallowed here: the dashboard
/// shows no reptile widgets rather than a failure.
pub struct ReptileStatsProvider<S> {
    source: S,
}

impl<S: StatsSource> ReptileStatsProvider<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S: StatsSource> CapabilityProvider for ReptileStatsProvider<S> {
    async fn summarize(&self, subject: SubjectId) -> Result<Vec<DashboardWidget>, ProviderError> {
        match self.source.reptile_stats().await {
            Ok(stats) => Ok(stats.widgets()),
            Err(e) => {
                tracing::warn!(subject = %subject, error = %e, "Reptile statistics unavailable");
                Ok(Vec::new())
            }
        }
    }

    fn supports_preload(&self) -> bool {
        true
    }

    async fn preload(&self, subject: SubjectId) -> Result<(), ProviderError> {
        if let Err(e) = self.source.reptile_stats().await {
            tracing::warn!(subject = %subject, error = %e, "Reptile statistics preload failed");
        }
        Ok(())
    }
}
