//! # Provider Module
//!
//! The capability provider contract consumed from features, plus two
//! adapters:
//! - `TimeoutProvider` bounds every call of a wrapped provider
//! - `StaticProvider` answers with a fixed widget list

use crate::{DashboardWidget, ProviderError, SubjectId};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// CAPABILITY PROVIDER TRAIT
// =============================================================================

/// A feature-supplied source of dashboard summary data.
///
/// `summarize` is mandatory. `preload` is an optional best-effort warm-up;
/// a provider that implements it must also return `true` from
/// `supports_preload`, otherwise the aggregator skips it.
///
/// Implementations must not mutate shared state from `summarize`. They may
/// swallow their own internal errors and answer with an empty list; any
/// error they do return is still contained by the aggregator.
///
/// # Example
///
/// ```rust,ignore
/// struct CountProvider;
///
/// #[async_trait]
/// impl CapabilityProvider for CountProvider {
///     async fn summarize(&self, _subject: SubjectId) -> Result<Vec<DashboardWidget>, ProviderError> {
///         Ok(vec![DashboardWidget::new("Count", 3, "icon")])
///     }
/// }
/// ```
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    /// Produce zero or more widgets for `subject`.
    async fn summarize(&self, subject: SubjectId) -> Result<Vec<DashboardWidget>, ProviderError>;

    /// Whether `preload` does anything.
    fn supports_preload(&self) -> bool {
        false
    }

    /// Warm up data for `subject`.
    async fn preload(&self, subject: SubjectId) -> Result<(), ProviderError> {
        let _ = subject;
        Ok(())
    }
}

// =============================================================================
// TIMEOUT ADAPTER
// =============================================================================

/// Wraps a provider and fails any call that outlives `limit`.
#[derive(Clone)]
pub struct TimeoutProvider {
    inner: Arc<dyn CapabilityProvider>,
    limit: Duration,
}

impl TimeoutProvider {
    /// Bound every call of `inner` by `limit`.
    #[must_use]
    pub fn new(inner: Arc<dyn CapabilityProvider>, limit: Duration) -> Self {
        Self { inner, limit }
    }

    fn elapsed_error(&self) -> ProviderError {
        ProviderError::Timeout(self.limit.as_millis() as u64)
    }
}

#[async_trait]
impl CapabilityProvider for TimeoutProvider {
    async fn summarize(&self, subject: SubjectId) -> Result<Vec<DashboardWidget>, ProviderError> {
        tokio::time::timeout(self.limit, self.inner.summarize(subject))
            .await
            .map_err(|_| self.elapsed_error())?
    }

    fn supports_preload(&self) -> bool {
        self.inner.supports_preload()
    }

    async fn preload(&self, subject: SubjectId) -> Result<(), ProviderError> {
        tokio::time::timeout(self.limit, self.inner.preload(subject))
            .await
            .map_err(|_| self.elapsed_error())?
    }
}

// =============================================================================
// STATIC ADAPTER
// =============================================================================

/// Provider answering every subject with the same widgets.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    widgets: Vec<DashboardWidget>,
}

impl StaticProvider {
    /// Create a provider that always returns `widgets`.
    #[must_use]
    pub fn new(widgets: Vec<DashboardWidget>) -> Self {
        Self { widgets }
    }
}

#[async_trait]
impl CapabilityProvider for StaticProvider {
    async fn summarize(&self, _subject: SubjectId) -> Result<Vec<DashboardWidget>, ProviderError> {
        Ok(self.widgets.clone())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Stalled;

    #[async_trait]
    impl CapabilityProvider for Stalled {
        async fn summarize(&self, _subject: SubjectId) -> Result<Vec<DashboardWidget>, ProviderError> {
            futures::future::pending().await
        }

        fn supports_preload(&self) -> bool {
            true
        }

        async fn preload(&self, _subject: SubjectId) -> Result<(), ProviderError> {
            futures::future::pending().await
        }
    }

    #[tokio::test]
    async fn static_provider_returns_its_widgets() {
        let provider = StaticProvider::new(vec![DashboardWidget::new("Count", 3, "i")]);
        let widgets = provider.summarize(SubjectId(1)).await.expect("summarize");
        assert_eq!(widgets.len(), 1);
        assert!(!provider.supports_preload());
        assert!(provider.preload(SubjectId(1)).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_fails_stalled_summarize() {
        let provider = TimeoutProvider::new(Arc::new(Stalled), Duration::from_millis(50));
        let result = provider.summarize(SubjectId(7)).await;
        assert_eq!(result, Err(ProviderError::Timeout(50)));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_fails_stalled_preload() {
        let provider = TimeoutProvider::new(Arc::new(Stalled), Duration::from_millis(20));
        assert!(provider.supports_preload());
        assert_eq!(
            provider.preload(SubjectId(7)).await,
            Err(ProviderError::Timeout(20))
        );
    }

    #[tokio::test]
    async fn timeout_passes_fast_results_through() {
        let inner = Arc::new(StaticProvider::new(vec![DashboardWidget::new("A", 1, "i")]));
        let provider = TimeoutProvider::new(inner, Duration::from_secs(5));
        let widgets = provider.summarize(SubjectId(1)).await.expect("summarize");
        assert_eq!(widgets[0].title, "A");
    }
}
