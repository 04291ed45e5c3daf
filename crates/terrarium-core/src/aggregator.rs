//! # Aggregator Module
//!
//! The dashboard aggregator: owns one provider per enabled feature and fans
//! summary and preload requests out across all of them.
//!
//! Both operations go through the same fan-out routine; they differ only in
//! the `JoinPolicy` applied when collecting results:
//! - `widgets` always joins `Tolerant`: a failing provider is logged and
//!   contributes nothing
//! - `preload` joins with the configured policy, `Strict` by default: every
//!   failure is logged and the first in binding order is returned

use crate::provider::CapabilityProvider;
use crate::registry::FeatureRegistry;
use crate::{CoreError, DashboardWidget, ProviderError, SubjectId};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

/// How a fan-out treats individual provider failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinPolicy {
    /// Log and skip failures; partial results are fine.
    Tolerant,
    /// Surface the first failure.
    #[default]
    Strict,
}

/// Widgets from one aggregation plus the features whose provider failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetReport {
    pub widgets: Vec<DashboardWidget>,
    pub failed: Vec<String>,
}

struct ProviderBinding {
    feature: String,
    provider: Arc<dyn CapabilityProvider>,
}

/// Successful results tagged with their feature, plus failed feature names.
struct FanOut<'a, T> {
    values: Vec<(&'a str, T)>,
    failed: Vec<String>,
}

/// Fans dashboard requests out to the providers of enabled features.
///
/// Bindings are fixed at construction and never change afterwards.
pub struct DashboardAggregator {
    bindings: Vec<ProviderBinding>,
    preload_policy: JoinPolicy,
}

impl DashboardAggregator {
    /// Bind the candidate providers whose feature is enabled in `registry`.
    ///
    /// Candidates for disabled or unknown features are dropped. A candidate
    /// repeating a feature name replaces the earlier one in place.
    pub fn new<I>(registry: &FeatureRegistry, candidates: I) -> Self
    where
        I: IntoIterator<Item = (String, Arc<dyn CapabilityProvider>)>,
    {
        let mut bindings: Vec<ProviderBinding> = Vec::new();
        for (feature, provider) in candidates {
            if !registry.is_enabled(&feature) {
                tracing::debug!(feature = %feature, "Feature disabled; provider not bound");
                continue;
            }
            match bindings.iter_mut().find(|b| b.feature == feature) {
                Some(existing) => existing.provider = provider,
                None => {
                    tracing::debug!(feature = %feature, "Provider bound");
                    bindings.push(ProviderBinding { feature, provider });
                }
            }
        }

        Self {
            bindings,
            preload_policy: JoinPolicy::default(),
        }
    }

    /// Set the join policy used by `preload`.
    #[must_use]
    pub fn with_preload_policy(mut self, policy: JoinPolicy) -> Self {
        self.preload_policy = policy;
        self
    }

    /// The join policy used by `preload`.
    #[must_use]
    pub fn preload_policy(&self) -> JoinPolicy {
        self.preload_policy
    }

    /// Bound feature names in binding order.
    pub fn bound_features(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.feature.as_str())
    }

    /// Number of bound providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True when no provider is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Collect widgets for `subject` from every bound provider.
    ///
    /// Never fails. Provider order and each provider's own widget order are
    /// preserved.
    pub async fn widgets(&self, subject: SubjectId) -> Vec<DashboardWidget> {
        self.widgets_report(subject).await.widgets
    }

    /// Like `widgets`, also naming the features whose provider failed.
    pub async fn widgets_report(&self, subject: SubjectId) -> WidgetReport {
        let outcomes = join_bound(self.bindings.iter(), |binding| {
            binding.provider.summarize(subject)
        })
        .await;
        let FanOut { values, failed } = tolerate(outcomes, "summarize");

        let widgets = values
            .into_iter()
            .flat_map(|(feature, widgets)| {
                widgets.into_iter().map(move |mut widget| {
                    if widget.feature.is_none() {
                        widget.feature = Some(feature.to_string());
                    }
                    widget
                })
            })
            .collect();

        WidgetReport { widgets, failed }
    }

    /// Run every bound provider's preload for `subject` and wait for all.
    ///
    /// Providers without a preload capability are skipped.
    pub async fn preload(&self, subject: SubjectId) -> Result<(), CoreError> {
        let capable = self
            .bindings
            .iter()
            .filter(|b| b.provider.supports_preload());
        let outcomes = join_bound(capable, |binding| binding.provider.preload(subject)).await;

        match self.preload_policy {
            JoinPolicy::Strict => require_all(outcomes, "preload").map(|_| ()),
            JoinPolicy::Tolerant => {
                tolerate(outcomes, "preload");
                Ok(())
            }
        }
    }
}

/// Outcome of one provider call, tagged with its feature.
type Outcome<'a, T> = (&'a str, Result<T, ProviderError>);

/// Start `call` on every binding at once and wait for all of them.
///
/// Outcomes come back in binding order.
async fn join_bound<'a, T, I, F, Fut>(bindings: I, call: F) -> Vec<Outcome<'a, T>>
where
    I: Iterator<Item = &'a ProviderBinding>,
    F: Fn(&'a ProviderBinding) -> Fut,
    Fut: Future<Output = Result<T, ProviderError>> + 'a,
{
    let calls = bindings.map(|binding| {
        let pending = call(binding);
        async move { (binding.feature.as_str(), pending.await) }
    });
    join_all(calls).await
}

/// `JoinPolicy::Tolerant`: keep the successes, log and name the failures.
fn tolerate<'a, T>(outcomes: Vec<Outcome<'a, T>>, operation: &'static str) -> FanOut<'a, T> {
    let mut collected = FanOut {
        values: Vec::with_capacity(outcomes.len()),
        failed: Vec::new(),
    };
    for (feature, outcome) in outcomes {
        match outcome {
            Ok(value) => collected.values.push((feature, value)),
            Err(error) => {
                tracing::warn!(feature, operation, error = %error, "Provider failed; skipping");
                collected.failed.push(feature.to_string());
            }
        }
    }
    collected
}

/// `JoinPolicy::Strict`: every failure is logged, the first in binding
/// order is returned.
fn require_all<'a, T>(
    outcomes: Vec<Outcome<'a, T>>,
    operation: &'static str,
) -> Result<Vec<(&'a str, T)>, CoreError> {
    let mut values = Vec::with_capacity(outcomes.len());
    let mut first_failure = None;
    for (feature, outcome) in outcomes {
        match outcome {
            Ok(value) => values.push((feature, value)),
            Err(source) => {
                tracing::error!(feature, operation, error = %source, "Provider failed");
                if first_failure.is_none() {
                    first_failure = Some(CoreError::Provider {
                        feature: feature.to_string(),
                        source,
                    });
                }
            }
        }
    }
    match first_failure {
        Some(error) => Err(error),
        None => Ok(values),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureDescriptor;
    use crate::provider::StaticProvider;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    /// Counts `ERROR` events.
    struct ErrorCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for ErrorCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    struct Failing;

    #[async_trait]
    impl CapabilityProvider for Failing {
        async fn summarize(&self, _subject: SubjectId) -> Result<Vec<DashboardWidget>, ProviderError> {
            Err(ProviderError::Failed("backend down".to_string()))
        }

        fn supports_preload(&self) -> bool {
            true
        }

        async fn preload(&self, _subject: SubjectId) -> Result<(), ProviderError> {
            Err(ProviderError::Failed("backend down".to_string()))
        }
    }

    #[derive(Default)]
    struct Counting {
        preloads: AtomicUsize,
    }

    #[async_trait]
    impl CapabilityProvider for Counting {
        async fn summarize(&self, _subject: SubjectId) -> Result<Vec<DashboardWidget>, ProviderError> {
            Ok(Vec::new())
        }

        fn supports_preload(&self) -> bool {
            true
        }

        async fn preload(&self, _subject: SubjectId) -> Result<(), ProviderError> {
            self.preloads.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn registry(features: &[(&str, bool)]) -> FeatureRegistry {
        FeatureRegistry::from_descriptors(
            features
                .iter()
                .map(|&(name, enabled)| FeatureDescriptor::new(name, enabled)),
        )
    }

    fn count_widget(value: i64) -> Arc<dyn CapabilityProvider> {
        Arc::new(StaticProvider::new(vec![DashboardWidget::new(
            "Count", value, "icon",
        )]))
    }

    #[test]
    fn binds_only_enabled_features() {
        let registry = registry(&[("on", true), ("off", false)]);
        let aggregator = DashboardAggregator::new(
            &registry,
            [
                ("on".to_string(), count_widget(1)),
                ("off".to_string(), count_widget(2)),
                ("unknown".to_string(), count_widget(3)),
            ],
        );
        assert_eq!(aggregator.bound_features().collect::<Vec<_>>(), vec!["on"]);
    }

    #[tokio::test]
    async fn no_providers_yields_empty_widgets() {
        let aggregator = DashboardAggregator::new(
            &FeatureRegistry::new(),
            Vec::<(String, Arc<dyn CapabilityProvider>)>::new(),
        );
        assert!(aggregator.is_empty());
        assert!(aggregator.widgets(SubjectId(1)).await.is_empty());
        assert!(aggregator.preload(SubjectId(1)).await.is_ok());
    }

    #[tokio::test]
    async fn failing_provider_is_skipped() {
        let registry = registry(&[("X", true), ("Y", true)]);
        let aggregator = DashboardAggregator::new(
            &registry,
            [
                ("X".to_string(), Arc::new(Failing) as Arc<dyn CapabilityProvider>),
                ("Y".to_string(), count_widget(3)),
            ],
        );

        let report = aggregator.widgets_report(SubjectId(42)).await;
        assert_eq!(report.failed, vec!["X"]);
        assert_eq!(report.widgets.len(), 1);
        assert_eq!(report.widgets[0].title, "Count");
        assert_eq!(report.widgets[0].value, 3);
        assert_eq!(report.widgets[0].feature.as_deref(), Some("Y"));
    }

    #[tokio::test]
    async fn widgets_keep_binding_order() {
        let registry = registry(&[("a", true), ("b", true)]);
        let aggregator = DashboardAggregator::new(
            &registry,
            [
                ("b".to_string(), count_widget(2)),
                ("a".to_string(), count_widget(1)),
            ],
        );
        let values: Vec<_> = aggregator
            .widgets(SubjectId(1))
            .await
            .into_iter()
            .map(|w| w.value)
            .collect();
        assert_eq!(values, vec![2, 1]);
    }

    #[tokio::test]
    async fn strict_preload_surfaces_failure() {
        let registry = registry(&[("X", true), ("Y", true)]);
        let counting = Arc::new(Counting::default());
        let aggregator = DashboardAggregator::new(
            &registry,
            [
                ("X".to_string(), Arc::new(Failing) as Arc<dyn CapabilityProvider>),
                ("Y".to_string(), counting.clone() as Arc<dyn CapabilityProvider>),
            ],
        );

        let result = aggregator.preload(SubjectId(1)).await;
        assert!(matches!(result, Err(CoreError::Provider { ref feature, .. }) if feature == "X"));
        // Every preload still ran to completion.
        assert_eq!(counting.preloads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn strict_preload_logs_every_failure() {
        let errors = Arc::new(AtomicUsize::new(0));
        let _default = tracing::subscriber::set_default(
            tracing_subscriber::registry().with(ErrorCounter(errors.clone())),
        );

        let registry = registry(&[("X", true), ("Y", true), ("Z", true)]);
        let counting = Arc::new(Counting::default());
        let aggregator = DashboardAggregator::new(
            &registry,
            [
                ("X".to_string(), Arc::new(Failing) as Arc<dyn CapabilityProvider>),
                ("Y".to_string(), counting.clone() as Arc<dyn CapabilityProvider>),
                ("Z".to_string(), Arc::new(Failing) as Arc<dyn CapabilityProvider>),
            ],
        );

        let result = aggregator.preload(SubjectId(1)).await;
        assert!(matches!(result, Err(CoreError::Provider { ref feature, .. }) if feature == "X"));
        assert_eq!(errors.load(Ordering::SeqCst), 2);
        assert_eq!(counting.preloads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn strict_join_reports_first_failure_in_binding_order() {
        let outcomes: Vec<Outcome<'_, ()>> = vec![
            ("a", Ok(())),
            ("b", Err(ProviderError::Timeout(5))),
            ("c", Err(ProviderError::Failed("down".to_string()))),
        ];
        match require_all(outcomes, "preload") {
            Err(CoreError::Provider { feature, source }) => {
                assert_eq!(feature, "b");
                assert_eq!(source, ProviderError::Timeout(5));
            }
            other => unreachable!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn tolerant_join_keeps_successes_in_order() {
        let outcomes: Vec<Outcome<'_, i64>> = vec![
            ("a", Ok(1)),
            ("b", Err(ProviderError::Failed("down".to_string()))),
            ("c", Ok(3)),
        ];
        let FanOut { values, failed } = tolerate(outcomes, "summarize");
        assert_eq!(values, vec![("a", 1), ("c", 3)]);
        assert_eq!(failed, vec!["b"]);
    }

    #[tokio::test]
    async fn tolerant_preload_ignores_failure() {
        let registry = registry(&[("X", true), ("Y", true)]);
        let counting = Arc::new(Counting::default());
        let aggregator = DashboardAggregator::new(
            &registry,
            [
                ("X".to_string(), Arc::new(Failing) as Arc<dyn CapabilityProvider>),
                ("Y".to_string(), counting.clone() as Arc<dyn CapabilityProvider>),
            ],
        )
        .with_preload_policy(JoinPolicy::Tolerant);

        assert!(aggregator.preload(SubjectId(1)).await.is_ok());
        assert_eq!(counting.preloads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn repeated_candidate_replaces_in_place() {
        let registry = registry(&[("a", true), ("b", true)]);
        let aggregator = DashboardAggregator::new(
            &registry,
            [
                ("a".to_string(), count_widget(1)),
                ("b".to_string(), count_widget(2)),
                ("a".to_string(), count_widget(9)),
            ],
        );
        assert_eq!(aggregator.len(), 2);
        assert_eq!(aggregator.bound_features().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
