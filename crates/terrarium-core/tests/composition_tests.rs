//! # Composition Scenario Tests
//!
//! End-to-end checks of registry and aggregator working together, grouped
//! by the component they exercise.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use terrarium_core::{
    CapabilityProvider, CoreError, DashboardAggregator, DashboardWidget, FeatureDescriptor,
    FeatureRegistry, JoinPolicy, NavigationEntry, ProviderError, RouteDefinition, StaticProvider,
    SubjectId, TimeoutProvider,
};

/// Provider that always fails.
struct Broken;

#[async_trait]
impl CapabilityProvider for Broken {
    async fn summarize(&self, subject: SubjectId) -> Result<Vec<DashboardWidget>, ProviderError> {
        Err(ProviderError::Failed(format!("no data for {subject}")))
    }

    fn supports_preload(&self) -> bool {
        true
    }

    async fn preload(&self, _subject: SubjectId) -> Result<(), ProviderError> {
        Err(ProviderError::Failed("warm-up failed".to_string()))
    }
}

/// Provider that answers after a delay.
struct Slow(Duration);

#[async_trait]
impl CapabilityProvider for Slow {
    async fn summarize(&self, _subject: SubjectId) -> Result<Vec<DashboardWidget>, ProviderError> {
        tokio::time::sleep(self.0).await;
        Ok(vec![DashboardWidget::new("Slow", 1, "icon")])
    }

    fn supports_preload(&self) -> bool {
        true
    }

    async fn preload(&self, _subject: SubjectId) -> Result<(), ProviderError> {
        tokio::time::sleep(self.0).await;
        Ok(())
    }
}

fn provider(p: impl CapabilityProvider + 'static) -> Arc<dyn CapabilityProvider> {
    Arc::new(p)
}

// =============================================================================
// REGISTRY SCENARIOS
// =============================================================================

mod registry {
    use super::*;

    /// Enabled "A" with one route and nav entry, disabled "B" with one route.
    #[test]
    fn disabled_feature_is_invisible() {
        let registry = FeatureRegistry::from_descriptors([
            FeatureDescriptor::new("A", true)
                .with_route(RouteDefinition::new("/a", "a"))
                .with_navigation(NavigationEntry::new("A", "/a", "icon")),
            FeatureDescriptor::new("B", false).with_route(RouteDefinition::new("/b", "b")),
        ]);

        let routes: Vec<_> = registry.enabled_routes().into_iter().map(|r| r.path).collect();
        assert_eq!(routes, vec!["/a"]);

        let nav = registry.enabled_navigation();
        assert_eq!(nav.len(), 1);
        assert_eq!(nav[0].label, "A");
        assert!(!nav[0].admin_only);
    }

    /// "Admin" (admin-only) registered before "Home"; Home is listed first.
    #[test]
    fn admin_navigation_listed_last() {
        let registry = FeatureRegistry::from_descriptors([
            FeatureDescriptor::new("Admin", true)
                .with_navigation(NavigationEntry::new("Admin", "/admin", "icon").admin_only()),
            FeatureDescriptor::new("Home", true)
                .with_navigation(NavigationEntry::new("Home", "/home", "icon")),
        ]);

        let labels: Vec<_> = registry
            .enabled_navigation()
            .into_iter()
            .map(|n| n.label)
            .collect();
        assert_eq!(labels, vec!["Home", "Admin"]);
    }

    #[test]
    fn aggregation_reflects_registration_at_call_time() {
        let mut registry = FeatureRegistry::new();
        registry.register(
            FeatureDescriptor::new("A", true).with_route(RouteDefinition::new("/a", "a")),
        );
        assert_eq!(registry.enabled_routes().len(), 1);

        registry.register(
            FeatureDescriptor::new("B", true).with_route(RouteDefinition::new("/b", "b")),
        );
        assert_eq!(registry.enabled_routes().len(), 2);
    }
}

// =============================================================================
// AGGREGATOR SCENARIOS
// =============================================================================

mod aggregator {
    use super::*;

    fn registry(names: &[&str]) -> FeatureRegistry {
        FeatureRegistry::from_descriptors(names.iter().map(|n| FeatureDescriptor::new(*n, true)))
    }

    /// Provider X fails for subject 42; provider Y's widget still comes through.
    #[tokio::test]
    async fn failing_provider_does_not_hide_others() {
        let registry = registry(&["X", "Y"]);
        let aggregator = DashboardAggregator::new(
            &registry,
            [
                ("X".to_string(), provider(Broken)),
                (
                    "Y".to_string(),
                    provider(StaticProvider::new(vec![DashboardWidget::new(
                        "Count", 3, "icon",
                    )])),
                ),
            ],
        );

        let widgets = aggregator.widgets(SubjectId(42)).await;
        assert_eq!(widgets.len(), 1);
        assert_eq!(widgets[0].title, "Count");
        assert_eq!(widgets[0].value, 3);
    }

    #[tokio::test]
    async fn all_providers_failing_yields_empty() {
        let registry = registry(&["X", "Y"]);
        let aggregator = DashboardAggregator::new(
            &registry,
            [
                ("X".to_string(), provider(Broken)),
                ("Y".to_string(), provider(Broken)),
            ],
        );

        let report = aggregator.widgets_report(SubjectId(1)).await;
        assert!(report.widgets.is_empty());
        assert_eq!(report.failed, vec!["X", "Y"]);
    }

    #[tokio::test(start_paused = true)]
    async fn providers_run_concurrently() {
        let registry = registry(&["a", "b", "c"]);
        let aggregator = DashboardAggregator::new(
            &registry,
            ["a", "b", "c"]
                .into_iter()
                .map(|n| (n.to_string(), provider(Slow(Duration::from_secs(10))))),
        );

        let started = tokio::time::Instant::now();
        let widgets = aggregator.widgets(SubjectId(1)).await;
        assert_eq!(widgets.len(), 3);
        // Sequential calls would take 30 s of virtual time.
        assert!(started.elapsed() < Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn preloads_run_concurrently() {
        let registry = registry(&["a", "b", "c"]);
        for policy in [JoinPolicy::Strict, JoinPolicy::Tolerant] {
            let aggregator = DashboardAggregator::new(
                &registry,
                ["a", "b", "c"]
                    .into_iter()
                    .map(|n| (n.to_string(), provider(Slow(Duration::from_secs(10))))),
            )
            .with_preload_policy(policy);

            let started = tokio::time::Instant::now();
            assert!(aggregator.preload(SubjectId(1)).await.is_ok());
            let elapsed = started.elapsed();
            assert!(
                elapsed >= Duration::from_secs(10) && elapsed < Duration::from_secs(20),
                "{policy:?} preload took {elapsed:?}"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_provider_is_dropped_from_widgets() {
        let registry = registry(&["slow", "fast"]);
        let slow = TimeoutProvider::new(
            provider(Slow(Duration::from_secs(60))),
            Duration::from_secs(1),
        );
        let aggregator = DashboardAggregator::new(
            &registry,
            [
                ("slow".to_string(), provider(slow)),
                (
                    "fast".to_string(),
                    provider(StaticProvider::new(vec![DashboardWidget::new("Fast", 2, "i")])),
                ),
            ],
        );

        let report = aggregator.widgets_report(SubjectId(1)).await;
        assert_eq!(report.failed, vec!["slow"]);
        assert_eq!(report.widgets.len(), 1);
        assert_eq!(report.widgets[0].title, "Fast");
    }

    #[tokio::test]
    async fn preload_policy_decides_failure_surfacing() {
        let registry = registry(&["X"]);
        let strict = DashboardAggregator::new(&registry, [("X".to_string(), provider(Broken))]);
        assert_eq!(strict.preload_policy(), JoinPolicy::Strict);
        assert!(matches!(
            strict.preload(SubjectId(1)).await,
            Err(CoreError::Provider { .. })
        ));

        let tolerant = DashboardAggregator::new(&registry, [("X".to_string(), provider(Broken))])
            .with_preload_policy(JoinPolicy::Tolerant);
        assert!(tolerant.preload(SubjectId(1)).await.is_ok());
    }

    #[tokio::test]
    async fn providers_without_preload_are_skipped() {
        let registry = registry(&["static"]);
        let aggregator = DashboardAggregator::new(
            &registry,
            [("static".to_string(), provider(StaticProvider::default()))],
        );
        assert!(aggregator.preload(SubjectId(1)).await.is_ok());
    }
}
