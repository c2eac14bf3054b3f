//! Runs every dependency probe and folds the results into a report.

use std::time::Duration;

use futures_util::future::join_all;
use tokio::time;

use super::probe::ProbeRegistry;
use super::report::ReadinessReport;
use super::types::{DependencySpec, DependencyStatus, ProbeError};
use crate::observability::metrics;

pub struct HealthAggregator {
    registry: ProbeRegistry,
    timeout: Duration,
}

impl HealthAggregator {
    /// `timeout` bounds every probe, whatever the probe's own deadline.
    pub fn new(registry: ProbeRegistry, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    /// Probe every spec concurrently and return the report plus the overall
    /// readiness. All probes run to completion; a failure never hides the
    /// results of the others.
    pub async fn check_all(&self, specs: &[DependencySpec]) -> (ReadinessReport, bool) {
        let statuses = join_all(specs.iter().map(|spec| self.check_one(spec))).await;

        let ready = statuses.iter().all(|s| s.ok);
        let report: ReadinessReport = statuses.into_iter().collect();
        (report, ready)
    }

    async fn check_one(&self, spec: &DependencySpec) -> DependencyStatus {
        let name = spec.name();

        let result = match self.registry.get(spec.kind) {
            Some(probe) => match time::timeout(self.timeout, probe.check(spec)).await {
                Ok(result) => result,
                Err(_) => Err(ProbeError::Timeout(self.timeout)),
            },
            None => Err(ProbeError::NoProbe(spec.kind)),
        };

        let status = DependencyStatus::from_result(name, result);
        if status.ok {
            tracing::info!(dependency = %status.name, "Dependency is ready");
        } else {
            tracing::warn!(dependency = %status.name, detail = %status.detail, "Dependency check failed");
        }
        metrics::record_dependency_health(&status.name, status.ok);

        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::probe::Probe;
    use crate::health::types::DependencyKind;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Probe with a scripted outcome per address.
    #[derive(Default)]
    struct Scripted {
        failures: HashMap<String, &'static str>,
        calls: Arc<AtomicUsize>,
    }

    impl Scripted {
        fn failing(mut self, address: &str, detail: &'static str) -> Self {
            self.failures.insert(address.to_string(), detail);
            self
        }
    }

    #[async_trait]
    impl Probe for Scripted {
        async fn check(&self, spec: &DependencySpec) -> Result<(), ProbeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.failures.get(&spec.address) {
                Some(detail) => Err(ProbeError::UnexpectedResponse(detail.to_string())),
                None => Ok(()),
            }
        }
    }

    /// Fails its first call, answers every later one.
    #[derive(Default)]
    struct FailsOnce {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Probe for FailsOnce {
        async fn check(&self, _spec: &DependencySpec) -> Result<(), ProbeError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ProbeError::UnexpectedResponse("down".into()))
            } else {
                Ok(())
            }
        }
    }

    struct Hangs;

    #[async_trait]
    impl Probe for Hangs {
        async fn check(&self, _spec: &DependencySpec) -> Result<(), ProbeError> {
            time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }
    }

    fn specs(addresses: &[&str]) -> Vec<DependencySpec> {
        addresses
            .iter()
            .map(|a| DependencySpec::new(DependencyKind::Splash, *a))
            .collect()
    }

    fn aggregator(probe: impl Probe + 'static) -> HealthAggregator {
        HealthAggregator::new(
            ProbeRegistry::new().with(DependencyKind::Splash, probe),
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn test_all_ok_is_ready() {
        let aggregator = aggregator(Scripted::default());
        let (report, ready) = aggregator.check_all(&specs(&["a:1", "b:2", "c:3"])).await;

        assert!(ready);
        assert_eq!(report.len(), 3);
        assert!(report.iter().all(|s| s.detail == "Ok"));
    }

    #[tokio::test]
    async fn test_one_failure_does_not_hide_later_results() {
        let probe = Scripted::default().failing("a:1", "down");
        let calls = probe.calls.clone();
        let aggregator = aggregator(probe);

        let (report, ready) = aggregator.check_all(&specs(&["a:1", "b:2", "c:3"])).await;

        assert!(!ready);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(report.len(), 3);
        assert_eq!(report.detail("Splash (a:1)"), Some("unexpected response: down"));
        assert_eq!(report.detail("Splash (c:3)"), Some("Ok"));
        let order: Vec<_> = report.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(order, vec!["Splash (a:1)", "Splash (b:2)", "Splash (c:3)"]);
    }

    #[tokio::test]
    async fn test_failed_duplicate_is_not_masked_by_later_success() {
        let aggregator = aggregator(FailsOnce::default());
        let (report, ready) = aggregator.check_all(&specs(&["a:1", "a:1"])).await;

        assert!(!ready);
        assert_eq!(report.len(), 1);
        let status = report.get("Splash (a:1)").unwrap();
        assert!(!status.ok);
        assert_eq!(status.detail, "unexpected response: down");
    }

    #[tokio::test]
    async fn test_empty_specs_are_vacuously_ready() {
        let aggregator = aggregator(Scripted::default());
        let (report, ready) = aggregator.check_all(&[]).await;
        assert!(ready);
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_check_all_is_idempotent() {
        let aggregator = aggregator(Scripted::default().failing("b:2", "down"));
        let specs = specs(&["a:1", "b:2"]);

        let (first, first_ready) = aggregator.check_all(&specs).await;
        let (second, second_ready) = aggregator.check_all(&specs).await;

        assert_eq!(first_ready, second_ready);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_probe_fails_dependency() {
        let aggregator = aggregator(Scripted::default());
        let redis = vec![DependencySpec::new(DependencyKind::Redis, "r:6379")];

        let (report, ready) = aggregator.check_all(&redis).await;
        assert!(!ready);
        assert_eq!(report.detail("Redis (r:6379)"), Some("no probe registered for Redis"));
    }

    #[tokio::test]
    async fn test_hanging_probe_is_bounded_by_timeout() {
        let aggregator = HealthAggregator::new(
            ProbeRegistry::new().with(DependencyKind::Splash, Hangs),
            Duration::from_millis(50),
        );

        let started = std::time::Instant::now();
        let (report, ready) = aggregator.check_all(&specs(&["a:1", "b:2"])).await;

        assert!(!ready);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(report.iter().all(|s| s.detail == "timeout after 50ms"));
    }
}
