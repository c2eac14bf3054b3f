//! Liveness probe capability and the per-kind probe registry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::redis::RedisProbe;
use super::splash::SplashProbe;
use super::types::{DependencyKind, DependencySpec, ProbeError};

/// Something that can check one dependency for liveness.
///
/// Implementations perform a single round trip and must return within a
/// bounded time. Failures are returned as [`ProbeError`]; turning them into
/// report entries is the aggregator's job.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn check(&self, spec: &DependencySpec) -> Result<(), ProbeError>;
}

/// Maps each dependency kind to the probe that understands it.
#[derive(Clone, Default)]
pub struct ProbeRegistry {
    probes: HashMap<DependencyKind, Arc<dyn Probe>>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the network probes for every known kind.
    pub fn network(timeout: Duration) -> Self {
        Self::new()
            .with(DependencyKind::Splash, SplashProbe::new(timeout))
            .with(DependencyKind::Redis, RedisProbe::new(timeout))
    }

    /// Register `probe` for `kind`, replacing any previous one.
    pub fn with(mut self, kind: DependencyKind, probe: impl Probe + 'static) -> Self {
        self.probes.insert(kind, Arc::new(probe));
        self
    }

    pub fn get(&self, kind: DependencyKind) -> Option<Arc<dyn Probe>> {
        self.probes.get(&kind).cloned()
    }
}

impl std::fmt::Debug for ProbeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeRegistry")
            .field("kinds", &self.probes.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Always;

    #[async_trait]
    impl Probe for Always {
        async fn check(&self, _spec: &DependencySpec) -> Result<(), ProbeError> {
            Ok(())
        }
    }

    #[test]
    fn test_network_registry_covers_all_kinds() {
        let registry = ProbeRegistry::network(Duration::from_secs(1));
        assert!(registry.get(DependencyKind::Splash).is_some());
        assert!(registry.get(DependencyKind::Redis).is_some());
    }

    #[tokio::test]
    async fn test_with_replaces_probe() {
        let registry = ProbeRegistry::new().with(DependencyKind::Redis, Always);
        assert!(registry.get(DependencyKind::Splash).is_none());

        let probe = registry.get(DependencyKind::Redis).unwrap();
        let spec = DependencySpec::new(DependencyKind::Redis, "nowhere:1");
        assert!(probe.check(&spec).await.is_ok());
    }
}
