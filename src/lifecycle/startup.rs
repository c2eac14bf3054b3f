//! Startup gate.
//!
//! # Responsibilities
//! - Decide which dependencies must be live for the configured backends
//! - Probe them all and print one report line per dependency
//! - Hand control to the service entry point only when every probe passed
//!
//! # States
//! ```text
//! StartupGate (Checking) --check()--> Decision (Deciding) --start()--> entry point | abort
//! ```
//!
//! # Design Decisions
//! - One shot: no retry, the operator re-runs the process
//! - Both states are consumed on transition, so the entry point runs at most once

use std::error::Error as StdError;
use std::future::Future;
use std::io::Write;
use std::time::Duration;

use thiserror::Error;

use crate::config::FetchConfig;
use crate::health::{DependencyKind, DependencySpec, HealthAggregator, ProbeRegistry, ReadinessReport};
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    /// At least one required dependency failed its probe.
    #[error("dependencies not ready: {}", .failing.join(", "))]
    Unready { failing: Vec<String> },

    /// The service entry point returned an error.
    #[error("service failed: {0}")]
    EntryPoint(#[source] Box<dyn StdError + Send + Sync>),

    /// The operator report could not be written.
    #[error("failed to write startup report: {0}")]
    Report(#[from] std::io::Error),
}

/// Dependencies that must be live before the service may start: always the
/// Splash render backend, plus whatever the storage backend kind asks for.
pub fn required_dependencies(config: &FetchConfig) -> Vec<DependencySpec> {
    let mut specs = vec![DependencySpec::new(DependencyKind::Splash, config.splash.host.clone())];
    specs.extend(config.storage.kind.liveness_dependency(config));
    specs
}

/// Checking state.
pub struct StartupGate<'a> {
    config: &'a FetchConfig,
    aggregator: HealthAggregator,
}

impl<'a> StartupGate<'a> {
    pub fn new(config: &'a FetchConfig, registry: ProbeRegistry) -> Self {
        let timeout = Duration::from_secs(config.health_check.timeout_secs);
        Self {
            config,
            aggregator: HealthAggregator::new(registry, timeout),
        }
    }

    pub async fn check(self) -> Decision {
        let specs = required_dependencies(self.config);
        tracing::info!(
            storage = %self.config.storage.kind,
            dependencies = specs.len(),
            "Checking dependencies"
        );

        let (report, ready) = self.aggregator.check_all(&specs).await;
        metrics::record_startup_attempt(ready);

        Decision {
            listen_address: self.config.listener.address.clone(),
            report,
            ready,
        }
    }
}

/// Deciding state: the outcome of one check cycle.
#[derive(Debug)]
pub struct Decision {
    listen_address: String,
    report: ReadinessReport,
    ready: bool,
}

impl Decision {
    pub fn report(&self) -> &ReadinessReport {
        &self.report
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Write the report to `out`, then either run `entry` with the listen
    /// address or abort with [`StartupError::Unready`].
    pub async fn start<W, F, Fut, E>(self, out: &mut W, entry: F) -> Result<(), StartupError>
    where
        W: Write,
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        write!(out, "{}", self.report)?;

        if !self.ready {
            let failing = self.report.failing();
            tracing::error!(failing = ?failing, "Startup aborted: dependencies not ready");
            writeln!(out, "Not starting: required services are unavailable")?;
            out.flush()?;
            return Err(StartupError::Unready { failing });
        }

        writeln!(out, "Starting Server {}", self.listen_address)?;
        out.flush()?;
        tracing::info!(address = %self.listen_address, "All dependencies ready, starting service");

        entry(self.listen_address)
            .await
            .map_err(|e| StartupError::EntryPoint(e.into()))
    }
}

/// Run the whole gate: print the banner, check, decide.
pub async fn run<W, F, Fut, E>(
    config: &FetchConfig,
    registry: ProbeRegistry,
    out: &mut W,
    entry: F,
) -> Result<(), StartupError>
where
    W: Write,
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    writeln!(out, "Checking services ... ")?;
    out.flush()?;

    let decision = StartupGate::new(config, registry).check().await;
    decision.start(out, entry).await
}
