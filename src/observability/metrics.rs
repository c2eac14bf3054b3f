//! Metrics collection and exposition.
//!
//! # Metrics
//! - `fetch_dependency_up` (gauge): 1=reachable, 0=failing, per dependency
//! - `fetch_startup_attempts_total` (counter): gate outcomes by `outcome`

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

pub fn record_dependency_health(dependency: &str, ok: bool) {
    metrics::gauge!("fetch_dependency_up", "dependency" => dependency.to_string())
        .set(if ok { 1.0 } else { 0.0 });
}

pub fn record_startup_attempt(ready: bool) {
    let outcome = if ready { "ready" } else { "unready" };
    metrics::counter!("fetch_startup_attempts_total", "outcome" => outcome).increment(1);
}
