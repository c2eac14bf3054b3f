//! Fetch service entry binary.
//!
//! ```text
//! flags/env/file → FetchConfig → startup gate → FetchServer (or exit 1)
//! ```

use std::net::SocketAddr;
use std::process::ExitCode;

use clap::Parser;

use fetch_gate::config::{self, Cli};
use fetch_gate::lifecycle::{signals, startup};
use fetch_gate::observability::{logging, metrics};
use fetch_gate::{FetchServer, ProbeRegistry, Shutdown};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config::resolve(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "fetch-gate starting");
    tracing::info!(
        listen_address = %config.listener.address,
        splash = %config.splash.host,
        storage = %config.storage.kind,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let server = FetchServer::new(&config.listener);
    let registry = ProbeRegistry::network(std::time::Duration::from_secs(
        config.health_check.timeout_secs,
    ));

    let mut stdout = std::io::stdout();
    let result = startup::run(&config, registry, &mut stdout, |listen_address| {
        signals::spawn_signal_listener(shutdown.clone());
        async move { server.bind_and_run(&listen_address, shutdown).await }
    })
    .await;

    match result {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
