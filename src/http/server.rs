//! HTTP server started once the startup gate has passed.
//!
//! # Responsibilities
//! - Bind the listen address handed over by the gate
//! - Answer liveness checks on `/ping`
//! - Wire up middleware (tracing, request timeout)
//! - Drain and stop on the shutdown broadcast

use std::time::Duration;

use axum::{routing::get, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::schema::ListenerConfig;
use crate::lifecycle::Shutdown;

#[derive(Debug, Serialize)]
pub struct PingReply {
    pub alive: bool,
}

/// HTTP server for the fetch service.
pub struct FetchServer {
    router: Router,
}

impl FetchServer {
    pub fn new(config: &ListenerConfig) -> Self {
        Self {
            router: Self::build_router(config),
        }
    }

    #[allow(deprecated)]
    fn build_router(config: &ListenerConfig) -> Router {
        Router::new().route("/ping", get(ping)).layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs))),
        )
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Bind `listen_address` and serve. This is the entry point the startup
    /// gate hands control to.
    pub async fn bind_and_run(
        self,
        listen_address: &str,
        shutdown: Shutdown,
    ) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(listen_address).await?;
        self.run(listener, shutdown).await
    }
}

async fn ping() -> Json<PingReply> {
    Json(PingReply { alive: true })
}
