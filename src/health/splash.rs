//! Splash rendering backend probe.
//!
//! # Responsibilities
//! - Hit Splash's `/_ping` endpoint
//! - Accept only a 2xx answer whose JSON body reports `"status": "ok"`

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde::Deserialize;
use tokio::time;
use url::Url;

use super::probe::Probe;
use super::types::{DependencySpec, ProbeError};

const PING_PATH: &str = "/_ping";
const MAX_PING_BODY: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
struct PingReply {
    status: String,
}

pub struct SplashProbe {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl SplashProbe {
    pub fn new(timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeout));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self { client, timeout }
    }

    async fn ping(&self, url: &Url) -> Result<(), ProbeError> {
        let request = Request::builder()
            .method("GET")
            .uri(url.as_str())
            .header("user-agent", "fetch-gate-health-check")
            .body(Body::empty())
            .map_err(|e| ProbeError::Http(e.to_string()))?;

        let response: hyper::Response<Incoming> = self
            .client
            .request(request)
            .await
            .map_err(|e| ProbeError::Http(error_chain(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::UnexpectedResponse(format!("status {}", status)));
        }

        let body = axum::body::to_bytes(Body::new(response.into_body()), MAX_PING_BODY)
            .await
            .map_err(|e| ProbeError::Http(e.to_string()))?;
        let reply: PingReply = serde_json::from_slice(&body)
            .map_err(|e| ProbeError::UnexpectedResponse(format!("malformed ping reply: {}", e)))?;

        if reply.status != "ok" {
            return Err(ProbeError::UnexpectedResponse(format!("splash status '{}'", reply.status)));
        }
        Ok(())
    }
}

/// Flatten an error and its sources into one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}

/// Build the `/_ping` URL for a Splash address. Bare `host:port` addresses
/// are treated as plain HTTP. The client has no TLS connector, so any scheme
/// other than `http` is rejected.
pub fn ping_url(address: &str) -> Result<Url, ProbeError> {
    let base = if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    };

    let invalid = |reason: String| ProbeError::InvalidAddress {
        address: address.to_string(),
        reason,
    };
    let base = Url::parse(&base).map_err(|e| invalid(e.to_string()))?;
    if base.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    if base.scheme() != "http" {
        return Err(invalid(format!(
            "unsupported scheme '{}', only http is supported",
            base.scheme()
        )));
    }
    base.join(PING_PATH).map_err(|e| invalid(e.to_string()))
}

#[async_trait]
impl Probe for SplashProbe {
    async fn check(&self, spec: &DependencySpec) -> Result<(), ProbeError> {
        let url = ping_url(&spec.address)?;
        tracing::debug!(url = %url, "Probing Splash");

        match time::timeout(self.timeout, self.ping(&url)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(self.timeout)),
        }
    }
}
