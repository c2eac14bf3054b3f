//! Dependency descriptions, probe outcomes and probe errors.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::config::schema::RedisNetwork;

/// Detail recorded for a dependency that answered its probe.
pub const OK_DETAIL: &str = "Ok";

/// Kinds of external dependency the fetch service relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DependencyKind {
    /// Splash rendering backend.
    Splash,
    /// Redis cache service.
    Redis,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyKind::Splash => f.write_str("Splash"),
            DependencyKind::Redis => f.write_str("Redis"),
        }
    }
}

/// Redis-specific connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisParams {
    pub network: RedisNetwork,
    pub password: Option<String>,
    pub db: i64,
}

impl Default for RedisParams {
    fn default() -> Self {
        Self {
            network: RedisNetwork::Tcp,
            password: None,
            db: 0,
        }
    }
}

/// One external dependency to verify before startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    pub kind: DependencyKind,
    /// `host:port`, URL or socket path depending on kind and transport.
    pub address: String,
    pub redis: Option<RedisParams>,
}

impl DependencySpec {
    pub fn new(kind: DependencyKind, address: impl Into<String>) -> Self {
        Self {
            kind,
            address: address.into(),
            redis: None,
        }
    }

    pub fn with_redis(mut self, params: RedisParams) -> Self {
        self.redis = Some(params);
        self
    }

    /// Report key, unique per kind and address.
    pub fn name(&self) -> String {
        format!("{} ({})", self.kind, self.address)
    }
}

/// Result of probing one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyStatus {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

impl DependencyStatus {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ok: true,
            detail: OK_DETAIL.to_string(),
        }
    }

    /// A failed status. An empty detail is replaced so a failure is never
    /// reported without an explanation.
    pub fn failed(name: impl Into<String>, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            name: name.into(),
            ok: false,
            detail: if detail.trim().is_empty() {
                "unknown failure".to_string()
            } else {
                detail
            },
        }
    }

    pub fn from_result(name: impl Into<String>, result: Result<(), ProbeError>) -> Self {
        match result {
            Ok(()) => Self::healthy(name),
            Err(e) => Self::failed(name, e.to_string()),
        }
    }
}

/// Errors a probe can hit. Always converted into a [`DependencyStatus`].
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Connection could not be established or broke mid-exchange.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Probe did not complete within its deadline.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// Address could not be turned into a probe target.
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// HTTP exchange failed below the status line.
    #[error("http error: {0}")]
    Http(String),

    /// Dependency answered, but not with a healthy reply.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Redis answered with an error reply.
    #[error("redis error: {0}")]
    Redis(String),

    /// Transport is unavailable on this platform.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// No probe is registered for the dependency kind.
    #[error("no probe registered for {0}")]
    NoProbe(DependencyKind),
}
