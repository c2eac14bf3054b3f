//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the fetch
//! service launcher. All types derive Serde traits for deserialization from
//! config files.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::health::{DependencyKind, DependencySpec, RedisParams};

/// Root configuration for the fetch service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FetchConfig {
    /// HTTP listener of the fetch service itself.
    pub listener: ListenerConfig,

    /// Splash rendering backend.
    pub splash: SplashConfig,

    /// Storage backend for fetch results.
    pub storage: StorageConfig,

    /// Redis connection, used when `storage.kind` is `Redis`.
    pub redis: RedisConfig,

    /// Startup health check settings.
    pub health_check: HealthCheckConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Listen address (e.g., "127.0.0.1:8000").
    pub address: String,

    /// Request timeout for the service's HTTP surface in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8000".to_string(),
            request_timeout_secs: 60,
        }
    }
}

/// Splash rendering backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SplashConfig {
    /// Splash host address.
    pub host: String,

    /// Timeout for a render in seconds.
    pub timeout_secs: u64,

    /// Timeout for individual network requests made by Splash in seconds.
    pub resource_timeout_secs: u64,

    /// Time in seconds to wait for scripts to load.
    pub wait_secs: f64,
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1:8050".to_string(),
            timeout_secs: 20,
            resource_timeout_secs: 30,
            wait_secs: 0.5,
        }
    }
}

/// Storage backend kinds. Exactly one is active per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize, clap::ValueEnum)]
pub enum StorageKind {
    /// Local disk store rooted at `storage.diskv_base_dir`.
    #[default]
    #[value(name = "Diskv", alias = "diskv")]
    Diskv,
    /// Object storage bucket `storage.fetch_bucket`.
    #[value(name = "S3", alias = "s3")]
    S3,
    /// Redis cache service.
    #[value(name = "Redis", alias = "redis")]
    Redis,
}

impl StorageKind {
    /// Dependency that must answer a liveness probe before the service may
    /// start with this backend, if any.
    pub fn liveness_dependency(self, config: &FetchConfig) -> Option<DependencySpec> {
        match self {
            StorageKind::Redis => Some(config.redis.dependency()),
            StorageKind::Diskv | StorageKind::S3 => None,
        }
    }

    /// Whether this backend is gated on a live network service at startup.
    pub fn requires_liveness_probe(self) -> bool {
        matches!(self, StorageKind::Redis)
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Diskv => f.write_str("Diskv"),
            StorageKind::S3 => f.write_str("S3"),
            StorageKind::Redis => f.write_str("Redis"),
        }
    }
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Selected backend.
    pub kind: StorageKind,

    /// How long a stored fetch result lives, in seconds.
    pub expire_secs: u64,

    /// Base directory for the Diskv backend.
    pub diskv_base_dir: PathBuf,

    /// Bucket name for the S3 backend.
    pub fetch_bucket: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::Diskv,
            expire_secs: 3600,
            diskv_base_dir: PathBuf::from("diskv"),
            fetch_bucket: "fetch-bucket".to_string(),
        }
    }
}

/// Transport used to reach Redis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RedisNetwork {
    #[default]
    Tcp,
    Unix,
}

impl fmt::Display for RedisNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedisNetwork::Tcp => f.write_str("tcp"),
            RedisNetwork::Unix => f.write_str("unix"),
        }
    }
}

/// Redis connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Redis host address.
    pub host: String,

    /// Default key expiry in seconds.
    pub expire_secs: u64,

    /// Transport.
    pub network: RedisNetwork,

    /// Password, empty for none.
    pub password: String,

    /// Database index.
    pub db: i64,

    /// Unix socket path, used when `network` is `unix`.
    pub socket_path: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1:6379".to_string(),
            expire_secs: 3600,
            network: RedisNetwork::Tcp,
            password: String::new(),
            db: 0,
            socket_path: String::new(),
        }
    }
}

impl RedisConfig {
    /// Socket path for the `unix` transport: `socket_path` when set,
    /// otherwise `host` if it is itself a filesystem path. A `host:port`
    /// host is never a socket path.
    pub fn unix_socket_path(&self) -> Option<&str> {
        if !self.socket_path.trim().is_empty() {
            Some(&self.socket_path)
        } else if self.host.contains('/') {
            Some(&self.host)
        } else {
            None
        }
    }

    /// Address actually dialed for the configured transport.
    pub fn dial_address(&self) -> &str {
        match self.network {
            RedisNetwork::Unix => self.unix_socket_path().unwrap_or(&self.host),
            RedisNetwork::Tcp => &self.host,
        }
    }

    /// Liveness dependency for this Redis instance.
    pub fn dependency(&self) -> DependencySpec {
        DependencySpec::new(DependencyKind::Redis, self.dial_address()).with_redis(RedisParams {
            network: self.network,
            password: (!self.password.is_empty()).then(|| self.password.clone()),
            db: self.db,
        })
    }
}

/// Startup health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Upper bound for a single dependency probe in seconds.
    pub timeout_secs: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self { timeout_secs: 5 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
