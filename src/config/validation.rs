//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FetchConfig → Result<(), Vec<ValidationError>>
//! - Only storage sections relevant to the selected backend are checked

use std::net::SocketAddr;

use thiserror::Error;

use super::schema::{FetchConfig, RedisConfig, RedisNetwork, StorageKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} '{value}' is not a valid socket address")]
    BadSocketAddr { field: &'static str, value: String },

    #[error("splash.wait_secs must be a finite, non-negative number")]
    BadWait,

    #[error("redis.socket_path is required for the unix network; host '{host}' is not a socket path")]
    MissingSocketPath { host: String },
}

pub fn validate_config(config: &FetchConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    require_non_empty(&mut errors, "listener.address", &config.listener.address);
    require_positive(&mut errors, "listener.request_timeout_secs", config.listener.request_timeout_secs);

    require_non_empty(&mut errors, "splash.host", &config.splash.host);
    require_positive(&mut errors, "splash.timeout_secs", config.splash.timeout_secs);
    require_positive(&mut errors, "splash.resource_timeout_secs", config.splash.resource_timeout_secs);
    if !config.splash.wait_secs.is_finite() || config.splash.wait_secs < 0.0 {
        errors.push(ValidationError::BadWait);
    }

    match config.storage.kind {
        StorageKind::Diskv => {
            if config.storage.diskv_base_dir.as_os_str().is_empty() {
                errors.push(ValidationError::Empty { field: "storage.diskv_base_dir" });
            }
        }
        StorageKind::S3 => {
            require_non_empty(&mut errors, "storage.fetch_bucket", &config.storage.fetch_bucket);
        }
        StorageKind::Redis => {}
    }
    if config.storage.kind.requires_liveness_probe() {
        validate_redis(&mut errors, &config.redis);
    }

    require_positive(&mut errors, "health_check.timeout_secs", config.health_check.timeout_secs);

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::BadSocketAddr {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_redis(errors: &mut Vec<ValidationError>, redis: &RedisConfig) {
    match redis.network {
        RedisNetwork::Tcp => require_non_empty(errors, "redis.host", &redis.host),
        RedisNetwork::Unix => {
            if redis.unix_socket_path().is_none() {
                errors.push(ValidationError::MissingSocketPath {
                    host: redis.host.clone(),
                });
            }
        }
    }
}

fn require_non_empty(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::Empty { field });
    }
}

fn require_positive(errors: &mut Vec<ValidationError>, field: &'static str, value: u64) {
    if value == 0 {
        errors.push(ValidationError::Zero { field });
    }
}
