//! Command-line flags and their environment bindings.
//!
//! Every flag can also be set through the environment variable of the same
//! name. Flags left unset keep the value from the config file or defaults.

use std::path::PathBuf;

use clap::Parser;

use super::schema::{FetchConfig, RedisNetwork, StorageKind};

#[derive(Debug, Default, Parser)]
#[command(name = "fetch-gate")]
#[command(about = "Fetch service: checks its dependencies, then serves", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, env = "FETCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// HTTP listen address
    #[arg(short = 'a', long = "DFK_FETCH", env = "DFK_FETCH")]
    pub listen_address: Option<String>,

    /// Splash host address
    #[arg(short = 's', long = "SPLASH", env = "SPLASH")]
    pub splash_host: Option<String>,

    /// Timeout in seconds for a render
    #[arg(long = "SPLASH_TIMEOUT", env = "SPLASH_TIMEOUT")]
    pub splash_timeout: Option<u64>,

    /// Timeout in seconds for individual network requests
    #[arg(long = "SPLASH_RESOURCE_TIMEOUT", env = "SPLASH_RESOURCE_TIMEOUT")]
    pub splash_resource_timeout: Option<u64>,

    /// Seconds to wait until scripts are loaded
    #[arg(long = "SPLASH_WAIT", env = "SPLASH_WAIT")]
    pub splash_wait: Option<f64>,

    /// Storage backend for fetch results
    #[arg(long = "STORAGE_TYPE", env = "STORAGE_TYPE", value_enum)]
    pub storage_type: Option<StorageKind>,

    /// Default storage expiry in seconds
    #[arg(long = "STORAGE_EXPIRE", env = "STORAGE_EXPIRE")]
    pub storage_expire: Option<u64>,

    /// Diskv base directory for fetch results
    #[arg(long = "DISKV_BASE_DIR", env = "DISKV_BASE_DIR")]
    pub diskv_base_dir: Option<PathBuf>,

    /// S3 bucket name for fetch results
    #[arg(long = "FETCH_BUCKET", env = "FETCH_BUCKET")]
    pub fetch_bucket: Option<String>,

    /// Redis host address
    #[arg(short = 'r', long = "REDIS", env = "REDIS")]
    pub redis_host: Option<String>,

    /// Default Redis expiry in seconds
    #[arg(long = "REDIS_EXPIRE", env = "REDIS_EXPIRE")]
    pub redis_expire: Option<u64>,

    /// Redis network
    #[arg(long = "REDIS_NETWORK", env = "REDIS_NETWORK", value_enum)]
    pub redis_network: Option<RedisNetwork>,

    /// Redis password
    #[arg(long = "REDIS_PASSWORD", env = "REDIS_PASSWORD", hide_env_values = true)]
    pub redis_password: Option<String>,

    /// Redis database index
    #[arg(long = "REDIS_DB", env = "REDIS_DB")]
    pub redis_db: Option<i64>,

    /// Redis Unix socket path
    #[arg(long = "REDIS_SOCKET_PATH", env = "REDIS_SOCKET_PATH")]
    pub redis_socket_path: Option<String>,

    /// Per-dependency startup probe timeout in seconds
    #[arg(long = "HEALTH_CHECK_TIMEOUT", env = "HEALTH_CHECK_TIMEOUT")]
    pub health_check_timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long = "LOG_LEVEL", env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Expose Prometheus metrics
    #[arg(long = "METRICS_ENABLED", env = "METRICS_ENABLED")]
    pub metrics_enabled: Option<bool>,

    /// Metrics endpoint bind address
    #[arg(long = "METRICS_ADDRESS", env = "METRICS_ADDRESS")]
    pub metrics_address: Option<String>,
}

impl Cli {
    /// Overlay every flag that was given onto `config`.
    pub fn apply(self, config: &mut FetchConfig) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut config.listener.address, self.listen_address);

        set(&mut config.splash.host, self.splash_host);
        set(&mut config.splash.timeout_secs, self.splash_timeout);
        set(&mut config.splash.resource_timeout_secs, self.splash_resource_timeout);
        set(&mut config.splash.wait_secs, self.splash_wait);

        set(&mut config.storage.kind, self.storage_type);
        set(&mut config.storage.expire_secs, self.storage_expire);
        set(&mut config.storage.diskv_base_dir, self.diskv_base_dir);
        set(&mut config.storage.fetch_bucket, self.fetch_bucket);

        set(&mut config.redis.host, self.redis_host);
        set(&mut config.redis.expire_secs, self.redis_expire);
        set(&mut config.redis.network, self.redis_network);
        set(&mut config.redis.password, self.redis_password);
        set(&mut config.redis.db, self.redis_db);
        set(&mut config.redis.socket_path, self.redis_socket_path);

        set(&mut config.health_check.timeout_secs, self.health_check_timeout);

        set(&mut config.observability.log_level, self.log_level);
        set(&mut config.observability.metrics_enabled, self.metrics_enabled);
        set(&mut config.observability.metrics_address, self.metrics_address);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "fetch-gate",
            "-a",
            "0.0.0.0:9000",
            "--STORAGE_TYPE",
            "Redis",
            "-r",
            "cache:6380",
            "--REDIS_NETWORK",
            "unix",
            "--REDIS_DB",
            "4",
        ])
        .unwrap();

        let mut config = FetchConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.listener.address, "0.0.0.0:9000");
        assert_eq!(config.storage.kind, StorageKind::Redis);
        assert_eq!(config.redis.host, "cache:6380");
        assert_eq!(config.redis.network, RedisNetwork::Unix);
        assert_eq!(config.redis.db, 4);
        assert_eq!(config.splash.host, "127.0.0.1:8050");
    }

    #[test]
    fn test_storage_type_accepts_lowercase() {
        let cli = Cli::try_parse_from(["fetch-gate", "--STORAGE_TYPE", "s3"]).unwrap();
        assert_eq!(cli.storage_type, Some(StorageKind::S3));
    }

    #[test]
    fn test_unknown_storage_type_rejected() {
        assert!(Cli::try_parse_from(["fetch-gate", "--STORAGE_TYPE", "Cassandra"]).is_err());
    }

    #[test]
    fn test_no_flags_changes_nothing() {
        let mut config = FetchConfig::default();
        Cli::default().apply(&mut config);
        assert_eq!(config.listener.address, FetchConfig::default().listener.address);
        assert_eq!(config.storage.kind, StorageKind::Diskv);
    }
}
