//! Fetch service launcher library.
//!
//! Resolves configuration, verifies that the Splash render backend (and the
//! Redis cache when it is the storage backend) answer, and only then starts
//! the fetch service.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::FetchConfig;
pub use health::{HealthAggregator, ProbeRegistry, ReadinessReport};
pub use http::FetchServer;
pub use lifecycle::{Shutdown, StartupError, StartupGate};
