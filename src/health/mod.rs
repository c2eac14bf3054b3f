//! Dependency health checking subsystem.
//!
//! # Data Flow
//! ```text
//! DependencySpec list (built by lifecycle::startup)
//!     → aggregator.rs (one task per spec, joined)
//!     → probe.rs registry picks the probe for the spec's kind
//!     → splash.rs / redis.rs perform the round trip
//!     → report.rs collects statuses in check order
//! ```
//!
//! # Design Decisions
//! - Probe errors are data, never propagated past the aggregator
//! - Every probe runs under a deadline
//! - The aggregator knows the `Probe` trait only, not concrete kinds

pub mod aggregator;
pub mod probe;
pub mod redis;
pub mod report;
pub mod splash;
pub mod types;

pub use aggregator::HealthAggregator;
pub use probe::{Probe, ProbeRegistry};
pub use report::ReadinessReport;
pub use types::{DependencyKind, DependencySpec, DependencyStatus, ProbeError, RedisParams, OK_DETAIL};
