//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Startup gate produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (dependency gauges, startup counters)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Operator-facing report lines go to stdout separately from logs
//! - Metrics are optional and off by default

pub mod logging;
pub mod metrics;
