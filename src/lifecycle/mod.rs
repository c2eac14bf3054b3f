//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Resolved config → Required dependencies → Probe all → Report → Start or abort
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Broadcast → Server drains → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - The gate runs before any listener is bound
//! - A failed gate never binds the listen address

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{required_dependencies, Decision, StartupError, StartupGate};
