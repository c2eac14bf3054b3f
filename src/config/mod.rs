//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → flags / environment (cli.rs)
//!     → validation.rs (semantic checks)
//!     → FetchConfig (validated, immutable)
//!     → passed by reference into the startup gate
//! ```
//!
//! # Design Decisions
//! - Config is resolved once per process and never mutated afterwards
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde/clap) from semantic checks

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;

pub use cli::Cli;
pub use loader::{resolve, ConfigError};
pub use schema::{FetchConfig, RedisNetwork, StorageKind};
