//! HTTP surface of the fetch service.
//!
//! # Data Flow
//! ```text
//! startup gate passes
//!     → server.rs binds the listen address
//!     → liveness route answers until shutdown
//! ```

pub mod server;

pub use server::FetchServer;
