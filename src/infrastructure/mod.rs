//! Infrastructure layer: HTTP implementations and DI container
//!
//! This layer implements the backend boundary traits and wires up services.

pub mod di;
pub mod error;
pub mod http;
pub mod session_guard;
pub mod traits;

pub use error::{InfraError, InfraResult, TransportError};
