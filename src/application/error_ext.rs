//! Error conversion helpers for backend requests
//!
//! Provides extension traits for cleaner error handling with request context.

use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::TransportError;

/// Extension trait for converting transport results to `ApplicationResult` with context.
pub trait TransportResultExt<T> {
    /// Add request context to a transport error.
    ///
    /// # Example
    /// ```ignore
    /// api.get(DETAIL_PATH, &query)
    ///     .with_request_context("load campaign", DETAIL_PATH)?;
    /// ```
    fn with_request_context(self, action: &str, path: &str) -> ApplicationResult<T>;
}

impl<T> TransportResultExt<T> for Result<T, TransportError> {
    fn with_request_context(self, action: &str, path: &str) -> ApplicationResult<T> {
        self.map_err(|e| match e {
            TransportError::NotAuthenticated { code } => ApplicationError::NotAuthenticated { code },
            other => ApplicationError::OperationFailed {
                context: format!("{}: {}", action, path),
                source: Box::new(other),
            },
        })
    }
}
