//! I/O boundary traits for testability
//!
//! These traits abstract the backend API, allowing services
//! to be tested with mock implementations.

use serde_json::Value;
use tracing::warn;

use crate::infrastructure::error::TransportError;

/// JSON-over-HTTP access to the admin backend.
pub trait HttpTransport: Send + Sync {
    /// GET `path` with query parameters, returning the decoded JSON body.
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, TransportError>;

    /// POST a JSON body to `path`, returning the decoded JSON body.
    fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError>;
}

/// Side effect performed when the backend reports an expired or missing session.
pub trait SessionRedirect: Send + Sync {
    fn redirect(&self, target: &str);
}

/// Redirect that only records the event in the log.
#[derive(Debug, Default)]
pub struct LoggingRedirect;

impl SessionRedirect for LoggingRedirect {
    fn redirect(&self, target: &str) {
        warn!("session rejected by backend, login required at {}", target);
    }
}
