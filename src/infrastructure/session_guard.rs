//! Authentication interceptor layered around any transport.
//!
//! Every backend response is an envelope `{code, msg, data}`. A handful of
//! codes mean the session is missing or expired; on those the guard fires the
//! redirect side effect and the caller never sees the response.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::config::Settings;
use crate::infrastructure::error::TransportError;
use crate::infrastructure::traits::{HttpTransport, SessionRedirect};

pub struct SessionGuard {
    inner: Arc<dyn HttpTransport>,
    redirect: Arc<dyn SessionRedirect>,
    codes: Vec<i64>,
    login_path: String,
}

impl SessionGuard {
    pub fn new(
        inner: Arc<dyn HttpTransport>,
        redirect: Arc<dyn SessionRedirect>,
        codes: Vec<i64>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            inner,
            redirect,
            codes,
            login_path: login_path.into(),
        }
    }

    pub fn from_settings(
        inner: Arc<dyn HttpTransport>,
        redirect: Arc<dyn SessionRedirect>,
        settings: &Settings,
    ) -> Self {
        Self::new(
            inner,
            redirect,
            settings.unauthenticated_codes.clone(),
            settings.login_path.clone(),
        )
    }

    fn check(&self, path: &str, response: Value) -> Result<Value, TransportError> {
        let code = response.get("code").and_then(Value::as_i64);
        match code {
            Some(code) if self.codes.contains(&code) => {
                warn!("{} rejected session with code {}", path, code);
                self.redirect.redirect(&self.login_path);
                Err(TransportError::NotAuthenticated { code })
            }
            _ => Ok(response),
        }
    }
}

impl HttpTransport for SessionGuard {
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, TransportError> {
        let response = self.inner.get(path, query)?;
        self.check(path, response)
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        let response = self.inner.post(path, body)?;
        self.check(path, response)
    }
}
