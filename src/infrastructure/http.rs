//! Blocking reqwest implementation of [`HttpTransport`].

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::COOKIE;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::Settings;
use crate::infrastructure::error::{InfraError, InfraResult, TransportError};
use crate::infrastructure::traits::HttpTransport;

/// Talks to the admin backend over HTTP.
#[derive(Debug)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    cookie: Option<String>,
}

impl ReqwestTransport {
    pub fn new(
        base_url: impl Into<String>,
        cookie: Option<String>,
        timeout: Duration,
    ) -> InfraResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request {
                url: "<client>".into(),
                source: e,
            })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            cookie,
        })
    }

    pub fn from_settings(settings: &Settings) -> InfraResult<Self> {
        let cookie = settings
            .session_cookie_value()
            .map_err(InfraError::Application)?;
        Self::new(
            settings.base_url.clone(),
            cookie,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn send(&self, request: RequestBuilder, url: &str) -> Result<Value, TransportError> {
        let request = match &self.cookie {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        };
        let request_err = |source: reqwest::Error| TransportError::Request {
            url: url.to_string(),
            source,
        };

        let response = request.send().map_err(request_err)?;
        let status = response.status();
        debug!("{} -> {}", url, status);
        let response = response.error_for_status().map_err(request_err)?;
        response.json::<Value>().map_err(request_err)
    }
}

impl HttpTransport for ReqwestTransport {
    #[instrument(level = "debug", skip(self))]
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, TransportError> {
        let url = self.url(path);
        self.send(self.client.get(&url).query(query), &url)
    }

    #[instrument(level = "debug", skip(self, body))]
    fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        let url = self.url(path);
        self.send(self.client.post(&url).json(body), &url)
    }
}
