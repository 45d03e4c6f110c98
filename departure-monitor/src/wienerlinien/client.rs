//! Wiener Linien realtime monitor HTTP client.
//!
//! One GET per stop per poll cycle, bounded by the client timeout. The body
//! is handed back as an untyped JSON value; decoding happens in the
//! converter so that a broken entry does not poison the whole response.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::StopQuery;

use super::error::FetchError;

/// Default base URL for the open-data realtime API.
pub const DEFAULT_BASE_URL: &str = "https://www.wienerlinien.at/ogd_realtime";

/// Default upper bound on a single request, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Source of raw monitor responses.
///
/// This abstraction lets the poll loop run against mock data in tests.
#[async_trait]
pub trait MonitorSource: Send + Sync {
    /// Fetch the raw monitor JSON for one stop.
    async fn fetch_monitor(&self, query: &StopQuery) -> Result<Value, FetchError>;
}

/// Configuration for the monitor client.
#[derive(Debug, Clone)]
pub struct MonitorClientConfig {
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl MonitorClientConfig {
    /// Create a config pointing at the production API.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for MonitorClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Realtime monitor API client.
#[derive(Debug, Clone)]
pub struct MonitorClient {
    http: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl MonitorClient {
    /// Create a new client with the given configuration.
    pub fn new(config: MonitorClientConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Monitor endpoint URL.
    fn monitor_url(&self) -> String {
        format!("{}/monitor", self.base_url)
    }

    fn map_send_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            FetchError::Http(err)
        }
    }
}

#[async_trait]
impl MonitorSource for MonitorClient {
    #[instrument(skip(self, query), fields(stop = %query.stop))]
    async fn fetch_monitor(&self, query: &StopQuery) -> Result<Value, FetchError> {
        let mut params: Vec<(&str, &str)> = vec![("rbl", query.stop.as_str())];
        if let Some(key) = query.api_key.as_deref() {
            params.push(("sender", key));
        }

        let response = self
            .http
            .get(self.monitor_url())
            .query(&params)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        debug!(bytes = body.len(), "monitor response received");

        serde_json::from_str(&body).map_err(|e| FetchError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}
