//! Monitor client error types.

/// Errors from fetching a stop's monitor.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (connection refused, DNS, reset, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not complete within the configured bound
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// API returned a non-success status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not valid JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Canned mock data could not be read from disk
    #[error("mock data error: {0}")]
    MockData(String),
}

impl FetchError {
    /// Whether this is a transport-level failure rather than a bad payload.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            FetchError::Http(_) | FetchError::Timeout { .. } | FetchError::Api { .. }
        )
    }
}
