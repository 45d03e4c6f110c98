//! Mock monitor source for testing without API access.
//!
//! Serves canned monitor responses per stop, either set up in code or
//! loaded from `{stop}.json` files in a directory.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::domain::{StopId, StopQuery};

use super::client::MonitorSource;
use super::error::FetchError;

/// What the mock answers for a stop.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A successful response with this body.
    Body(Value),
    /// The request times out.
    Timeout,
    /// The API answers with this status code.
    Status(u16),
}

impl MockReply {
    fn to_result(&self) -> Result<Value, FetchError> {
        match self {
            MockReply::Body(v) => Ok(v.clone()),
            MockReply::Timeout => Err(FetchError::Timeout { timeout_secs: 10 }),
            MockReply::Status(status) => Err(FetchError::Api {
                status: *status,
                message: "mock failure".to_string(),
            }),
        }
    }
}

/// Mock monitor source that serves data from memory.
#[derive(Debug, Clone, Default)]
pub struct MockMonitorSource {
    replies: Arc<RwLock<HashMap<StopId, MockReply>>>,
    calls: Arc<AtomicUsize>,
}

impl MockMonitorSource {
    /// Create an empty mock. Unknown stops answer 404.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `{stop}.json` files from a directory.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, FetchError> {
        let data_dir = data_dir.as_ref();
        let mut replies = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| {
            FetchError::MockData(format!("failed to read mock data directory: {}", e))
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                FetchError::MockData(format!("failed to read directory entry: {}", e))
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let Some(stop) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| StopId::parse(s).ok())
            else {
                continue;
            };

            let json = std::fs::read_to_string(&path)
                .map_err(|e| FetchError::MockData(format!("failed to read {:?}: {}", path, e)))?;

            let body: Value = serde_json::from_str(&json).map_err(|e| FetchError::Json {
                message: format!("failed to parse {:?}: {}", path, e),
                body: None,
            })?;

            replies.insert(stop, MockReply::Body(body));
        }

        if replies.is_empty() {
            return Err(FetchError::MockData(format!(
                "no mock monitor files found in {:?}",
                data_dir
            )));
        }

        Ok(Self {
            replies: Arc::new(RwLock::new(replies)),
            calls: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Set the reply for a stop, replacing any previous one.
    pub async fn set_reply(&self, stop: StopId, reply: MockReply) {
        self.replies.write().await.insert(stop, reply);
    }

    /// Shorthand for a successful body.
    pub async fn set_body(&self, stop: StopId, body: Value) {
        self.set_reply(stop, MockReply::Body(body)).await;
    }

    /// Number of fetches served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Stops with a configured reply.
    pub async fn available_stops(&self) -> Vec<StopId> {
        self.replies.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl MonitorSource for MockMonitorSource {
    async fn fetch_monitor(&self, query: &StopQuery) -> Result<Value, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let replies = self.replies.read().await;
        match replies.get(&query.stop) {
            Some(reply) => reply.to_result(),
            None => Err(FetchError::Api {
                status: 404,
                message: format!("no mock data for stop {}", query.stop),
            }),
        }
    }
}
