//! Stop registration.
//!
//! A stop is only polled once its title is known. The title comes from a
//! first fetch; until that succeeds the stop is not ready and setup is
//! retried later.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::domain::{StopId, StopQuery};
use crate::wienerlinien::{ConversionError, FetchError, MonitorSource, stop_title};

/// A stop whose title has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredStop {
    pub query: StopQuery,
    pub title: String,
}

/// Why a stop is not ready yet.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("stop {stop} not ready: {source}")]
    Fetch {
        stop: StopId,
        #[source]
        source: FetchError,
    },

    #[error("stop {stop} not ready: {source}")]
    MissingTitle {
        stop: StopId,
        #[source]
        source: ConversionError,
    },
}

/// Fetch once and resolve the stop's title.
pub async fn register_stop(
    source: &dyn MonitorSource,
    query: StopQuery,
) -> Result<RegisteredStop, SetupError> {
    let body = source
        .fetch_monitor(&query)
        .await
        .map_err(|source| SetupError::Fetch {
            stop: query.stop.clone(),
            source,
        })?;

    let title = stop_title(&body).map_err(|source| SetupError::MissingTitle {
        stop: query.stop.clone(),
        source,
    })?;

    info!(stop = %query.stop, title = %title, "stop registered");
    Ok(RegisteredStop { query, title })
}

/// Keep trying to register until it works or shutdown is signalled.
///
/// Returns `None` on shutdown.
pub async fn register_with_retry(
    source: &dyn MonitorSource,
    query: StopQuery,
    retry: Duration,
    shutdown: &mut watch::Receiver<bool>,
) -> Option<RegisteredStop> {
    loop {
        if *shutdown.borrow() {
            return None;
        }

        tokio::select! {
            result = register_stop(source, query.clone()) => match result {
                Ok(registered) => return Some(registered),
                Err(e) => {
                    warn!(error = %e, retry_secs = retry.as_secs(), "stop setup failed, retrying");
                }
            },
            _ = shutdown.changed() => return None,
        }

        tokio::select! {
            _ = tokio::time::sleep(retry) => {}
            _ = shutdown.changed() => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wienerlinien::{MockMonitorSource, MockReply};
    use serde_json::json;

    fn stop() -> StopId {
        StopId::parse("4609").unwrap()
    }

    fn titled_body() -> serde_json::Value {
        json!({
            "data": { "monitors": [{
                "locationStop": { "properties": { "title": "Karlsplatz" } },
                "lines": []
            }] }
        })
    }

    #[tokio::test]
    async fn resolves_title() {
        let mock = MockMonitorSource::new();
        mock.set_body(stop(), titled_body()).await;

        let registered = register_stop(&mock, StopQuery::new(stop())).await.unwrap();
        assert_eq!(registered.title, "Karlsplatz");
        assert_eq!(registered.query.stop, stop());
    }

    #[tokio::test]
    async fn fetch_failure_is_not_ready() {
        let mock = MockMonitorSource::new();
        mock.set_reply(stop(), MockReply::Timeout).await;

        let err = register_stop(&mock, StopQuery::new(stop()))
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::Fetch { .. }));
        assert!(err.to_string().starts_with("stop 4609 not ready"));
    }

    #[tokio::test]
    async fn empty_response_is_not_ready() {
        let mock = MockMonitorSource::new();
        mock.set_body(stop(), json!({ "data": { "monitors": [] } }))
            .await;

        let err = register_stop(&mock, StopQuery::new(stop()))
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::MissingTitle { .. }));
    }

    #[tokio::test]
    async fn retries_until_ready() {
        let mock = MockMonitorSource::new();
        mock.set_reply(stop(), MockReply::Status(503)).await;

        let (_tx, mut rx) = watch::channel(false);
        let source = mock.clone();
        let task = tokio::spawn(async move {
            register_with_retry(
                &source,
                StopQuery::new(stop()),
                Duration::from_millis(10),
                &mut rx,
            )
            .await
        });

        while mock.call_count() < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        mock.set_body(stop(), titled_body()).await;

        let registered = task.await.unwrap().unwrap();
        assert_eq!(registered.title, "Karlsplatz");
    }

    /// A provider that never answers.
    struct StalledSource;

    #[async_trait::async_trait]
    impl MonitorSource for StalledSource {
        async fn fetch_monitor(&self, _query: &StopQuery) -> Result<serde_json::Value, FetchError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn shutdown_abandons_in_flight_fetch() {
        let (tx, mut rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            register_with_retry(
                &StalledSource,
                StopQuery::new(stop()),
                Duration::from_secs(3600),
                &mut rx,
            )
            .await
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(true).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("registration did not stop at shutdown")
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn stalled_stop_task_exits_at_shutdown() {
        let registry = crate::poll::StopRegistry::new();
        let (tx, rx) = watch::channel(false);
        let task = crate::poll::spawn_stop(
            StopQuery::new(stop()),
            std::sync::Arc::new(StalledSource),
            crate::board::BoardConfig::default(),
            crate::poll::PollTiming {
                interval: Duration::from_secs(30),
                setup_retry: Duration::from_secs(60),
            },
            registry.clone(),
            rx,
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("stop task did not exit at shutdown")
            .unwrap();
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn shutdown_stops_retrying() {
        let mock = MockMonitorSource::new();
        let (tx, mut rx) = watch::channel(false);

        let source = mock.clone();
        let task = tokio::spawn(async move {
            register_with_retry(
                &source,
                StopQuery::new(stop()),
                Duration::from_secs(3600),
                &mut rx,
            )
            .await
        });

        while mock.call_count() < 1 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        tx.send(true).unwrap();

        assert!(task.await.unwrap().is_none());
    }
}
