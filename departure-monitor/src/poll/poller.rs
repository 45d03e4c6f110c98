//! Per-stop poll loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

use crate::board::{BoardConfig, BoardError, DisplaySnapshot, build_snapshot};
use crate::domain::StopQuery;
use crate::wienerlinien::{FetchError, MonitorSource};

use super::state::{PollPhase, StopHandle};

/// Why a poll cycle did not publish.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    /// The provider could not be reached or returned garbage
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The response could not be turned into a snapshot
    #[error(transparent)]
    Board(#[from] BoardError),
}

impl CycleError {
    /// Short classification for logs and the read side.
    pub fn kind(&self) -> &'static str {
        match self {
            CycleError::Fetch(e) if e.is_network() => "network",
            CycleError::Fetch(_) => "malformed_response",
            CycleError::Board(BoardError::Conversion(_)) => "malformed_response",
            CycleError::Board(BoardError::Rank(_)) => "insufficient_data",
            CycleError::Board(BoardError::Format(_)) => "format",
        }
    }
}

/// Polls one stop on a fixed interval and publishes into its handle.
pub struct StopPoller {
    query: StopQuery,
    source: Arc<dyn MonitorSource>,
    board: BoardConfig,
    handle: StopHandle,
    interval: Duration,
}

impl StopPoller {
    pub fn new(
        query: StopQuery,
        source: Arc<dyn MonitorSource>,
        board: BoardConfig,
        handle: StopHandle,
        interval: Duration,
    ) -> Self {
        Self {
            query,
            source,
            board,
            handle,
            interval,
        }
    }

    /// Handle this poller publishes into.
    pub fn handle(&self) -> &StopHandle {
        &self.handle
    }

    /// Run one fetch-normalize-rank-present cycle.
    ///
    /// On success the snapshot is replaced. On failure the previous snapshot
    /// stays and the error is recorded on the handle and returned.
    #[instrument(skip(self), fields(stop = %self.query.stop))]
    pub async fn run_cycle(&self) -> Result<(), CycleError> {
        match self.compute().await {
            Ok(snapshot) => {
                debug!(state = %snapshot.state, "publishing snapshot");
                self.handle.publish(snapshot).await;
                Ok(())
            }
            Err(e) => {
                self.handle.fail(e.to_string()).await;
                Err(e)
            }
        }
    }

    async fn compute(&self) -> Result<DisplaySnapshot, CycleError> {
        self.handle.set_phase(PollPhase::Fetching).await;
        let body = self.source.fetch_monitor(&self.query).await?;

        self.handle.set_phase(PollPhase::Normalizing).await;
        Ok(build_snapshot(&body, &self.board)?)
    }

    /// Poll until shutdown is signalled.
    ///
    /// The first cycle runs immediately. Cycles for this stop run one at a
    /// time; ticks that come due while a cycle is still running are skipped.
    /// A cycle in flight at shutdown is dropped without publishing.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(stop = %self.query.stop, interval_secs = self.interval.as_secs(), "polling stop");

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.changed() => break,
            }

            tokio::select! {
                result = self.run_cycle() => {
                    if let Err(e) = result {
                        warn!(
                            stop = %self.query.stop,
                            kind = e.kind(),
                            error = %e,
                            "poll cycle failed, keeping previous state"
                        );
                    }
                }
                _ = shutdown.changed() => {
                    debug!(stop = %self.query.stop, "abandoning in-flight cycle");
                    break;
                }
            }
        }

        info!(stop = %self.query.stop, "poller stopped");
    }
}
