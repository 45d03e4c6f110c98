//! Background polling of configured stops.
//!
//! Each stop gets its own task: register (retrying until the stop's title
//! is known), then poll on a fixed interval. Stops are independent; one
//! stop failing never blocks another.

mod poller;
mod setup;
mod state;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::board::BoardConfig;
use crate::domain::StopQuery;
use crate::wienerlinien::MonitorSource;

pub use poller::{CycleError, StopPoller};
pub use setup::{RegisteredStop, SetupError, register_stop, register_with_retry};
pub use state::{PollPhase, StopHandle, StopRegistry, StopState};

/// Timing for stop tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTiming {
    /// Time between poll cycles.
    pub interval: Duration,
    /// Time between setup attempts for a stop that is not ready.
    pub setup_retry: Duration,
}

/// Spawn the task that registers and then polls one stop.
///
/// The stop appears in `registry` once registration succeeds.
pub fn spawn_stop(
    query: StopQuery,
    source: Arc<dyn MonitorSource>,
    board: BoardConfig,
    timing: PollTiming,
    registry: StopRegistry,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let Some(registered) =
            register_with_retry(source.as_ref(), query, timing.setup_retry, &mut shutdown).await
        else {
            return;
        };

        let name = board.selection.display_name(&registered.title);
        let handle = StopHandle::new(StopState::new(registered.query.stop.clone(), name));
        registry.insert(handle.clone()).await;

        StopPoller::new(registered.query, source, board, handle, timing.interval)
            .run(shutdown)
            .await;
    })
}
