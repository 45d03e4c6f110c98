//! Per-stop published state.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::board::DisplaySnapshot;
use crate::domain::StopId;

/// Where a stop's poll loop currently is.
///
/// `Published` and `Failed` are idle states that also record how the last
/// cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollPhase {
    /// Registered, no cycle run yet.
    Idle,
    /// Waiting on the provider.
    Fetching,
    /// Normalizing, ranking and formatting the response.
    Normalizing,
    /// Last cycle replaced the snapshot.
    Published,
    /// Last cycle failed; the previous snapshot is still shown.
    Failed,
}

/// Everything the read side sees about one stop.
#[derive(Debug, Clone, Serialize)]
pub struct StopState {
    pub stop: StopId,

    /// Display name, derived from the stop title and selection mode.
    pub name: String,

    /// Last successfully computed snapshot; `None` until the first success.
    pub snapshot: Option<DisplaySnapshot>,

    pub phase: PollPhase,

    /// When the snapshot was last replaced.
    pub last_updated: Option<DateTime<Utc>>,

    /// Error of the most recent failed cycle, cleared on success.
    pub last_error: Option<String>,
}

impl StopState {
    pub fn new(stop: StopId, name: impl Into<String>) -> Self {
        Self {
            stop,
            name: name.into(),
            snapshot: None,
            phase: PollPhase::Idle,
            last_updated: None,
            last_error: None,
        }
    }
}

/// Shared handle to one stop's state.
///
/// The poller is the only writer. Publishing replaces snapshot, phase and
/// timestamps under a single write lock, so readers never see a half
/// updated stop.
#[derive(Debug, Clone)]
pub struct StopHandle {
    inner: Arc<RwLock<StopState>>,
}

impl StopHandle {
    pub fn new(state: StopState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Copy of the current state.
    pub async fn state(&self) -> StopState {
        self.inner.read().await.clone()
    }

    /// Current snapshot, if any.
    pub async fn snapshot(&self) -> Option<DisplaySnapshot> {
        self.inner.read().await.snapshot.clone()
    }

    pub async fn stop(&self) -> StopId {
        self.inner.read().await.stop.clone()
    }

    pub(crate) async fn set_phase(&self, phase: PollPhase) {
        self.inner.write().await.phase = phase;
    }

    /// Replace the snapshot.
    pub(crate) async fn publish(&self, snapshot: DisplaySnapshot) {
        let mut guard = self.inner.write().await;
        guard.snapshot = Some(snapshot);
        guard.phase = PollPhase::Published;
        guard.last_updated = Some(Utc::now());
        guard.last_error = None;
    }

    /// Record a failed cycle, keeping the previous snapshot.
    pub(crate) async fn fail(&self, error: String) {
        let mut guard = self.inner.write().await;
        guard.phase = PollPhase::Failed;
        guard.last_error = Some(error);
    }
}

/// All registered stops, keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct StopRegistry {
    inner: Arc<RwLock<BTreeMap<StopId, StopHandle>>>,
}

impl StopRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stop's handle. A later registration for the same stop wins.
    pub async fn insert(&self, handle: StopHandle) {
        let stop = handle.stop().await;
        self.inner.write().await.insert(stop, handle);
    }

    pub async fn get(&self, stop: &StopId) -> Option<StopHandle> {
        self.inner.read().await.get(stop).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Current state of every stop, ordered by identifier.
    pub async fn states(&self) -> Vec<StopState> {
        let handles: Vec<StopHandle> = self.inner.read().await.values().cloned().collect();
        join_all(handles.iter().map(|h| h.state())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::AttributeValue;

    fn stop(s: &str) -> StopId {
        StopId::parse(s).unwrap()
    }

    fn snapshot(state: &str) -> DisplaySnapshot {
        let mut attributes = BTreeMap::new();
        attributes.insert("countdown".to_string(), AttributeValue::Minutes(3));
        DisplaySnapshot {
            state: state.to_string(),
            attributes,
        }
    }

    #[tokio::test]
    async fn starts_idle_without_snapshot() {
        let handle = StopHandle::new(StopState::new(stop("4609"), "Karlsplatz"));
        let state = handle.state().await;

        assert_eq!(state.phase, PollPhase::Idle);
        assert!(state.snapshot.is_none());
        assert!(state.last_updated.is_none());
    }

    #[tokio::test]
    async fn publish_replaces_snapshot_and_clears_error() {
        let handle = StopHandle::new(StopState::new(stop("4609"), "Karlsplatz"));

        handle.fail("boom".into()).await;
        handle.publish(snapshot("08:00")).await;

        let state = handle.state().await;
        assert_eq!(state.phase, PollPhase::Published);
        assert_eq!(state.snapshot.unwrap().state, "08:00");
        assert!(state.last_error.is_none());
        assert!(state.last_updated.is_some());
    }

    #[tokio::test]
    async fn fail_keeps_snapshot() {
        let handle = StopHandle::new(StopState::new(stop("4609"), "Karlsplatz"));

        handle.publish(snapshot("08:00")).await;
        handle.fail("timeout".into()).await;

        let state = handle.state().await;
        assert_eq!(state.phase, PollPhase::Failed);
        assert_eq!(state.snapshot.unwrap().state, "08:00");
        assert_eq!(state.last_error.as_deref(), Some("timeout"));
    }

    #[tokio::test]
    async fn registry_orders_by_stop() {
        let registry = StopRegistry::new();
        registry
            .insert(StopHandle::new(StopState::new(stop("200"), "B")))
            .await;
        registry
            .insert(StopHandle::new(StopState::new(stop("100"), "A")))
            .await;

        assert_eq!(registry.len().await, 2);
        let names: Vec<_> = registry.states().await.into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["A", "B"]);

        assert!(registry.get(&stop("100")).await.is_some());
        assert!(registry.get(&stop("300")).await.is_none());
    }
}
