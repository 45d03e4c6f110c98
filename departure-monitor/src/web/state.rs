//! Application state for the web layer.

use crate::poll::StopRegistry;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Published state of every registered stop
    pub registry: StopRegistry,
}

impl AppState {
    pub fn new(registry: StopRegistry) -> Self {
        Self { registry }
    }
}
