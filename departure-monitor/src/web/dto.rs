//! Data transfer objects for web responses.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::board::AttributeValue;
use crate::poll::{PollPhase, StopState};

/// One stop as seen by a display.
#[derive(Debug, Serialize)]
pub struct StopView {
    pub stop_id: String,

    /// Display name (stop title, qualified by selection mode)
    pub name: String,

    /// "HH:MM" of the primary departure, null before the first success
    pub state: Option<String>,

    pub attributes: BTreeMap<String, AttributeValue>,

    pub phase: PollPhase,

    pub last_updated: Option<DateTime<Utc>>,

    /// Error from the most recent cycle, if it failed
    pub last_error: Option<String>,
}

impl From<StopState> for StopView {
    fn from(state: StopState) -> Self {
        let (value, attributes) = match state.snapshot {
            Some(snapshot) => (Some(snapshot.state), snapshot.attributes),
            None => (None, BTreeMap::new()),
        };

        Self {
            stop_id: state.stop.to_string(),
            name: state.name,
            state: value,
            attributes,
            phase: state.phase,
            last_updated: state.last_updated,
            last_error: state.last_error,
        }
    }
}

/// All registered stops.
#[derive(Debug, Serialize)]
pub struct StopsResponse {
    pub stops: Vec<StopView>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
