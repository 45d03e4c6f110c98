//! Departure ranking across lines.
//!
//! Countdown is whole minutes, so ties are common. Ties keep converter
//! order (line order, then departure position), which `sort_by_key`
//! guarantees as a stable sort.

use crate::domain::DepartureRecord;

use super::selection::SelectionMode;

/// Error from selecting ranked departures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankError {
    /// Not enough departures for the configured selection
    #[error("insufficient departures: need {required}, have {available}")]
    InsufficientDepartures { required: usize, available: usize },
}

/// The departure(s) chosen for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedSelection {
    /// Departure exposed as the state value.
    pub primary: DepartureRecord,

    /// Departure exposed as `next_*` attributes, in pair mode.
    pub secondary: Option<DepartureRecord>,
}

/// Sort departures soonest-first by countdown.
pub fn rank_departures(mut departures: Vec<DepartureRecord>) -> Vec<DepartureRecord> {
    departures.sort_by_key(|d| d.countdown);
    departures
}

/// Pick the departure(s) the selection mode asks for from a ranked list.
pub fn select(
    ranked: &[DepartureRecord],
    mode: SelectionMode,
) -> Result<RankedSelection, RankError> {
    let required = mode.required_len();
    if ranked.len() < required {
        return Err(RankError::InsufficientDepartures {
            required,
            available: ranked.len(),
        });
    }

    Ok(RankedSelection {
        primary: ranked[mode.primary_index()].clone(),
        secondary: mode.secondary_index().map(|i| ranked[i].clone()),
    })
}
