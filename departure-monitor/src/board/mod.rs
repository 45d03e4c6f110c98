//! Departure board: ranking and presentation.
//!
//! Turns one stop's raw monitor response into the snapshot it publishes:
//! normalize, rank across lines by countdown, select per the configured
//! mode, then format for display. The whole chain is a pure function of
//! the response and the configuration.

mod config;
mod present;
mod rank;
mod selection;

use serde_json::Value;

use crate::domain::FormatError;
use crate::wienerlinien::{ConversionError, normalize_monitor};

pub use config::BoardConfig;
pub use present::{AttributeValue, DisplaySnapshot, present};
pub use rank::{RankError, RankedSelection, rank_departures, select};
pub use selection::SelectionMode;

/// Why a response could not be turned into a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The response shape was unusable
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Too few departures for the selection
    #[error(transparent)]
    Rank(#[from] RankError),

    /// A selected timestamp could not be formatted
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Compute the display snapshot for a raw monitor response.
pub fn build_snapshot(body: &Value, config: &BoardConfig) -> Result<DisplaySnapshot, BoardError> {
    let records = normalize_monitor(body, &config.normalize_options())?;
    let ranked = rank_departures(records);
    let selection = select(&ranked, config.selection)?;
    Ok(present(&selection)?)
}
