//! Which ranked departure(s) a stop exposes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Selection of departures from the ranked list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Only the soonest departure.
    First,
    /// Only the departure after the soonest one.
    Next,
    /// The soonest departure, with the one after it as `next_*` attributes.
    #[default]
    FirstAndNext,
}

impl SelectionMode {
    /// Ranked index of the departure exposed as the state value.
    pub fn primary_index(&self) -> usize {
        match self {
            SelectionMode::First | SelectionMode::FirstAndNext => 0,
            SelectionMode::Next => 1,
        }
    }

    /// Ranked index of the departure exposed as `next_*` attributes.
    pub fn secondary_index(&self) -> Option<usize> {
        match self {
            SelectionMode::FirstAndNext => Some(1),
            SelectionMode::First | SelectionMode::Next => None,
        }
    }

    /// Minimum number of ranked departures needed to make a selection.
    pub fn required_len(&self) -> usize {
        self.secondary_index()
            .unwrap_or(0)
            .max(self.primary_index())
            + 1
    }

    /// Display name for a stop under this mode.
    pub fn display_name(&self, title: &str) -> String {
        match self {
            SelectionMode::FirstAndNext => title.to_string(),
            SelectionMode::First => format!("{} first departure", title),
            SelectionMode::Next => format!("{} next departure", title),
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SelectionMode::First => "first",
            SelectionMode::Next => "next",
            SelectionMode::FirstAndNext => "first_and_next",
        })
    }
}
