//! Normalized departure records.

use std::fmt;

use serde::Serialize;

/// Glyph appended to line names served by an accessible vehicle.
pub const ACCESSIBLE_GLYPH: &str = " \u{267F}";

/// Glyph appended to line names served by an old high-floor vehicle.
pub const LEGACY_VEHICLE_GLYPH: &str = " \u{1F68B}";

/// Step-free access of the vehicle serving a departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    /// Low-floor / barrier-free vehicle.
    Accessible,
    /// Old vehicle without step-free access.
    LegacyVehicle,
    /// Provider gave no flag at either vehicle or line level.
    Unknown,
}

impl Accessibility {
    /// Resolve the marker from the vehicle flag, falling back to the line flag.
    pub fn resolve(vehicle: Option<bool>, line: Option<bool>) -> Self {
        match vehicle.or(line) {
            Some(true) => Accessibility::Accessible,
            Some(false) => Accessibility::LegacyVehicle,
            None => Accessibility::Unknown,
        }
    }

    /// Suffix to append to a line name, if any.
    pub fn glyph(&self) -> Option<&'static str> {
        match self {
            Accessibility::Accessible => Some(ACCESSIBLE_GLYPH),
            Accessibility::LegacyVehicle => Some(LEGACY_VEHICLE_GLYPH),
            Accessibility::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Accessibility::Accessible => "accessible",
            Accessibility::LegacyVehicle => "legacy_vehicle",
            Accessibility::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Accessibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One upcoming departure, flattened out of the provider's monitor structure.
///
/// Only departures with a resolvable time become records, so `time` is
/// always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartureRecord {
    /// Line name, possibly suffixed with an accessibility glyph.
    pub line_name: String,

    /// Departure timestamp as reported (real-time if known, else planned).
    pub time: String,

    /// Minutes until departure. Primary ranking key.
    pub countdown: i64,

    /// Destination ("towards").
    pub destination: String,

    pub platform: String,

    pub direction: String,

    pub accessibility: Accessibility,
}
