//! Departure timestamp handling.
//!
//! The monitor API reports `timeReal` / `timePlanned` as local timestamps
//! carrying their own UTC offset, e.g. `2024-01-01T08:00:00.000+0100`.
//! Display only ever needs the wall-clock hour and minute in that offset,
//! so no timezone conversion happens here.

use std::fmt;

use chrono::{DateTime, FixedOffset};

/// Formats the provider has been seen to use, tried in order.
const PROVIDER_FORMATS: &[&str] = &[
    // 2024-01-01T08:00:00.000+0100 (fraction optional)
    "%Y-%m-%dT%H:%M:%S%.f%z",
    // 20240101T080000+0100
    "%Y%m%dT%H%M%S%z",
];

/// Error returned when a departure timestamp cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The input did not match any known provider timestamp shape.
    #[error("invalid departure timestamp: {0:?}")]
    InvalidTimestamp(String),
}

/// A departure instant as reported by the provider, offset preserved.
///
/// # Examples
///
/// ```
/// use departure_monitor::domain::DepartureTime;
///
/// let t = DepartureTime::parse("2024-01-01T08:05:00.000+0100").unwrap();
/// assert_eq!(t.to_hhmm(), "08:05");
///
/// let t = DepartureTime::parse("20240101T230000+0100").unwrap();
/// assert_eq!(t.to_hhmm(), "23:00");
///
/// assert!(DepartureTime::parse("08:05").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepartureTime(DateTime<FixedOffset>);

impl DepartureTime {
    /// Parse a provider timestamp.
    pub fn parse(s: &str) -> Result<Self, FormatError> {
        let s = s.trim();

        for format in PROVIDER_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, format) {
                return Ok(Self(dt));
            }
        }

        DateTime::parse_from_rfc3339(s)
            .map(Self)
            .map_err(|_| FormatError::InvalidTimestamp(s.to_string()))
    }

    /// Wall-clock "HH:MM" in the provider's own offset.
    pub fn to_hhmm(&self) -> String {
        self.0.format("%H:%M").to_string()
    }
}

impl fmt::Debug for DepartureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DepartureTime({})", self.0.to_rfc3339())
    }
}

impl fmt::Display for DepartureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hhmm())
    }
}

/// Format a raw provider timestamp as "HH:MM".
pub fn format_hhmm(raw: &str) -> Result<String, FormatError> {
    DepartureTime::parse(raw).map(|t| t.to_hhmm())
}
