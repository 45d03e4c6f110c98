//! Stop identifier types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid stop identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop identifier: {reason}")]
pub struct InvalidStopId {
    reason: &'static str,
}

/// A provider stop identifier (the RBL number on Wiener Linien stop signs).
///
/// Identifiers are non-empty ASCII alphanumeric strings. Surrounding
/// whitespace is trimmed, since config files often carry it.
///
/// # Examples
///
/// ```
/// use departure_monitor::domain::StopId;
///
/// let stop = StopId::parse("4609").unwrap();
/// assert_eq!(stop.as_str(), "4609");
///
/// assert!(StopId::parse("").is_err());
/// assert!(StopId::parse("46 09").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StopId(String);

impl StopId {
    /// Parse a stop identifier from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidStopId> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidStopId {
                reason: "must not be empty",
            });
        }

        if !trimmed.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidStopId {
                reason: "must be ASCII letters or digits",
            });
        }

        Ok(StopId(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StopId {
    type Error = InvalidStopId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StopId::parse(&value)
    }
}

impl From<StopId> for String {
    fn from(value: StopId) -> Self {
        value.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A configured stop to monitor. Immutable once created at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopQuery {
    /// Provider stop identifier.
    pub stop: StopId,

    /// Optional API key sent with every request for this stop.
    pub api_key: Option<String>,
}

impl StopQuery {
    /// Create a query without an API key.
    pub fn new(stop: StopId) -> Self {
        Self {
            stop,
            api_key: None,
        }
    }

    /// Attach an API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_ids() {
        assert!(StopId::parse("4609").is_ok());
        assert!(StopId::parse("60201234").is_ok());
        assert!(StopId::parse("A12").is_ok());
    }

    #[test]
    fn trims_whitespace() {
        let stop = StopId::parse("  4609 ").unwrap();
        assert_eq!(stop.as_str(), "4609");
    }

    #[test]
    fn reject_empty() {
        assert!(StopId::parse("").is_err());
        assert!(StopId::parse("   ").is_err());
    }

    #[test]
    fn reject_non_alphanumeric() {
        assert!(StopId::parse("46-09").is_err());
        assert!(StopId::parse("46 09").is_err());
        assert!(StopId::parse("46ö9").is_err());
        assert!(StopId::parse("4609&sender=x").is_err());
    }

    #[test]
    fn display_and_debug() {
        let stop = StopId::parse("4609").unwrap();
        assert_eq!(format!("{}", stop), "4609");
        assert_eq!(format!("{:?}", stop), "StopId(4609)");
    }

    #[test]
    fn deserialize_validates() {
        let ok: Result<StopId, _> = serde_json::from_str(r#""4609""#);
        assert!(ok.is_ok());

        let bad: Result<StopId, _> = serde_json::from_str(r#""not a stop""#);
        assert!(bad.is_err());
    }

    #[test]
    fn query_builder() {
        let query = StopQuery::new(StopId::parse("4609").unwrap()).with_api_key("secret");
        assert_eq!(query.stop.as_str(), "4609");
        assert_eq!(query.api_key.as_deref(), Some("secret"));
    }
}
