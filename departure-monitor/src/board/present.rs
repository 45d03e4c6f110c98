//! Formatting of selected departures for the display layer.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{DepartureRecord, FormatError, format_hhmm};

use super::rank::RankedSelection;

/// Prefix for attributes of the secondary departure.
const NEXT_PREFIX: &str = "next_";

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Minutes(i64),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

/// What a stop publishes: an "HH:MM" state plus descriptive attributes.
///
/// This is the only thing kept between poll cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplaySnapshot {
    /// Departure time of the primary selection, "HH:MM".
    pub state: String,

    /// Named attributes, ordered by key.
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl DisplaySnapshot {
    /// Look up an attribute.
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }
}

/// Build the snapshot for a selection.
///
/// Fails if either selected timestamp cannot be formatted; a garbled
/// state is never produced.
pub fn present(selection: &RankedSelection) -> Result<DisplaySnapshot, FormatError> {
    let state = format_hhmm(&selection.primary.time)?;

    let mut attributes = BTreeMap::new();
    insert_record(&mut attributes, "", &selection.primary);

    if let Some(next) = &selection.secondary {
        let next_time = format_hhmm(&next.time)?;
        attributes.insert(format!("{NEXT_PREFIX}time"), next_time.into());
        insert_record(&mut attributes, NEXT_PREFIX, next);
    }

    Ok(DisplaySnapshot { state, attributes })
}

fn insert_record(
    attributes: &mut BTreeMap<String, AttributeValue>,
    prefix: &str,
    record: &DepartureRecord,
) {
    let mut put = |key: &str, value: AttributeValue| {
        attributes.insert(format!("{prefix}{key}"), value);
    };

    put("destination", record.destination.as_str().into());
    put("platform", record.platform.as_str().into());
    put("direction", record.direction.as_str().into());
    put("name", record.line_name.as_str().into());
    put("countdown", AttributeValue::Minutes(record.countdown));
    put("accessibility", record.accessibility.as_str().into());
}
