//! Conversion from raw monitor JSON to departure records.
//!
//! The monitor response nests departures per line, and the next two
//! departures at a stop may well belong to different lines. So every line
//! contributes its first two departures and the global order is left to
//! the ranker.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{Accessibility, DepartureRecord};

use super::types::{RawDeparture, RawLine, RawMonitor};

/// How many pending departures per line are considered.
pub const DEPARTURES_PER_LINE: usize = 2;

/// Error during raw JSON to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// A required path is missing from the response
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A monitor entry could not be decoded
    #[error("malformed monitor #{index}: {message}")]
    MalformedMonitor { index: usize, message: String },

    /// A line entry could not be decoded
    #[error("malformed line #{index}: {message}")]
    MalformedLine { index: usize, message: String },

    /// A departure entry could not be decoded
    #[error("malformed departure #{index} of line {line}: {message}")]
    MalformedDeparture {
        line: String,
        index: usize,
        message: String,
    },
}

/// Options that shape the emitted records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Append an accessibility glyph to each line name.
    pub accessibility_suffix: bool,
}

/// Flatten a stop's monitor response into departure records.
///
/// A `null` body or `null` `data` means the provider had nothing for the
/// stop and yields no records. A response without a `data.monitors` list
/// fails as a whole. Anything below that is decoded entry by entry;
/// malformed entries are logged and skipped.
pub fn normalize_monitor(
    body: &Value,
    options: &NormalizeOptions,
) -> Result<Vec<DepartureRecord>, ConversionError> {
    let Some(monitors) = monitors(body)? else {
        return Ok(Vec::new());
    };

    let mut records = Vec::with_capacity(monitors.len() * DEPARTURES_PER_LINE);

    for (index, monitor) in monitors.iter().enumerate() {
        let monitor = match RawMonitor::deserialize(monitor) {
            Ok(m) => m,
            Err(e) => {
                let err = ConversionError::MalformedMonitor {
                    index,
                    message: e.to_string(),
                };
                warn!(error = %err, "skipping monitor");
                continue;
            }
        };

        for (index, line) in monitor.lines.iter().enumerate() {
            match RawLine::deserialize(line) {
                Ok(line) => convert_line(&line, options, &mut records),
                Err(e) => {
                    let err = ConversionError::MalformedLine {
                        index,
                        message: e.to_string(),
                    };
                    warn!(error = %err, "skipping line");
                }
            }
        }
    }

    Ok(records)
}

/// Human-readable name of the stop: the first monitor's title.
pub fn stop_title(body: &Value) -> Result<String, ConversionError> {
    const PATH: &str = "data.monitors[0].locationStop.properties.title";

    let first = monitors(body)?
        .and_then(|m| m.first())
        .ok_or(ConversionError::MissingField(PATH))?;

    let monitor = RawMonitor::deserialize(first).map_err(|e| ConversionError::MalformedMonitor {
        index: 0,
        message: e.to_string(),
    })?;

    monitor
        .location_stop
        .map(|stop| stop.properties.title)
        .ok_or(ConversionError::MissingField(PATH))
}

/// Locate `data.monitors`, distinguishing "no data" from a broken shape.
fn monitors(body: &Value) -> Result<Option<&Vec<Value>>, ConversionError> {
    if body.is_null() {
        return Ok(None);
    }

    match body.get("data") {
        Some(Value::Null) => Ok(None),
        Some(data) => data
            .get("monitors")
            .and_then(Value::as_array)
            .map(Some)
            .ok_or(ConversionError::MissingField("data.monitors")),
        None => Err(ConversionError::MissingField("data.monitors")),
    }
}

/// Emit records for the first departures of one line.
fn convert_line(line: &RawLine, options: &NormalizeOptions, out: &mut Vec<DepartureRecord>) {
    for (index, raw) in line
        .departures
        .departure
        .iter()
        .take(DEPARTURES_PER_LINE)
        .enumerate()
    {
        let departure = match RawDeparture::deserialize(raw) {
            Ok(d) => d,
            Err(e) => {
                let err = ConversionError::MalformedDeparture {
                    line: line.name.clone(),
                    index,
                    message: e.to_string(),
                };
                warn!(error = %err, "skipping departure");
                continue;
            }
        };

        if let Some(record) = convert_departure(line, &departure, options) {
            out.push(record);
        } else {
            debug!(line = %line.name, index, "departure has no time, skipping");
        }
    }
}

/// Convert one departure; `None` when it carries neither time field.
pub fn convert_departure(
    line: &RawLine,
    departure: &RawDeparture,
    options: &NormalizeOptions,
) -> Option<DepartureRecord> {
    let time = departure.departure_time.resolved()?;

    let accessibility = Accessibility::resolve(
        departure.vehicle.as_ref().and_then(|v| v.barrier_free),
        line.barrier_free,
    );

    let line_name = match accessibility.glyph() {
        Some(glyph) if options.accessibility_suffix => format!("{}{}", line.name, glyph),
        _ => line.name.clone(),
    };

    Some(DepartureRecord {
        line_name,
        time: time.to_string(),
        countdown: departure.departure_time.countdown,
        destination: line.towards.clone(),
        platform: line.platform.clone(),
        direction: line.direction.clone(),
        accessibility,
    })
}
