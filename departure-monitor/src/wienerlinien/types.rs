//! Monitor API response DTOs.
//!
//! These map directly onto pieces of the `ogd_realtime/monitor` JSON. The
//! converter deserializes each monitor, line and departure separately from
//! the raw `serde_json::Value`, so one malformed entry only costs that entry.
//! Lists nested below an entry are therefore kept as raw values here.

use serde::Deserialize;
use serde_json::Value;

/// One monitor (a stop as seen by one RBL) from `data.monitors`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMonitor {
    /// Stop description, including its display title.
    pub location_stop: Option<LocationStop>,

    /// Lines serving this stop, still undecoded.
    #[serde(default)]
    pub lines: Vec<Value>,
}

/// GeoJSON-ish stop feature.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationStop {
    pub properties: StopProperties,
}

/// Properties of a stop feature.
#[derive(Debug, Clone, Deserialize)]
pub struct StopProperties {
    /// Human-readable stop name, e.g. "Karlsplatz".
    pub title: String,

    /// Provider-internal name (DIVA number as string).
    pub name: Option<String>,
}

/// A line serving the stop.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLine {
    /// Line name, e.g. "U1" or "13A".
    pub name: String,

    /// Destination shown on the vehicle.
    pub towards: String,

    /// Platform; not every stop reports one.
    #[serde(default)]
    pub platform: String,

    /// Direction code ("H" / "R").
    pub direction: String,

    /// Line-level step-free flag, used when the vehicle does not report one.
    pub barrier_free: Option<bool>,

    /// Upcoming departures.
    pub departures: RawDepartures,
}

/// Wrapper around the departure list.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDepartures {
    /// Departures in provider order, still undecoded.
    #[serde(default)]
    pub departure: Vec<Value>,
}

/// A single upcoming departure of a line.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDeparture {
    pub departure_time: RawDepartureTime,

    /// Present when the provider knows which vehicle is running.
    pub vehicle: Option<RawVehicle>,
}

/// Time fields of a departure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDepartureTime {
    /// Live estimate, when available.
    pub time_real: Option<String>,

    /// Timetable time.
    pub time_planned: Option<String>,

    /// Minutes until departure.
    pub countdown: i64,
}

impl RawDepartureTime {
    /// Real-time estimate if present, otherwise the planned time.
    pub fn resolved(&self) -> Option<&str> {
        self.time_real.as_deref().or(self.time_planned.as_deref())
    }
}

/// Vehicle details of a departure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVehicle {
    /// Vehicle-level step-free flag.
    pub barrier_free: Option<bool>,
}
