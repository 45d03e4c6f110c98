//! Wiener Linien realtime monitor client.
//!
//! This module provides the HTTP client for the open-data realtime API
//! (`ogd_realtime/monitor`) and the converter that flattens its responses.
//!
//! Key characteristics of the monitor response:
//! - Departures are nested per line, per monitor, per stop
//! - A departure may carry a live `timeReal`, a `timePlanned`, both or neither
//! - Step-free access is flagged per line and, when known, per vehicle

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, MonitorClient, MonitorClientConfig, MonitorSource,
};
pub use convert::{
    ConversionError, DEPARTURES_PER_LINE, NormalizeOptions, convert_departure, normalize_monitor,
    stop_title,
};
pub use error::FetchError;
pub use mock::{MockMonitorSource, MockReply};
pub use types::{
    LocationStop, RawDeparture, RawDepartureTime, RawDepartures, RawLine, RawMonitor, RawVehicle,
    StopProperties,
};
