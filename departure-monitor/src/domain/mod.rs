//! Domain types for the departure monitor.
//!
//! These are the validated, provider-independent shapes the rest of the
//! pipeline works with. Raw API payloads never leak past the converter.

mod departure;
mod stop;
mod time;

pub use departure::{ACCESSIBLE_GLYPH, Accessibility, DepartureRecord, LEGACY_VEHICLE_GLYPH};
pub use stop::{InvalidStopId, StopId, StopQuery};
pub use time::{DepartureTime, FormatError, format_hhmm};
