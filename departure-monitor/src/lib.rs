//! Realtime departure monitor for Wiener Linien stops.
//!
//! Polls the open-data monitor endpoint for each configured stop, picks the
//! soonest departure(s) across all lines serving it, and publishes an
//! "HH:MM" state with descriptive attributes for displays to read.

pub mod board;
pub mod config;
pub mod domain;
pub mod poll;
pub mod web;
pub mod wienerlinien;
