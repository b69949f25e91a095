//! ICS file generation.
//!
//! This module writes compiled schedules as RFC 5545 calendars.

mod generate;

pub use generate::{IcsOptions, generate_ics};
