//! Error types for schedule compilation.

use thiserror::Error;

/// Errors that abort a compilation run.
///
/// Record-level variants carry the course id of the offending record so the
/// failure can be traced back to one cell of the source timetable.
#[derive(Error, Debug)]
pub enum S2cError {
    #[error("Malformed week mask for course '{course_id}': expected {expected} characters of '0'/'1', got {found:?}")]
    MalformedWeekMask {
        course_id: String,
        expected: usize,
        found: String,
    },

    #[error("Cannot merge split records of course '{course_id}': {reason}")]
    UnmergeableConflict { course_id: String, reason: String },

    #[error("Course '{course_id}' is missing its {field}")]
    MissingScheduleFields {
        course_id: String,
        field: &'static str,
    },

    #[error("Course '{course_id}' has day of week {day}, expected 0-6")]
    InvalidDayOfWeek { course_id: String, day: u8 },

    #[error("Course '{course_id}' references unknown period {period}")]
    UnknownPeriod { course_id: String, period: u8 },

    #[error("Invalid term window: {0}")]
    InvalidTermWindow(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Unknown time zone '{0}'")]
    InvalidTimezone(String),

    #[error("Two events of course '{course_id}' share the key '{uid}'")]
    DuplicateEventKey { course_id: String, uid: String },

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for schedule compilation.
pub type S2cResult<T> = Result<T, S2cError>;
