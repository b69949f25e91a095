//! Where scraped schedules come from.
//!
//! Logging in and scraping the timetable page happen outside this crate. A
//! `ScheduleSource` hands over the fully materialized result.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::RawCourseRecord;
use crate::term::TermWindow;

/// Why a schedule could not be obtained.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("No course data for this term: {0}")]
    NoCourseData(String),

    #[error("Could not parse schedule: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A scraped term: the week window plus every timetable cell, in page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    /// e.g. "2019-2020"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_year: Option<String>,
    /// e.g. "1"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    pub term: TermWindow,
    pub records: Vec<RawCourseRecord>,
}

impl ScheduleInput {
    /// Suggested .ics file name for this schedule.
    pub fn default_file_name(&self) -> String {
        match (&self.student_id, &self.school_year, &self.semester) {
            (Some(student), Some(year), Some(semester)) => {
                format!("{student}_{year}_term{semester}.ics")
            }
            _ => "schedule.ics".to_string(),
        }
    }
}

pub trait ScheduleSource {
    fn fetch(&self) -> Result<ScheduleInput, FetchError>;
}

/// Reads a schedule exported by the scraper as JSON.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScheduleSource for JsonFileSource {
    fn fetch(&self) -> Result<ScheduleInput, FetchError> {
        let content = std::fs::read_to_string(&self.path)?;

        let input: ScheduleInput = serde_json::from_str(&content)
            .map_err(|e| FetchError::Parse(format!("{}: {e}", self.path.display())))?;

        if input.records.is_empty() {
            return Err(FetchError::NoCourseData(format!(
                "{} contains no timetable cells",
                self.path.display()
            )));
        }

        Ok(input)
    }
}
