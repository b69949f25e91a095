//! Event descriptors handed to the calendar encoder.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{S2cError, S2cResult};

/// A display reminder attached to every occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    /// Minutes before the start of the class. Always non-negative.
    pub minutes: i64,
    pub description: String,
}

/// One weekly-recurring class event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDescriptor {
    /// Stable key, unique within one compiled schedule.
    pub uid: String,
    pub summary: String,
    pub location: String,

    /// First occurrence, wall-clock time in `timezone`.
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// End of the final occurrence; the weekly rule repeats until here.
    pub until: NaiveDateTime,
    pub timezone: Tz,

    pub reminder: Reminder,

    // Provenance, for confirmation output
    pub course_id: String,
    pub teacher_name: String,
    /// Monday = 0 .. Sunday = 6.
    pub day_of_week: u8,
    /// 1-based weeks of the activity block.
    pub first_week: i64,
    pub last_week: i64,
    pub first_period: u8,
    pub last_period: u8,
    pub building_override: bool,
}

impl EventDescriptor {
    pub fn occurrence_count(&self) -> i64 {
        self.last_week - self.first_week + 1
    }

    /// The recurrence end as an absolute instant.
    pub fn until_utc(&self) -> S2cResult<DateTime<Utc>> {
        to_utc(self.timezone, self.until)
    }

    /// RRULE value for this event. UNTIL is written in UTC since DTSTART
    /// carries a TZID.
    pub fn rrule(&self) -> S2cResult<String> {
        Ok(format!(
            "FREQ=WEEKLY;UNTIL={}",
            self.until_utc()?.format("%Y%m%dT%H%M%SZ")
        ))
    }
}

pub(crate) fn to_utc(tz: Tz, local: NaiveDateTime) -> S2cResult<DateTime<Utc>> {
    tz.from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            S2cError::IcsGenerate(format!("{local} does not exist in time zone {}", tz.name()))
        })
}
