//! Turning merged records into dated, recurring events.
//!
//! Weeks are counted on a Sunday-first calendar: the anchor of the activity
//! block is a Sunday, and a class on source day `d` (Monday = 0) lands
//! `(d + 1) % 7` days after it.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use chrono_tz::Tz;

use crate::error::{S2cError, S2cResult};
use crate::event::{EventDescriptor, Reminder, to_utc};
use crate::options::CompileOptions;
use crate::record::MergedCourseRecord;
use crate::split::split_blocks;
use crate::term::TermWindow;
use crate::timetable::{BlockSpan, ClockTime, Timetable};
use crate::week_mask::WeekRun;

/// True when January 1 of `year` is a Sunday.
pub fn starts_on_sunday(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 1, 1).is_some_and(|d| d.weekday() == chrono::Weekday::Sun)
}

/// Start of `week` in Sunday-first week numbering.
///
/// Week 1 begins on the first Sunday of the year; week 0 holds the days
/// before it and is taken to start on the Sunday on or before January 1.
/// In a year that starts on a Sunday, weeks 0 and 1 are the same week.
pub fn sunday_week_start(year: i32, week: u32) -> Option<NaiveDate> {
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let first_weekday = i64::from(jan1.weekday().num_days_from_sunday());

    let days = if week == 0 {
        -first_weekday
    } else {
        let week_0_length = (7 - first_weekday) % 7;
        week_0_length + 7 * (i64::from(week) - 1)
    };

    jan1.checked_add_signed(TimeDelta::days(days))
}

/// The Sunday that starts the term's activity block.
pub fn week_anchor(term: &TermWindow) -> S2cResult<NaiveDate> {
    let mut week = term.all_occupy_week.saturating_sub(1);

    // Week 0 and week 1 collapse when the year starts on a Sunday, so every
    // week number is one lower than the real week. Skip ahead by one.
    if starts_on_sunday(term.start_year) {
        tracing::debug!(year = term.start_year, "year starts on a Sunday, shifting anchor one week");
        week += 1;
    }

    sunday_week_start(term.start_year, week).ok_or_else(|| {
        S2cError::InvalidTermWindow(format!(
            "week {} of {} is out of range",
            term.all_occupy_week, term.start_year
        ))
    })
}

/// Projects merged records onto calendar dates for one term.
#[derive(Debug)]
pub struct EventProjector<'a> {
    term: &'a TermWindow,
    timetable: &'a Timetable,
    options: &'a CompileOptions,
    anchor: NaiveDate,
    timezone: Tz,
}

impl<'a> EventProjector<'a> {
    pub fn new(
        term: &'a TermWindow,
        timetable: &'a Timetable,
        options: &'a CompileOptions,
    ) -> S2cResult<Self> {
        Ok(EventProjector {
            term,
            timetable,
            options,
            anchor: week_anchor(term)?,
            timezone: options.tz()?,
        })
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// One event per (period block, week run) of the record.
    pub fn project(&self, record: &MergedCourseRecord) -> S2cResult<Vec<EventDescriptor>> {
        let runs = record.week_mask.runs();
        let mut events = Vec::new();

        for block in split_blocks(record, self.options.split_cross_break_blocks) {
            let span = self.timetable.resolve(
                &block.course_id,
                &block.periods,
                &block.room_name,
                self.options.apply_building_time_override,
            )?;

            for run in &runs {
                events.push(self.project_run(&block, &span, run)?);
            }
        }

        Ok(events)
    }

    fn project_run(
        &self,
        record: &MergedCourseRecord,
        span: &BlockSpan,
        run: &WeekRun,
    ) -> S2cResult<EventDescriptor> {
        let first_week = run.start as i64 - self.term.occupy_offset();
        let last_week = run.end as i64 - self.term.occupy_offset();

        let start = self.occurrence(record, first_week, span.start)?;
        let end = self.occurrence(record, first_week, span.end)?;
        let until = self.occurrence(record, last_week, span.end)?;

        // Fail now rather than in the encoder if a time falls in a DST gap.
        to_utc(self.timezone, start)?;
        to_utc(self.timezone, until)?;

        let uid = format!(
            "{}-{}-{}-w{}-{}-p{}-{}@s2c",
            record.course_id,
            record.room_id,
            record.day_of_week,
            first_week,
            last_week,
            span.first_period,
            span.last_period
        );

        tracing::info!(
            course = %record.course_name,
            teacher = %record.teacher_name,
            weeks = %format!("{}-{}", first_week + 1, last_week + 1),
            day = record.day_of_week + 1,
            periods = %format!("{}-{}", span.first_period + 1, span.last_period + 1),
            room = %record.room_name,
            building_override = span.building_override,
            "adding event"
        );

        Ok(EventDescriptor {
            uid,
            summary: format!("{} {}", record.course_name, record.teacher_name),
            location: record.room_name.clone(),
            start,
            end,
            until,
            timezone: self.timezone,
            reminder: Reminder {
                minutes: i64::from(self.options.alarm_lead_minutes).abs(),
                description: format!("{} {}", record.course_name, record.room_name),
            },
            course_id: record.course_id.clone(),
            teacher_name: record.teacher_name.clone(),
            day_of_week: record.day_of_week,
            first_week: first_week + 1,
            last_week: last_week + 1,
            first_period: span.first_period,
            last_period: span.last_period,
            building_override: span.building_override,
        })
    }

    /// Wall-clock time of `clock` on the record's weekday in relative `week`.
    fn occurrence(
        &self,
        record: &MergedCourseRecord,
        week: i64,
        clock: ClockTime,
    ) -> S2cResult<NaiveDateTime> {
        let weekday_offset = (i64::from(record.day_of_week) + 1) % 7;

        let date = self
            .anchor
            .checked_add_signed(TimeDelta::weeks(week) + TimeDelta::days(weekday_offset))
            .ok_or_else(|| {
                S2cError::InvalidTermWindow(format!(
                    "week {week} of course '{}' is out of range",
                    record.course_id
                ))
            })?;

        Ok(date.and_time(NaiveTime::MIN) + clock.since_midnight())
    }
}
