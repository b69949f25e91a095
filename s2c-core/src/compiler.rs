//! End-to-end schedule compilation.

use std::collections::HashSet;

use chrono_tz::Tz;

use crate::error::{S2cError, S2cResult};
use crate::event::EventDescriptor;
use crate::merge::merge_records;
use crate::options::CompileOptions;
use crate::project::EventProjector;
use crate::record::RawCourseRecord;
use crate::term::{ActivityRange, TermWindow};
use crate::timetable::Timetable;

/// The events of one term, ready for calendar encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSchedule {
    pub events: Vec<EventDescriptor>,
    /// Requested week range, for user confirmation only.
    pub activity: ActivityRange,
    pub timezone: Tz,
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleCompiler {
    options: CompileOptions,
    timetable: Timetable,
}

impl ScheduleCompiler {
    pub fn new(options: CompileOptions, timetable: Timetable) -> Self {
        ScheduleCompiler { options, timetable }
    }

    /// Merge, split, resolve and project the records of one term.
    ///
    /// Any invalid record aborts the whole run; no partial schedule is
    /// returned.
    pub fn compile(
        &self,
        term: &TermWindow,
        records: &[RawCourseRecord],
    ) -> S2cResult<CompiledSchedule> {
        self.options.validate()?;
        if self.options.apply_building_time_override && !self.timetable.has_building_override() {
            return Err(S2cError::InvalidConfiguration(
                "building time override is enabled but the timetable defines no building times"
                    .into(),
            ));
        }
        term.validate()?;

        let buckets = merge_records(records, term)?;
        let projector = EventProjector::new(term, &self.timetable, &self.options)?;

        let mut events = Vec::new();
        let mut seen = HashSet::new();

        for record in buckets.values().flatten() {
            for event in projector.project(record)? {
                if !seen.insert(event.uid.clone()) {
                    return Err(S2cError::DuplicateEventKey {
                        course_id: event.course_id,
                        uid: event.uid,
                    });
                }
                events.push(event);
            }
        }

        tracing::debug!(
            anchor = %projector.anchor(),
            records = records.len(),
            courses = buckets.len(),
            events = events.len(),
            "compiled schedule"
        );

        Ok(CompiledSchedule {
            events,
            activity: term.activity_range(),
            timezone: self.options.tz()?,
        })
    }
}
