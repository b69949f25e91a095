//! RRULE expansion for previewing events.
//!
//! Expands an event's weekly rule into its concrete occurrences, so the
//! output can be checked against the timetable page before importing.

use chrono::NaiveDateTime;
use rrule::RRuleSet;

use crate::error::{S2cError, S2cResult};
use crate::event::EventDescriptor;

/// Upper bound on expanded occurrences. A term mask spans at most two years.
const MAX_OCCURRENCES: u16 = 2 * 53;

/// Build an iCalendar-format RRULE string for the rrule crate parser.
fn build_rrule_string(event: &EventDescriptor) -> S2cResult<String> {
    Ok(format!(
        "DTSTART;TZID={}:{}\nRRULE:{}",
        event.timezone.name(),
        event.start.format("%Y%m%dT%H%M%S"),
        event.rrule()?
    ))
}

/// Start times of every occurrence of `event`, as wall-clock times in its zone.
pub fn expand(event: &EventDescriptor) -> S2cResult<Vec<NaiveDateTime>> {
    let rrule_str = build_rrule_string(event)?;

    let rrule_set: RRuleSet = rrule_str.parse().map_err(|e| {
        S2cError::IcsGenerate(format!(
            "Failed to parse RRULE for event '{}': {}",
            event.uid, e
        ))
    })?;

    let result = rrule_set.all(MAX_OCCURRENCES);

    Ok(result.dates.iter().map(|dt| dt.naive_local()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ScheduleCompiler;
    use crate::record::raw_record;
    use crate::term::TermWindow;
    use crate::week_mask::mask_with;
    use chrono::{NaiveDate, TimeDelta};

    fn compile(year: i32, mask: &str) -> Vec<EventDescriptor> {
        let term = TermWindow {
            start_year: year,
            all_occupy_week: 1,
            all_start_week: 1,
            all_end_week: 18,
        };
        ScheduleCompiler::default()
            .compile(&term, &[raw_record("MATH101", mask, 0, &[0, 1])])
            .unwrap()
            .events
    }

    #[test]
    fn expands_every_week_of_the_run() {
        let events = compile(2019, &mask_with(0..18).to_string());
        let dates = expand(&events[0]).unwrap();

        assert_eq!(dates.len(), 18);
        assert_eq!(
            dates[0],
            NaiveDate::from_ymd_opt(2018, 12, 31).unwrap().and_hms_opt(8, 15, 0).unwrap()
        );
        for pair in dates.windows(2) {
            assert_eq!(pair[1] - pair[0], TimeDelta::weeks(1));
        }
        assert_eq!(dates[17].date(), events[0].until.date());
    }

    #[test]
    fn single_week_expands_once() {
        let events = compile(2019, &mask_with([0]).to_string());
        assert_eq!(expand(&events[0]).unwrap(), vec![events[0].start]);
    }

    #[test]
    fn occurrence_count_agrees_with_expansion() {
        let events = compile(2023, &mask_with((0..5).chain(9..16)).to_string());
        assert_eq!(events.len(), 2);
        for event in &events {
            let dates = expand(event).unwrap();
            assert_eq!(dates.len() as i64, event.occurrence_count(), "{}", event.uid);
        }
    }
}
