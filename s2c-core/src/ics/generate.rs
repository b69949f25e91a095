//! ICS file generation.

use chrono::{DateTime, NaiveDateTime, Utc};
use icalendar::{Alarm, Calendar, Component, EventLike, Property, Trigger};

use crate::compiler::CompiledSchedule;
use crate::error::S2cResult;
use crate::event::EventDescriptor;

const PRODID: &str = "PRODID:-//s2c//Timetable Export//EN";

/// Calendar-level settings for one export.
#[derive(Debug, Clone)]
pub struct IcsOptions {
    /// Shown by clients as the calendar's name (X-WR-CALNAME).
    pub calendar_name: Option<String>,
    /// DTSTAMP written on every event. Supplied by the caller so that the
    /// same schedule always encodes to the same bytes.
    pub dtstamp: DateTime<Utc>,
}

/// Generate .ics content for a compiled schedule
pub fn generate_ics(schedule: &CompiledSchedule, options: &IcsOptions) -> S2cResult<String> {
    let mut cal = Calendar::new();

    if let Some(ref name) = options.calendar_name {
        cal.name(name);
    }
    cal.timezone(schedule.timezone.name());

    let dtstamp = options.dtstamp.format("%Y%m%dT%H%M%SZ").to_string();

    for event in &schedule.events {
        cal.push(build_event(event, &dtstamp)?);
    }

    let cal = cal.done();

    // Post-process to remove unnecessary bloat from the icalendar crate's output
    Ok(strip_ics_bloat(&cal.to_string()))
}

fn build_event(event: &EventDescriptor, dtstamp: &str) -> S2cResult<icalendar::Event> {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uid);
    ics_event.summary(&event.summary);
    ics_event.location(&event.location);
    ics_event.add_property("DTSTAMP", dtstamp);

    let tzid = event.timezone.name();
    add_zoned_property(&mut ics_event, "DTSTART", &event.start, tzid);
    add_zoned_property(&mut ics_event, "DTEND", &event.end, tzid);

    // Weekly until the end of the last occurrence
    ics_event.add_property("RRULE", event.rrule()?);

    let trigger = Trigger::before_start(chrono::Duration::minutes(event.reminder.minutes.abs()));
    ics_event.alarm(Alarm::display(&event.reminder.description, trigger));

    Ok(ics_event.done())
}

/// Datetime with TZID parameter
fn add_zoned_property(
    ics_event: &mut icalendar::Event,
    name: &str,
    datetime: &NaiveDateTime,
    tzid: &str,
) {
    let mut prop = Property::new(name, datetime.format("%Y%m%dT%H%M%S").to_string());
    prop.add_parameter("TZID", tzid);
    ics_event.append_property(prop);
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with our own
/// - Remove CALSCALE:GREGORIAN (it's the default)
/// - Remove DTSTAMP and UID inside VALARM sections (not required by RFC 5545)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());
    let mut in_valarm = false;

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str(PRODID);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        if line == "BEGIN:VALARM" {
            in_valarm = true;
        } else if line == "END:VALARM" {
            in_valarm = false;
        }

        if in_valarm && (line.starts_with("DTSTAMP:") || line.starts_with("UID:")) {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ScheduleCompiler;
    use crate::record::raw_record;
    use crate::term::TermWindow;
    use crate::week_mask::mask_with;
    use chrono::TimeZone;

    fn compiled() -> CompiledSchedule {
        let term = TermWindow {
            start_year: 2019,
            all_occupy_week: 1,
            all_start_week: 1,
            all_end_week: 18,
        };
        let records = vec![
            raw_record("MATH101", &mask_with(0..18).to_string(), 0, &[0, 1]),
            raw_record("PHYS201", &mask_with(0..4).to_string(), 3, &[6, 7]),
        ];
        ScheduleCompiler::default().compile(&term, &records).unwrap()
    }

    fn options() -> IcsOptions {
        IcsOptions {
            calendar_name: Some("2019-2020 term 2".into()),
            dtstamp: Utc.with_ymd_and_hms(2019, 2, 20, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_generate_ics_one_vevent_per_descriptor() {
        let ics = generate_ics(&compiled(), &options()).unwrap();

        let count = ics.lines().filter(|l| *l == "BEGIN:VEVENT").count();
        assert_eq!(count, 2, "Should have 2 VEVENTs. ICS:\n{}", ics);
        assert!(ics.contains("UID:MATH101-R101-0-w0-17-p0-1@s2c"), "ICS:\n{}", ics);
    }

    #[test]
    fn test_generate_ics_zoned_times_and_weekly_rule() {
        let ics = generate_ics(&compiled(), &options()).unwrap();

        assert!(
            ics.contains("DTSTART;TZID=Asia/Shanghai:20181231T081500"),
            "DTSTART should carry TZID. ICS:\n{}",
            ics
        );
        assert!(
            ics.contains("DTEND;TZID=Asia/Shanghai:20181231T094500"),
            "DTEND should carry TZID. ICS:\n{}",
            ics
        );
        assert!(
            ics.contains("RRULE:FREQ=WEEKLY;UNTIL=20190429T014500Z"),
            "RRULE should repeat weekly until the last class ends. ICS:\n{}",
            ics
        );
        assert!(ics.contains("LOCATION:A101"), "ICS:\n{}", ics);
    }

    #[test]
    fn test_generate_ics_alarm_is_minimal() {
        let ics = generate_ics(&compiled(), &options()).unwrap();

        assert!(ics.contains("BEGIN:VALARM"), "Should have VALARM");
        assert!(ics.contains("ACTION:DISPLAY"), "Should have ACTION:DISPLAY");
        assert!(ics.contains("TRIGGER"), "Should have TRIGGER");
        assert!(
            ics.contains("DESCRIPTION:Course MATH101 A101"),
            "Alarm should describe course and room. ICS:\n{}",
            ics
        );

        let valarm_section: String = ics
            .split("BEGIN:VALARM")
            .nth(1)
            .unwrap()
            .split("END:VALARM")
            .next()
            .unwrap()
            .to_string();
        assert!(
            !valarm_section.contains("UID:"),
            "VALARM should not have UID. Got:\n{}",
            valarm_section
        );
        assert!(
            !valarm_section.contains("DTSTAMP:"),
            "VALARM should not have DTSTAMP. Got:\n{}",
            valarm_section
        );
    }

    #[test]
    fn test_generate_ics_is_deterministic() {
        let first = generate_ics(&compiled(), &options()).unwrap();
        let second = generate_ics(&compiled(), &options()).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("DTSTAMP:20190220T120000Z"), "ICS:\n{}", first);
        assert!(first.contains(PRODID));
        assert!(!first.contains("CALSCALE"));
    }
}
