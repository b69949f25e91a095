//! Terminal rendering for compiled schedules.
//!
//! Extension traits that add colored output to s2c-core types using
//! owo_colors.

use owo_colors::OwoColorize;
use s2c_core::EventDescriptor;
use s2c_core::term::ActivityRange;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub fn weekday_name(day_of_week: u8) -> &'static str {
    WEEKDAYS.get(day_of_week as usize).copied().unwrap_or("???")
}

impl Render for EventDescriptor {
    /// One confirmation row: course, weeks, weekday, periods, times and room.
    fn render(&self) -> String {
        let weeks = if self.first_week == self.last_week {
            format!("week {}", self.first_week)
        } else {
            format!("weeks {}-{}", self.first_week, self.last_week)
        };
        let periods = format!("periods {}-{}", self.first_period + 1, self.last_period + 1);
        let time = format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"));

        let mut line = format!(
            "{} {} {} {} {} {}",
            self.summary.bold(),
            weeks,
            weekday_name(self.day_of_week),
            periods.dimmed(),
            time.cyan(),
            format!("@ {}", self.location).dimmed(),
        );
        if self.building_override {
            line.push_str(&format!(" {}", "(D/E/F times)".yellow()));
        }
        line
    }
}

impl Render for ActivityRange {
    fn render(&self) -> String {
        format!("Active from week {} to week {}", self.start_week, self.end_week)
    }
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> &str {
    if count == 1 { word } else { match word {
        "event" => "events",
        "class" => "classes",
        _ => word,
    }}
}
