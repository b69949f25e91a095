//! Core of s2c: compiles a university's week-mask timetable into
//! weekly-recurring calendar events.
//!
//! - `week_mask` decodes the 53-week occupancy strings
//! - `merge` reassembles classes split across two source records
//! - `timetable` maps period indices to clock times
//! - `project` places events on the calendar
//! - `compiler` runs the whole pipeline
//! - `ics` writes the result as an .ics file

pub mod compiler;
pub mod config;
pub mod error;
pub mod event;
pub mod ics;
pub mod merge;
pub mod options;
pub mod project;
pub mod record;
pub mod recurrence;
pub mod source;
pub mod split;
pub mod term;
pub mod timetable;
pub mod week_mask;

pub use compiler::{CompiledSchedule, ScheduleCompiler};
pub use error::{S2cError, S2cResult};
pub use event::EventDescriptor;
pub use options::CompileOptions;
pub use record::{MergedCourseRecord, RawCourseRecord};
pub use term::TermWindow;
