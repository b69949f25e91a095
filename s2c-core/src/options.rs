//! Knobs that change how a schedule is compiled.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{S2cError, S2cResult};

/// Longest reminder lead time accepted, in minutes.
pub const MAX_ALARM_LEAD_MINUTES: u32 = 120;

pub const DEFAULT_ALARM_LEAD_MINUTES: u32 = 15;

/// The campus time zone.
pub const DEFAULT_TIMEZONE: &str = "Asia/Shanghai";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Minutes before each class the reminder fires.
    pub alarm_lead_minutes: u32,
    /// Use the D/E/F building times for late-morning periods.
    pub apply_building_time_override: bool,
    /// Split classes spanning the lunch or dinner break into separate events.
    pub split_cross_break_blocks: bool,
    /// IANA time zone the timetable's clock times are in.
    pub timezone: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            alarm_lead_minutes: DEFAULT_ALARM_LEAD_MINUTES,
            apply_building_time_override: false,
            split_cross_break_blocks: false,
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

impl CompileOptions {
    pub fn validate(&self) -> S2cResult<()> {
        if self.alarm_lead_minutes > MAX_ALARM_LEAD_MINUTES {
            return Err(S2cError::InvalidConfiguration(format!(
                "alarm lead time must be between 0 and {MAX_ALARM_LEAD_MINUTES} minutes, got {}",
                self.alarm_lead_minutes
            )));
        }
        self.tz()?;
        Ok(())
    }

    pub fn tz(&self) -> S2cResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| S2cError::InvalidTimezone(self.timezone.clone()))
    }
}
