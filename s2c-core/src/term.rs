//! The term a schedule is compiled for.

use serde::{Deserialize, Serialize};

use crate::error::{S2cError, S2cResult};
use crate::week_mask::WEEK_MASK_LEN;

/// Year and week offsets of one term, as reported by the timetable page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermWindow {
    /// Calendar year the term begins in.
    pub start_year: i32,
    /// 1-based week of the year at which the academic activity block begins.
    pub all_occupy_week: u32,
    /// 1-based first selectable week, relative to `all_occupy_week`.
    pub all_start_week: u32,
    /// 1-based last selectable week, relative to `all_occupy_week`.
    pub all_end_week: u32,
}

/// The requested week range, echoed back to the user for confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityRange {
    pub start_week: u32,
    pub end_week: u32,
}

impl TermWindow {
    pub fn validate(&self) -> S2cResult<()> {
        if self.all_occupy_week < 1 || self.all_start_week < 1 || self.all_end_week < 1 {
            return Err(S2cError::InvalidTermWindow(format!(
                "week offsets must be at least 1 (occupy {}, start {}, end {})",
                self.all_occupy_week, self.all_start_week, self.all_end_week
            )));
        }
        if self.all_start_week > self.all_end_week {
            return Err(S2cError::InvalidTermWindow(format!(
                "start week {} is after end week {}",
                self.all_start_week, self.all_end_week
            )));
        }
        if self.all_occupy_week as usize > WEEK_MASK_LEN {
            return Err(S2cError::InvalidTermWindow(format!(
                "occupy week {} is beyond week {WEEK_MASK_LEN}",
                self.all_occupy_week
            )));
        }
        chrono::NaiveDate::from_ymd_opt(self.start_year, 1, 1).ok_or_else(|| {
            S2cError::InvalidTermWindow(format!("start year {} is out of range", self.start_year))
        })?;
        Ok(())
    }

    /// Offset subtracted from a mask index to get the week relative to the
    /// start of the activity block.
    pub fn occupy_offset(&self) -> i64 {
        i64::from(self.all_occupy_week) - 1
    }

    /// How many week slots a single mask is short of to hold the whole term.
    /// Negative means the source had to split some classes across two records.
    pub fn need_merge_indicator(&self) -> i64 {
        WEEK_MASK_LEN as i64 - self.occupy_offset() - i64::from(self.all_end_week)
    }

    /// True when records of this term may have been split by the source.
    pub fn needs_merge(&self) -> bool {
        self.need_merge_indicator() < 0
    }

    pub fn activity_range(&self) -> ActivityRange {
        ActivityRange {
            start_week: self.all_start_week,
            end_week: self.all_end_week,
        }
    }
}
