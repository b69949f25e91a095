//! Course records, as scraped and after merging.

use serde::{Deserialize, Serialize};

use crate::error::{S2cError, S2cResult};
use crate::week_mask::{WEEK_MASK_LEN, WeekMask};

/// One timetable cell as decoded from the source page.
///
/// `day_of_week` and `periods` are filled in by the scraper after the cell
/// itself is created, so both may be missing in malformed exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCourseRecord {
    pub teacher_id: String,
    pub teacher_name: String,
    pub course_id: String,
    pub course_name: String,
    pub room_id: String,
    pub room_name: String,
    pub week_mask: String,
    /// Monday = 0 .. Sunday = 6.
    #[serde(default)]
    pub day_of_week: Option<u8>,
    #[serde(default)]
    pub periods: Vec<u8>,
}

/// A validated course record whose week mask may span two source records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedCourseRecord {
    pub teacher_id: String,
    pub teacher_name: String,
    pub course_id: String,
    pub course_name: String,
    pub room_id: String,
    pub room_name: String,
    pub week_mask: WeekMask,
    /// Monday = 0 .. Sunday = 6.
    pub day_of_week: u8,
    pub periods: Vec<u8>,
}

impl MergedCourseRecord {
    /// Check the scraped fields and parse the week mask.
    pub fn from_raw(raw: &RawCourseRecord) -> S2cResult<Self> {
        let week_mask: WeekMask =
            raw.week_mask
                .parse()
                .map_err(|e: crate::week_mask::InvalidMask| S2cError::MalformedWeekMask {
                    course_id: raw.course_id.clone(),
                    expected: WEEK_MASK_LEN,
                    found: e.0,
                })?;

        let day_of_week = raw.day_of_week.ok_or_else(|| S2cError::MissingScheduleFields {
            course_id: raw.course_id.clone(),
            field: "day of week",
        })?;
        if day_of_week > 6 {
            return Err(S2cError::InvalidDayOfWeek {
                course_id: raw.course_id.clone(),
                day: day_of_week,
            });
        }

        if raw.periods.is_empty() {
            return Err(S2cError::MissingScheduleFields {
                course_id: raw.course_id.clone(),
                field: "periods",
            });
        }

        let mut periods = raw.periods.clone();
        periods.sort_unstable();
        periods.dedup();

        Ok(MergedCourseRecord {
            teacher_id: raw.teacher_id.clone(),
            teacher_name: raw.teacher_name.clone(),
            course_id: raw.course_id.clone(),
            course_name: raw.course_name.clone(),
            room_id: raw.room_id.clone(),
            room_name: raw.room_name.clone(),
            week_mask,
            day_of_week,
            periods,
        })
    }

    /// Two records are halves of one class when everything but the week mask
    /// matches and both masks are still unmerged source masks.
    pub fn can_merge_with(&self, other: &MergedCourseRecord) -> bool {
        self.week_mask.is_source_length()
            && other.week_mask.is_source_length()
            && self.week_mask != other.week_mask
            && self.teacher_id == other.teacher_id
            && self.course_id == other.course_id
            && self.room_id == other.room_id
            && self.day_of_week == other.day_of_week
    }

    /// Copy of this record restricted to a subset of its periods.
    pub fn with_periods(&self, periods: Vec<u8>) -> MergedCourseRecord {
        MergedCourseRecord {
            periods,
            ..self.clone()
        }
    }
}

#[cfg(test)]
pub(crate) fn raw_record(course_id: &str, mask: &str, day: u8, periods: &[u8]) -> RawCourseRecord {
    RawCourseRecord {
        teacher_id: "T01".into(),
        teacher_name: "Li Wei".into(),
        course_id: course_id.into(),
        course_name: format!("Course {course_id}"),
        room_id: "R101".into(),
        room_name: "A101".into(),
        week_mask: mask.into(),
        day_of_week: Some(day),
        periods: periods.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::week_mask::mask_with;

    #[test]
    fn from_raw_sorts_and_dedups_periods() {
        let raw = raw_record("C1", &mask_with([0]).to_string(), 2, &[3, 2, 3]);
        let record = MergedCourseRecord::from_raw(&raw).unwrap();
        assert_eq!(record.periods, vec![2, 3]);
        assert_eq!(record.day_of_week, 2);
    }

    #[test]
    fn from_raw_rejects_short_mask() {
        let raw = raw_record("C1", &"1".repeat(52), 0, &[0]);
        let err = MergedCourseRecord::from_raw(&raw).unwrap_err();
        assert!(
            matches!(err, S2cError::MalformedWeekMask { ref course_id, .. } if course_id == "C1"),
            "got {err:?}"
        );
    }

    #[test]
    fn from_raw_requires_day_and_periods() {
        let mut raw = raw_record("C1", &mask_with([0]).to_string(), 0, &[0]);
        raw.day_of_week = None;
        assert!(matches!(
            MergedCourseRecord::from_raw(&raw),
            Err(S2cError::MissingScheduleFields { field: "day of week", .. })
        ));

        let mut raw = raw_record("C1", &mask_with([0]).to_string(), 0, &[]);
        raw.periods.clear();
        assert!(matches!(
            MergedCourseRecord::from_raw(&raw),
            Err(S2cError::MissingScheduleFields { field: "periods", .. })
        ));
    }

    #[test]
    fn from_raw_rejects_day_out_of_range() {
        let raw = raw_record("C1", &mask_with([0]).to_string(), 7, &[0]);
        assert!(matches!(
            MergedCourseRecord::from_raw(&raw),
            Err(S2cError::InvalidDayOfWeek { day: 7, .. })
        ));
    }

    #[test]
    fn merge_predicate_ignores_periods_but_not_room() {
        let a = MergedCourseRecord::from_raw(&raw_record("C1", &mask_with([0]).to_string(), 1, &[0, 1])).unwrap();
        let b = MergedCourseRecord::from_raw(&raw_record("C1", &mask_with(1..53).to_string(), 1, &[4])).unwrap();
        assert!(a.can_merge_with(&b));

        let mut other_room = b.clone();
        other_room.room_id = "R202".into();
        assert!(!a.can_merge_with(&other_room));

        assert!(!a.can_merge_with(&a.clone()), "identical masks are not halves");
    }

    #[test]
    fn raw_record_parses_from_scraper_json() {
        let json = format!(
            r#"{{"teacherId":"T9","teacherName":"Zhang","courseId":"MATH101","courseName":"Calculus",
                "roomId":"R7","roomName":"D204","weekMask":"{}","dayOfWeek":4,"periods":[8,9]}}"#,
            mask_with([0]).to_string()
        );
        let raw: RawCourseRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(raw.day_of_week, Some(4));
        assert_eq!(raw.periods, vec![8, 9]);
    }
}
