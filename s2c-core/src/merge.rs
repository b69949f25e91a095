//! Reassembling classes the source system split across two records.
//!
//! When a term runs past the end of the 53-week mask, the source emits the
//! overflowing weeks as a second record that is identical except for its mask.
//! Merging runs in two phases: records are first validated, normalized and
//! bucketed by course id in input order, then each bucket is folded so that
//! matching halves are concatenated.

use indexmap::IndexMap;

use crate::error::{S2cError, S2cResult};
use crate::record::{MergedCourseRecord, RawCourseRecord};
use crate::term::TermWindow;

/// Merged records grouped by course id, in first-seen order.
pub type CourseBuckets = IndexMap<String, Vec<MergedCourseRecord>>;

/// Validate, normalize and merge the scraped records of one term.
pub fn merge_records(records: &[RawCourseRecord], term: &TermWindow) -> S2cResult<CourseBuckets> {
    let buckets = bucket_records(records, term)?;
    let needs_merge = term.needs_merge();

    buckets
        .into_iter()
        .map(|(course_id, bucket)| {
            let merged = merge_bucket(bucket, term.all_occupy_week, needs_merge)?;
            Ok((course_id, merged))
        })
        .collect()
}

/// Phase one: an append-only multimap from course id to its records.
fn bucket_records(records: &[RawCourseRecord], term: &TermWindow) -> S2cResult<CourseBuckets> {
    let mut buckets = CourseBuckets::new();

    for raw in records {
        let mut record = MergedCourseRecord::from_raw(raw)?;

        if record.week_mask.overflows(term.all_occupy_week) {
            tracing::debug!(
                course_id = %record.course_id,
                mask = %record.week_mask,
                weeks = record.week_mask.count_ones(),
                "week mask wraps around the year, shifting by 52 weeks"
            );
            record.week_mask = record.week_mask.normalize(term.all_occupy_week);
        }

        buckets
            .entry(record.course_id.clone())
            .or_default()
            .push(record);
    }

    Ok(buckets)
}

/// Phase two: fold one course's records, joining split halves.
fn merge_bucket(
    records: Vec<MergedCourseRecord>,
    occupy_week: u32,
    needs_merge: bool,
) -> S2cResult<Vec<MergedCourseRecord>> {
    let mut merged: Vec<MergedCourseRecord> = Vec::with_capacity(records.len());

    for record in records {
        if !needs_merge {
            merged.push(record);
            continue;
        }

        match merged.iter().position(|existing| existing.can_merge_with(&record)) {
            Some(index) => {
                let joined = join_halves(&merged[index], record, occupy_week)?;
                merged[index] = joined;
            }
            None => merged.push(record),
        }
    }

    Ok(merged)
}

/// Concatenate two halves in chronological order.
///
/// The half holding the later weeks is the one with an occupied week before
/// the occupancy origin; exactly one half must qualify. The earlier half keeps
/// its identity and periods.
fn join_halves(
    existing: &MergedCourseRecord,
    incoming: MergedCourseRecord,
    occupy_week: u32,
) -> S2cResult<MergedCourseRecord> {
    let existing_is_later = existing.week_mask.has_bit_before(occupy_week);
    let incoming_is_later = incoming.week_mask.has_bit_before(occupy_week);

    let (earlier, later) = match (existing_is_later, incoming_is_later) {
        (false, true) => (existing.clone(), incoming),
        (true, false) => (incoming, existing.clone()),
        (true, true) => {
            return Err(S2cError::UnmergeableConflict {
                course_id: incoming.course_id,
                reason: format!(
                    "both halves occupy weeks before week {occupy_week}, cannot tell which is later"
                ),
            });
        }
        (false, false) => {
            return Err(S2cError::UnmergeableConflict {
                course_id: incoming.course_id,
                reason: format!(
                    "neither half occupies weeks before week {occupy_week}, cannot tell which is later"
                ),
            });
        }
    };

    tracing::debug!(
        course_id = %earlier.course_id,
        earlier = %earlier.week_mask,
        later = %later.week_mask,
        "merging split course records"
    );

    Ok(MergedCourseRecord {
        week_mask: earlier.week_mask.concat(&later.week_mask),
        ..earlier
    })
}
