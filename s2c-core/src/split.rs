//! Splitting long classes at the lunch and dinner breaks.

use crate::record::MergedCourseRecord;

/// Last morning period (0-based index).
const MORNING_END: u8 = 3;
/// Last afternoon period (0-based index).
const AFTERNOON_END: u8 = 7;

/// Period blocks that become separate events.
///
/// With splitting disabled the record's whole period set is one block.
/// Otherwise periods fall into morning (0-3), afternoon (4-7) and
/// evening (8 and up) blocks, and empty blocks are dropped.
pub fn split_blocks(record: &MergedCourseRecord, split_cross_break: bool) -> Vec<MergedCourseRecord> {
    if !split_cross_break {
        return vec![record.clone()];
    }

    let mut morning = Vec::new();
    let mut afternoon = Vec::new();
    let mut evening = Vec::new();

    for &period in &record.periods {
        match period {
            0..=MORNING_END => morning.push(period),
            p if p <= AFTERNOON_END => afternoon.push(period),
            _ => evening.push(period),
        }
    }

    [morning, afternoon, evening]
        .into_iter()
        .filter(|block| !block.is_empty())
        .map(|block| record.with_periods(block))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::raw_record;
    use crate::week_mask::mask_with;

    fn record(periods: &[u8]) -> MergedCourseRecord {
        MergedCourseRecord::from_raw(&raw_record("C1", &mask_with(0..18).to_string(), 0, periods)).unwrap()
    }

    #[test]
    fn disabled_keeps_one_block() {
        let blocks = split_blocks(&record(&[2, 3, 4, 5]), false);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].periods, vec![2, 3, 4, 5]);
    }

    #[test]
    fn splits_across_lunch_and_dinner() {
        let blocks = split_blocks(&record(&[3, 4, 7, 8, 12]), true);
        let periods: Vec<_> = blocks.iter().map(|b| b.periods.clone()).collect();
        assert_eq!(periods, vec![vec![3], vec![4, 7], vec![8, 12]]);
    }

    #[test]
    fn single_block_class_is_untouched() {
        let blocks = split_blocks(&record(&[4, 5]), true);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0], record(&[4, 5]));
    }
}
