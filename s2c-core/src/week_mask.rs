//! Week mask decoding.
//!
//! The source timetable marks the weeks a class meets with a string of 53
//! `'0'`/`'1'` characters, one per week of the year. A mask can grow past 53
//! characters in two ways: wrap-around normalization (52 zeros prepended) and
//! the concatenation of two split records. Only freshly parsed masks are
//! required to be exactly 53 long.

use std::fmt;
use std::str::FromStr;

/// Length of a week mask as delivered by the source system.
pub const WEEK_MASK_LEN: usize = 53;

/// A mask that failed to parse. Holds the offending input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMask(pub String);

/// Which weeks of the academic year a class meets in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeekMask {
    bits: Vec<bool>,
}

/// A maximal range of consecutive occupied weeks, inclusive, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRun {
    pub start: usize,
    pub end: usize,
}

impl FromStr for WeekMask {
    type Err = InvalidMask;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.chars().count() != WEEK_MASK_LEN {
            return Err(InvalidMask(s.to_string()));
        }

        let bits = s
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(InvalidMask(s.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WeekMask { bits })
    }
}

impl WeekMask {
    /// True if this mask still has the length the source system emits.
    pub fn is_source_length(&self) -> bool {
        self.bits.len() == WEEK_MASK_LEN
    }

    pub fn is_set(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    /// Number of occupied weeks.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Maximal runs of occupied weeks, in ascending order.
    pub fn runs(&self) -> Vec<WeekRun> {
        let mut runs = Vec::new();
        let mut open: Option<usize> = None;

        for (index, &bit) in self.bits.iter().enumerate() {
            match (bit, open) {
                (true, None) => open = Some(index),
                (false, Some(start)) => {
                    runs.push(WeekRun {
                        start,
                        end: index - 1,
                    });
                    open = None;
                }
                _ => {}
            }
        }

        if let Some(start) = open {
            runs.push(WeekRun {
                start,
                end: self.bits.len() - 1,
            });
        }

        runs
    }

    /// True if any week before the term's occupancy origin is set, i.e. a
    /// `'1'` within `[0, occupy_week - 1)`.
    ///
    /// Those positions can only be occupied by weeks that belong to the next
    /// calendar year, which is how split records reveal which half is later.
    pub fn has_bit_before(&self, occupy_week: u32) -> bool {
        let prefix = (occupy_week.saturating_sub(1) as usize).min(self.bits.len());
        self.bits[..prefix].iter().any(|b| *b)
    }

    /// Detects the wrap-around encoding: a week before the occupancy origin is
    /// set while week 0 itself is free.
    pub fn overflows(&self, occupy_week: u32) -> bool {
        !self.is_set(0) && self.has_bit_before(occupy_week)
    }

    /// Undo the wrap-around encoding by shifting the mask 52 weeks later.
    /// Masks that do not overflow are returned unchanged.
    pub fn normalize(self, occupy_week: u32) -> Self {
        if !self.overflows(occupy_week) {
            return self;
        }

        let mut bits = vec![false; WEEK_MASK_LEN - 1];
        bits.extend(self.bits);
        WeekMask { bits }
    }

    /// Append `later` after this mask. Split records are joined this way, never
    /// with a bitwise OR.
    pub fn concat(&self, later: &WeekMask) -> WeekMask {
        let mut bits = Vec::with_capacity(self.bits.len() + later.bits.len());
        bits.extend_from_slice(&self.bits);
        bits.extend_from_slice(&later.bits);
        WeekMask { bits }
    }
}

impl fmt::Display for WeekMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.bits {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn mask_with(ones: impl IntoIterator<Item = usize>) -> WeekMask {
    let mut chars = vec!['0'; WEEK_MASK_LEN];
    for i in ones {
        chars[i] = '1';
    }
    chars.into_iter().collect::<String>().parse().unwrap()
}
