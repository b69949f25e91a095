//! Period index to wall-clock time mapping.
//!
//! Period indices are display positions on the timetable page, not clock
//! order: the two late-afternoon periods (12 and 13) were added after the
//! evening periods were numbered. Every "earliest"/"latest" decision goes
//! through the rank table.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{S2cError, S2cResult};

/// A time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    pub const fn new(hour: u8, minute: u8) -> Self {
        ClockTime { hour, minute }
    }

    /// Offset from midnight.
    pub fn since_midnight(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.hour) * 60 + i64::from(self.minute))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let parse = || -> Option<ClockTime> {
            let (hour, minute) = value.trim().split_once(':')?;
            let hour: u8 = hour.parse().ok()?;
            let minute: u8 = minute.parse().ok()?;
            (hour < 24 && minute < 60).then_some(ClockTime { hour, minute })
        };
        parse().ok_or_else(|| format!("Invalid clock time '{value}'. Expected HH:MM"))
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Start and end of one teaching period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSlot {
    pub start: ClockTime,
    pub end: ClockTime,
}

const fn slot(start: (u8, u8), end: (u8, u8)) -> PeriodSlot {
    PeriodSlot {
        start: ClockTime::new(start.0, start.1),
        end: ClockTime::new(end.0, end.1),
    }
}

/// The institution's official periods, indexed as on the timetable page.
pub(crate) const STANDARD_SLOTS: [PeriodSlot; 14] = [
    slot((8, 15), (9, 0)),
    slot((9, 0), (9, 45)),
    slot((10, 5), (10, 50)),
    slot((10, 50), (11, 35)),
    slot((13, 0), (13, 45)),
    slot((13, 45), (14, 30)),
    slot((14, 50), (15, 35)),
    slot((15, 35), (16, 20)),
    slot((18, 0), (18, 45)),
    slot((18, 45), (19, 30)),
    slot((19, 30), (20, 15)),
    slot((20, 15), (21, 0)),
    slot((16, 30), (17, 15)),
    slot((17, 15), (18, 0)),
];

/// Chronological position of each standard period.
const STANDARD_RANK: [u8; 14] = [1, 2, 3, 4, 5, 6, 7, 8, 11, 12, 13, 14, 9, 10];

/// Buildings D, E and F run their late-morning periods 20 minutes later.
const DEF_BUILDINGS: [char; 3] = ['D', 'E', 'F'];
const DEF_SLOTS: [(u8, PeriodSlot); 2] = [
    (2, slot((10, 25), (11, 10))),
    (3, slot((11, 10), (11, 55))),
];

/// Alternate period times for rooms in particular buildings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingOverride {
    /// First character of the room name identifying the building.
    pub buildings: Vec<char>,
    /// Replacement slots keyed by period index.
    pub slots: Vec<(u8, PeriodSlot)>,
}

impl BuildingOverride {
    fn applies_to_room(&self, room_name: &str) -> bool {
        room_name
            .chars()
            .next()
            .is_some_and(|c| self.buildings.contains(&c))
    }

    fn slot(&self, period: u8) -> Option<PeriodSlot> {
        self.slots
            .iter()
            .find(|(p, _)| *p == period)
            .map(|(_, slot)| *slot)
    }
}

/// Resolved clock range of one block of consecutive periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    /// Chronologically earliest period of the block.
    pub first_period: u8,
    /// Chronologically latest period of the block.
    pub last_period: u8,
    pub start: ClockTime,
    pub end: ClockTime,
    /// Whether building-specific times were used.
    pub building_override: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timetable {
    slots: Vec<PeriodSlot>,
    rank: Vec<u8>,
    building_override: Option<BuildingOverride>,
}

impl Default for Timetable {
    fn default() -> Self {
        Timetable::standard()
    }
}

impl Timetable {
    /// The official 14-period day, with its non-monotonic rank table and the
    /// D/E/F building override.
    pub fn standard() -> Self {
        Timetable {
            slots: STANDARD_SLOTS.to_vec(),
            rank: STANDARD_RANK.to_vec(),
            building_override: Some(BuildingOverride {
                buildings: DEF_BUILDINGS.to_vec(),
                slots: DEF_SLOTS.to_vec(),
            }),
        }
    }

    /// A custom timetable. Without an explicit rank table periods are
    /// ordered by index.
    pub fn new(slots: Vec<PeriodSlot>, rank: Option<Vec<u8>>) -> S2cResult<Self> {
        if slots.is_empty() || slots.len() > usize::from(u8::MAX) {
            return Err(S2cError::InvalidConfiguration(format!(
                "timetable must have between 1 and 255 periods, got {}",
                slots.len()
            )));
        }

        if let Some(bad) = slots.iter().position(|s| s.start >= s.end) {
            return Err(S2cError::InvalidConfiguration(format!(
                "period {bad} ends before it starts ({} - {})",
                slots[bad].start, slots[bad].end
            )));
        }

        let rank = match rank {
            Some(rank) => {
                let mut sorted = rank.clone();
                sorted.sort_unstable();
                sorted.dedup();
                if rank.len() != slots.len() || sorted.len() != rank.len() {
                    return Err(S2cError::InvalidConfiguration(format!(
                        "rank table must hold {} distinct entries, got {:?}",
                        slots.len(),
                        rank
                    )));
                }
                rank
            }
            None => (0..slots.len() as u8).collect(),
        };

        Ok(Timetable {
            slots,
            rank,
            building_override: None,
        })
    }

    /// Attach building-specific times. Every overridden period must exist in
    /// this table.
    pub fn with_building_override(mut self, building_override: BuildingOverride) -> S2cResult<Self> {
        if building_override.buildings.is_empty() {
            return Err(S2cError::InvalidConfiguration(
                "building override names no buildings".into(),
            ));
        }

        for (period, slot) in &building_override.slots {
            if usize::from(*period) >= self.slots.len() {
                return Err(S2cError::InvalidConfiguration(format!(
                    "building override references unknown period {period}"
                )));
            }
            if slot.start >= slot.end {
                return Err(S2cError::InvalidConfiguration(format!(
                    "overridden period {period} ends before it starts ({} - {})",
                    slot.start, slot.end
                )));
            }
        }

        self.building_override = Some(building_override);
        Ok(self)
    }

    pub fn has_building_override(&self) -> bool {
        self.building_override.is_some()
    }

    pub fn slot(&self, period: u8) -> Option<PeriodSlot> {
        self.slots.get(usize::from(period)).copied()
    }

    /// Chronological position of a period. Unknown periods sort last.
    pub fn rank(&self, period: u8) -> u8 {
        self.rank
            .get(usize::from(period))
            .copied()
            .unwrap_or(u8::MAX)
    }

    /// Periods sorted by clock time rather than by index.
    pub fn chronological(&self, periods: &[u8]) -> Vec<u8> {
        let mut sorted = periods.to_vec();
        sorted.sort_by_key(|p| (self.rank(*p), *p));
        sorted
    }

    /// Clock range covered by a block of periods held in `room_name`.
    ///
    /// The building override is only used when enabled and when both ends of
    /// the block are overridden periods.
    pub fn resolve(
        &self,
        course_id: &str,
        periods: &[u8],
        room_name: &str,
        apply_building_override: bool,
    ) -> S2cResult<BlockSpan> {
        if let Some(&period) = periods.iter().find(|p| usize::from(**p) >= self.slots.len()) {
            return Err(S2cError::UnknownPeriod {
                course_id: course_id.to_string(),
                period,
            });
        }

        let ordered = self.chronological(periods);
        let (Some(&first), Some(&last)) = (ordered.first(), ordered.last()) else {
            return Err(S2cError::MissingScheduleFields {
                course_id: course_id.to_string(),
                field: "periods",
            });
        };

        let overridden = self
            .building_override
            .as_ref()
            .filter(|_| apply_building_override)
            .filter(|o| o.applies_to_room(room_name))
            .and_then(|o| Some((o.slot(first)?, o.slot(last)?)));

        let span = match overridden {
            Some((first_slot, last_slot)) => BlockSpan {
                first_period: first,
                last_period: last,
                start: first_slot.start,
                end: last_slot.end,
                building_override: true,
            },
            None => BlockSpan {
                first_period: first,
                last_period: last,
                start: self.slots[usize::from(first)].start,
                end: self.slots[usize::from(last)].end,
                building_override: false,
            },
        };

        if span.building_override {
            tracing::debug!(course_id, room_name, "using building-specific period times");
        }

        Ok(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_rank_puts_late_afternoon_before_evening() {
        let table = Timetable::standard();
        assert!(table.rank(12) < table.rank(9));
        assert!(table.rank(13) < table.rank(8));
        assert_eq!(table.chronological(&[9, 12, 8, 13]), vec![12, 13, 8, 9]);
    }

    #[test]
    fn custom_table_without_rank_orders_numerically() {
        let table = Timetable::new(STANDARD_SLOTS.to_vec(), None).unwrap();
        assert!(table.rank(9) < table.rank(12));
        assert_eq!(table.chronological(&[12, 9]), vec![9, 12]);
    }

    #[test]
    fn morning_block() {
        let span = Timetable::standard().resolve("C1", &[0, 1], "A101", false).unwrap();
        assert_eq!(span.start, ClockTime::new(8, 15));
        assert_eq!(span.end, ClockTime::new(9, 45));
        assert!(!span.building_override);
    }

    #[test]
    fn block_crossing_the_reordered_periods() {
        let span = Timetable::standard().resolve("C1", &[9, 12, 13, 8], "A101", false).unwrap();
        assert_eq!((span.first_period, span.last_period), (12, 9));
        assert_eq!(span.start, ClockTime::new(16, 30));
        assert_eq!(span.end, ClockTime::new(19, 30));
    }

    #[test]
    fn building_override_for_def_rooms() {
        let table = Timetable::standard();

        let span = table.resolve("C1", &[2, 3], "D204", true).unwrap();
        assert_eq!((span.start, span.end), (ClockTime::new(10, 25), ClockTime::new(11, 55)));
        assert!(span.building_override);

        let span = table.resolve("C1", &[3], "F110", true).unwrap();
        assert_eq!((span.start, span.end), (ClockTime::new(11, 10), ClockTime::new(11, 55)));
    }

    #[test]
    fn building_override_needs_flag_room_and_both_ends() {
        let table = Timetable::standard();

        let off = table.resolve("C1", &[2, 3], "D204", false).unwrap();
        assert_eq!((off.start, off.end), (ClockTime::new(10, 5), ClockTime::new(11, 35)));

        let other_building = table.resolve("C1", &[2, 3], "A204", true).unwrap();
        assert!(!other_building.building_override);

        let wider_block = table.resolve("C1", &[1, 2, 3], "E301", true).unwrap();
        assert!(!wider_block.building_override);
        assert_eq!(wider_block.end, ClockTime::new(11, 35));
    }

    #[test]
    fn custom_table_takes_a_building_override() {
        let table = Timetable::new(STANDARD_SLOTS.to_vec(), None)
            .unwrap()
            .with_building_override(BuildingOverride {
                buildings: vec!['D'],
                slots: DEF_SLOTS.to_vec(),
            })
            .unwrap();

        assert!(table.has_building_override());
        let span = table.resolve("C1", &[2, 3], "D204", true).unwrap();
        assert_eq!((span.start, span.end), (ClockTime::new(10, 25), ClockTime::new(11, 55)));
        assert!(span.building_override);

        let span = table.resolve("C1", &[2, 3], "E204", true).unwrap();
        assert!(!span.building_override, "only building D was listed");
    }

    #[test]
    fn building_override_must_fit_the_table() {
        let short = Timetable::new(STANDARD_SLOTS[..3].to_vec(), None).unwrap();
        let err = short
            .with_building_override(BuildingOverride {
                buildings: vec!['D'],
                slots: DEF_SLOTS.to_vec(),
            })
            .unwrap_err();
        assert!(matches!(err, S2cError::InvalidConfiguration(_)), "got {err:?}");

        let table = Timetable::new(STANDARD_SLOTS.to_vec(), None).unwrap();
        assert!(!table.has_building_override());
        assert!(
            table
                .with_building_override(BuildingOverride {
                    buildings: Vec::new(),
                    slots: DEF_SLOTS.to_vec(),
                })
                .is_err()
        );
    }

    #[test]
    fn unknown_period_is_rejected() {
        let err = Timetable::standard().resolve("C1", &[0, 14], "A101", false).unwrap_err();
        assert!(
            matches!(err, S2cError::UnknownPeriod { period: 14, .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn new_validates_rank_table() {
        let slots = STANDARD_SLOTS[..3].to_vec();
        assert!(Timetable::new(slots.clone(), Some(vec![0, 1])).is_err());
        assert!(Timetable::new(slots.clone(), Some(vec![0, 0, 1])).is_err());
        assert!(Timetable::new(slots, Some(vec![2, 0, 1])).is_ok());
    }

    #[test]
    fn clock_time_parses_and_formats() {
        let t = ClockTime::try_from("8:05".to_string()).unwrap();
        assert_eq!(t.to_string(), "08:05");
        assert!(ClockTime::try_from("24:00".to_string()).is_err());
        assert!(ClockTime::try_from("noon".to_string()).is_err());
    }
}
