//! Season/day coordinates of the simulation calendar.

use core::cmp::Ordering;
use core::fmt;

use serde::{Deserialize, Serialize};

/// Named days that do not carry a regular day number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialDay {
    /// Before day 1.
    Preseason,
    /// First superstar break day.
    SuperstarDay1,
    /// Second superstar break day.
    SuperstarDay2,
    /// End-of-season election.
    Election,
    /// Post-election holiday.
    Holiday,
    /// Mid-season special event.
    SpecialEvent,
    /// Generic event day.
    Event,
}

impl SpecialDay {
    /// Position in tenths of a day, interpolated between regular days.
    const fn tenths(self) -> u32 {
        match self {
            Self::Preseason => 0,
            Self::SpecialEvent | Self::Event => 10,
            Self::SuperstarDay1 => 1201,
            Self::SuperstarDay2 => 1202,
            Self::Election => 3000,
            Self::Holiday => 3010,
        }
    }

    const fn rank(self) -> u8 {
        self as u8
    }
}

/// A day within a season: either numbered or one of the named special days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Day {
    /// Regular numbered day.
    Regular(u16),
    /// Named special day.
    Special(SpecialDay),
}

impl Day {
    /// Sort key: interpolated position, then a tiebreak so the order stays total.
    const fn sort_key(self) -> (u32, u8) {
        match self {
            Self::Regular(d) => (d as u32 * 10, 0),
            Self::Special(s) => (s.tenths(), s.rank() + 1),
        }
    }
}

impl Ord for Day {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Day {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regular(d) => write!(f, "{d}"),
            Self::Special(s) => write!(f, "{s:?}"),
        }
    }
}

/// A point on the simulation calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeasonDay {
    /// Season number.
    pub season: u32,
    /// Day within the season.
    pub day: Day,
}

impl SeasonDay {
    /// Regular numbered day of a season.
    #[must_use]
    pub const fn new(season: u32, day: u16) -> Self {
        Self {
            season,
            day: Day::Regular(day),
        }
    }

    /// Named special day of a season.
    #[must_use]
    pub const fn special(season: u32, day: SpecialDay) -> Self {
        Self {
            season,
            day: Day::Special(day),
        }
    }
}

impl fmt::Display for SeasonDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{} D{}", self.season, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superstar_days_sort_between_regular_days() {
        let d120 = SeasonDay::new(4, 120);
        let ss1 = SeasonDay::special(4, SpecialDay::SuperstarDay1);
        let ss2 = SeasonDay::special(4, SpecialDay::SuperstarDay2);
        let d121 = SeasonDay::new(4, 121);
        assert!(d120 < ss1 && ss1 < ss2 && ss2 < d121);
    }

    #[test]
    fn seasons_dominate_days() {
        assert!(SeasonDay::special(1, SpecialDay::Holiday) < SeasonDay::new(2, 1));
        assert!(SeasonDay::special(2, SpecialDay::Preseason) < SeasonDay::new(2, 1));
    }

    #[test]
    fn event_ties_with_day_one_but_orders_deterministically() {
        let d1 = Day::Regular(1);
        let ev = Day::Special(SpecialDay::Event);
        let sp = Day::Special(SpecialDay::SpecialEvent);
        assert!(d1 < sp && sp < ev);
    }
}
