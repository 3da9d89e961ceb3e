//! Calendar of globally observable time points.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use triad_types::SeasonDay;

/// Sorted mapping of season days to the instant each day started.
///
/// Snapshots are only materialized at these points; anything that happens
/// between two points is first observable at the later one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    days: BTreeMap<SeasonDay, DateTime<Utc>>,
    points: Vec<DateTime<Utc>>,
}

impl Timeline {
    /// Build a timeline from `(day, start instant)` pairs in any order.
    ///
    /// Later duplicates of a day replace earlier ones.
    pub fn new<I>(days: I) -> Self
    where
        I: IntoIterator<Item = (SeasonDay, DateTime<Utc>)>,
    {
        let days: BTreeMap<_, _> = days.into_iter().collect();
        let mut points: Vec<_> = days.values().copied().collect();
        points.sort_unstable();
        points.dedup();
        Self { days, points }
    }

    /// Number of distinct days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// True when no day is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Instant at which `day` started, if it has been observed.
    #[must_use]
    pub fn resolve(&self, day: SeasonDay) -> Option<DateTime<Utc>> {
        self.days.get(&day).copied()
    }

    /// All observable instants, ascending.
    #[must_use]
    pub fn points(&self) -> &[DateTime<Utc>] {
        &self.points
    }

    /// Instants in `(lower, upper]`; `upper = None` is unbounded.
    #[must_use]
    pub fn points_between(
        &self,
        lower: DateTime<Utc>,
        upper: Option<DateTime<Utc>>,
    ) -> &[DateTime<Utc>] {
        let from = self.points.partition_point(|p| *p <= lower);
        let to = upper.map_or(self.points.len(), |u| self.points.partition_point(|p| *p <= u));
        if from >= to {
            return &[];
        }
        &self.points[from..to]
    }

    /// The most recent observable instant.
    #[must_use]
    pub fn latest(&self) -> Option<DateTime<Utc>> {
        self.points.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triad_types::SpecialDay;

    fn ts(s: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(s, 0).unwrap()
    }

    fn fixture() -> Timeline {
        Timeline::new([
            (SeasonDay::new(1, 2), ts(200)),
            (SeasonDay::new(1, 1), ts(100)),
            (SeasonDay::special(1, SpecialDay::Holiday), ts(300)),
        ])
    }

    #[test]
    fn points_are_sorted() {
        assert_eq!(fixture().points(), &[ts(100), ts(200), ts(300)]);
        assert_eq!(fixture().latest(), Some(ts(300)));
    }

    #[test]
    fn points_between_is_open_below_closed_above() {
        let t = fixture();
        assert_eq!(t.points_between(ts(100), Some(ts(200))), &[ts(200)]);
        assert_eq!(t.points_between(ts(99), None), &[ts(100), ts(200), ts(300)]);
        assert!(t.points_between(ts(300), None).is_empty());
        assert!(t.points_between(ts(250), Some(ts(120))).is_empty());
    }
}
