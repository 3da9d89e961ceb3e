use chrono::{DateTime, Duration, TimeZone, Utc};
use triad_core::SeasonDay;

/// Regular days observed in every fixture season.
pub const DAYS: [u16; 6] = [1, 2, 3, 60, 120, 121];

/// Seasons covered by the fixture calendar.
pub const SEASONS: std::ops::RangeInclusive<u32> = 1..=5;

/// Start instant of a fixture season day: one hour per day, 200 hours per season.
#[must_use]
pub fn instant(season: u32, day: u16) -> DateTime<Utc> {
    let base = Utc
        .with_ymd_and_hms(2025, 3, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH);
    base + Duration::hours(i64::from(season - 1) * 200 + i64::from(day))
}

/// An instant inside a fixture season day, after its start.
#[must_use]
pub fn during(season: u32, day: u16) -> DateTime<Utc> {
    instant(season, day) + Duration::minutes(30)
}

/// Every fixture season day with its start instant, in calendar order.
#[must_use]
pub fn days() -> Vec<(SeasonDay, DateTime<Utc>)> {
    SEASONS
        .flat_map(|s| {
            DAYS.iter()
                .map(move |d| (SeasonDay::new(s, *d), instant(s, *d)))
        })
        .collect()
}
