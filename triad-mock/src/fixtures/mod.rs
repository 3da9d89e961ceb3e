//! The deterministic fixture league.
//!
//! Every player exercises one path of the triangulation driver. Calendar
//! points come from [`instant`]; feed events happen [`during`] a day, after
//! its start. The calendar covers seasons 1 to 5.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use triad_core::{
    Attribute, CategoryTalk, FeedEntry, FeedLink, PlayerRecord, TalkRecord, TeamId,
};

use crate::League;

mod calendar;

pub use calendar::{DAYS, SEASONS, days, during, instant};

/// Recomposed during S3 D60 from Bob Jones into Alice Smith.
pub const RENAMED: &str = "p-renamed";
/// Talk at S4 D60 contradicts the bonus logged at S4 D121.
pub const CONTRADICTION: &str = "p-contradiction";
/// Season 1 player whose early gains only appear in the team feed.
pub const VETERAN: &str = "p-veteran";
/// Feed carries a misspelled gain that the exception table excuses.
pub const EXCUSED: &str = "p-excused";
/// Has an identity but no talk; yields no rows.
pub const SILENT: &str = "p-silent";
/// Fails every call.
pub const FAIL: &str = "FAIL";
/// Answers after a short delay.
pub const TIMEOUT: &str = "TIMEOUT";

/// Team the veteran played for on S2 D1.
pub const LANTERNS: &str = "t-lanterns";

/// Feed ordinal of the misspelled gain in [`EXCUSED`]'s feed.
pub const EXCUSED_ORDINAL: usize = 1;

/// Identity version valid from `at`.
#[must_use]
pub fn player(at: DateTime<Utc>, first: &str, last: &str, birth_season: u32) -> PlayerRecord {
    PlayerRecord {
        valid_from: at,
        first_name: first.to_string(),
        last_name: last.to_string(),
        birth_season,
        team_id: None,
    }
}

/// Talk version valid from `at` with the given star counts.
#[must_use]
pub fn talk(at: DateTime<Utc>, stars: &[(Attribute, usize)]) -> TalkRecord {
    let mut categories = BTreeMap::new();
    for (attribute, n) in stars {
        categories
            .entry(attribute.category())
            .or_insert_with(CategoryTalk::default)
            .stars
            .insert(*attribute, "★".repeat(*n));
    }
    TalkRecord {
        valid_from: at,
        categories,
    }
}

/// Feed entry of the given type.
#[must_use]
pub fn entry(at: DateTime<Utc>, kind: &str, text: &str) -> FeedEntry {
    FeedEntry {
        ts: at,
        kind: kind.to_string(),
        text: text.to_string(),
        links: Vec::new(),
    }
}

fn linked(mut e: FeedEntry, player_id: &str) -> FeedEntry {
    e.links.push(FeedLink {
        kind: "player".to_string(),
        id: player_id.to_string(),
    });
    e
}

/// The full fixture league.
#[must_use]
pub fn league() -> League {
    let league = League::empty().with_calendar(days());
    let league = renamed(league);
    let league = contradiction(league);
    let league = veteran(league);
    let league = excused(league);
    league
        .with_player(SILENT, player(instant(1, 1), "Gus", "Hale", 3))
        .enroll(SILENT)
        .enroll(FAIL)
}

fn renamed(league: League) -> League {
    league
        .with_player(RENAMED, player(instant(1, 1), "Bob", "Jones", 2))
        .with_player(RENAMED, player(during(3, 60), "Alice", "Smith", 2))
        .with_talk(
            RENAMED,
            talk(instant(5, 1), &[(Attribute::Contact, 2), (Attribute::Aiming, 3)]),
        )
        .with_player_feed(
            RENAMED,
            vec![
                entry(during(2, 60), "augment", "Bob Jones gained +10 Contact."),
                entry(
                    during(3, 60),
                    "recomposition",
                    "Bob Jones was Recomposed into Alice Smith.",
                ),
                entry(during(3, 120), "augment", "Alice Smith gained +5 Aiming."),
                entry(during(3, 121), "game", "Alice Smith hit a home run!"),
            ],
        )
        .enroll(RENAMED)
}

fn contradiction(league: League) -> League {
    league
        .with_player(CONTRADICTION, player(instant(1, 1), "Carl", "Ray", 3))
        .with_talk(CONTRADICTION, talk(instant(4, 60), &[(Attribute::Contact, 4)]))
        .with_talk(CONTRADICTION, talk(instant(5, 1), &[(Attribute::Contact, 2)]))
        .with_player_feed(
            CONTRADICTION,
            vec![entry(during(4, 121), "augment", "Carl Ray gained +30 Contact.")],
        )
        .enroll(CONTRADICTION)
}

fn veteran(league: League) -> League {
    let mut on_lanterns = player(instant(2, 1), "Dana", "Moss", 1);
    on_lanterns.team_id = Some(TeamId::from(LANTERNS));
    league
        .with_player(VETERAN, player(instant(1, 1), "Dana", "Moss", 1))
        .with_player(VETERAN, on_lanterns)
        .with_talk(VETERAN, talk(instant(5, 1), &[(Attribute::Contact, 3)]))
        .with_player_feed(
            VETERAN,
            vec![entry(during(3, 1), "augment", "Dana Moss gained +5 Speed.")],
        )
        .with_team_feed(
            LANTERNS,
            vec![
                entry(during(1, 2), "game", "Dana Moss gained +3 Contact."),
                entry(during(1, 60), "augment", "Dana Moss gained +50 Aiming."),
                entry(during(1, 120), "augment", "Dana Moss gained +20 Contact."),
                linked(
                    entry(during(3, 1), "augment", "Dana Moss gained +5 Speed."),
                    VETERAN,
                ),
                entry(during(3, 2), "augment", "Gus Hale gained +9 Contact."),
            ],
        )
        .enroll(VETERAN)
}

fn excused(league: League) -> League {
    league
        .with_player(EXCUSED, player(instant(1, 1), "Eve", "Park", 2))
        .with_talk(EXCUSED, talk(instant(5, 1), &[(Attribute::Contact, 2)]))
        .with_player_feed(
            EXCUSED,
            vec![
                entry(during(2, 1), "augment", "Eve Park gained +5 Contact."),
                entry(during(2, 60), "augment", "Evelyn Park gained +5 Contact."),
            ],
        )
        .enroll(EXCUSED)
}
