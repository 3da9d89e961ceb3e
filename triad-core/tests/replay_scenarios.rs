use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use triad_core::{
    Attribute, CategoryTalk, Category, EpochPrior, Interval, NameHistory, PlayerHistory, PlayerId,
    ReplayState, SeasonDay, TalkRecord, Timeline, TriadError,
};

fn ts(s: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(s, 0).unwrap()
}

fn talk(at: i64, stars: &[(Attribute, usize)]) -> TalkRecord {
    let mut categories: BTreeMap<Category, CategoryTalk> = BTreeMap::new();
    for (a, n) in stars {
        categories
            .entry(a.category())
            .or_default()
            .stars
            .insert(*a, "★".repeat(*n));
    }
    TalkRecord {
        valid_from: ts(at),
        categories,
    }
}

fn daily_timeline(days: u16) -> Timeline {
    Timeline::new((1..=days).map(|d| (SeasonDay::new(3, d), ts(i64::from(d) * 100))))
}

#[test]
fn contradictory_ratings_name_the_attribute() {
    let mut h: PlayerHistory = PlayerHistory::new(PlayerId::from("p1"), "Alice Smith");
    h.apply_talk(&talk(900, &[(Attribute::Contact, 2)])).unwrap();
    let err = h.apply_talk(&talk(800, &[(Attribute::Contact, 3)])).unwrap_err();
    match err {
        TriadError::ImpossibleInterval {
            player_id,
            player_name,
            attribute,
            ..
        } => {
            assert_eq!(player_id.as_str(), "p1");
            assert_eq!(player_name, "Alice Smith");
            assert_eq!(attribute, "Contact");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn rename_splits_into_two_epochs() {
    let mut h: PlayerHistory = PlayerHistory::new(PlayerId::from("p1"), "Bob Jones");
    h.apply_talk(&talk(500, &[(Attribute::Contact, 2)])).unwrap();

    // "Alice Smith was Recomposed into Bob Jones." at t=300
    h.finalize(ts(300), "Bob Jones", None).unwrap();
    h.set_working_name("Alice Smith");
    // "Alice Smith gained +10 Contact." at t=200
    h.add_bonus(ts(200), Attribute::Contact, 10.0).unwrap();
    h.finish(ts(100), None).unwrap();
    assert_eq!(h.state(), ReplayState::Done);

    let epochs = h.compositions();
    assert_eq!(epochs.len(), 2);
    let (bob, alice) = (&epochs[0], &epochs[1]);

    assert_eq!(bob.player_name, "Bob Jones");
    assert_eq!(bob.lifetime.birth, ts(300));
    assert_eq!(bob.lifetime.death, None);
    assert!(bob.bonus_history.is_empty());
    assert_eq!(
        bob.initial_attributes[&Attribute::Contact],
        Interval::from_rating(2)
    );

    assert_eq!(alice.player_name, "Alice Smith");
    assert_eq!(alice.lifetime.birth, ts(100));
    assert_eq!(alice.lifetime.death, Some(ts(300)));
    assert_eq!(
        alice.bonus_history.get(&ts(200)),
        Some(&vec![(Attribute::Contact, 10.0)])
    );
    assert_eq!(alice.initial_attributes[&Attribute::Contact], Interval::DOMAIN);

    assert_eq!(h.current_composition().map(|c| c.player_name.as_str()), Some("Bob Jones"));
    assert_eq!(h.composition_at(ts(250)).map(|c| c.player_name.as_str()), Some("Alice Smith"));
    assert_eq!(h.composition_at(ts(300)).map(|c| c.player_name.as_str()), Some("Alice Smith"));
    assert_eq!(h.composition_at(ts(301)).map(|c| c.player_name.as_str()), Some("Bob Jones"));
    assert!(h.composition_at(ts(50)).is_none());
}

#[test]
fn bonuses_are_subtracted_during_replay_and_readded_forward() {
    let mut h: PlayerHistory = PlayerHistory::new(PlayerId::from("p1"), "Alice Smith");
    h.apply_talk(&talk(900, &[(Attribute::Lift, 4)])).unwrap();
    h.add_bonus(ts(500), Attribute::Lift, 10.0).unwrap();
    assert_eq!(h.working(Attribute::Lift), Interval::new(77.5, 102.5).unwrap());
    h.finish(ts(100), None).unwrap();

    let comp = &h.compositions()[0];
    let before = comp.attributes_at(ts(499)).unwrap();
    let after = comp.attributes_at(ts(500)).unwrap();
    assert_eq!(before[&Attribute::Lift], Interval::new(77.5, 102.5).unwrap());
    assert_eq!(after[&Attribute::Lift], Interval::from_rating(4));
    assert!(matches!(
        comp.attributes_at(ts(50)),
        Err(TriadError::NotAlive { .. })
    ));
}

#[test]
fn first_identity_after_a_rename_is_clamped_to_the_newer_epoch() {
    let mut h: PlayerHistory = PlayerHistory::new(PlayerId::from("p1"), "Alice Smith");
    h.apply_talk(&talk(900, &[(Attribute::Contact, 2)])).unwrap();
    h.finalize(ts(200), "Alice Smith", None).unwrap();
    h.set_working_name("Bob Jones");
    // The identity records only start after the recomposition.
    h.finish(ts(400), None).unwrap();

    let epochs = h.compositions();
    assert_eq!(epochs.len(), 2);
    assert_eq!(epochs[0].lifetime.birth, ts(200));
    assert_eq!(epochs[1].player_name, "Bob Jones");
    assert_eq!(epochs[1].lifetime.birth, ts(200));
    assert_eq!(epochs[1].lifetime.death, Some(ts(200)));

    let names = NameHistory::default();
    let rows: Vec<_> = h.all_versions(&daily_timeline(9), &names).collect();
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|r| r.player_name == "Alice Smith"));
}

#[test]
fn gains_before_the_first_identity_fold_into_the_oldest_epoch() {
    let mut h: PlayerHistory = PlayerHistory::new(PlayerId::from("p1"), "Alice Smith");
    h.apply_talk(&talk(900, &[(Attribute::Contact, 4)])).unwrap();
    h.add_bonus(ts(150), Attribute::Contact, 30.0).unwrap();
    h.finish(ts(300), None).unwrap();

    let comp = &h.compositions()[0];
    assert!(comp.bonus_history.is_empty());
    assert_eq!(
        comp.initial_attributes[&Attribute::Contact],
        Interval::from_rating(4)
    );
    let names = NameHistory::default();
    let last = h.all_versions(&daily_timeline(9), &names).last().unwrap();
    assert_eq!(last.interval(Attribute::Contact), Interval::from_rating(4));
}

#[test]
fn bonus_below_zero_is_a_contradiction() {
    let mut h: PlayerHistory = PlayerHistory::new(PlayerId::from("p1"), "Alice Smith");
    h.apply_talk(&talk(900, &[(Attribute::Speed, 0)])).unwrap();
    let err = h.add_bonus(ts(500), Attribute::Speed, 30.0).unwrap_err();
    assert!(err.is_contradiction());
}

#[test]
fn birth_prior_caps_modern_epochs_only() {
    let prior = EpochPrior {
        from: ts(1_000),
        upper: 106.5,
    };

    let mut modern: PlayerHistory = PlayerHistory::new(PlayerId::from("p1"), "A");
    modern.finish(ts(2_000), Some(prior)).unwrap();
    let c = &modern.compositions()[0];
    assert!(
        c.initial_attributes
            .values()
            .all(|i| *i == Interval::new(0.0, 106.5).unwrap())
    );

    let mut ancient: PlayerHistory = PlayerHistory::new(PlayerId::from("p2"), "B");
    ancient.finish(ts(10), Some(prior)).unwrap();
    let c = &ancient.compositions()[0];
    assert!(c.initial_attributes.values().all(|i| *i == Interval::DOMAIN));
    assert_eq!(c.initial_attributes.len(), Attribute::ALL.len());
}

#[test]
fn finished_history_rejects_more_evidence() {
    let mut h: PlayerHistory = PlayerHistory::new(PlayerId::from("p1"), "A");
    h.finish(ts(10), None).unwrap();
    let err = h.add_bonus(ts(20), Attribute::Luck, 1.0).unwrap_err();
    assert!(matches!(err, TriadError::InvalidArg(_)));
    assert!(h.finish(ts(5), None).is_err());
}

#[test]
fn bonuses_at_two_days_yield_at_most_three_rows() {
    let mut h: PlayerHistory = PlayerHistory::new(PlayerId::from("p1"), "Alice Smith");
    h.apply_talk(&talk(2_000, &[(Attribute::Aiming, 3)])).unwrap();
    h.add_bonus(ts(1_000), Attribute::Aiming, 5.0).unwrap();
    h.add_bonus(ts(500), Attribute::Aiming, 5.0).unwrap();
    h.finish(ts(50), None).unwrap();

    let timeline = daily_timeline(15);
    let names = NameHistory::default();
    let rows: Vec<_> = h.all_versions(&timeline, &names).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].valid_from, Some(ts(100)));
    assert_eq!(rows[0].valid_to, Some(ts(400)));
    assert_eq!(rows[1].valid_from, Some(ts(500)));
    assert_eq!(rows[1].valid_to, Some(ts(900)));
    assert_eq!(rows[2].valid_from, Some(ts(1_000)));
    assert_eq!(rows[2].valid_to, Some(ts(1_500)));
    assert_eq!(rows[2].interval(Attribute::Aiming), Interval::from_rating(3));
    assert!(rows.iter().all(|r| r.player_name == "Alice Smith"));
}

#[test]
fn versions_are_chronological_across_epochs() {
    let mut h: PlayerHistory = PlayerHistory::new(PlayerId::from("p1"), "Bob Jones");
    h.apply_talk(&talk(2_000, &[(Attribute::Arm, 1)])).unwrap();
    h.finalize(ts(650), "Bob Jones", None).unwrap();
    h.set_working_name("Alice Smith");
    h.apply_talk(&talk(600, &[(Attribute::Arm, 4)])).unwrap();
    h.finish(ts(50), None).unwrap();

    let timeline = daily_timeline(10);
    let names = NameHistory::default();
    let rows: Vec<_> = h.all_versions(&timeline, &names).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].player_name, "Alice Smith");
    assert_eq!(rows[0].valid_to, Some(ts(600)));
    assert_eq!(rows[1].player_name, "Bob Jones");
    assert_eq!(rows[1].valid_from, Some(ts(700)));
    assert_eq!(rows[1].valid_to, Some(ts(1_000)));

    // Restartable: a second pass yields the same rows.
    let again: Vec<_> = h.all_versions(&timeline, &names).collect();
    assert_eq!(rows, again);
}

#[test]
fn replay_is_deterministic() {
    let run = || {
        let mut h: PlayerHistory = PlayerHistory::new(PlayerId::from("p1"), "A");
        h.apply_talk(&talk(900, &[(Attribute::Guts, 3), (Attribute::Luck, 1)])).unwrap();
        h.add_bonus(ts(800), Attribute::Guts, 15.0).unwrap();
        h.add_bonus(ts(700), Attribute::Luck, 2.0).unwrap();
        h.finish(ts(100), None).unwrap();
        h.compositions().to_vec()
    };
    assert_eq!(run(), run());
}
