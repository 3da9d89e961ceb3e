use std::sync::Arc;

use triad::{Attribute, Backfill, ExceptionTable, Interval, PlayerId, SeasonDay, Triangulator, TriadError};
use triad_mock::{League, MockConnector, fixtures};

fn triangulator() -> Triangulator {
    Triangulator::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .unwrap()
}

fn iv(start: f64, end: f64) -> Interval {
    Interval::new(start, end).unwrap()
}

#[tokio::test]
async fn recomposition_splits_into_two_epochs() {
    let t = triangulator();
    let timeline = t.timeline().await.unwrap();
    let tri = t
        .triangulate(&PlayerId::from(fixtures::RENAMED), &timeline)
        .await
        .unwrap();

    let epochs = tri.history.compositions();
    assert_eq!(epochs.len(), 2);
    let (alice, bob) = (&epochs[0], &epochs[1]);

    assert_eq!(alice.player_name, "Alice Smith");
    assert_eq!(alice.lifetime.birth, fixtures::during(3, 60));
    assert_eq!(alice.lifetime.death, None);
    assert_eq!(
        alice.bonus_history[&fixtures::during(3, 120)],
        vec![(Attribute::Aiming, 5.0)]
    );
    // The +5 is undone at birth.
    assert_eq!(alice.initial_attributes[&Attribute::Aiming], iv(57.5, 82.5));
    assert_eq!(
        alice.initial_attributes[&Attribute::Contact],
        Interval::from_rating(2)
    );

    assert_eq!(bob.player_name, "Bob Jones");
    assert_eq!(bob.lifetime.birth, fixtures::instant(1, 1));
    assert_eq!(bob.lifetime.death, Some(fixtures::during(3, 60)));
    assert_eq!(
        bob.bonus_history[&fixtures::during(2, 60)],
        vec![(Attribute::Contact, 10.0)]
    );
    // Nothing observed Bob; only the birth prior bounds him.
    assert_eq!(bob.initial_attributes[&Attribute::Contact], iv(0.0, 106.5));
}

#[tokio::test]
async fn snapshots_are_chronological_and_coalesced() {
    let t = triangulator();
    let timeline = t.timeline().await.unwrap();
    let tri = t
        .triangulate(&PlayerId::from(fixtures::RENAMED), &timeline)
        .await
        .unwrap();
    let rows: Vec<_> = tri.snapshots(&timeline).collect();
    assert_eq!(rows.len(), 4);

    let spans: Vec<_> = rows
        .iter()
        .map(|s| (s.player_name.as_str(), s.valid_from.unwrap(), s.valid_to.unwrap()))
        .collect();
    assert_eq!(
        spans,
        vec![
            ("Bob Jones", fixtures::instant(1, 2), fixtures::instant(2, 60)),
            ("Bob Jones", fixtures::instant(2, 120), fixtures::instant(3, 60)),
            ("Alice Smith", fixtures::instant(3, 120), fixtures::instant(3, 120)),
            ("Alice Smith", fixtures::instant(3, 121), fixtures::instant(5, 121)),
        ]
    );
    assert_eq!(rows[1].interval(Attribute::Contact), iv(10.0, 116.5));
    assert_eq!(rows[2].interval(Attribute::Aiming), iv(57.5, 82.5));
    assert_eq!(rows[3].interval(Attribute::Aiming), Interval::from_rating(3));
    for pair in rows.windows(2) {
        assert_ne!(pair[0], pair[1], "adjacent rows must differ");
    }
}

#[tokio::test]
async fn late_gain_rechecks_talk_and_finds_contradiction() {
    let t = triangulator();
    let timeline = t.timeline().await.unwrap();
    let failure = t
        .triangulate(&PlayerId::from(fixtures::CONTRADICTION), &timeline)
        .await
        .unwrap_err();
    assert_eq!(failure.player_name.as_deref(), Some("Carl Ray"));
    match failure.error {
        TriadError::ImpossibleInterval { attribute, .. } => assert_eq!(attribute, "Contact"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn gains_before_the_recheck_day_skip_talk() {
    let t = Triangulator::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .talk_recheck_after(SeasonDay::new(5, 1))
        .build()
        .unwrap();
    let timeline = t.timeline().await.unwrap();
    let tri = t
        .triangulate(&PlayerId::from(fixtures::CONTRADICTION), &timeline)
        .await
        .unwrap();
    let epoch = &tri.history.compositions()[0];
    assert_eq!(epoch.initial_attributes[&Attribute::Contact], iv(7.5, 32.5));
}

#[tokio::test]
async fn backfill_recovers_team_feed_gains_and_skips_the_artifact() {
    let t = triangulator();
    let timeline = t.timeline().await.unwrap();
    let tri = t
        .triangulate(&PlayerId::from(fixtures::VETERAN), &timeline)
        .await
        .unwrap();
    let epochs = tri.history.compositions();
    assert_eq!(epochs.len(), 1);
    let epoch = &epochs[0];

    assert_eq!(
        epoch.bonus_history[&fixtures::during(1, 120)],
        vec![(Attribute::Contact, 20.0)]
    );
    // Linked entries are already in the player feed and count once.
    assert_eq!(
        epoch.bonus_history[&fixtures::during(3, 1)],
        vec![(Attribute::Speed, 5.0)]
    );
    assert!(
        !epoch
            .bonus_history
            .values()
            .flatten()
            .any(|(a, _)| *a == Attribute::Aiming),
        "the +50 artifact must not be logged"
    );
    assert_eq!(epoch.bonus_history.len(), 2);
    assert_eq!(epoch.initial_attributes[&Attribute::Contact], iv(42.5, 67.5));
    assert_eq!(epoch.initial_attributes[&Attribute::Aiming], iv(0.0, 106.5));
}

#[tokio::test]
async fn backfill_only_applies_to_early_players() {
    let t = Triangulator::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .backfill(Backfill {
            max_birth_season: 0,
            ..Backfill::default()
        })
        .build()
        .unwrap();
    let timeline = t.timeline().await.unwrap();
    let tri = t
        .triangulate(&PlayerId::from(fixtures::VETERAN), &timeline)
        .await
        .unwrap();
    let epoch = &tri.history.compositions()[0];
    assert_eq!(epoch.bonus_history.len(), 1);
    assert_eq!(
        epoch.initial_attributes[&Attribute::Contact],
        Interval::from_rating(3)
    );
}

#[tokio::test]
async fn subject_mismatch_splits_unless_excused() {
    let t = triangulator();
    let timeline = t.timeline().await.unwrap();
    let id = PlayerId::from(fixtures::EXCUSED);

    let split = t.triangulate(&id, &timeline).await.unwrap();
    let names: Vec<_> = split
        .history
        .compositions()
        .iter()
        .map(|c| c.player_name.as_str())
        .collect();
    assert_eq!(names, vec!["Eve Park", "Evelyn Park", "Eve Park"]);

    let excused = Triangulator::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .exceptions(ExceptionTable::new().with(fixtures::EXCUSED, fixtures::EXCUSED_ORDINAL))
        .build()
        .unwrap();
    let whole = excused.triangulate(&id, &timeline).await.unwrap();
    let epochs = whole.history.compositions();
    assert_eq!(epochs.len(), 1);
    assert_eq!(epochs[0].bonus_history.len(), 2);
    assert_eq!(epochs[0].initial_attributes[&Attribute::Contact], iv(27.5, 52.5));
}

#[tokio::test]
async fn players_without_talk_are_empty_not_errors() {
    let t = triangulator();
    let timeline = t.timeline().await.unwrap();
    let tri = t
        .triangulate(&PlayerId::from(fixtures::SILENT), &timeline)
        .await
        .unwrap();
    assert!(tri.is_empty());
    assert_eq!(tri.snapshots(&timeline).count(), 0);

    let unknown = t
        .triangulate(&PlayerId::from("nobody"), &timeline)
        .await
        .unwrap();
    assert!(unknown.is_empty());
}

#[tokio::test]
async fn triangulation_is_deterministic() {
    let t = triangulator();
    let timeline = t.timeline().await.unwrap();
    let id = PlayerId::from(fixtures::VETERAN);
    let a = t.triangulate(&id, &timeline).await.unwrap();
    let b = t.triangulate(&id, &timeline).await.unwrap();
    assert_eq!(a.history.compositions(), b.history.compositions());
}

fn league_triangulator(league: League) -> Triangulator {
    Triangulator::builder()
        .with_connector(Arc::new(MockConnector::from_league(league)))
        .build()
        .unwrap()
}

#[tokio::test]
async fn rename_before_first_identity_keeps_the_newer_epoch() {
    let league = League::empty()
        .with_calendar(fixtures::days())
        .with_player("p-early", fixtures::player(fixtures::instant(2, 1), "Alice", "Smith", 4))
        .with_talk("p-early", fixtures::talk(fixtures::instant(5, 1), &[(Attribute::Contact, 2)]))
        .with_player_feed(
            "p-early",
            vec![fixtures::entry(
                fixtures::during(1, 60),
                "recomposition",
                "Bob Jones was Recomposed into Alice Smith.",
            )],
        )
        .enroll("p-early");
    let report = league_triangulator(league).run_batch().await.unwrap();

    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert!(!report.snapshots.is_empty());
    assert!(report.snapshots.iter().all(|s| s.player_name == "Alice Smith"));
    let last = report.snapshots.last().unwrap();
    assert_eq!(last.interval(Attribute::Contact), Interval::from_rating(2));
}

#[tokio::test]
async fn gain_before_first_identity_is_kept_in_the_oldest_epoch() {
    let league = League::empty()
        .with_calendar(fixtures::days())
        .with_player("p-early", fixtures::player(fixtures::instant(2, 1), "Ann", "Lee", 4))
        .with_talk("p-early", fixtures::talk(fixtures::instant(5, 1), &[(Attribute::Contact, 4)]))
        .with_player_feed(
            "p-early",
            vec![fixtures::entry(
                fixtures::during(1, 60),
                "augment",
                "Ann Lee gained +30 Contact.",
            )],
        )
        .enroll("p-early");
    let t = league_triangulator(league);
    let snapshots = t.snapshots(&PlayerId::from("p-early")).await.unwrap();

    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].interval(Attribute::Contact), Interval::from_rating(4));
}

#[tokio::test]
async fn gain_with_unknown_attribute_still_splits_on_name() {
    let league = League::empty()
        .with_calendar(fixtures::days())
        .with_player("p-odd", fixtures::player(fixtures::instant(1, 1), "Alice", "Smith", 3))
        .with_talk("p-odd", fixtures::talk(fixtures::instant(5, 1), &[(Attribute::Contact, 2)]))
        .with_player_feed(
            "p-odd",
            vec![fixtures::entry(
                fixtures::during(2, 60),
                "augment",
                "Bob Jones gained +10 Charisma.",
            )],
        )
        .enroll("p-odd");
    let t = league_triangulator(league);
    let timeline = t.timeline().await.unwrap();
    let tri = t.triangulate(&PlayerId::from("p-odd"), &timeline).await.unwrap();

    let epochs = tri.history.compositions();
    let names: Vec<_> = epochs.iter().map(|c| c.player_name.as_str()).collect();
    assert_eq!(names, vec!["Alice Smith", "Bob Jones"]);
    assert_eq!(epochs[0].lifetime.birth, fixtures::during(2, 60));
    assert!(epochs.iter().all(|c| c.bonus_history.is_empty()));
}
