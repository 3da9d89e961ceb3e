use triad_core::connector::ChronConnector;
use triad_core::{PlayerId, TriadError};
use triad_mock::{MockConnector, fixtures};

#[tokio::test]
async fn identity_lookup_is_at_or_before() {
    let mock = MockConnector::new();
    let players = mock.as_player_provider().unwrap();
    let id = PlayerId::from(fixtures::RENAMED);

    let before = players
        .player(&id, Some(fixtures::instant(3, 60)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(before.full_name(), "Bob Jones");

    let at = players
        .player(&id, Some(fixtures::during(3, 60)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(at.full_name(), "Alice Smith");

    let latest = players.player(&id, None).await.unwrap().unwrap();
    assert_eq!(latest.full_name(), "Alice Smith");

    let none = players
        .player(&id, Some(fixtures::instant(1, 1) - chrono::Duration::seconds(1)))
        .await
        .unwrap();
    assert!(none.is_none());

    let earliest = players.earliest_player(&id).await.unwrap().unwrap();
    assert_eq!(earliest.valid_from, fixtures::instant(1, 1));
    assert_eq!(players.player_versions(&id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_entities_are_none_not_errors() {
    let mock = MockConnector::new();
    let id = PlayerId::from("nobody");
    assert!(mock.as_player_provider().unwrap().player(&id, None).await.unwrap().is_none());
    assert!(mock.as_talk_provider().unwrap().talk(&id, None).await.unwrap().is_none());
    assert!(mock.as_feed_provider().unwrap().player_feed(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn fail_id_forces_connector_errors() {
    let mock = MockConnector::new();
    let err = mock
        .as_talk_provider()
        .unwrap()
        .talk(&PlayerId::from(fixtures::FAIL), None)
        .await
        .unwrap_err();
    assert!(matches!(err, TriadError::Connector { .. }));
    assert!(err.to_string().contains("forced failure: talk"));
}

#[tokio::test]
async fn calendar_and_roster_cover_the_fixture_league() {
    let mock = MockConnector::new();
    let days = mock.as_calendar_provider().unwrap().season_days().await.unwrap();
    assert_eq!(days.len(), fixtures::DAYS.len() * 5);
    assert!(days.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 < w[1].1));

    let roster = mock
        .as_roster_provider()
        .unwrap()
        .players_with_appearances()
        .await
        .unwrap();
    assert!(roster.contains(&PlayerId::from(fixtures::RENAMED)));
    assert!(roster.contains(&PlayerId::from(fixtures::FAIL)));
    assert!(!roster.contains(&PlayerId::from(fixtures::TIMEOUT)));
}
