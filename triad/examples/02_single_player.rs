use std::sync::Arc;

use triad::{PlayerId, Triangulator};
use triad_mock::{MockConnector, fixtures};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let t = Triangulator::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .build()?;

    let timeline = t.timeline().await?;
    let triangulation = t
        .triangulate(&PlayerId::from(fixtures::RENAMED), &timeline)
        .await?;

    // Epochs are stored newest first.
    for epoch in triangulation.history.compositions().iter().rev() {
        println!(
            "{}: born {} died {:?}, {} bonus instants",
            epoch.player_name,
            epoch.lifetime.birth,
            epoch.lifetime.death,
            epoch.bonus_history.len()
        );
    }
    for s in triangulation.snapshots(&timeline) {
        println!(
            "{} {:?}..{:?} Contact {}",
            s.player_name,
            s.valid_from,
            s.valid_to,
            s.interval(triad::Attribute::Contact)
        );
    }
    Ok(())
}
