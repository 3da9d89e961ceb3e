use std::sync::Arc;

use triad::{CsvSink, Triangulator};
use triad_mock::MockConnector;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Log to stderr; RUST_LOG=triad=debug shows per-player replay detail.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    // 2. Build the triangulator over the fixture league.
    let t = Triangulator::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .concurrency(4)
        .build()?;

    // 3. Run the batch and stream rows to stdout as CSV.
    let mut sink = CsvSink::new(std::io::stdout());
    let report = t.run_to_sink(&mut sink).await?;

    // 4. Summarize.
    eprintln!("{}", report.stats());
    for failure in &report.failures {
        eprintln!("  {failure}");
    }
    Ok(())
}
