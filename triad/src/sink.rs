//! Output sinks for materialized snapshots.

use std::fs::File;
use std::io;
use std::path::Path;

use triad_core::{PlayerSnapshot, TriadError};

/// Destination for snapshot rows.
pub trait SnapshotSink {
    /// Write one snapshot.
    ///
    /// # Errors
    /// Returns the sink's I/O failure.
    fn write(&mut self, snapshot: &PlayerSnapshot) -> Result<(), TriadError>;

    /// Flush buffered output. Called once after the last snapshot.
    ///
    /// # Errors
    /// Returns the sink's I/O failure.
    fn finish(&mut self) -> Result<(), TriadError> {
        Ok(())
    }
}

fn csv_err(e: &csv::Error) -> TriadError {
    TriadError::Other(format!("csv: {e}"))
}

/// Writes the header once, then one row per snapshot.
///
/// Attributes without a finite median render as
/// [`UNDEFINED_CELL`](triad_core::snapshot::UNDEFINED_CELL) and are logged.
pub struct CsvSink<W: io::Write> {
    writer: csv::Writer<W>,
    header_written: bool,
}

impl<W: io::Write> CsvSink<W> {
    /// Sink over any writer.
    pub fn new(w: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(w),
            header_written: false,
        }
    }

    fn ensure_header(&mut self) -> Result<(), TriadError> {
        if !self.header_written {
            self.writer
                .write_record(PlayerSnapshot::<triad_core::Attribute>::header())
                .map_err(|e| csv_err(&e))?;
            self.header_written = true;
        }
        Ok(())
    }

    /// Flush and return the underlying writer.
    ///
    /// # Errors
    /// Returns the flush failure.
    pub fn into_inner(mut self) -> Result<W, TriadError> {
        self.ensure_header()?;
        self.writer
            .into_inner()
            .map_err(|e| TriadError::Other(format!("csv: {}", e.into_error())))
    }
}

impl CsvSink<File> {
    /// Create (or truncate) a CSV file at `path`.
    ///
    /// # Errors
    /// Returns the file creation failure.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, TriadError> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| TriadError::Other(format!("create {}: {e}", path.display())))?;
        Ok(Self::new(file))
    }
}

impl<W: io::Write> SnapshotSink for CsvSink<W> {
    fn write(&mut self, snapshot: &PlayerSnapshot) -> Result<(), TriadError> {
        self.ensure_header()?;
        #[cfg(feature = "tracing")]
        for attribute in snapshot.undefined() {
            tracing::warn!(
                player_id = %snapshot.player_id,
                player_name = %snapshot.player_name,
                %attribute,
                interval = %snapshot.interval(attribute),
                "attribute has no median"
            );
        }
        self.writer
            .write_record(snapshot.row())
            .map_err(|e| csv_err(&e))
    }

    fn finish(&mut self) -> Result<(), TriadError> {
        self.ensure_header()?;
        self.writer
            .flush()
            .map_err(|e| TriadError::Other(format!("csv: {e}")))
    }
}

/// Collects rendered rows in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Rendered rows, header excluded.
    pub rows: Vec<Vec<String>>,
}

impl MemorySink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The header every row lines up with.
    #[must_use]
    pub fn header(&self) -> Vec<String> {
        PlayerSnapshot::<triad_core::Attribute>::header()
    }
}

impl SnapshotSink for MemorySink {
    fn write(&mut self, snapshot: &PlayerSnapshot) -> Result<(), TriadError> {
        self.rows.push(snapshot.row());
        Ok(())
    }
}
