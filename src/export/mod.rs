//! CSV serialization of a collected record set.
//!
//! The exporter consumes the caller's running collection after a traversal
//! finishes (or fails partway; partial collections export the same way).
//! Absent optional fields become empty cells, so a re-parse restores the
//! same field values.

use std::io::Write;
use std::path::Path;

use crate::models::Record;

/// Errors raised while writing a record set
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Serialization through the csv writer failed
    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying I/O failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write records as headed CSV to any writer
pub fn write_csv<W: Write>(records: &[Record], writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;

    Ok(())
}

/// Write records as headed CSV to a file path
pub fn write_csv_path(records: &[Record], path: &Path) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_csv(records, file)
}
