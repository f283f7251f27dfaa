//! CSV output of extracted invoice records.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SinkError;
use crate::invoice::InvoiceField;
use crate::models::config::DEFAULT_CSV_PATH;
use crate::models::invoice::InvoiceRecord;

/// Column names in output order.
pub fn header() -> [&'static str; 3] {
    InvoiceField::ALL.map(InvoiceField::label)
}

/// Writes the result set to a CSV file, replacing any earlier file.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl Default for CsvSink {
    fn default() -> Self {
        Self::new(DEFAULT_CSV_PATH)
    }
}

impl CsvSink {
    /// Create a sink writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the header and one row per record, truncating the file.
    pub fn write(&self, records: &[InvoiceRecord]) -> Result<(), SinkError> {
        let file = std::fs::File::create(&self.path)?;
        write_records(file, records)?;
        debug!("Wrote {} rows to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Read back a file produced by [`CsvSink::write`].
    pub fn read(&self) -> Result<Vec<InvoiceRecord>, SinkError> {
        let file = std::fs::File::open(&self.path)?;
        read_records(file)
    }
}

/// Write records as CSV to any writer.
pub fn write_records<W: Write>(writer: W, records: &[InvoiceRecord]) -> Result<(), SinkError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(header())?;
    for record in records {
        wtr.write_record(record.values())?;
    }

    wtr.flush()?;
    Ok(())
}

/// Read records from CSV with the expected header.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<InvoiceRecord>, SinkError> {
    let mut rdr = csv::Reader::from_reader(reader);

    let found: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if found != header() {
        return Err(SinkError::Header(found.join(",")));
    }

    let mut records = Vec::new();
    for row in rdr.deserialize() {
        records.push(row?);
    }
    Ok(records)
}
