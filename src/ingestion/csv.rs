//! CSV table reader.

use std::path::Path;

use crate::error::CompileResult;
use crate::types::{Cell, Row};

/// Read a CSV export into rows.
///
/// Rules:
///
/// - There is no header row; the first record is row 0.
/// - Records may have different lengths.
/// - Each field is classified with [`Cell::parse`].
pub fn read_table_from_path(path: impl AsRef<Path>) -> CompileResult<Vec<Row>> {
    let mut rdr = reader_builder().from_path(path)?;
    read_table_from_reader(&mut rdr)
}

/// Read rows from an existing CSV reader.
///
/// The reader should be built without headers, otherwise its first record is lost.
pub fn read_table_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> CompileResult<Vec<Row>> {
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(Cell::parse).collect());
    }
    Ok(rows)
}

/// Read rows from in-memory CSV text.
pub fn read_table_from_str(input: &str) -> CompileResult<Vec<Row>> {
    let mut rdr = reader_builder().from_reader(input.as_bytes());
    read_table_from_reader(&mut rdr)
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(false).flexible(true);
    builder
}
