#![cfg(feature = "excel")]

//! Workbook sheet reader (`.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`).

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use crate::error::{CompileError, CompileResult};
use crate::types::{Cell, Row};

/// Read one sheet of a workbook into rows.
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Row and column indexes are absolute: a sheet whose data starts at `C3` yields two leading
///   empty rows and two leading empty cells per row
/// - Dates are kept as their serial number, error cells as their text (`#DIV/0!`)
pub fn read_table_from_path(path: impl AsRef<Path>, sheet_name: Option<&str>) -> CompileResult<Vec<Row>> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| CompileError::InvalidInput {
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook.worksheet_range(&sheet)?;
    Ok(range_to_rows(&range))
}

fn range_to_rows(range: &calamine::Range<Data>) -> Vec<Row> {
    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Row> = vec![Vec::new(); first_row as usize];
    for row in range.rows() {
        let mut out: Row = vec![Cell::Empty; first_col as usize];
        out.extend(row.iter().map(convert_cell));
        rows.push(out);
    }
    rows
}

fn convert_cell(c: &Data) -> Cell {
    match c {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}
