//! Result block parser.
//!
//! The result sheet is a sequence of blocks. A row whose first cell contains `##` opens a block
//! and names its kind (`##Indicator`, `##Pie1D`, ...). The rows that follow are key/value rows
//! (first cell = field name, second cell = value) until a row with an empty first cell, another
//! marker, or the end of input.
//!
//! - Unknown field names are ignored.
//! - `display` is `true` iff its value is exactly `yes`.
//! - An unknown kind (or the reserved `Actions`) yields nothing; scanning resumes on the next row.
//!
//! ```rust
//! use sheet_compiler::compile::results;
//! use sheet_compiler::model::ResultBlock;
//! use sheet_compiler::types::text_row;
//!
//! let rows = vec![
//!     text_row(&["##Indicator"]),
//!     text_row(&["code", "co2"]),
//!     text_row(&["number", "42"]),
//!     text_row(&["display", "yes"]),
//! ];
//! let out = results::compile(&rows);
//! match &out.value[0] {
//!     ResultBlock::Indicator(b) => assert_eq!(b.number.as_deref(), Some("42")),
//!     other => panic!("unexpected block {other:?}"),
//! }
//! ```

mod charts;
mod simple;
mod table;

use crate::diagnostics::{Compiled, Diagnostic, Severity, Stage};
use crate::model::{ResultBlock, ResultKind};
use crate::types::{Cell, Row, cell, cell_text, first_cell_text};

/// Substring that turns a row into a block marker.
pub const MARKER: &str = "##";

/// Scan `rows` and parse every recognized block, in order.
pub fn compile(rows: &[Row]) -> Compiled<Vec<ResultBlock>> {
    let mut blocks = Vec::new();
    let mut diagnostics = Vec::new();
    let mut i = 0;

    while i < rows.len() {
        let Some(name) = marker_name(&rows[i]) else {
            i += 1;
            continue;
        };
        let start = i + 1;

        let parsed = match ResultKind::from_marker(&name) {
            Some(ResultKind::ScoreCard) => Some(simple::score_card(rows, start)),
            Some(ResultKind::Indicator) => Some(simple::indicator(rows, start)),
            Some(ResultKind::Indicator2Values) => Some(simple::indicator_2_values(rows, start)),
            Some(ResultKind::Title) => Some(simple::title(rows, start)),
            Some(ResultKind::Subtitle) => Some(simple::subtitle(rows, start)),
            Some(ResultKind::GlobalScore) => Some(simple::global_score(rows, start)),
            Some(ResultKind::Text) => Some(simple::text(rows, start)),
            Some(ResultKind::Nav) => Some(simple::nav(rows, start, &mut diagnostics)),
            Some(ResultKind::Treemap) => Some(charts::treemap(rows, start, &mut diagnostics)),
            Some(ResultKind::Pie1D) => Some(charts::pie_1d(rows, start, &mut diagnostics)),
            Some(ResultKind::BarStacked2D) => Some(charts::bar_stacked_2d(rows, start)),
            Some(ResultKind::BarStacked1D) => Some(charts::bar_stacked_1d(rows, start)),
            Some(ResultKind::BarSingle1D) => Some(charts::bar_single_1d(rows, start)),
            Some(ResultKind::Bar1D) => Some(charts::bar_1d(rows, start)),
            Some(ResultKind::Table) => Some(table::table(rows, start)),
            Some(ResultKind::Actions) => {
                diagnostics.push(Diagnostic::new(
                    Severity::Info,
                    Stage::Results,
                    Some(i),
                    "actions block is compiled separately; skipped",
                ));
                None
            }
            None => {
                diagnostics.push(Diagnostic::warning(
                    Stage::Results,
                    i,
                    format!("unknown result block '{name}'; skipped"),
                ));
                None
            }
        };

        match parsed {
            Some((block, next)) => {
                blocks.push(block);
                i = next.max(start);
            }
            None => i += 1,
        }
    }

    Compiled::new(blocks, diagnostics)
}

/// Kind name of a marker row (text after the first `##`), or `None` for ordinary rows.
pub fn marker_name(row: &[Cell]) -> Option<String> {
    let first = cell_text(row, 0);
    let (_, after) = first.split_once(MARKER)?;
    Some(after.trim().to_string())
}

/// Walk the key/value rows of a block starting at `start`.
///
/// `on_field(key, row_index)` returns the index of the next row to read, which lets a field
/// consume several rows. Returns the index of the row that ended the block.
pub(crate) fn read_fields<F>(rows: &[Row], start: usize, mut on_field: F) -> usize
where
    F: FnMut(&str, usize) -> usize,
{
    let mut i = start;
    while i < rows.len() {
        let row = &rows[i];
        let key = first_cell_text(row);
        if key.is_empty() || marker_name(row).is_some() {
            break;
        }
        i = on_field(&key, i).max(i + 1);
    }
    i.min(rows.len())
}

/// Trimmed value cell of a key/value row.
pub(crate) fn field_value(row: &[Cell]) -> String {
    cell_text(row, 1).trim().to_string()
}

pub(crate) fn is_yes(row: &[Cell]) -> bool {
    cell_text(row, 1) == "yes"
}

/// Trimmed text at `idx`, `None` when blank.
pub(crate) fn non_blank(row: &[Cell], idx: usize) -> Option<String> {
    let c = cell(row, idx);
    if c.is_blank() {
        None
    } else {
        Some(c.text().trim().to_string())
    }
}

/// Trimmed texts of the cells from `from` to the end of the row.
pub(crate) fn texts_from(row: &[Cell], from: usize) -> Vec<String> {
    row.iter()
        .skip(from)
        .map(|c| c.text().trim().to_string())
        .collect()
}

/// Index of the first row at or after `start` that fails `keep`.
pub(crate) fn table_end<F>(rows: &[Row], start: usize, keep: F) -> usize
where
    F: Fn(&[Cell]) -> bool,
{
    rows.iter()
        .skip(start)
        .position(|r| !keep(r))
        .map_or(rows.len(), |offset| start + offset)
        .max(start.min(rows.len()))
}
