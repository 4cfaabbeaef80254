//! Core cell/row types shared by every compiler.
//!
//! A table is a plain `Vec<Row>`; a [`Row`] is an ordered list of [`Cell`]s exactly as exported
//! from the spreadsheet. Cells past the end of a row read as [`Cell::Empty`].

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single raw spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Missing/blank cell.
    #[default]
    Empty,
    /// Numeric cell.
    Number(f64),
    /// Text cell.
    Text(String),
}

/// One row of a table.
pub type Row = Vec<Cell>;

impl Cell {
    /// Text form of the cell.
    ///
    /// Integral numbers render without a fractional part (`42.0` -> `"42"`).
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Cell::Empty => Cow::Borrowed(""),
            Cell::Text(s) => Cow::Borrowed(s.as_str()),
            Cell::Number(n) => Cow::Owned(format_number(*n)),
        }
    }

    /// Returns `true` if the cell's trimmed text is empty.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Numeric value of the cell, parsing text when needed.
    ///
    /// Returns `None` for blank cells and for text that is not a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl Cell {
    /// Classify a raw exported string.
    ///
    /// `""` is [`Cell::Empty`]; text whose number form renders back to the same text is a
    /// [`Cell::Number`]; anything else (`"007"`, `"1e3"`, `"12kg"`) stays [`Cell::Text`].
    pub fn parse(raw: &str) -> Cell {
        if raw.is_empty() {
            return Cell::Empty;
        }
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() && format_number(n) == raw => Cell::Number(n),
            _ => Cell::Text(raw.to_string()),
        }
    }
}

/// Format a number the way the spreadsheet export shows it.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

static EMPTY: Cell = Cell::Empty;

/// Cell at `idx`, or [`Cell::Empty`] when the row is shorter.
pub fn cell(row: &[Cell], idx: usize) -> &Cell {
    row.get(idx).unwrap_or(&EMPTY)
}

/// Text of the cell at `idx` (empty when out of range).
pub fn cell_text(row: &[Cell], idx: usize) -> Cow<'_, str> {
    cell(row, idx).text()
}

/// Trimmed text of the first cell.
pub fn first_cell_text(row: &[Cell]) -> String {
    cell_text(row, 0).trim().to_string()
}

/// Returns `true` when every cell of the row is blank (including the zero-length row).
pub fn row_is_empty(row: &[Cell]) -> bool {
    row.iter().all(Cell::is_blank)
}

/// Build a row from string literals; blank strings become [`Cell::Empty`].
///
/// Mostly useful for tests and for callers assembling tables by hand.
pub fn text_row(cells: &[&str]) -> Row {
    cells
        .iter()
        .map(|c| if c.is_empty() { Cell::Empty } else { Cell::from(*c) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_render_without_fraction() {
        assert_eq!(Cell::Number(42.0).text(), "42");
        assert_eq!(Cell::Number(-3.0).text(), "-3");
        assert_eq!(Cell::Number(2.5).text(), "2.5");
    }

    #[test]
    fn out_of_range_cells_are_empty() {
        let row = text_row(&["a"]);
        assert_eq!(cell(&row, 5), &Cell::Empty);
        assert_eq!(cell_text(&row, 5), "");
    }

    #[test]
    fn row_is_empty_ignores_whitespace() {
        assert!(row_is_empty(&[]));
        assert!(row_is_empty(&[Cell::Empty, Cell::from("  ")]));
        assert!(!row_is_empty(&[Cell::Empty, Cell::Number(0.0)]));
    }

    #[test]
    fn as_f64_parses_text_cells() {
        assert_eq!(Cell::from(" 12.5 ").as_f64(), Some(12.5));
        assert_eq!(Cell::from("abc").as_f64(), None);
        assert_eq!(Cell::Empty.as_f64(), None);
    }

    #[test]
    fn parse_keeps_text_that_does_not_round_trip() {
        assert_eq!(Cell::parse(""), Cell::Empty);
        assert_eq!(Cell::parse("42"), Cell::Number(42.0));
        assert_eq!(Cell::parse("-0.5"), Cell::Number(-0.5));
        assert_eq!(Cell::parse("007"), Cell::from("007"));
        assert_eq!(Cell::parse(" 3"), Cell::from(" 3"));
        assert_eq!(Cell::parse("NaN"), Cell::from("NaN"));
        assert_eq!(Cell::parse("12kg"), Cell::from("12kg"));
    }

    #[test]
    fn cells_deserialize_from_json_scalars() {
        let row: Row = serde_json::from_str(r#"[null, 3, "x"]"#).unwrap();
        assert_eq!(row, vec![Cell::Empty, Cell::Number(3.0), Cell::from("x")]);
    }
}
