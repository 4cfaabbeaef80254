//! JSON table reader.
//!
//! The input is an array of rows, each an array of scalars:
//! `[["##Indicator"], ["code", "co2"], ["number", 42], []]`.
//!
//! - `null` and `""` are empty cells
//! - numbers are numeric cells
//! - booleans become the text `true` / `false`
//! - nested arrays or objects are rejected

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{CompileError, CompileResult};
use crate::types::{Cell, Row};

/// Read a JSON table from a file.
pub fn read_table_from_path(path: impl AsRef<Path>) -> CompileResult<Vec<Row>> {
    let text = fs::read_to_string(path)?;
    read_table_from_str(&text)
}

/// Read a JSON table from an in-memory string.
pub fn read_table_from_str(input: &str) -> CompileResult<Vec<Row>> {
    let value: Value = serde_json::from_str(input)?;
    let Value::Array(rows) = value else {
        return Err(CompileError::InvalidInput {
            message: "json table must be an array of rows".to_string(),
        });
    };

    rows.iter()
        .enumerate()
        .map(|(r, row)| match row {
            Value::Array(cells) => cells
                .iter()
                .enumerate()
                .map(|(c, v)| convert_value(r, c, v))
                .collect::<CompileResult<Row>>(),
            _ => Err(CompileError::InvalidInput {
                message: format!("row {r} is not an array"),
            }),
        })
        .collect()
}

fn convert_value(row: usize, column: usize, v: &Value) -> CompileResult<Cell> {
    match v {
        Value::Null => Ok(Cell::Empty),
        Value::String(s) if s.is_empty() => Ok(Cell::Empty),
        Value::String(s) => Ok(Cell::Text(s.clone())),
        Value::Bool(b) => Ok(Cell::Text(b.to_string())),
        Value::Number(n) => n.as_f64().map(Cell::Number).ok_or_else(|| CompileError::InvalidInput {
            message: format!("row {row}, column {column}: number {n} is not representable as f64"),
        }),
        Value::Array(_) | Value::Object(_) => Err(CompileError::InvalidInput {
            message: format!("row {row}, column {column}: nested values are not supported"),
        }),
    }
}
