//! Sector tree compiler.
//!
//! Turns parameter rows into a forest of [`Sector`]s with leaf [`Parameter`]s.
//!
//! Behavior:
//! - Rows are folded in order. For each row the sector-name cells are compared with the previous
//!   row's; every depth from the first differing one down to the deepest configured depth opens a
//!   new sector (blank names included).
//! - Color/icon come from the style catalogs by sibling ordinal, for depth 0 and 1 only.
//! - Every field of a parameter is extracted independently; a failing field is recorded in
//!   [`Parameter::error`] and the row is still built.
//! - [`cleanup`] drops parameters with `display == false`, then sectors left empty.
//!
//! ```rust
//! use sheet_compiler::compile::sectors;
//! use sheet_compiler::config::{ParameterColumns, ParameterConfig};
//! use sheet_compiler::types::text_row;
//!
//! let config = ParameterConfig {
//!     sector_columns: vec![0],
//!     fields: ParameterColumns { name: Some(1), display: Some(2), ..Default::default() },
//!     ..Default::default()
//! };
//! let rows = vec![text_row(&["Housing", "Surface", "1"]), text_row(&["Housing", "Heating", "1"])];
//! let out = sectors::compile(&rows, &config).unwrap();
//! assert_eq!(out.value.len(), 1);
//! assert_eq!(out.value[0].parameters.len(), 2);
//! ```

use std::collections::BTreeMap;

use thiserror::Error;

use crate::config::{ParameterColumns, ParameterConfig};
use crate::diagnostics::{Compiled, Diagnostic, Stage};
use crate::error::CompileResult;
use crate::model::{Parameter, ParameterValue, Sector};
use crate::types::{Cell, Row, cell, cell_text};

/// Canonical types whose `value` cell holds a comma-separated list.
const LIST_TYPES: [&str; 3] = ["list", "checkbox", "template"];

/// Failure while extracting a single parameter field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub type FieldResult<T> = Result<T, FieldError>;

/// Compile parameter rows into a cleaned-up sector tree.
pub fn compile(rows: &[Row], config: &ParameterConfig) -> CompileResult<Compiled<Vec<Sector>>> {
    compile_with_filter(rows, config, |_| true)
}

/// Like [`compile`], but parameters for which `predicate` returns `false` are never attached.
///
/// Excluded parameters still open their sectors; [`cleanup`] removes those left empty.
pub fn compile_with_filter<F>(rows: &[Row], config: &ParameterConfig, predicate: F) -> CompileResult<Compiled<Vec<Sector>>>
where
    F: Fn(&Parameter) -> bool,
{
    let built = build_tree(rows, config, predicate)?;
    Ok(Compiled::new(cleanup(built.value), built.diagnostics))
}

/// Build the raw tree without the cleanup pass.
pub fn build_tree<F>(rows: &[Row], config: &ParameterConfig, predicate: F) -> CompileResult<Compiled<Vec<Sector>>>
where
    F: Fn(&Parameter) -> bool,
{
    config.validate()?;

    let columns = &config.sector_columns;
    let deepest = columns.len() - 1;
    let mut tree: Vec<Sector> = Vec::new();
    let mut ordinals = SiblingOrdinals::default();
    let mut diagnostics = Vec::new();
    let mut previous: Option<&Row> = None;

    for (index, row) in rows.iter().enumerate() {
        let first_diff = match previous {
            None => Some(0),
            Some(prev) => first_differing_depth(prev, row, columns),
        };

        let attach_depth = match first_diff {
            Some(from) => {
                for depth in from..=deepest {
                    let style = ordinals.next(depth).and_then(|o| config.style_for(depth, o));
                    let sector = Sector::new(cell_text(row, columns[depth]).into_owned(), style);
                    match children_at_depth_mut(&mut tree, depth) {
                        Some(siblings) => siblings.push(sector),
                        None => diagnostics.push(Diagnostic::warning(
                            Stage::Sectors,
                            index,
                            format!("no parent sector at depth {} for '{}'", depth, sector.name()),
                        )),
                    }
                }
                deepest
            }
            None => columns
                .iter()
                .rposition(|&c| !cell(row, c).is_blank())
                .unwrap_or(deepest),
        };

        let (parameter, errors) = build_parameter(index, row, config);
        for e in &errors {
            diagnostics.push(Diagnostic::warning(Stage::Sectors, index, e.to_string()));
        }

        if predicate(&parameter) {
            match last_at_depth_mut(&mut tree, attach_depth) {
                Some(sector) => sector.parameters.push(parameter),
                None => diagnostics.push(Diagnostic::warning(
                    Stage::Sectors,
                    index,
                    format!("no sector at depth {attach_depth} to attach parameter '{}'", parameter.name),
                )),
            }
        }

        previous = Some(row);
    }

    Ok(Compiled::new(tree, diagnostics))
}

/// First configured depth whose name cell differs from the previous row, if any.
pub fn first_differing_depth(previous: &[Cell], current: &[Cell], columns: &[usize]) -> Option<usize> {
    columns
        .iter()
        .position(|&c| cell_text(previous, c) != cell_text(current, c))
}

/// Sibling ordinal counters threaded through the row fold.
///
/// The top-level counter advances on every new depth-0 sector and resets the second-level one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct SiblingOrdinals {
    top: Option<usize>,
    sub: Option<usize>,
}

impl SiblingOrdinals {
    fn next(&mut self, depth: usize) -> Option<usize> {
        match depth {
            0 => {
                let n = self.top.map_or(0, |n| n + 1);
                self.top = Some(n);
                self.sub = None;
                Some(n)
            }
            1 => {
                let n = self.sub.map_or(0, |n| n + 1);
                self.sub = Some(n);
                Some(n)
            }
            _ => None,
        }
    }
}

/// Rightmost sector at `depth`.
fn last_at_depth_mut(tree: &mut [Sector], depth: usize) -> Option<&mut Sector> {
    let mut node = tree.last_mut()?;
    for _ in 0..depth {
        node = node.sectors.last_mut()?;
    }
    Some(node)
}

/// Sibling list new sectors at `depth` are appended to.
fn children_at_depth_mut(tree: &mut Vec<Sector>, depth: usize) -> Option<&mut Vec<Sector>> {
    if depth == 0 {
        return Some(tree);
    }
    last_at_depth_mut(tree, depth - 1).map(|s| &mut s.sectors)
}

/// Build the parameter of row `index`; field failures are returned beside it.
pub fn build_parameter(index: usize, row: &[Cell], config: &ParameterConfig) -> (Parameter, Vec<FieldError>) {
    let cols: &ParameterColumns = &config.fields;
    let mut errors = Vec::new();

    let kind = keep(&mut errors, resolve_type(row, cols.kind, &config.type_aliases));
    let is_list = LIST_TYPES.contains(&kind.as_str());

    let mut parameter = Parameter {
        index,
        name: text_field(row, cols.name),
        unit: text_field(row, cols.unit),
        description: text_field(row, cols.description),
        initial_value: text_field(row, cols.initial_value),
        value: value_field(row, cols.value, is_list),
        possible_values: list_field(row, cols.possible_values),
        min: keep(&mut errors, number_field("min", row, cols.min)),
        max: keep(&mut errors, number_field("max", row, cols.max)),
        step: keep(&mut errors, number_field("step", row, cols.step)),
        display: cols.display.is_some_and(|c| is_one(cell(row, c))),
        kind,
        error: None,
    };

    if !errors.is_empty() {
        let joined = errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
        parameter.error = Some(joined);
    }
    (parameter, errors)
}

fn keep<T: Default>(errors: &mut Vec<FieldError>, result: FieldResult<T>) -> T {
    result.unwrap_or_else(|e| {
        errors.push(e);
        T::default()
    })
}

fn text_field(row: &[Cell], column: Option<usize>) -> String {
    column
        .map(|c| cell_text(row, c).trim().to_string())
        .unwrap_or_default()
}

fn value_field(row: &[Cell], column: Option<usize>, is_list: bool) -> ParameterValue {
    let text = text_field(row, column);
    if is_list {
        ParameterValue::List(split_unescaped_commas(&text))
    } else {
        ParameterValue::Text(text)
    }
}

fn list_field(row: &[Cell], column: Option<usize>) -> Option<Vec<String>> {
    let c = column?;
    let text = cell_text(row, c);
    if text.trim().is_empty() {
        return None;
    }
    Some(split_unescaped_commas(&text))
}

/// Resolve the raw type through the alias map.
pub fn resolve_type(row: &[Cell], column: Option<usize>, aliases: &BTreeMap<String, String>) -> FieldResult<String> {
    let Some(c) = column else {
        return Ok(String::new());
    };
    let raw = cell_text(row, c);
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FieldError::new("type", "missing type"));
    }
    aliases
        .get(raw)
        .cloned()
        .ok_or_else(|| FieldError::new("type", format!("unknown type '{raw}'")))
}

fn number_field(field: &'static str, row: &[Cell], column: Option<usize>) -> FieldResult<Option<f64>> {
    let Some(c) = column else {
        return Ok(None);
    };
    match cell(row, c) {
        Cell::Empty => Ok(None),
        Cell::Number(n) => Ok(Some(*n)),
        Cell::Text(s) if s.trim().is_empty() => Ok(None),
        Cell::Text(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| FieldError::new(field, format!("invalid number '{}'", s.trim()))),
    }
}

fn is_one(c: &Cell) -> bool {
    match c {
        Cell::Number(n) => *n == 1.0,
        Cell::Text(s) => s.trim() == "1",
        Cell::Empty => false,
    }
}

/// Split on commas not preceded by a backslash; pieces are trimmed and `\,` unescaped.
///
/// An empty input yields an empty list.
pub fn split_unescaped_commas(input: &str) -> Vec<String> {
    if input.trim().is_empty() {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&',') => {
                current.push(',');
                chars.next();
            }
            ',' => out.push(std::mem::take(&mut current).trim().to_string()),
            other => current.push(other),
        }
    }
    out.push(current.trim().to_string());
    out
}

/// Drop parameters with a falsy `display`, then every sector left without content, bottom-up.
///
/// Sibling order is preserved. Running it twice yields the same tree as running it once.
pub fn cleanup(sectors: Vec<Sector>) -> Vec<Sector> {
    sectors.into_iter().filter_map(cleanup_sector).collect()
}

fn cleanup_sector(mut sector: Sector) -> Option<Sector> {
    sector.parameters.retain(|p| p.display);
    sector.sectors = cleanup(std::mem::take(&mut sector.sectors));
    (!sector.is_empty()).then_some(sector)
}
