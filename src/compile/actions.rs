//! Action catalogue compiler.
//!
//! Rules:
//! - Rows are read until the first entirely empty row; anything after it is ignored.
//! - Rows are grouped by exact title. The first row of a title supplies the template fields
//!   (sector, types, link, cost, difficulty, duration, display), even when it is not displayable.
//! - Every row of a title, first one included, contributes one impact iff its own display flag
//!   is set.
//! - `impact_value` is the sum of the impacts' `absolute_percentage`.
//! - Kept: displayable templates whose `impact_value != 0`, or whose impacts are all `-1`
//!   (not applicable). The result is ranked by descending `impact_value`, ties in row order.

use std::collections::HashMap;

use crate::config::{ActionConfig, ImpactColumns};
use crate::diagnostics::{Compiled, Diagnostic, Severity, Stage};
use crate::model::{Action, Impact};
use crate::types::{Cell, Row, cell, cell_text, row_is_empty};

/// Compile action rows into the ranked, deduplicated catalogue.
pub fn compile(rows: &[Row], config: &ActionConfig) -> Compiled<Vec<Action>> {
    let Compiled { value: mut actions, diagnostics } = group(rows, config);
    actions.retain(is_kept);
    // Stable sort keeps first-appearance order between equal impact values.
    actions.sort_by(|a, b| b.impact_value.total_cmp(&a.impact_value));
    Compiled::new(actions, diagnostics)
}

/// Group rows by title, before the survival filter and ranking.
pub fn group(rows: &[Row], config: &ActionConfig) -> Compiled<Vec<Action>> {
    let mut actions: Vec<Action> = Vec::new();
    let mut by_title: HashMap<String, usize> = HashMap::new();
    let mut diagnostics = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        if row_is_empty(row) {
            if idx + 1 < rows.len() {
                diagnostics.push(Diagnostic::new(
                    Severity::Info,
                    Stage::Actions,
                    Some(idx),
                    format!("empty row ends the action table; {} row(s) ignored", rows.len() - idx - 1),
                ));
            }
            break;
        }

        let title = cell_text(row, config.columns.title).into_owned();
        let displayable = is_displayed(row, config);

        let slot = match by_title.get(&title) {
            Some(&slot) => slot,
            None => {
                by_title.insert(title.clone(), actions.len());
                actions.push(template(row, title, config));
                actions.len() - 1
            }
        };

        if displayable {
            actions[slot].impacts.push(impact(row, &config.impact));
        }
    }

    for action in &mut actions {
        action.impact_value = action.impacts.iter().map(|i| i.absolute_percentage).sum();
    }

    Compiled::new(actions, diagnostics)
}

/// Survival rule applied after grouping.
pub fn is_kept(action: &Action) -> bool {
    action.display && (action.impact_value != 0.0 || action.impacts.iter().all(Impact::is_not_applicable))
}

fn is_displayed(row: &[Cell], config: &ActionConfig) -> bool {
    config.columns.display.is_some_and(|c| match cell(row, c) {
        Cell::Number(n) => *n == 1.0,
        Cell::Text(s) => s.trim() == "1",
        Cell::Empty => false,
    })
}

fn text(row: &[Cell], column: Option<usize>) -> String {
    column
        .map(|c| cell_text(row, c).trim().to_string())
        .unwrap_or_default()
}

fn number(row: &[Cell], column: Option<usize>) -> Option<f64> {
    column.and_then(|c| cell(row, c).as_f64())
}

fn template(row: &[Cell], title: String, config: &ActionConfig) -> Action {
    let cols = &config.columns;
    Action {
        sector: text(row, cols.sector),
        types: text(row, cols.types)
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        title,
        link: text(row, cols.link),
        impacts: Vec::new(),
        cost: text(row, cols.cost),
        difficulty: text(row, cols.difficulty),
        duration: text(row, cols.duration),
        impact_value: 0.0,
        display: is_displayed(row, config),
    }
}

fn impact(row: &[Cell], cols: &ImpactColumns) -> Impact {
    Impact {
        scope: text(row, cols.scope),
        value: number(row, cols.value).unwrap_or(0.0),
        unit: text(row, cols.unit),
        percentage: number(row, cols.percentage).unwrap_or(0.0),
        priority: number(row, cols.priority),
        absolute_value: number(row, cols.absolute_value).unwrap_or(0.0),
        absolute_percentage: number(row, cols.absolute_percentage).unwrap_or(0.0),
    }
}
