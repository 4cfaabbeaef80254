//! Report aggregation over several compiled projects.
//!
//! The first project's result list is the shape of the report. Every other project contributes
//! the block with the same kind and `code`, weighted by its coefficient. Repeated blocks with the
//! same kind and `code` pair up by order of appearance:
//!
//! - `Indicator` / `GlobalScore` / `Indicator2Values`: numbers are summed as
//!   `sum(number * coefficient)` over the projects whose number parses
//! - `Pie1D`: slices are merged by case-insensitive name, new names appended in first-seen order
//! - `Table`: rows are matched by their first cell (case-insensitive); the first grid row is the
//!   header and is kept as-is; quantity cells (`12kg`, `3.5 %`) with the same unit are summed
//!
//! Every other kind is copied from the first project.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::ResultBlock;
use crate::model::result::{PieSlice, TableBlock};
use crate::types::format_number;

static QUANTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(-?\d+(?:\.\d+)?)(\s*)(\D*)$").expect("invalid quantity pattern"));

/// One project's results with its weight in the report.
#[derive(Debug, Clone, Copy)]
pub struct WeightedResults<'a> {
    pub results: &'a [ResultBlock],
    pub coefficient: f64,
}

impl<'a> WeightedResults<'a> {
    pub fn new(results: &'a [ResultBlock], coefficient: f64) -> Self {
        Self { results, coefficient }
    }
}

/// Merge the result lists of `projects` into one report.
pub fn aggregate(projects: &[WeightedResults<'_>]) -> Vec<ResultBlock> {
    let Some(template) = projects.first() else {
        return Vec::new();
    };

    template
        .results
        .iter()
        .enumerate()
        .map(|(i, block)| {
            let occurrence = template.results[..i].iter().filter(|b| same_key(b, block)).count();
            let peers: Vec<(&ResultBlock, f64)> = projects
                .iter()
                .filter_map(|p| counterpart(p.results, block, occurrence).map(|b| (b, p.coefficient)))
                .collect();
            merge_block(block, &peers)
        })
        .collect()
}

fn same_key(a: &ResultBlock, b: &ResultBlock) -> bool {
    a.kind() == b.kind() && a.code() == b.code()
}

/// The `occurrence`-th block (zero-based) in `results` sharing `block`'s kind and `code`.
fn counterpart<'a>(results: &'a [ResultBlock], block: &ResultBlock, occurrence: usize) -> Option<&'a ResultBlock> {
    results.iter().filter(|b| same_key(b, block)).nth(occurrence)
}

fn merge_block(template: &ResultBlock, peers: &[(&ResultBlock, f64)]) -> ResultBlock {
    match template {
        ResultBlock::Indicator(t) => {
            let mut out = t.clone();
            out.number = weighted_number(&t.number, peers, |b| match b {
                ResultBlock::Indicator(x) => x.number.as_deref(),
                _ => None,
            });
            ResultBlock::Indicator(out)
        }
        ResultBlock::GlobalScore(t) => {
            let mut out = t.clone();
            out.score = weighted_number(&t.score, peers, |b| match b {
                ResultBlock::GlobalScore(x) => x.score.as_deref(),
                _ => None,
            });
            ResultBlock::GlobalScore(out)
        }
        ResultBlock::Indicator2Values(t) => {
            let mut out = t.clone();
            out.number1 = weighted_number(&t.number1, peers, |b| match b {
                ResultBlock::Indicator2Values(x) => x.number1.as_deref(),
                _ => None,
            });
            out.number2 = weighted_number(&t.number2, peers, |b| match b {
                ResultBlock::Indicator2Values(x) => x.number2.as_deref(),
                _ => None,
            });
            ResultBlock::Indicator2Values(out)
        }
        ResultBlock::Pie1D(t) => {
            let mut out = t.clone();
            if t.slices.is_some() {
                out.slices = Some(merge_slices(peers));
            }
            ResultBlock::Pie1D(out)
        }
        ResultBlock::Table(t) => {
            let mut out = t.clone();
            if let Some(rows) = merge_tables(peers) {
                out.columns = Some(rows.iter().map(Vec::len).max().unwrap_or(0));
                out.rows = Some(rows);
            }
            ResultBlock::Table(out)
        }
        other => other.clone(),
    }
}

/// Weighted sum of the numbers `pick` finds in `peers`; the template value when none parses.
fn weighted_number<F>(template: &Option<String>, peers: &[(&ResultBlock, f64)], pick: F) -> Option<String>
where
    F: Fn(&ResultBlock) -> Option<&str>,
{
    let mut total: Option<f64> = None;
    for (block, coefficient) in peers {
        if let Some(n) = pick(block).and_then(|s| s.trim().parse::<f64>().ok()) {
            *total.get_or_insert(0.0) += n * coefficient;
        }
    }
    match total {
        Some(t) => Some(render(t)),
        None => template.clone(),
    }
}

fn merge_slices(peers: &[(&ResultBlock, f64)]) -> Vec<PieSlice> {
    let mut merged: Vec<PieSlice> = Vec::new();
    for (block, coefficient) in peers {
        let ResultBlock::Pie1D(pie) = block else { continue };
        for slice in pie.slices.iter().flatten() {
            let weighted = slice.value * coefficient;
            match merged.iter_mut().find(|s| s.name.eq_ignore_ascii_case(&slice.name)) {
                Some(existing) => existing.value += weighted,
                None => merged.push(PieSlice {
                    value: weighted,
                    ..slice.clone()
                }),
            }
        }
    }
    for slice in &mut merged {
        slice.value = tidy(slice.value);
    }
    merged
}

#[derive(Debug, Clone, PartialEq)]
enum CellAcc {
    Quantity { value: f64, suffix: String, unit: String },
    Text(String),
}

impl CellAcc {
    fn from_text(text: &str, coefficient: f64) -> Self {
        match parse_quantity(text) {
            Some((value, suffix, unit)) => CellAcc::Quantity {
                value: value * coefficient,
                suffix,
                unit,
            },
            None => CellAcc::Text(text.to_string()),
        }
    }

    fn add(&mut self, text: &str, coefficient: f64) {
        let CellAcc::Quantity { value, unit, .. } = self else {
            return;
        };
        if let Some((n, _, _)) = parse_quantity(text).filter(|(_, _, u)| *u == *unit) {
            *value += n * coefficient;
        }
    }

    fn render(&self) -> String {
        match self {
            CellAcc::Quantity { value, suffix, .. } => format!("{}{suffix}", render(*value)),
            CellAcc::Text(s) => s.clone(),
        }
    }
}

struct RowAcc {
    key: String,
    cells: Vec<CellAcc>,
}

fn merge_tables(peers: &[(&ResultBlock, f64)]) -> Option<Vec<Vec<String>>> {
    let mut grids = peers.iter().filter_map(|(block, coefficient)| match block {
        ResultBlock::Table(TableBlock { rows: Some(rows), .. }) => Some((rows, *coefficient)),
        _ => None,
    });

    let (first, first_coefficient) = grids.next()?;
    let Some((header, body)) = first.split_first() else {
        return Some(Vec::new());
    };

    let mut acc: Vec<RowAcc> = Vec::new();
    absorb(&mut acc, body, first_coefficient);
    for (grid, coefficient) in grids {
        absorb(&mut acc, grid.get(1..).unwrap_or_default(), coefficient);
    }

    let mut out = vec![header.clone()];
    out.extend(acc.iter().map(|row| {
        let mut cells = vec![row.key.clone()];
        cells.extend(row.cells.iter().map(CellAcc::render));
        cells
    }));
    Some(out)
}

fn absorb(acc: &mut Vec<RowAcc>, rows: &[Vec<String>], coefficient: f64) {
    for row in rows {
        let Some((key, cells)) = row.split_first() else { continue };
        match acc.iter_mut().find(|r| r.key.eq_ignore_ascii_case(key)) {
            Some(existing) => {
                for (j, text) in cells.iter().enumerate() {
                    match existing.cells.get_mut(j) {
                        Some(cell) => cell.add(text, coefficient),
                        None => existing.cells.push(CellAcc::from_text(text, coefficient)),
                    }
                }
            }
            None => acc.push(RowAcc {
                key: key.clone(),
                cells: cells.iter().map(|t| CellAcc::from_text(t, coefficient)).collect(),
            }),
        }
    }
}

/// Split `"12.5 kg"` into `(12.5, " kg", "kg")`.
pub fn parse_quantity(text: &str) -> Option<(f64, String, String)> {
    let caps = QUANTITY.captures(text)?;
    let value = caps[1].parse::<f64>().ok()?;
    let unit = caps[3].trim_end().to_string();
    Some((value, format!("{}{unit}", &caps[2]), unit))
}

fn render(n: f64) -> String {
    format_number(tidy(n))
}

/// Drop float noise from weighted sums (`0.1 * 3` -> `0.3`).
fn tidy(n: f64) -> f64 {
    (n * 1e9).round() / 1e9
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::result::{Heading, Indicator, Pie1D};

    fn indicator(code: &str, number: &str) -> ResultBlock {
        ResultBlock::Indicator(Indicator {
            code: Some(code.into()),
            number: Some(number.into()),
            unit: Some("t".into()),
            ..Default::default()
        })
    }

    fn pie(slices: &[(&str, f64)]) -> ResultBlock {
        ResultBlock::Pie1D(Pie1D {
            code: Some("split".into()),
            slices: Some(
                slices
                    .iter()
                    .map(|(name, value)| PieSlice {
                        name: name.to_string(),
                        fill: "#000".into(),
                        value: *value,
                        link: None,
                    })
                    .collect(),
            ),
            ..Default::default()
        })
    }

    fn table(rows: &[&[&str]]) -> ResultBlock {
        let rows: Vec<Vec<String>> = rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect();
        ResultBlock::Table(TableBlock {
            code: Some("breakdown".into()),
            columns: Some(0),
            rows: Some(rows),
            ..Default::default()
        })
    }

    #[test]
    fn indicator_numbers_are_weighted() {
        let a = vec![indicator("co2", "10"), indicator("water", "n/a")];
        let b = vec![indicator("water", "4"), indicator("co2", "3")];
        let out = aggregate(&[WeightedResults::new(&a, 1.0), WeightedResults::new(&b, 0.5)]);
        let ResultBlock::Indicator(co2) = &out[0] else { panic!("expected indicator") };
        assert_eq!(co2.number.as_deref(), Some("11.5"));
        assert_eq!(co2.unit.as_deref(), Some("t"));
        let ResultBlock::Indicator(water) = &out[1] else { panic!("expected indicator") };
        assert_eq!(water.number.as_deref(), Some("2"));
    }

    #[test]
    fn repeated_uncoded_blocks_pair_by_position() {
        let uncoded = |number: &str| {
            ResultBlock::Indicator(Indicator {
                number: Some(number.into()),
                ..Default::default()
            })
        };
        let a = vec![uncoded("1"), uncoded("100")];
        let b = vec![uncoded("2"), uncoded("200")];

        let alone = aggregate(&[WeightedResults::new(&a, 1.0)]);
        let nums: Vec<Option<&str>> = alone
            .iter()
            .map(|block| match block {
                ResultBlock::Indicator(x) => x.number.as_deref(),
                _ => None,
            })
            .collect();
        assert_eq!(nums, vec![Some("1"), Some("100")]);

        let both = aggregate(&[WeightedResults::new(&a, 1.0), WeightedResults::new(&b, 0.5)]);
        let nums: Vec<Option<&str>> = both
            .iter()
            .map(|block| match block {
                ResultBlock::Indicator(x) => x.number.as_deref(),
                _ => None,
            })
            .collect();
        assert_eq!(nums, vec![Some("2"), Some("200")]);
    }

    #[test]
    fn pie_slices_merge_case_insensitively() {
        let a = vec![pie(&[("Food", 2.0), ("Car", 1.0)])];
        let b = vec![pie(&[("food", 1.0), ("Plane", 4.0)])];
        let out = aggregate(&[WeightedResults::new(&a, 1.0), WeightedResults::new(&b, 2.0)]);
        let ResultBlock::Pie1D(p) = &out[0] else { panic!("expected pie") };
        let slices: Vec<(&str, f64)> = p
            .slices
            .as_ref()
            .unwrap()
            .iter()
            .map(|s| (s.name.as_str(), s.value))
            .collect();
        assert_eq!(slices, vec![("Food", 4.0), ("Car", 1.0), ("Plane", 8.0)]);
    }

    #[test]
    fn table_quantities_sum_by_unit() {
        let a = vec![table(&[&["Sector", "2020"], &["Food", "12kg"], &["Car", "3 %"]])];
        let b = vec![table(&[&["Sector", "2020"], &["car", "2 %"], &["FOOD", "1t"], &["Bike", "1kg"]])];
        let out = aggregate(&[WeightedResults::new(&a, 1.0), WeightedResults::new(&b, 1.0)]);
        let ResultBlock::Table(t) = &out[0] else { panic!("expected table") };
        assert_eq!(
            t.rows.as_ref().unwrap(),
            &vec![
                vec!["Sector".to_string(), "2020".to_string()],
                vec!["Food".to_string(), "12kg".to_string()],
                vec!["Car".to_string(), "5 %".to_string()],
                vec!["Bike".to_string(), "1kg".to_string()],
            ]
        );
        assert_eq!(t.columns, Some(2));
    }

    #[test]
    fn other_kinds_come_from_the_first_project() {
        let title = ResultBlock::Title(Heading {
            title: Some("Report".into()),
            ..Default::default()
        });
        let a = vec![title.clone()];
        let out = aggregate(&[WeightedResults::new(&a, 2.0), WeightedResults::new(&[], 1.0)]);
        assert_eq!(out, vec![title]);
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn quantities_need_a_leading_number() {
        assert_eq!(parse_quantity("12kg"), Some((12.0, "kg".into(), "kg".into())));
        assert_eq!(parse_quantity(" -3.5 %"), Some((-3.5, " %".into(), "%".into())));
        assert_eq!(parse_quantity("kg12"), None);
        assert_eq!(parse_quantity("1.2.3"), None);
    }
}
