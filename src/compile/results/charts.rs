//! Chart block kinds. Each has a `table` field introducing positional rows.

use crate::diagnostics::{Diagnostic, Stage};
use crate::model::ResultBlock;
use crate::model::result::{Bar1D, BarCategory, BarChart, BarGroup, BarSeries, Pie1D, PieSlice, Treemap, TreemapNode};
use crate::types::{Cell, Row, cell};

use super::{field_value, is_yes, non_blank, read_fields, table_end, texts_from};

/// Column at which `Bar1D` series names (header) and values start.
const BAR_1D_FIRST_SERIES: usize = 3;

fn has(row: &[Cell], idx: usize) -> bool {
    !cell(row, idx).is_blank()
}

/// Treemap: rows `(_, sector, sectorColor, subSector, subSectorColor, value)`.
///
/// A sector named with a sub-sector becomes a container and loses its own value. An unparsable
/// value leaves its node without a value; the rest of the tree is kept.
pub(super) fn treemap(rows: &[Row], start: usize, diagnostics: &mut Vec<Diagnostic>) -> (ResultBlock, usize) {
    let mut b = Treemap::default();
    let next = read_fields(rows, start, |key, i| {
        let row = &rows[i];
        let v = Some(field_value(row));
        match key {
            "code" => b.code = v,
            "title" => b.title = v,
            "unit" => b.unit = v,
            "display" => b.display = Some(is_yes(row)),
            "table" => {
                let end = table_end(rows, i + 1, |r| has(r, 1));
                b.data = Some(treemap_nodes(rows, i + 1, end, diagnostics));
                return end;
            }
            _ => {}
        }
        i + 1
    });
    (ResultBlock::Treemap(b), next)
}

fn treemap_nodes(rows: &[Row], start: usize, end: usize, diagnostics: &mut Vec<Diagnostic>) -> Vec<TreemapNode> {
    let mut nodes: Vec<TreemapNode> = Vec::new();
    for (idx, row) in rows.iter().enumerate().take(end).skip(start) {
        let name = non_blank(row, 1).unwrap_or_default();
        let value = match cell(row, 5) {
            c if c.is_blank() => None,
            c => {
                let parsed = c.as_f64();
                if parsed.is_none() {
                    diagnostics.push(Diagnostic::warning(
                        Stage::Results,
                        idx,
                        format!("treemap value '{}' for '{name}' is not a number", c.text().trim()),
                    ));
                }
                parsed
            }
        };

        let existing = nodes.iter().position(|n| n.name == name);
        let pos = match existing {
            Some(pos) => pos,
            None => {
                nodes.push(TreemapNode {
                    name,
                    color: non_blank(row, 2),
                    ..Default::default()
                });
                nodes.len() - 1
            }
        };
        let sector = &mut nodes[pos];

        match non_blank(row, 3) {
            Some(sub) => {
                sector.value = None;
                match sector.children.iter_mut().find(|c| c.name == sub) {
                    Some(child) => child.value = value,
                    None => sector.children.push(TreemapNode {
                        name: sub,
                        color: non_blank(row, 4),
                        value,
                        children: Vec::new(),
                    }),
                }
            }
            None if sector.children.is_empty() => sector.value = value,
            None => {}
        }
    }
    nodes
}

/// Pie chart: rows `(_, name, fillColor, value, link?)`.
pub(super) fn pie_1d(rows: &[Row], start: usize, diagnostics: &mut Vec<Diagnostic>) -> (ResultBlock, usize) {
    let mut b = Pie1D::default();
    let next = read_fields(rows, start, |key, i| {
        let row = &rows[i];
        let v = Some(field_value(row));
        match key {
            "code" => b.code = v,
            "title" => b.title = v,
            "unit" => b.unit = v,
            "display" => b.display = Some(is_yes(row)),
            "table" => {
                let end = table_end(rows, i + 1, |r| has(r, 1));
                let slices = (i + 1..end)
                    .map(|idx| pie_slice(&rows[idx], idx, diagnostics))
                    .collect();
                b.slices = Some(slices);
                return end;
            }
            _ => {}
        }
        i + 1
    });
    (ResultBlock::Pie1D(b), next)
}

fn pie_slice(row: &[Cell], idx: usize, diagnostics: &mut Vec<Diagnostic>) -> PieSlice {
    let name = non_blank(row, 1).unwrap_or_default();
    let value = cell(row, 3).as_f64().unwrap_or_else(|| {
        diagnostics.push(Diagnostic::warning(
            Stage::Results,
            idx,
            format!("pie slice '{name}' has no numeric value; using 0"),
        ));
        0.0
    });
    PieSlice {
        fill: non_blank(row, 2).unwrap_or_default(),
        value,
        link: non_blank(row, 4).map(|l| if l.starts_with('#') { l } else { format!("#{l}") }),
        name,
    }
}

/// Score bar against a ceiling: `score` series plus, when stacked, a `rest = total - score` one.
fn progress_bar(name: String, color: Option<String>, total: f64, score: f64, row: usize, stacked: bool) -> BarCategory {
    let mut series = vec![BarSeries {
        key: format!("score-{row}"),
        value: score,
        color: color.clone(),
    }];
    if stacked {
        series.push(BarSeries {
            key: format!("rest-{row}"),
            value: total - score,
            color: None,
        });
    }
    BarCategory {
        name,
        color,
        total,
        score,
        series,
        sub_categories: Vec::new(),
    }
}

fn bar_chart_fields<F>(rows: &[Row], start: usize, mut read_table: F) -> (BarChart, usize)
where
    F: FnMut(usize) -> (Vec<BarCategory>, usize),
{
    let mut b = BarChart::default();
    let next = read_fields(rows, start, |key, i| {
        let row = &rows[i];
        let v = Some(field_value(row));
        match key {
            "code" => b.code = v,
            "title" => b.title = v,
            "unit" => b.unit = v,
            "display" => b.display = Some(is_yes(row)),
            "table" => {
                let (categories, end) = read_table(i + 1);
                b.categories = Some(categories);
                return end;
            }
            _ => {}
        }
        i + 1
    });
    (b, next)
}

/// Two-level stacked bars: rows `(_, category, subCategory, color, total, score, ...)`.
///
/// Rows with a zero total are skipped; sub-category rows of a skipped category are dropped too.
pub(super) fn bar_stacked_2d(rows: &[Row], start: usize) -> (ResultBlock, usize) {
    let (b, next) = bar_chart_fields(rows, start, |from| {
        let end = table_end(rows, from, |r| has(r, 1) || has(r, 2));
        let mut categories: Vec<BarCategory> = Vec::new();
        let mut category_open = false;
        for idx in from..end {
            let row = &rows[idx];
            let total = cell(row, 4).as_f64().unwrap_or(0.0);
            let is_category = has(row, 1);
            if is_category {
                category_open = total != 0.0;
            }
            if total == 0.0 {
                continue;
            }
            let score = cell(row, 5).as_f64().unwrap_or(0.0);
            let name_col = if is_category { 1 } else { 2 };
            let bar = progress_bar(
                non_blank(row, name_col).unwrap_or_default(),
                non_blank(row, 3),
                total,
                score,
                idx,
                true,
            );
            if is_category {
                categories.push(bar);
            } else if category_open {
                if let Some(parent) = categories.last_mut() {
                    parent.sub_categories.push(bar);
                }
            }
        }
        (categories, end)
    });
    (ResultBlock::BarStacked2D(b), next)
}

fn one_level_bars(rows: &[Row], from: usize, stacked: bool) -> (Vec<BarCategory>, usize) {
    let end = table_end(rows, from, |r| has(r, 1));
    let bars = (from..end)
        .filter_map(|idx| {
            let row = &rows[idx];
            let total = cell(row, 3).as_f64().unwrap_or(0.0);
            if total == 0.0 {
                return None;
            }
            let score = cell(row, 4).as_f64().unwrap_or(0.0);
            Some(progress_bar(
                non_blank(row, 1).unwrap_or_default(),
                non_blank(row, 2),
                total,
                score,
                idx,
                stacked,
            ))
        })
        .collect();
    (bars, end)
}

/// One-level stacked bars: rows `(_, name, color, total, score)`.
pub(super) fn bar_stacked_1d(rows: &[Row], start: usize) -> (ResultBlock, usize) {
    let (b, next) = bar_chart_fields(rows, start, |from| one_level_bars(rows, from, true));
    (ResultBlock::BarStacked1D(b), next)
}

/// Single-series bars: same rows as [`bar_stacked_1d`], without the `rest` series.
pub(super) fn bar_single_1d(rows: &[Row], start: usize) -> (ResultBlock, usize) {
    let (b, next) = bar_chart_fields(rows, start, |from| one_level_bars(rows, from, false));
    (ResultBlock::BarSingle1D(b), next)
}

/// Grouped bars: the `table` row names series from the fourth column on; following rows are
/// `(_, name, color, value...)`.
pub(super) fn bar_1d(rows: &[Row], start: usize) -> (ResultBlock, usize) {
    let mut b = Bar1D::default();
    let next = read_fields(rows, start, |key, i| {
        let row = &rows[i];
        let v = Some(field_value(row));
        match key {
            "code" => b.code = v,
            "title" => b.title = v,
            "unit" => b.unit = v,
            "display" => b.display = Some(is_yes(row)),
            "table" => {
                let header = texts_from(row, BAR_1D_FIRST_SERIES);
                let end = table_end(rows, i + 1, |r| has(r, 1));
                let bars = rows[i + 1..end].iter().map(|r| bar_group(r, &header)).collect();
                b.series = Some(header.into_iter().filter(|s| !s.is_empty()).collect());
                b.bars = Some(bars);
                return end;
            }
            _ => {}
        }
        i + 1
    });
    (ResultBlock::Bar1D(b), next)
}

fn bar_group(row: &[Cell], header: &[String]) -> BarGroup {
    let values = header
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.is_empty())
        .map(|(k, name)| BarSeries {
            key: name.clone(),
            value: cell(row, BAR_1D_FIRST_SERIES + k).as_f64().unwrap_or(0.0),
            color: None,
        })
        .collect();
    BarGroup {
        name: non_blank(row, 1).unwrap_or_default(),
        color: non_blank(row, 2).unwrap_or_default(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::super::compile;
    use crate::model::ResultBlock;
    use crate::model::result::{BarCategory, TreemapNode};
    use crate::types::{Cell, Row, text_row};

    fn row(cells: &[&str]) -> Row {
        text_row(cells)
    }

    #[test]
    fn treemap_builds_sectors_and_sub_sectors() {
        let rows = vec![
            row(&["##Treemap"]),
            row(&["title", "Footprint"]),
            row(&["table"]),
            row(&["", "Food", "#0a0", "", "", "2.5"]),
            row(&["", "Housing", "#00a", "Heat", "#33f", "3"]),
            row(&["", "Housing", "#00a", "Power", "#66f", "1"]),
            row(&["", ""]),
            row(&["display", "yes"]),
        ];
        let out = compile(&rows);
        let ResultBlock::Treemap(t) = &out.value[0] else {
            panic!("expected a treemap");
        };
        let data = t.data.as_ref().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].value, Some(2.5));
        assert_eq!(data[1].value, None);
        let children: Vec<&str> = data[1].children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(children, vec!["Heat", "Power"]);
        assert_eq!(data[1].children[0].color.as_deref(), Some("#33f"));
        // The empty-first-cell row ends the block; `display` is never read.
        assert_eq!(t.display, None);
    }

    #[test]
    fn treemap_keeps_partial_tree_on_bad_value() {
        let rows = vec![
            row(&["##Treemap"]),
            row(&["table"]),
            row(&["", "Food", "", "", "", "lots"]),
            row(&["", "Car", "", "", "", "4"]),
        ];
        let out = compile(&rows);
        let ResultBlock::Treemap(t) = &out.value[0] else {
            panic!("expected a treemap");
        };
        assert_eq!(
            t.data.as_deref().unwrap(),
            &[
                TreemapNode { name: "Food".into(), ..Default::default() },
                TreemapNode { name: "Car".into(), value: Some(4.0), ..Default::default() },
            ]
        );
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].row, Some(2));
    }

    #[test]
    fn pie_slices_get_hash_prefixed_links() {
        let rows = vec![
            row(&["##Pie1D"]),
            row(&["table"]),
            vec![Cell::Empty, "Food".into(), "#0a0".into(), Cell::Number(40.0), "food".into()],
            vec![Cell::Empty, "Car".into(), "#a00".into(), Cell::Number(60.0), "#car".into()],
            vec![Cell::Empty, "Other".into(), "#aaa".into(), Cell::Number(0.5)],
            row(&["", ""]),
        ];
        let out = compile(&rows);
        let ResultBlock::Pie1D(p) = &out.value[0] else {
            panic!("expected a pie");
        };
        let slices = p.slices.as_ref().unwrap();
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].link.as_deref(), Some("#food"));
        assert_eq!(slices[1].link.as_deref(), Some("#car"));
        assert_eq!(slices[2].link, None);
        assert_eq!(slices[2].value, 0.5);
    }

    #[test]
    fn bar_stacked_2d_adds_rest_series_and_skips_zero_totals() {
        let rows = vec![
            row(&["##BarStacked2D"]),
            row(&["table"]),
            row(&["", "Energy", "", "#f00", "10", "4", "9"]),
            row(&["", "", "Heat", "#f88", "6", "1"]),
            row(&["", "", "Empty", "#f88", "0", "0"]),
            row(&["", "Skipped", "", "#0f0", "0", "0"]),
            row(&["", "", "Orphan", "#0f0", "5", "5"]),
            row(&["", "Water", "", "#00f", "8", "8"]),
        ];
        let out = compile(&rows);
        let ResultBlock::BarStacked2D(chart) = &out.value[0] else {
            panic!("expected stacked bars");
        };
        let cats = chart.categories.as_ref().unwrap();
        let names: Vec<&str> = cats.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Energy", "Water"]);

        let energy: &BarCategory = &cats[0];
        assert_eq!(energy.score, 4.0);
        assert_eq!(energy.series[0].key, "score-2");
        assert_eq!(energy.series[1].key, "rest-2");
        assert_eq!(energy.series[1].value, 6.0);
        assert_eq!(energy.sub_categories.len(), 1);
        assert_eq!(energy.sub_categories[0].series[1].key, "rest-3");
        assert_eq!(energy.sub_categories[0].series[1].value, 5.0);
        assert!(cats[1].sub_categories.is_empty());
    }

    #[test]
    fn single_and_stacked_1d_differ_by_rest_series() {
        let rows = vec![
            row(&["##BarStacked1D"]),
            row(&["table"]),
            row(&["", "A", "#f00", "10", "3"]),
            row(&["", "B", "#0f0", "0", "3"]),
            vec![],
            row(&["##BarSingle1D"]),
            row(&["table"]),
            row(&["", "A", "#f00", "10", "3"]),
        ];
        let out = compile(&rows);
        match (&out.value[0], &out.value[1]) {
            (ResultBlock::BarStacked1D(stacked), ResultBlock::BarSingle1D(single)) => {
                let s = stacked.categories.as_ref().unwrap();
                assert_eq!(s.len(), 1);
                assert_eq!(s[0].series.len(), 2);
                assert_eq!(s[0].series[1].value, 7.0);
                let one = single.categories.as_ref().unwrap();
                assert_eq!(one[0].series.len(), 1);
                assert_eq!(one[0].total, 10.0);
            }
            other => panic!("unexpected blocks {other:?}"),
        }
    }

    #[test]
    fn bar_1d_reads_header_series() {
        let rows = vec![
            row(&["##Bar1D"]),
            row(&["table", "", "", "2020", "", "2021"]),
            row(&["", "Paris", "#f00", "1", "99", "2", "77"]),
            row(&["", "Lyon", "#0f0", "3"]),
        ];
        let out = compile(&rows);
        let ResultBlock::Bar1D(bars) = &out.value[0] else {
            panic!("expected bar1d");
        };
        assert_eq!(bars.series.as_deref().unwrap(), &["2020".to_string(), "2021".to_string()]);
        let groups = bars.bars.as_ref().unwrap();
        assert_eq!(groups.len(), 2);
        let paris: Vec<(&str, f64)> = groups[0].values.iter().map(|s| (s.key.as_str(), s.value)).collect();
        assert_eq!(paris, vec![("2020", 1.0), ("2021", 2.0)]);
        let lyon: Vec<f64> = groups[1].values.iter().map(|s| s.value).collect();
        assert_eq!(lyon, vec![3.0, 0.0]);
    }
}
