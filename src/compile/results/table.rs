use crate::model::ResultBlock;
use crate::model::result::TableBlock;
use crate::types::{Row, cell};

use super::{field_value, is_yes, read_fields, table_end, texts_from};

/// Generic grid. Rows follow the `table` row while their second cell is non-empty; each grid row
/// keeps cells `1..` without trailing blanks, and is never padded.
pub(super) fn table(rows: &[Row], start: usize) -> (ResultBlock, usize) {
    let mut b = TableBlock::default();
    let next = read_fields(rows, start, |key, i| {
        let row = &rows[i];
        let v = Some(field_value(row));
        match key {
            "code" => b.code = v,
            "title" => b.title = v,
            "display" => b.display = Some(is_yes(row)),
            "table" => {
                let end = table_end(rows, i + 1, |r| !cell(r, 1).is_blank());
                let grid: Vec<Vec<String>> = rows[i + 1..end].iter().map(grid_row).collect();
                b.columns = Some(grid.iter().map(Vec::len).max().unwrap_or(0));
                b.rows = Some(grid);
                return end;
            }
            _ => {}
        }
        i + 1
    });
    (ResultBlock::Table(b), next)
}

fn grid_row(row: &Row) -> Vec<String> {
    let mut cells = texts_from(row, 1);
    while cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::super::compile;
    use crate::model::ResultBlock;
    use crate::types::text_row;

    #[test]
    fn table_rows_are_bounded_by_blank_second_cell() {
        let rows = vec![
            text_row(&["##Table"]),
            text_row(&["title", "Breakdown"]),
            text_row(&["table"]),
            text_row(&["", "Sector", "2020", "2021"]),
            text_row(&["", "Food", "12kg", "", ""]),
            text_row(&["", "Car", "3", "4", "5"]),
            text_row(&["", "", "ignored"]),
            text_row(&["", "After", "x"]),
        ];
        let out = compile(&rows);
        let ResultBlock::Table(t) = &out.value[0] else {
            panic!("expected a table");
        };
        let grid = t.rows.as_ref().unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[1], vec!["Food", "12kg"]);
        assert_eq!(grid[2], vec!["Car", "3", "4", "5"]);
        assert_eq!(t.columns, Some(4));
        assert_eq!(t.title.as_deref(), Some("Breakdown"));
    }

    #[test]
    fn empty_table_has_zero_columns() {
        let rows = vec![text_row(&["##Table"]), text_row(&["table"])];
        let out = compile(&rows);
        let ResultBlock::Table(t) = &out.value[0] else {
            panic!("expected a table");
        };
        assert_eq!(t.rows, Some(vec![]));
        assert_eq!(t.columns, Some(0));
    }
}
