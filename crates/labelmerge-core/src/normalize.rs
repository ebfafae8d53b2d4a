//! Cell and identifier normalization

use crate::table::{Row, Table};

/// Normalize a row of loosely-typed cells into a [`Row`]
///
/// `None` becomes the empty string; anything else is stringified and
/// trimmed. Spreadsheet decoders go through this so their tables have the
/// same shape as parsed text.
pub fn normalize_cells<I, T>(cells: I) -> Row
where
    I: IntoIterator<Item = Option<T>>,
    T: ToString,
{
    cells
        .into_iter()
        .map(|cell| match cell {
            Some(value) => value.to_string().trim().to_string(),
            None => String::new(),
        })
        .collect()
}

/// Normalize every raw row and build a table, skipping blank rows
///
/// The first non-blank row becomes the headers.
pub fn normalize_table<R, I, T>(raw_rows: R) -> Table
where
    R: IntoIterator<Item = I>,
    I: IntoIterator<Item = Option<T>>,
    T: ToString,
{
    let records = raw_rows
        .into_iter()
        .map(normalize_cells)
        .filter(|row| !row.is_blank())
        .collect();
    Table::from_records(records)
}

/// Uppercase the cell at `index` in every row
///
/// Rows too short to hold `index` are padded with empty cells so the column
/// exists in the output. Idempotent.
pub fn uppercase_column(rows: &[Row], index: usize) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            let mut cells = row.cells.clone();
            if cells.len() <= index {
                cells.resize(index + 1, String::new());
            }
            cells[index] = cells[index].to_uppercase();
            Row::new(cells)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().copied().collect()
    }

    #[test]
    fn test_normalize_cells_coerces_values() {
        let normalized = normalize_cells(vec![Some("  Ana "), None, Some("x")]);
        assert_eq!(normalized, row(&["Ana", "", "x"]));

        let numbers = normalize_cells(vec![Some(42), None, Some(7)]);
        assert_eq!(numbers, row(&["42", "", "7"]));

        let floats = normalize_cells(vec![Some(1.5_f64), Some(2.0_f64)]);
        assert_eq!(floats, row(&["1.5", "2"]));
    }

    #[test]
    fn test_normalize_table_drops_blank_rows() {
        let raw: Vec<Vec<Option<&str>>> = vec![
            vec![None, None],
            vec![Some(" nif "), Some("alumno")],
            vec![Some("  "), None],
            vec![Some("a1"), Some("Ana")],
        ];
        let table = normalize_table(raw);
        assert_eq!(table.headers, vec!["nif", "alumno"]);
        assert_eq!(table.rows, vec![row(&["a1", "Ana"])]);
    }

    #[test]
    fn test_uppercase_column_only_touches_index() {
        let rows = vec![row(&["a1", "ana"]), row(&["b2", "luis"])];
        let out = uppercase_column(&rows, 0);
        assert_eq!(out, vec![row(&["A1", "ana"]), row(&["B2", "luis"])]);
        // Input left intact
        assert_eq!(rows[0].cell(0), "a1");
    }

    #[test]
    fn test_uppercase_column_is_idempotent() {
        let rows = vec![row(&["x", "ñandú-1"]), row(&["y"]), row(&[])];
        let once = uppercase_column(&rows, 1);
        let twice = uppercase_column(&once, 1);
        assert_eq!(once, twice);
        assert_eq!(once[0].cell(1), "ÑANDÚ-1");
    }

    #[test]
    fn test_uppercase_column_pads_short_rows() {
        let out = uppercase_column(&[row(&["only"])], 2);
        assert_eq!(out[0], row(&["only", "", ""]));
    }
}
