//! Core table types shared by every pipeline stage

use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed table: one header row plus data rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Header names, in source order
    pub headers: Vec<String>,
    /// Data rows, in source order
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a table from headers and rows
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Build a table from a sequence of raw rows, the first becoming the headers
    pub(crate) fn from_records(records: Vec<Row>) -> Self {
        let mut records = records.into_iter();
        let headers = records.next().map(|r| r.cells).unwrap_or_default();
        Self {
            headers,
            rows: records.collect(),
        }
    }
}

/// A row of cells, positionally aligned with the table headers
///
/// Rows may be shorter than the header row. Missing trailing cells read as
/// empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    pub cells: Vec<String>,
}

impl Row {
    /// Create a new row
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Get a cell by column index, empty if the row is too short
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    /// Number of cells actually present
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True when every cell is empty after trimming
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Position of a column within a table's headers
///
/// `NotFound` is a distinct state, never confused with index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnIndex {
    Found(usize),
    NotFound,
}

impl ColumnIndex {
    /// The resolved offset, if any
    pub fn get(self) -> Option<usize> {
        match self {
            ColumnIndex::Found(i) => Some(i),
            ColumnIndex::NotFound => None,
        }
    }

    pub fn is_found(self) -> bool {
        matches!(self, ColumnIndex::Found(_))
    }
}

impl From<Option<usize>> for ColumnIndex {
    fn from(value: Option<usize>) -> Self {
        value.map_or(ColumnIndex::NotFound, ColumnIndex::Found)
    }
}

/// Which side of the join a table plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableRole {
    /// Source of the label attributes and of the identifier membership set
    Primary,
    /// Table checked for membership against the primary identifiers
    Secondary,
}

impl fmt::Display for TableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableRole::Primary => write!(f, "primary"),
            TableRole::Secondary => write!(f, "secondary"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_cell_past_end_is_empty() {
        let row: Row = ["a", "b"].into_iter().collect();
        assert_eq!(row.cell(1), "b");
        assert_eq!(row.cell(5), "");
    }

    #[test]
    fn test_row_is_blank() {
        let blank: Row = ["", "  ", "\t"].into_iter().collect();
        let filled: Row = ["", "x"].into_iter().collect();
        assert!(blank.is_blank());
        assert!(!filled.is_blank());
        assert!(Row::default().is_blank());
    }

    #[test]
    fn test_column_index_not_found_is_distinct_from_zero() {
        assert_eq!(ColumnIndex::from(Some(0)), ColumnIndex::Found(0));
        assert_eq!(ColumnIndex::from(None), ColumnIndex::NotFound);
        assert_ne!(ColumnIndex::Found(0), ColumnIndex::NotFound);
        assert_eq!(ColumnIndex::NotFound.get(), None);
        assert!(ColumnIndex::Found(0).is_found());
    }

    #[test]
    fn test_from_records_splits_header() {
        let table = Table::from_records(vec![
            ["h1", "h2"].into_iter().collect(),
            ["a", "b"].into_iter().collect(),
        ]);
        assert_eq!(table.headers, vec!["h1", "h2"]);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_from_records_empty() {
        let table = Table::from_records(Vec::new());
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_role_display() {
        assert_eq!(TableRole::Primary.to_string(), "primary");
        assert_eq!(TableRole::Secondary.to_string(), "secondary");
    }
}
