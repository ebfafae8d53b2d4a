//! Label field extraction and sheet geometry
//!
//! Rendering happens outside this crate. What lives here is the data a
//! renderer needs: which columns feed a label, the label records themselves,
//! and the physical sheet layout.

use crate::schema::find_header_index;
use crate::table::{ColumnIndex, Row};
use serde::{Deserialize, Serialize};

/// Columns of the primary table that feed a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelFields {
    pub name: ColumnIndex,
    pub address: ColumnIndex,
}

impl LabelFields {
    /// Resolve the label columns by header name
    pub fn resolve<H: AsRef<str>>(headers: &[H], name_column: &str, address_column: &str) -> Self {
        Self {
            name: find_header_index(headers, name_column),
            address: find_header_index(headers, address_column),
        }
    }

    /// Build the label record for one row; missing columns read as empty
    pub fn record(&self, row: &Row) -> LabelRecord {
        let read = |index: ColumnIndex| index.get().map(|i| row.cell(i)).unwrap_or("").to_string();
        LabelRecord {
            name: read(self.name),
            address: read(self.address),
        }
    }

    pub fn records(&self, rows: &[Row]) -> Vec<LabelRecord> {
        rows.iter().map(|row| self.record(row)).collect()
    }
}

/// One printable address label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub name: String,
    pub address: String,
}

/// Physical layout of a label sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSheetLayout {
    /// Commercial template the geometry matches
    pub template: String,
    pub columns: usize,
    pub rows: usize,
    pub label_width_mm: f64,
    pub label_height_mm: f64,
    /// Page size keyword for `@page`
    pub page_size: String,
    pub page_margin_mm: f64,
}

impl Default for LabelSheetLayout {
    fn default() -> Self {
        Self {
            template: "Apli 01273".to_string(),
            columns: 3,
            rows: 8,
            label_width_mm: 70.0,
            label_height_mm: 37.0,
            page_size: "A4".to_string(),
            page_margin_mm: 0.0,
        }
    }
}

impl LabelSheetLayout {
    pub fn labels_per_page(&self) -> usize {
        self.columns * self.rows
    }

    /// Pages needed for `labels` labels
    pub fn page_count(&self, labels: usize) -> usize {
        match self.labels_per_page() {
            0 => 0,
            per_page => labels.div_ceil(per_page),
        }
    }

    /// Split records into pages of at most `labels_per_page`
    pub fn paginate<'a>(&self, records: &'a [LabelRecord]) -> Vec<&'a [LabelRecord]> {
        match self.labels_per_page() {
            0 => Vec::new(),
            per_page => records.chunks(per_page).collect(),
        }
    }
}
