//! Set-based equi-join on the identifier column
//!
//! The primary table's identifiers form a membership set; the secondary
//! table's rows are partitioned against it with one hash probe per row.
//! Identifiers are expected to be uppercased already, so membership is exact
//! string equality.

use crate::table::Row;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

/// Non-empty identifiers collected from one table's identifier column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierSet {
    ids: HashSet<String>,
}

impl IdentifierSet {
    /// Collect the identifier column of `rows`, skipping empty values
    pub fn from_rows(rows: &[Row], index: usize) -> Self {
        let ids = rows
            .iter()
            .map(|row| row.cell(index))
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        Self { ids }
    }

    /// Exact membership test; the empty identifier is never a member
    pub fn contains(&self, id: &str) -> bool {
        !id.is_empty() && self.ids.contains(id)
    }

    /// Number of distinct identifiers
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for IdentifierSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Secondary rows split by membership in the primary identifier set
///
/// Both partitions keep the secondary table's row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinResult {
    pub matches: Vec<Row>,
    pub mismatches: Vec<Row>,
}

impl JoinResult {
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn mismatch_count(&self) -> usize {
        self.mismatches.len()
    }
}

/// Primary rows selected for labels
pub type LabelRowSet = Vec<Row>;

/// Build the membership set from the primary table
pub fn build_identifier_set(primary_rows: &[Row], primary_id: usize) -> IdentifierSet {
    IdentifierSet::from_rows(primary_rows, primary_id)
}

/// Partition secondary rows into matches and mismatches
///
/// A row matches iff its identifier is non-empty and present in `ids`.
pub fn partition(secondary_rows: &[Row], secondary_id: usize, ids: &IdentifierSet) -> JoinResult {
    let (matches, mismatches): (Vec<Row>, Vec<Row>) = secondary_rows
        .iter()
        .cloned()
        .partition(|row| ids.contains(row.cell(secondary_id)));

    info!(
        matches = matches.len(),
        mismatches = mismatches.len(),
        "partitioned secondary rows"
    );

    JoinResult {
        matches,
        mismatches,
    }
}

/// Select the primary rows whose identifier appears among the matches
///
/// Duplicate primary identifiers are all kept.
pub fn derive_label_rows(
    primary_rows: &[Row],
    primary_id: usize,
    match_rows: &[Row],
    secondary_id: usize,
) -> LabelRowSet {
    let matched = IdentifierSet::from_rows(match_rows, secondary_id);
    primary_rows
        .iter()
        .filter(|row| matched.contains(row.cell(primary_id)))
        .cloned()
        .collect()
}
