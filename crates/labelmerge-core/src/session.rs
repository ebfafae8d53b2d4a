//! Pipeline stages and the caller-owned session that strings them together
//!
//! Each stage is a pure function from tables to new values. [`Session`] only
//! remembers the latest result of each stage and drops whatever a new upload
//! makes stale: a new primary table invalidates the secondary table and the
//! join; a new secondary table invalidates the join.

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::join::{build_identifier_set, derive_label_rows, partition, JoinResult, LabelRowSet};
use crate::labels::LabelRecord;
use crate::normalize::uppercase_column;
use crate::parser::Delimiter;
use crate::reader::load_table_with_delimiter;
use crate::schema::{find_header_index, normalize_header, validate_headers};
use crate::table::{Row, Table, TableRole};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// A table that passed its schema gate, with its identifier column uppercased
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedTable {
    pub table: Table,
    /// Offset of the identifier column
    pub identifier: usize,
}

impl PreparedTable {
    pub fn rows(&self) -> &[Row] {
        &self.table.rows
    }
}

/// Validate a table for `role`, locate its identifier and normalize it
pub fn prepare(table: Table, role: TableRole, config: &PipelineConfig) -> Result<PreparedTable> {
    validate_headers(&table, role, config.required_headers(role))?;

    // The identifier may be configured outside the required set
    let identifier = find_header_index(&table.headers, &config.identifier_column)
        .get()
        .ok_or_else(|| Error::SchemaMismatch {
            role,
            missing: vec![normalize_header(&config.identifier_column)],
        })?;

    let rows = uppercase_column(&table.rows, identifier);
    info!(%role, rows = rows.len(), "table accepted");

    Ok(PreparedTable {
        table: Table::new(table.headers, rows),
        identifier,
    })
}

/// Everything derived from one join of a primary and a secondary table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinOutcome {
    pub result: JoinResult,
    /// Primary rows to print labels for
    pub label_rows: LabelRowSet,
    /// Identifier offset in the secondary rows of `result`
    pub secondary_identifier: usize,
}

impl JoinOutcome {
    /// Identifiers of the mismatched secondary rows, in row order
    pub fn mismatched_identifiers(&self) -> Vec<&str> {
        self.result
            .mismatches
            .iter()
            .map(|row| row.cell(self.secondary_identifier))
            .collect()
    }
}

/// Join two prepared tables
pub fn join_tables(primary: &PreparedTable, secondary: &PreparedTable) -> JoinOutcome {
    let ids = build_identifier_set(primary.rows(), primary.identifier);
    let result = partition(secondary.rows(), secondary.identifier, &ids);
    let label_rows = derive_label_rows(
        primary.rows(),
        primary.identifier,
        &result.matches,
        secondary.identifier,
    );
    info!(label_rows = label_rows.len(), "derived label rows");

    JoinOutcome {
        result,
        label_rows,
        secondary_identifier: secondary.identifier,
    }
}

/// Caller-owned state for one primary/secondary pairing
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: PipelineConfig,
    primary: Option<PreparedTable>,
    secondary: Option<PreparedTable>,
    outcome: Option<JoinOutcome>,
}

impl Session {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn primary(&self) -> Option<&PreparedTable> {
        self.primary.as_ref()
    }

    pub fn secondary(&self) -> Option<&PreparedTable> {
        self.secondary.as_ref()
    }

    /// Result of the last [`Session::join`], if still current
    pub fn outcome(&self) -> Option<&JoinOutcome> {
        self.outcome.as_ref()
    }

    /// Both halves are loaded
    pub fn is_ready(&self) -> bool {
        self.primary.is_some() && self.secondary.is_some()
    }

    /// Replace the table for `role` with an already-decoded one
    pub fn load(&mut self, role: TableRole, table: Table) -> Result<&PreparedTable> {
        self.settle(role, Ok(table))
    }

    /// Read a table from disk and replace the table for `role`
    pub fn load_file(
        &mut self,
        role: TableRole,
        path: &Path,
        delimiter: Option<Delimiter>,
    ) -> Result<&PreparedTable> {
        let loaded = load_table_with_delimiter(path, delimiter);
        self.settle(role, loaded)
    }

    fn settle(&mut self, role: TableRole, loaded: Result<Table>) -> Result<&PreparedTable> {
        self.outcome = None;
        let prepared = loaded.and_then(|table| prepare(table, role, &self.config));

        // A rejected primary leaves the secondary table in place
        if prepared.is_ok() && role == TableRole::Primary {
            self.secondary = None;
        }
        let slot = match role {
            TableRole::Primary => &mut self.primary,
            TableRole::Secondary => &mut self.secondary,
        };

        match prepared {
            Ok(table) => Ok(&*slot.insert(table)),
            Err(e) => {
                warn!(%role, error = %e, "table rejected");
                *slot = None;
                Err(e)
            }
        }
    }

    /// Join the loaded tables, replacing any previous outcome
    pub fn join(&mut self) -> Result<&JoinOutcome> {
        let primary = self.primary.as_ref().ok_or(Error::NotReady("primary"))?;
        let secondary = self.secondary.as_ref().ok_or(Error::NotReady("secondary"))?;
        let outcome = join_tables(primary, secondary);
        Ok(&*self.outcome.insert(outcome))
    }

    /// Label records for the current outcome
    pub fn label_records(&self) -> Result<Vec<LabelRecord>> {
        let primary = self.primary.as_ref().ok_or(Error::NotReady("primary"))?;
        let outcome = self.outcome.as_ref().ok_or(Error::NotReady("join result"))?;
        let fields = self.config.label_fields(&primary.table.headers);
        Ok(fields.records(&outcome.label_rows))
    }
}
