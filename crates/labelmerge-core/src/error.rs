//! Error types for labelmerge-core

use crate::table::TableRole;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in labelmerge-core
#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be read or is not valid UTF-8 text
    #[error("failed to read file '{path}': {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension is neither delimited text nor a workbook
    #[error("unsupported file format '{extension}' for '{path}'")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Required headers absent from a table
    #[error("{role} table is missing required headers: {}", .missing.join(", "))]
    SchemaMismatch {
        role: TableRole,
        missing: Vec<String>,
    },

    /// Workbook support was not compiled in
    #[error("{0} support is not available in this build")]
    MissingDependency(&'static str),

    /// The workbook decoder rejected the file
    #[error("failed to read workbook '{path}': {message}")]
    Workbook { path: PathBuf, message: String },

    /// A join was requested before both tables were loaded
    #[error("{0} table has not been loaded")]
    NotReady(&'static str),

    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
