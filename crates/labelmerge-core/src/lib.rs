//! labelmerge-core: Core library for matching two student tables by NIF
//!
//! This library provides functionality to:
//! - Parse delimited text with delimiter sniffing, or read a workbook's first sheet
//! - Validate table headers against a required schema
//! - Normalize the identifier column and join the tables through a membership set
//! - Derive the primary rows to print labels for and export them for mail merge

pub mod config;
pub mod error;
pub mod export;
pub mod join;
pub mod labels;
pub mod normalize;
pub mod parser;
pub mod reader;
pub mod schema;
pub mod session;
pub mod table;

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use export::{merge_csv_string, write_merge_csv};
pub use join::{
    build_identifier_set, derive_label_rows, partition, IdentifierSet, JoinResult, LabelRowSet,
};
pub use labels::{LabelFields, LabelRecord, LabelSheetLayout};
pub use normalize::{normalize_cells, normalize_table, uppercase_column};
pub use parser::{detect_delimiter, parse, parse_with_delimiter, Delimiter};
pub use reader::{load_table, DelimitedTextReader, SourceFormat, SpreadsheetReader, WorkbookReader};
pub use schema::{find_header_index, find_missing_headers, validate_headers};
pub use session::{join_tables, prepare, JoinOutcome, PreparedTable, Session};
pub use table::{ColumnIndex, Row, Table, TableRole};
