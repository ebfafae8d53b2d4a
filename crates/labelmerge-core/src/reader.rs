//! Source readers: decode file bytes into a [`Table`]
//!
//! The decoder is picked from the file extension. Delimited text is parsed
//! by [`crate::parser`]; workbooks are read through `calamine` (first sheet
//! only) when the `workbook` feature is enabled.

use crate::error::{Error, Result};
use crate::parser::{self, Delimiter};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Capability to turn raw file bytes into a table
pub trait SpreadsheetReader {
    /// Decode `bytes`; `source` is used for error messages only
    fn read_table(&self, bytes: &[u8], source: &Path) -> Result<Table>;
}

/// Input file kinds, resolved from the extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    DelimitedText,
    Workbook,
}

impl SourceFormat {
    /// Resolve the format of `path` from its extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" | "tsv" | "txt" => Ok(SourceFormat::DelimitedText),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SourceFormat::Workbook),
            _ => Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }

    /// Reader for this format; `delimiter` overrides sniffing for text
    pub fn reader(self, delimiter: Option<Delimiter>) -> Box<dyn SpreadsheetReader> {
        match self {
            SourceFormat::DelimitedText => Box::new(DelimitedTextReader { delimiter }),
            SourceFormat::Workbook => Box::new(WorkbookReader),
        }
    }
}

/// Reads UTF-8 delimited text
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedTextReader {
    /// Fixed delimiter; `None` sniffs it from the first line
    pub delimiter: Option<Delimiter>,
}

impl DelimitedTextReader {
    pub fn with_delimiter(delimiter: Delimiter) -> Self {
        Self {
            delimiter: Some(delimiter),
        }
    }
}

impl SpreadsheetReader for DelimitedTextReader {
    fn read_table(&self, bytes: &[u8], source: &Path) -> Result<Table> {
        let text = decode_text(bytes, source)?;
        Ok(match self.delimiter {
            Some(delimiter) => parser::parse_with_delimiter(text, delimiter),
            None => parser::parse(text),
        })
    }
}

/// Strict UTF-8 decode; the BOM is left for the parser to strip
pub fn decode_text<'a>(bytes: &'a [u8], source: &Path) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|e| Error::UnreadableFile {
        path: source.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })
}

/// Reads the first sheet of a spreadsheet workbook
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookReader;

#[cfg(feature = "workbook")]
impl SpreadsheetReader for WorkbookReader {
    fn read_table(&self, bytes: &[u8], source: &Path) -> Result<Table> {
        use calamine::{open_workbook_auto_from_rs, Data, Reader};
        use std::io::Cursor;

        let workbook_error = |message: String| Error::Workbook {
            path: source.to_path_buf(),
            message,
        };

        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| workbook_error(e.to_string()))?;

        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range.map_err(|e| workbook_error(e.to_string()))?,
            None => {
                tracing::warn!(path = %source.display(), "workbook has no sheets");
                return Ok(Table::default());
            }
        };

        let raw_rows = range.rows().map(|row| {
            row.iter().map(|cell| match cell {
                Data::Empty => None,
                other => Some(other.to_string()),
            })
        });
        let table = crate::normalize::normalize_table(raw_rows);

        debug!(
            columns = table.column_count(),
            rows = table.row_count(),
            "read first workbook sheet"
        );
        Ok(table)
    }
}

#[cfg(not(feature = "workbook"))]
impl SpreadsheetReader for WorkbookReader {
    fn read_table(&self, _bytes: &[u8], _source: &Path) -> Result<Table> {
        Err(Error::MissingDependency("workbook"))
    }
}

/// Read and decode a table from disk
pub fn load_table(path: &Path) -> Result<Table> {
    load_table_with_delimiter(path, None)
}

/// Read and decode a table from disk, optionally fixing the text delimiter
pub fn load_table_with_delimiter(path: &Path, delimiter: Option<Delimiter>) -> Result<Table> {
    let format = SourceFormat::from_path(path)?;
    let bytes = fs::read(path).map_err(|source| Error::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), ?format, bytes = bytes.len(), "loading table");
    format.reader(delimiter).read_table(&bytes, path)
}
