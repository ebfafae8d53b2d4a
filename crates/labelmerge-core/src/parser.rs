//! Delimited text parser with delimiter sniffing
//!
//! The delimiter is guessed from the first line only: raw occurrences of
//! comma, semicolon and tab are counted (quotes are not considered) and the
//! most frequent wins, with comma as the fallback on ties or when none occur.
//! A header line whose values hold more semicolons or tabs than the real
//! delimiter is misparsed; use [`parse_with_delimiter`] when the delimiter is
//! known up front.

use crate::table::{Row, Table};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Column delimiters recognized by the sniffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    Comma,
    Semicolon,
    Tab,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Semicolon => ';',
            Delimiter::Tab => '\t',
        }
    }

    /// Byte form, as the csv crate expects it
    pub fn as_byte(self) -> u8 {
        self.as_char() as u8
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Comma => write!(f, "comma"),
            Delimiter::Semicolon => write!(f, "semicolon"),
            Delimiter::Tab => write!(f, "tab"),
        }
    }
}

/// Guess the delimiter from the first line of `text`
pub fn detect_delimiter(text: &str) -> Delimiter {
    let first_line = text
        .split(|c: char| c == '\n' || c == '\r')
        .next()
        .unwrap_or_default();

    let comma = first_line.matches(',').count();
    let semicolon = first_line.matches(';').count();
    let tab = first_line.matches('\t').count();

    if semicolon > comma && semicolon > tab {
        Delimiter::Semicolon
    } else if tab > comma && tab > semicolon {
        Delimiter::Tab
    } else {
        Delimiter::Comma
    }
}

/// Parse delimited text, sniffing the delimiter from the first line
pub fn parse(text: &str) -> Table {
    let text = strip_bom(text);
    parse_with_delimiter(text, detect_delimiter(text))
}

/// Parse delimited text with a known delimiter
///
/// The first non-blank row becomes the headers. Cells are trimmed, and rows
/// whose cells are all empty are dropped.
pub fn parse_with_delimiter(text: &str, delimiter: Delimiter) -> Table {
    let text = strip_bom(text);
    let delim = delimiter.as_char();

    let mut records: Vec<Row> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            c if c == delim && !in_quotes => {
                row.push(take_cell(&mut current));
            }
            '\n' | '\r' if !in_quotes => {
                // CRLF is a single terminator
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(take_cell(&mut current));
                push_record(&mut records, std::mem::take(&mut row));
            }
            _ => current.push(c),
        }
    }

    // Input without a final newline
    if !current.is_empty() || !row.is_empty() {
        row.push(take_cell(&mut current));
        push_record(&mut records, row);
    }

    let table = Table::from_records(records);
    debug!(
        %delimiter,
        columns = table.column_count(),
        rows = table.row_count(),
        "parsed delimited text"
    );
    table
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

fn take_cell(current: &mut String) -> String {
    let cell = current.trim().to_string();
    current.clear();
    cell
}

fn push_record(records: &mut Vec<Row>, cells: Vec<String>) {
    let row = Row::new(cells);
    if !row.is_blank() {
        records.push(row);
    }
}
