//! Mail-merge export of label records

use crate::error::{Error, Result};
use crate::labels::LabelRecord;
use std::io::{self, Write};

/// Column titles of the mail-merge file
pub const MERGE_HEADERS: [&str; 2] = ["Alumno", "Dirección completa"];

/// Write label records as a two-column CSV
///
/// Fields holding a quote, comma or line break are quoted with internal
/// quotes doubled. Lines end in CRLF.
pub fn write_merge_csv<W: Write>(records: &[LabelRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    csv_writer.write_record(MERGE_HEADERS)?;
    for record in records {
        csv_writer.write_record([record.name.as_str(), record.address.as_str()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Render the mail-merge CSV into a string
pub fn merge_csv_string(records: &[LabelRecord]) -> Result<String> {
    let mut buffer = Vec::new();
    write_merge_csv(records, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn record(name: &str, address: &str) -> LabelRecord {
        LabelRecord {
            name: name.to_string(),
            address: address.to_string(),
        }
    }

    #[test]
    fn test_header_only_when_empty() {
        assert_eq!(merge_csv_string(&[]).unwrap(), "Alumno,Dirección completa\r\n");
    }

    #[test]
    fn test_plain_fields_are_not_quoted() {
        let out = merge_csv_string(&[record("Ana Pérez", "Calle Mayor 3")]).unwrap();
        assert_eq!(out, "Alumno,Dirección completa\r\nAna Pérez,Calle Mayor 3\r\n");
    }

    #[test]
    fn test_special_fields_are_quoted() {
        let out = merge_csv_string(&[
            record("Ana \"la\"", "Calle Mayor, 3"),
            record("Luis", "Av.\nSol"),
        ])
        .unwrap();
        assert_eq!(
            out,
            "Alumno,Dirección completa\r\n\
             \"Ana \"\"la\"\"\",\"Calle Mayor, 3\"\r\n\
             Luis,\"Av.\nSol\"\r\n"
        );
    }

    #[test]
    fn test_export_parses_back() {
        let records = vec![record("Ana \"la\"", "Calle Mayor, 3\nMadrid"), record("Luis", "")];
        let table = parser::parse(&merge_csv_string(&records).unwrap());

        assert_eq!(table.headers, MERGE_HEADERS);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].cell(0), "Ana \"la\"");
        assert_eq!(table.rows[0].cell(1), "Calle Mayor, 3\nMadrid");
        assert_eq!(table.rows[1].cell(0), "Luis");
    }
}
