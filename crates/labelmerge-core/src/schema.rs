//! Header validation against a required schema

use crate::error::{Error, Result};
use crate::table::{ColumnIndex, Table, TableRole};
use std::collections::HashSet;

/// Normalize a header for comparison: trimmed and lowercased
pub fn normalize_header(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Return every required name absent from `headers`, in `required` order
///
/// Both sides are normalized before comparison and missing names are reported
/// normalized. An empty result means the schema is satisfied.
pub fn find_missing_headers<H, R>(headers: &[H], required: &[R]) -> Vec<String>
where
    H: AsRef<str>,
    R: AsRef<str>,
{
    let present: HashSet<String> = headers
        .iter()
        .map(|h| normalize_header(h.as_ref()))
        .collect();

    required
        .iter()
        .map(|name| normalize_header(name.as_ref()))
        .filter(|name| !present.contains(name))
        .collect()
}

/// Locate the first header matching `name` after normalization
pub fn find_header_index<H: AsRef<str>>(headers: &[H], name: &str) -> ColumnIndex {
    let name = normalize_header(name);
    headers
        .iter()
        .position(|h| normalize_header(h.as_ref()) == name)
        .into()
}

/// Gate a table on its required headers
///
/// Fails with [`Error::SchemaMismatch`] listing every missing header.
pub fn validate_headers<R: AsRef<str>>(
    table: &Table,
    role: TableRole,
    required: &[R],
) -> Result<()> {
    let missing = find_missing_headers(&table.headers, required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::SchemaMismatch { role, missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_headers_case_and_space_insensitive() {
        assert!(find_missing_headers(&["NIF", " Alumno "], &["nif", "alumno"]).is_empty());
    }

    #[test]
    fn test_required_names_are_normalized() {
        assert!(find_missing_headers(&["nif", "alumno"], &[" NIF ", "Alumno"]).is_empty());
        let missing = find_missing_headers(&["nif"], &["NIF", " Estado Expediente"]);
        assert_eq!(missing, vec!["estado expediente"]);
    }

    #[test]
    fn test_missing_headers_reports_absent() {
        assert_eq!(find_missing_headers(&["nif"], &["nif", "alumno"]), vec!["alumno"]);
    }

    #[test]
    fn test_missing_headers_reports_all_in_order() {
        let missing = find_missing_headers(&["otro"], &["alumno", "estado expediente", "nif"]);
        assert_eq!(missing, vec!["alumno", "estado expediente", "nif"]);
    }

    #[test]
    fn test_missing_headers_accented_names() {
        let headers = ["Dirección Completa", "PROMOCIÓN CAG"];
        let required = ["dirección completa", "promoción cag"];
        assert!(find_missing_headers(&headers, &required).is_empty());
    }

    #[test]
    fn test_missing_headers_is_exact_not_substring() {
        assert_eq!(find_missing_headers(&["nif alumno"], &["nif"]), vec!["nif"]);
    }

    #[test]
    fn test_find_header_index() {
        let headers = ["Alumno", " NIF ", "nif"];
        assert_eq!(find_header_index(&headers, "nif"), ColumnIndex::Found(1));
        assert_eq!(find_header_index(&headers, "ALUMNO"), ColumnIndex::Found(0));
        assert_eq!(find_header_index(&headers, "cif entidad"), ColumnIndex::NotFound);
    }

    #[test]
    fn test_validate_headers() {
        let table = Table::new(vec!["NIF".into()], Vec::new());
        assert!(validate_headers(&table, TableRole::Secondary, &["nif"]).is_ok());

        let required = ["nif", "alumno", "estado expediente"];
        let err = validate_headers(&table, TableRole::Secondary, &required).unwrap_err();
        match err {
            Error::SchemaMismatch { role, missing } => {
                assert_eq!(role, TableRole::Secondary);
                assert_eq!(missing, vec!["alumno", "estado expediente"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
