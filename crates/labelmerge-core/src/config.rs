//! Pipeline configuration: required schemas, key column, label fields

use crate::error::{Error, Result};
use crate::labels::{LabelFields, LabelSheetLayout};
use crate::table::TableRole;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Headers the primary table must carry
pub const PRIMARY_REQUIRED_HEADERS: &[&str] = &[
    "promoción cag",
    "promoción caz",
    "promoción cgd",
    "alumno",
    "estado expediente",
    "nif",
    "entidad",
    "cif entidad",
    "provincia",
    "dirección completa",
    "envío revista",
    "cag",
    "caz",
    "cgd",
];

/// Headers the secondary table must carry
pub const SECONDARY_REQUIRED_HEADERS: &[&str] = &["alumno", "estado expediente", "nif"];

pub const IDENTIFIER_COLUMN: &str = "nif";
pub const LABEL_NAME_COLUMN: &str = "alumno";
pub const LABEL_ADDRESS_COLUMN: &str = "dirección completa";

/// Everything the pipeline needs to know about its inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub primary_headers: Vec<String>,
    pub secondary_headers: Vec<String>,
    /// Join key, present in both tables
    pub identifier_column: String,
    pub label_name_column: String,
    pub label_address_column: String,
    pub layout: LabelSheetLayout,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let owned =
            |names: &[&str]| -> Vec<String> { names.iter().map(|s| s.to_string()).collect() };
        Self {
            primary_headers: owned(PRIMARY_REQUIRED_HEADERS),
            secondary_headers: owned(SECONDARY_REQUIRED_HEADERS),
            identifier_column: IDENTIFIER_COLUMN.to_string(),
            label_name_column: LABEL_NAME_COLUMN.to_string(),
            label_address_column: LABEL_ADDRESS_COLUMN.to_string(),
            layout: LabelSheetLayout::default(),
        }
    }
}

impl PipelineConfig {
    /// Required headers for a table role
    pub fn required_headers(&self, role: TableRole) -> &[String] {
        match role {
            TableRole::Primary => &self.primary_headers,
            TableRole::Secondary => &self.secondary_headers,
        }
    }

    /// Resolve the label columns against primary headers
    pub fn label_fields<H: AsRef<str>>(&self, headers: &[H]) -> LabelFields {
        LabelFields::resolve(headers, &self.label_name_column, &self.label_address_column)
    }

    /// Load a configuration file from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::UnreadableFile {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the configuration to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schemas() {
        let config = PipelineConfig::default();
        assert_eq!(config.primary_headers.len(), 14);
        assert_eq!(
            config.required_headers(TableRole::Secondary),
            &["alumno", "estado expediente", "nif"]
        );
        assert!(config.primary_headers.contains(&config.identifier_column));
        assert!(config.secondary_headers.contains(&config.identifier_column));
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"identifier_column": "dni"}"#).unwrap();
        assert_eq!(config.identifier_column, "dni");
        assert_eq!(config.label_name_column, "alumno");
        assert_eq!(config.layout.labels_per_page(), 24);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PipelineConfig::default();
        config.layout.rows = 7;
        config.save(&path).unwrap();

        let loaded = PipelineConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(PipelineConfig::load(&path), Err(Error::Json(_))));
    }
}
