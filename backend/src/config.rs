//! Pipeline configuration.
//!
//! Defaults reproduce the survey export layout: five banner rows above the
//! header, Spanish column names, and the `HOSPITAL NACIONAL` -> `HN` alias.
//! Every value can be overridden through `HOSPIVOT_*` environment variables
//! (a `.env` file is honoured) or CLI flags.

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::ConfigError;

/// Leading rows skipped before the header row.
pub const DEFAULT_SKIP_ROWS: usize = 5;

pub const DEFAULT_FACILITY_COLUMN: &str = "Establecimiento";
pub const DEFAULT_CATEGORY_COLUMN: &str = "Valoraciones";
pub const DEFAULT_COUNT_COLUMN: &str = "Cantidad de opiniones";

pub const DEFAULT_ALIAS_PATTERN: &str = "HOSPITAL NACIONAL";
pub const DEFAULT_ALIAS_REPLACEMENT: &str = "HN";

/// Matched case-insensitively against normalized facility names.
pub const DEFAULT_HOSPITAL_PATTERN: &str = r"\bHN\b|\bHospital\b";

pub const DEFAULT_SHEET_NAME: &str = "Datos_Limpios";
pub const DEFAULT_DOWNLOAD_NAME: &str = "Datos_Limpios_Solicitudes.xlsx";

/// Rows of the raw sheet shown in the preview step.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Names of the three columns the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnNames {
    pub facility: String,
    pub category: String,
    pub count: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            facility: DEFAULT_FACILITY_COLUMN.to_string(),
            category: DEFAULT_CATEGORY_COLUMN.to_string(),
            count: DEFAULT_COUNT_COLUMN.to_string(),
        }
    }
}

/// Options for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Rows skipped before the header row.
    pub skip_rows: usize,

    /// Input column names.
    pub columns: ColumnNames,

    /// Regex replaced in facility names (case-sensitive).
    pub alias_pattern: String,

    /// Literal replacement for `alias_pattern`.
    pub alias_replacement: String,

    /// Regex selecting hospital rows (case-insensitive).
    pub hospital_pattern: String,

    /// Sheet name of the exported workbook.
    pub sheet_name: String,

    /// File name offered for download.
    pub download_name: String,

    /// Number of raw rows in the preview.
    pub preview_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            skip_rows: DEFAULT_SKIP_ROWS,
            columns: ColumnNames::default(),
            alias_pattern: DEFAULT_ALIAS_PATTERN.to_string(),
            alias_replacement: DEFAULT_ALIAS_REPLACEMENT.to_string(),
            hospital_pattern: DEFAULT_HOSPITAL_PATTERN.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            download_name: DEFAULT_DOWNLOAD_NAME.to_string(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl PipelineConfig {
    /// Load defaults overridden by `HOSPIVOT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Try loading .env file
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`PipelineConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("HOSPIVOT_SKIP_ROWS") {
            config.skip_rows = parse_usize("HOSPIVOT_SKIP_ROWS", &value)?;
        }
        if let Some(value) = lookup("HOSPIVOT_PREVIEW_ROWS") {
            config.preview_rows = parse_usize("HOSPIVOT_PREVIEW_ROWS", &value)?;
        }

        let strings: [(&str, &mut String); 7] = [
            ("HOSPIVOT_FACILITY_COLUMN", &mut config.columns.facility),
            ("HOSPIVOT_CATEGORY_COLUMN", &mut config.columns.category),
            ("HOSPIVOT_COUNT_COLUMN", &mut config.columns.count),
            ("HOSPIVOT_ALIAS_PATTERN", &mut config.alias_pattern),
            ("HOSPIVOT_ALIAS_REPLACEMENT", &mut config.alias_replacement),
            ("HOSPIVOT_HOSPITAL_PATTERN", &mut config.hospital_pattern),
            ("HOSPIVOT_SHEET_NAME", &mut config.sheet_name),
        ];
        for (key, slot) in strings {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *slot = value;
            }
        }

        Ok(config)
    }

    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.skip_rows, 5);
        assert_eq!(config.columns.facility, "Establecimiento");
        assert_eq!(config.columns.category, "Valoraciones");
        assert_eq!(config.columns.count, "Cantidad de opiniones");
        assert_eq!(config.sheet_name, "Datos_Limpios");
        assert_eq!(config.download_name, "Datos_Limpios_Solicitudes.xlsx");
    }

    #[test]
    fn test_lookup_overrides() {
        let config = PipelineConfig::from_lookup(lookup_from(&[
            ("HOSPIVOT_SKIP_ROWS", "0"),
            ("HOSPIVOT_FACILITY_COLUMN", "Facility"),
            ("HOSPIVOT_COUNT_COLUMN", "  "),
        ]))
        .unwrap();

        assert_eq!(config.skip_rows, 0);
        assert_eq!(config.columns.facility, "Facility");
        // Blank values keep the default
        assert_eq!(config.columns.count, "Cantidad de opiniones");
    }

    #[test]
    fn test_invalid_skip_rows() {
        let err = PipelineConfig::from_lookup(lookup_from(&[("HOSPIVOT_SKIP_ROWS", "six")]))
            .unwrap_err();
        assert!(err.to_string().contains("HOSPIVOT_SKIP_ROWS"));
    }
}
