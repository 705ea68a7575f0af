//! Keep only hospital rows of a pivoted summary.

use regex::{Regex, RegexBuilder};

use crate::config::PipelineConfig;
use crate::error::ConfigError;
use crate::models::PivotTable;

/// Case-insensitive facility name matcher.
#[derive(Debug, Clone)]
pub struct HospitalFilter {
    pattern: Regex,
}

impl HospitalFilter {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self { pattern })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        Self::new(&config.hospital_pattern)
    }

    pub fn matches(&self, facility: &str) -> bool {
        self.pattern.is_match(facility)
    }

    /// Matching rows, original order preserved.
    pub fn apply(&self, table: &PivotTable) -> PivotTable {
        table.retain_rows(|row| self.matches(&row.facility))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PivotRow;

    fn filter() -> HospitalFilter {
        HospitalFilter::from_config(&PipelineConfig::default()).unwrap()
    }

    #[test]
    fn test_matches_whole_words() {
        let f = filter();
        assert!(f.matches("HN ROOSEVELT"));
        assert!(f.matches("hn de occidente"));
        assert!(f.matches("Hospital Regional de Cobán"));
        assert!(f.matches("HOSPITAL GENERAL"));
        assert!(f.matches("CENTRO (HN)"));

        assert!(!f.matches("CLINICA X"));
        assert!(!f.matches("JOHNSON CENTER"));
        assert!(!f.matches("HOSPITALARIO SUR"));
        assert!(!f.matches("HNOS. PEREZ"));
    }

    #[test]
    fn test_apply_keeps_order_and_columns() {
        let table = PivotTable {
            index_name: "Establecimiento".into(),
            categories: vec!["SATISFECHO".into()],
            rows: vec![
                PivotRow { facility: "HOSPITAL B".into(), counts: vec![1] },
                PivotRow { facility: "CLINICA X".into(), counts: vec![2] },
                PivotRow { facility: "HN A".into(), counts: vec![3] },
            ],
        };

        let filtered = filter().apply(&table);
        assert_eq!(filtered.facilities(), vec!["HOSPITAL B", "HN A"]);
        assert_eq!(filtered.categories, table.categories);

        // Every excluded row matches neither token
        let f = filter();
        for row in &table.rows {
            assert_eq!(f.matches(&row.facility), filtered.row(&row.facility).is_some());
        }
    }
}
