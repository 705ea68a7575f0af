//! Facility name normalization.
//!
//! Long institutional prefixes are shortened so chart labels stay readable:
//! `HOSPITAL NACIONAL ROOSEVELT` becomes `HN ROOSEVELT`.

use regex::{NoExpand, Regex};
use std::borrow::Cow;

use crate::config::PipelineConfig;
use crate::error::ConfigError;
use crate::models::RawRecord;

/// Case-sensitive pattern replacement over facility names.
#[derive(Debug, Clone)]
pub struct FacilityNormalizer {
    pattern: Regex,
    replacement: String,
}

impl FacilityNormalizer {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self, ConfigError> {
        let pattern = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern,
            replacement: replacement.into(),
        })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        Self::new(&config.alias_pattern, config.alias_replacement.clone())
    }

    /// Normalize one name. Borrows when nothing matched.
    pub fn normalize<'a>(&self, name: &'a str) -> Cow<'a, str> {
        self.pattern
            .replace_all(name, NoExpand(self.replacement.as_str()))
    }

    /// Normalize the facility of every record in place.
    ///
    /// Returns how many names changed.
    pub fn apply(&self, records: &mut [RawRecord]) -> usize {
        let mut changed = 0;
        for record in records.iter_mut() {
            if let Cow::Owned(name) = self.normalize(&record.facility) {
                record.facility = name;
                changed += 1;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_normalizer() -> FacilityNormalizer {
        FacilityNormalizer::from_config(&PipelineConfig::default()).unwrap()
    }

    #[test]
    fn test_replaces_prefix() {
        let n = default_normalizer();
        assert_eq!(n.normalize("HOSPITAL NACIONAL ROOSEVELT"), "HN ROOSEVELT");
        assert_eq!(
            n.normalize("HOSPITAL NACIONAL DE HOSPITAL NACIONAL"),
            "HN DE HN"
        );
    }

    #[test]
    fn test_case_sensitive() {
        let n = default_normalizer();
        assert_eq!(n.normalize("Hospital Nacional Roosevelt"), "Hospital Nacional Roosevelt");
        assert!(matches!(n.normalize("CLINICA X"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_idempotent() {
        let n = default_normalizer();
        for name in [
            "HOSPITAL NACIONAL ROOSEVELT",
            "CENTRO DE SALUD HOSPITAL NACIONAL",
            "HN ROOSEVELT",
            "CLINICA X",
        ] {
            let once = n.normalize(name).into_owned();
            let twice = n.normalize(&once).into_owned();
            assert_eq!(once, twice, "not idempotent for {name}");
        }
    }

    #[test]
    fn test_replacement_is_literal() {
        let n = FacilityNormalizer::new("HOSPITAL", "$1").unwrap();
        assert_eq!(n.normalize("HOSPITAL X"), "$1 X");
    }

    #[test]
    fn test_apply_counts_changes() {
        let n = default_normalizer();
        let mut records = vec![
            RawRecord::new("HOSPITAL NACIONAL ROOSEVELT", "SATISFECHO", 10),
            RawRecord::new("CLINICA X", "SATISFECHO", 5),
        ];
        assert_eq!(n.apply(&mut records), 1);
        assert_eq!(records[0].facility, "HN ROOSEVELT");
        assert_eq!(records[1].facility, "CLINICA X");
    }

    #[test]
    fn test_invalid_pattern() {
        let err = FacilityNormalizer::new("(unclosed", "x").unwrap_err();
        assert!(err.to_string().contains("(unclosed"));
    }
}
