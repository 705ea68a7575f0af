//! Domain models for the hospivot pipeline.
//!
//! - [`RawRecord`] - One (facility, rating) observation with a count
//! - [`PivotTable`] - Facility x rating wide table of summed counts
//! - [`PivotRow`] - One facility row of a [`PivotTable`]

use serde::{Deserialize, Serialize};

/// Largest count kept exact through an XLSX number cell (2^53).
pub const MAX_COUNT: u64 = 1 << 53;

// =============================================================================
// Raw Records
// =============================================================================

/// One survey observation as read from the uploaded sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Facility name (free text, normalized in place by the pipeline).
    pub facility: String,
    /// Satisfaction rating label.
    pub category: String,
    /// Number of opinions.
    pub count: u64,
}

impl RawRecord {
    pub fn new(facility: impl Into<String>, category: impl Into<String>, count: u64) -> Self {
        Self {
            facility: facility.into(),
            category: category.into(),
            count,
        }
    }
}

// =============================================================================
// Pivot Table
// =============================================================================

/// A facility row in the pivoted summary.
///
/// `counts[i]` is the summed count for `PivotTable::categories[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotRow {
    pub facility: String,
    pub counts: Vec<u64>,
}

impl PivotRow {
    /// Sum of all category cells.
    pub fn total(&self) -> u64 {
        self.counts.iter().fold(0, |acc, &c| acc.saturating_add(c))
    }
}

/// Wide-format facility x rating table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotTable {
    /// Header of the facility column (e.g. "Establecimiento").
    pub index_name: String,
    /// Rating categories, one column each.
    pub categories: Vec<String>,
    pub rows: Vec<PivotRow>,
}

impl PivotTable {
    pub fn new(index_name: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            index_name: index_name.into(),
            categories,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header row as exported: facility column followed by the categories.
    pub fn headers(&self) -> Vec<String> {
        std::iter::once(self.index_name.clone())
            .chain(self.categories.iter().cloned())
            .collect()
    }

    /// Facility names in row order.
    pub fn facilities(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.facility.as_str()).collect()
    }

    pub fn row(&self, facility: &str) -> Option<&PivotRow> {
        self.rows.iter().find(|r| r.facility == facility)
    }

    /// Cell value, `None` if either the facility or the category is unknown.
    pub fn get(&self, facility: &str, category: &str) -> Option<u64> {
        let col = self.categories.iter().position(|c| c == category)?;
        self.row(facility).map(|r| r.counts[col])
    }

    /// Largest stacked total over all rows.
    pub fn max_row_total(&self) -> u64 {
        self.rows.iter().map(PivotRow::total).max().unwrap_or(0)
    }

    /// New table with the same columns and only the rows matching `keep`.
    pub fn retain_rows<F>(&self, mut keep: F) -> PivotTable
    where
        F: FnMut(&PivotRow) -> bool,
    {
        PivotTable {
            index_name: self.index_name.clone(),
            categories: self.categories.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PivotTable {
        PivotTable {
            index_name: "Establecimiento".into(),
            categories: vec!["INSATISFECHO".into(), "SATISFECHO".into()],
            rows: vec![
                PivotRow { facility: "CLINICA X".into(), counts: vec![0, 5] },
                PivotRow { facility: "HN ROOSEVELT".into(), counts: vec![2, 10] },
            ],
        }
    }

    #[test]
    fn test_headers_start_with_index() {
        assert_eq!(
            sample().headers(),
            vec!["Establecimiento", "INSATISFECHO", "SATISFECHO"]
        );
    }

    #[test]
    fn test_get_cell() {
        let table = sample();
        assert_eq!(table.get("HN ROOSEVELT", "SATISFECHO"), Some(10));
        assert_eq!(table.get("CLINICA X", "INSATISFECHO"), Some(0));
        assert_eq!(table.get("CLINICA X", "MUY SATISFECHO"), None);
        assert_eq!(table.get("OTRA", "SATISFECHO"), None);
    }

    #[test]
    fn test_row_totals() {
        let table = sample();
        assert_eq!(table.row("HN ROOSEVELT").map(PivotRow::total), Some(12));
        assert_eq!(table.max_row_total(), 12);
    }

    #[test]
    fn test_row_total_saturates() {
        let row = PivotRow {
            facility: "HN A".into(),
            counts: vec![u64::MAX, 1],
        };
        assert_eq!(row.total(), u64::MAX);
    }

    #[test]
    fn test_retain_rows_keeps_columns() {
        let table = sample();
        let kept = table.retain_rows(|r| r.facility.starts_with("HN"));
        assert_eq!(kept.categories, table.categories);
        assert_eq!(kept.facilities(), vec!["HN ROOSEVELT"]);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["indexName"], "Establecimiento");
        assert_eq!(json["rows"][1]["counts"][1], 10);
    }
}
