//! Aggregate raw records into a facility x rating table.
//!
//! ```text
//! Raw records                              Pivoted summary
//! ┌──────────────────────────────────┐     ┌──────────────┬──────────────┬────────────┐
//! │ HN ROOSEVELT  SATISFECHO      10 │     │ Facility     │ INSATISFECHO │ SATISFECHO │
//! │ HN ROOSEVELT  INSATISFECHO     2 │  →  ├──────────────┼──────────────┼────────────┤
//! │ CLINICA X     SATISFECHO       5 │     │ CLINICA X    │            0 │          5 │
//! └──────────────────────────────────┘     │ HN ROOSEVELT │            2 │         10 │
//!                                          └──────────────┴──────────────┴────────────┘
//! ```
//!
//! Rows and columns come out sorted, as a data-frame pivot would emit them.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{RecordError, RecordResult};
use crate::models::{PivotRow, PivotTable, RawRecord, MAX_COUNT};

/// Sum counts per (facility, category), filling absent pairs with zero.
///
/// Fails with [`RecordError::CountOverflow`] when a cell sum passes
/// [`MAX_COUNT`].
pub fn pivot(records: &[RawRecord], index_name: &str) -> RecordResult<PivotTable> {
    let mut categories: BTreeSet<&str> = BTreeSet::new();
    let mut sums: BTreeMap<&str, BTreeMap<&str, u64>> = BTreeMap::new();

    for record in records {
        categories.insert(record.category.as_str());
        let cell = sums
            .entry(record.facility.as_str())
            .or_default()
            .entry(record.category.as_str())
            .or_insert(0);
        *cell = cell
            .checked_add(record.count)
            .filter(|&sum| sum <= MAX_COUNT)
            .ok_or_else(|| RecordError::CountOverflow {
                facility: record.facility.clone(),
                category: record.category.clone(),
            })?;
    }

    let mut table = PivotTable::new(
        index_name,
        categories.iter().map(|c| c.to_string()).collect(),
    );

    table.rows = sums
        .into_iter()
        .map(|(facility, by_category)| PivotRow {
            facility: facility.to_string(),
            counts: categories
                .iter()
                .map(|c| by_category.get(c).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    Ok(table)
}
