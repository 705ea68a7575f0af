//! Extract survey records from a parsed sheet.

use crate::config::ColumnNames;
use crate::error::{RecordError, RecordResult};
use crate::models::{RawRecord, MAX_COUNT};
use crate::parser::{Cell, Sheet};

/// Map sheet rows to [`RawRecord`]s using the configured column names.
///
/// Rows with a blank facility or category are dropped, like null group keys
/// in a data-frame groupby. A blank count contributes zero.
pub fn extract_records(sheet: &Sheet, columns: &ColumnNames) -> RecordResult<Vec<RawRecord>> {
    let facility_idx = require_column(sheet, &columns.facility)?;
    let category_idx = require_column(sheet, &columns.category)?;
    let count_idx = require_column(sheet, &columns.count)?;

    let mut records = Vec::with_capacity(sheet.rows.len());

    for row in &sheet.rows {
        let facility = &row.cells[facility_idx];
        let category = &row.cells[category_idx];
        if facility.is_blank() || category.is_blank() {
            continue;
        }

        let count = parse_count(&row.cells[count_idx]).ok_or_else(|| RecordError::InvalidCount {
            row: row.line,
            value: row.cells[count_idx].to_string(),
        })?;

        records.push(RawRecord {
            facility: facility.to_string(),
            category: category.to_string(),
            count,
        });
    }

    Ok(records)
}

fn require_column(sheet: &Sheet, name: &str) -> RecordResult<usize> {
    sheet
        .column_index(name)
        .ok_or_else(|| RecordError::MissingColumn {
            column: name.to_string(),
            available: sheet.headers.clone(),
        })
}

/// Non-negative integral count, `None` when the cell is not one.
fn parse_count(cell: &Cell) -> Option<u64> {
    match cell {
        Cell::Empty => Some(0),
        Cell::Number(n) => integral(*n),
        Cell::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Some(0);
            }
            s.parse::<u64>()
                .ok()
                .filter(|&n| n <= MAX_COUNT)
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        Cell::Bool(_) => None,
    }
}

fn integral(n: f64) -> Option<u64> {
    if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= MAX_COUNT as f64 {
        Some(n as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{SheetRow, SourceFormat};

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn sheet(rows: Vec<Vec<Cell>>) -> Sheet {
        Sheet {
            headers: vec![
                "Fecha".into(),
                "Establecimiento".into(),
                "Valoraciones".into(),
                "Cantidad de opiniones".into(),
            ],
            rows: rows
                .into_iter()
                .enumerate()
                .map(|(i, cells)| SheetRow { line: i + 7, cells })
                .collect(),
            source: SourceFormat::Workbook { sheet: "Hoja1".into() },
        }
    }

    #[test]
    fn test_extracts_by_column_name() {
        let sheet = sheet(vec![vec![
            text("2024-01"),
            text("CLINICA X"),
            text("SATISFECHO"),
            Cell::Number(5.0),
        ]]);
        let records = extract_records(&sheet, &ColumnNames::default()).unwrap();
        assert_eq!(records, vec![RawRecord::new("CLINICA X", "SATISFECHO", 5)]);
    }

    #[test]
    fn test_blank_keys_dropped_blank_count_zero() {
        let sheet = sheet(vec![
            vec![Cell::Empty, Cell::Empty, text("SATISFECHO"), Cell::Number(3.0)],
            vec![Cell::Empty, text("CLINICA X"), Cell::Empty, Cell::Number(3.0)],
            vec![Cell::Empty, text("CLINICA X"), text("SATISFECHO"), Cell::Empty],
        ]);
        let records = extract_records(&sheet, &ColumnNames::default()).unwrap();
        assert_eq!(records, vec![RawRecord::new("CLINICA X", "SATISFECHO", 0)]);
    }

    #[test]
    fn test_text_counts() {
        let sheet = sheet(vec![
            vec![Cell::Empty, text("A"), text("S"), text(" 12 ")],
            vec![Cell::Empty, text("A"), text("S"), text("4.0")],
        ]);
        let records = extract_records(&sheet, &ColumnNames::default()).unwrap();
        assert_eq!(records[0].count, 12);
        assert_eq!(records[1].count, 4);
    }

    #[test]
    fn test_invalid_counts() {
        for bad in [Cell::Number(-1.0), Cell::Number(2.5), text("muchos"), Cell::Bool(true)] {
            let sheet = sheet(vec![vec![Cell::Empty, text("A"), text("S"), bad]]);
            let err = extract_records(&sheet, &ColumnNames::default()).unwrap_err();
            assert!(matches!(err, RecordError::InvalidCount { row: 7, .. }));
        }
    }

    #[test]
    fn test_counts_beyond_exact_range_rejected() {
        for bad in [Cell::Number(1e19), text("9007199254740993"), text("1e19")] {
            let sheet = sheet(vec![vec![Cell::Empty, text("HN A"), text("S"), bad]]);
            let err = extract_records(&sheet, &ColumnNames::default()).unwrap_err();
            assert!(matches!(err, RecordError::InvalidCount { row: 7, .. }));
        }

        let sheet = sheet(vec![vec![
            Cell::Empty,
            text("HN A"),
            text("S"),
            Cell::Number(MAX_COUNT as f64),
        ]]);
        let records = extract_records(&sheet, &ColumnNames::default()).unwrap();
        assert_eq!(records[0].count, MAX_COUNT);
    }

    #[test]
    fn test_keys_kept_verbatim() {
        let sheet = sheet(vec![
            vec![Cell::Empty, text("HN A"), text("SATISFECHO"), Cell::Number(1.0)],
            vec![Cell::Empty, text("HN A"), text(" SATISFECHO"), Cell::Number(2.0)],
        ]);
        let records = extract_records(&sheet, &ColumnNames::default()).unwrap();
        assert_eq!(records[0].category, "SATISFECHO");
        assert_eq!(records[1].category, " SATISFECHO");
    }

    #[test]
    fn test_missing_column() {
        let sheet = sheet(vec![]);
        let columns = ColumnNames {
            count: "Total".into(),
            ..ColumnNames::default()
        };
        let err = extract_records(&sheet, &columns).unwrap_err();
        match err {
            RecordError::MissingColumn { column, available } => {
                assert_eq!(column, "Total");
                assert_eq!(available.len(), 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
