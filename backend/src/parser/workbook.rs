//! Workbook reading via calamine.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

use super::{Cell, Sheet, SourceFormat};
use crate::error::{SheetError, SheetResult};

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(e) => Cell::Text(e.to_string()),
        }
    }
}

/// Read the first worksheet of a workbook held in memory.
///
/// Row offsets are absolute sheet rows: calamine trims leading empty rows
/// from the used range, so the range start is added back before skipping.
pub fn read_workbook(bytes: &[u8], skip_rows: usize) -> SheetResult<Sheet> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SheetError::NoWorksheet)?;

    let range = workbook.worksheet_range(&sheet_name)?;
    let (start_row, _) = range.start().unwrap_or((0, 0));

    let grid = range.rows().enumerate().map(|(i, row)| {
        let cells: Vec<Cell> = row.iter().map(Cell::from).collect();
        (start_row as usize + i, cells)
    });

    Sheet::from_grid(grid, skip_rows, SourceFormat::Workbook { sheet: sheet_name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    /// Survey-like workbook: banner lines, then header on row 6.
    fn survey_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Ministerio de Salud").unwrap();
        sheet.write_string(2, 0, "Reporte de opiniones").unwrap();
        sheet.write_string(5, 0, "Establecimiento").unwrap();
        sheet.write_string(5, 1, "Valoraciones").unwrap();
        sheet.write_string(5, 2, "Cantidad de opiniones").unwrap();
        sheet.write_string(6, 0, "HOSPITAL NACIONAL ROOSEVELT").unwrap();
        sheet.write_string(6, 1, "SATISFECHO").unwrap();
        sheet.write_number(6, 2, 10).unwrap();
        sheet.write_string(7, 0, "CLINICA X").unwrap();
        sheet.write_string(7, 1, "SATISFECHO").unwrap();
        sheet.write_number(7, 2, 5).unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_reads_header_after_banner() {
        let sheet = read_workbook(&survey_workbook(), 5).unwrap();

        assert_eq!(
            sheet.headers,
            vec!["Establecimiento", "Valoraciones", "Cantidad de opiniones"]
        );
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].line, 7);
        assert_eq!(sheet.rows[0].cells[2], Cell::Number(10.0));
        assert!(matches!(sheet.source, SourceFormat::Workbook { .. }));
    }

    #[test]
    fn test_range_offset_is_absolute() {
        // Nothing above the header: calamine's range starts at row 5
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(5, 0, "a").unwrap();
        sheet.write_number(6, 0, 1).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let sheet = read_workbook(&bytes, 5).unwrap();
        assert_eq!(sheet.headers, vec!["a"]);
        assert_eq!(sheet.rows[0].line, 7);
    }

    #[test]
    fn test_not_a_workbook() {
        let err = read_workbook(b"PK\x03\x04garbage", 0).unwrap_err();
        assert!(matches!(err, SheetError::Workbook(_)));
    }
}
