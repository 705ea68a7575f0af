//! XLSX export of the pivoted summary.
//!
//! One sheet, header row = facility column followed by the categories,
//! no index column. Facility names are written as strings and counts as
//! numbers so the download sorts and sums correctly in Excel.

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::error::ExportError;
use crate::models::PivotTable;

/// MIME type of the download.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A ready-to-send file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Download {
    pub file_name: String,
    pub content_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl Download {
    /// `Content-Disposition` header value.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }
}

/// Serialize a pivot table as a single-sheet workbook.
pub fn write_xlsx(table: &PivotTable, sheet_name: &str) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    let header_format = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);

    // Write header row
    for (col, header) in table.headers().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    // Write data rows
    for (row_idx, row) in table.rows.iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        worksheet.write_string(excel_row, 0, &row.facility)?;
        for (col_idx, count) in row.counts.iter().enumerate() {
            worksheet.write_number(excel_row, (col_idx + 1) as u16, *count as f64)?;
        }
    }

    // Auto-fit columns for readability
    worksheet.autofit();

    Ok(workbook.save_to_buffer()?)
}

/// Export the pivot table under the configured sheet and file names.
pub fn export_download(table: &PivotTable, config: &PipelineConfig) -> Result<Download, ExportError> {
    Ok(Download {
        file_name: config.download_name.clone(),
        content_type: XLSX_MIME.to_string(),
        bytes: write_xlsx(table, &config.sheet_name)?,
    })
}
