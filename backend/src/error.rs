//! Error types for the hospivot pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`SheetError`] - Reading the uploaded workbook or CSV
//! - [`RecordError`] - Turning sheet rows into survey records
//! - [`ConfigError`] - Invalid configuration values
//! - [`ExportError`] - Writing the XLSX download
//! - [`ChartError`] - Rendering the stacked bar chart
//! - [`PipelineError`] - Top-level orchestration errors
//! - [`ServerError`] - HTTP layer errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Sheet Reading Errors
// =============================================================================

/// Errors while reading the uploaded spreadsheet.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The workbook container could not be opened.
    #[error("Cannot open workbook: {0}")]
    Workbook(String),

    /// The workbook has no worksheet.
    #[error("Workbook contains no worksheet")]
    NoWorksheet,

    /// No header row after skipping the leading rows.
    #[error("No header row found after skipping {skip_rows} rows")]
    MissingHeader { skip_rows: usize },

    /// Failed to decode CSV text.
    #[error("Failed to decode content: {0}")]
    Encoding(String),

    /// Invalid CSV format.
    #[error("Invalid CSV format: {0}")]
    Csv(#[from] csv::Error),
}

impl From<calamine::Error> for SheetError {
    fn from(err: calamine::Error) -> Self {
        SheetError::Workbook(err.to_string())
    }
}

// =============================================================================
// Record Extraction Errors
// =============================================================================

/// Errors while extracting survey records from sheet rows.
#[derive(Debug, Error)]
pub enum RecordError {
    /// A required column is absent from the header row.
    #[error("Missing column '{column}' (found: {})", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// Count cell is not a non-negative integer.
    #[error("Row {row}: invalid count '{value}'")]
    InvalidCount { row: usize, value: String },

    /// Summed cell grew past the largest count a spreadsheet holds exactly.
    #[error("Count for '{facility}' / '{category}' exceeds {}", crate::models::MAX_COUNT)]
    CountOverflow { facility: String, category: String },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors in pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment or flag value could not be parsed.
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    /// A configured pattern is not a valid regex.
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while writing the XLSX export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Workbook writer failed.
    #[error("XLSX writer error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

// =============================================================================
// Chart Errors
// =============================================================================

/// Errors while rendering the chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Nothing to plot.
    #[error("No hospital rows to plot")]
    NoData,

    /// Drawing backend failure.
    #[error("Drawing error: {0}")]
    Drawing(String),
}

impl<E> From<plotters::drawing::DrawingAreaErrorKind<E>> for ChartError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ChartError::Drawing(err.to_string())
    }
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by [`crate::transform::pipeline::run_bytes`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Spreadsheet reading error.
    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    /// Record extraction error.
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Export error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Chart error.
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for sheet operations.
pub type SheetResult<T> = Result<T, SheetError>;

/// Result type for record extraction.
pub type RecordResult<T> = Result<T, RecordError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // SheetError -> PipelineError
        let sheet_err = SheetError::NoWorksheet;
        let pipeline_err: PipelineError = sheet_err.into();
        assert!(pipeline_err.to_string().contains("no worksheet"));

        // RecordError -> PipelineError -> ServerError
        let record_err = RecordError::MissingColumn {
            column: "Establecimiento".into(),
            available: vec!["A".into(), "B".into()],
        };
        let server_err: ServerError = PipelineError::from(record_err).into();
        assert!(server_err.to_string().contains("Establecimiento"));
    }

    #[test]
    fn test_missing_column_lists_available() {
        let err = RecordError::MissingColumn {
            column: "Valoraciones".into(),
            available: vec!["Fecha".into(), "Total".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Valoraciones"));
        assert!(msg.contains("Fecha, Total"));
    }

    #[test]
    fn test_invalid_count_format() {
        let err = RecordError::InvalidCount {
            row: 9,
            value: "abc".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Row 9"));
        assert!(msg.contains("abc"));
    }
}
