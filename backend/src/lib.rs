//! # Hospivot - Hospital satisfaction survey summaries
//!
//! Hospivot reads a satisfaction survey export (facility, rating, number of
//! opinions), pivots it into a facility x rating table, exports the table as
//! XLSX, and charts the hospitals-only view as a stacked bar chart.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ XLSX / CSV  │────▶│   Parser    │────▶│  Transform  │────▶│ XLSX export │
//! │  (5 banner  │     │ (calamine / │     │ (normalize, │     │ SVG chart   │
//! │   rows)     │     │  csv)       │     │ pivot, HN)  │     │             │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hospivot::{render_svg, run_file, PipelineConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let output = run_file("encuesta.xlsx".as_ref(), &PipelineConfig::default())?;
//!     let svg = render_svg(&output.hospitals)?;
//!     std::fs::write("chart.svg", svg)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Pipeline configuration and environment overrides
//! - [`models`] - Domain models (RawRecord, PivotTable)
//! - [`parser`] - Workbook and CSV reading with auto-detection
//! - [`transform`] - Normalization, pivot, filter, and pipeline
//! - [`export`] - XLSX serialization
//! - [`chart`] - Stacked bar chart rendering
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Outputs
pub mod chart;
pub mod export;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ChartError, ConfigError, ExportError, PipelineError, PipelineResult, RecordError,
    ServerError, SheetError,
};

// =============================================================================
// Re-exports - Config & Models
// =============================================================================

pub use config::{ColumnNames, PipelineConfig};
pub use models::{PivotRow, PivotTable, RawRecord};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, detect_kind, parse_bytes, parse_file,
    read_delimited, read_workbook, Cell, InputKind, Preview, Sheet, SourceFormat,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{
    extract_records, pivot, run_bytes, run_file, run_sheet, summarize, FacilityNormalizer,
    HospitalFilter, PipelineOutput, Summary,
};

// =============================================================================
// Re-exports - Outputs
// =============================================================================

pub use chart::{render_svg, render_svg_with, ColorMap};
pub use export::{export_download, write_xlsx, Download, XLSX_MIME};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, UploadResponse};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, AppState};
}
