//! High-level pipeline API: uploaded file to pivoted summary.
//!
//! This module combines all steps: parsing, record extraction, facility
//! normalization, pivot, and hospital filtering. Export and chart rendering
//! consume its [`PipelineOutput`].
//!
//! # Example
//!
//! ```rust,ignore
//! use hospivot::{run_file, PipelineConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let output = run_file("encuesta.xlsx".as_ref(), &PipelineConfig::default())?;
//!     println!("{} facilities, {} hospitals", output.pivot.len(), output.hospitals.len());
//!     Ok(())
//! }
//! ```

use serde::Serialize;
use std::path::Path;

use super::filter::HospitalFilter;
use super::normalize::FacilityNormalizer;
use super::pivot::pivot;
use super::records::extract_records;
use crate::api::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::models::{PivotTable, RawRecord};
use crate::parser::{parse_bytes, parse_file, Preview, Sheet, SourceFormat};

/// Result of a complete pipeline run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    /// Where the rows came from.
    pub source: SourceFormat,

    /// First raw rows, before any processing.
    pub preview: Preview,

    /// Records extracted from the sheet.
    pub record_count: usize,

    /// Records whose facility name was shortened.
    pub normalized_count: usize,

    /// Pivoted summary, all facilities.
    pub pivot: PivotTable,

    /// Pivoted summary restricted to hospitals.
    pub hospitals: PivotTable,
}

/// Pivot and filter outputs for already-extracted records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub pivot: PivotTable,
    pub hospitals: PivotTable,
    pub normalized_count: usize,
}

/// Run the pipeline on a file.
pub fn run_file(path: &Path, config: &PipelineConfig) -> PipelineResult<PipelineOutput> {
    log_info(format!("📖 Reading {}...", path.display()));
    let sheet = parse_file(path, config.skip_rows)?;
    run_sheet(sheet, config)
}

/// Run the pipeline on uploaded bytes.
pub fn run_bytes(bytes: &[u8], config: &PipelineConfig) -> PipelineResult<PipelineOutput> {
    log_info(format!("📖 Reading upload ({} bytes)...", bytes.len()));
    let sheet = parse_bytes(bytes, config.skip_rows)?;
    run_sheet(sheet, config)
}

/// Run the pipeline on a parsed sheet.
pub fn run_sheet(sheet: Sheet, config: &PipelineConfig) -> PipelineResult<PipelineOutput> {
    // Step 1: Sheet info
    log_success(format!("Detected {}", sheet.source));
    log_success(format!(
        "Header on row {}, {} data rows",
        config.skip_rows + 1,
        sheet.rows.len()
    ));
    log_info(format!("📋 Sheet has {} columns:", sheet.headers.len()));
    for (i, col) in sheet.headers.iter().enumerate() {
        log_info_indent(format!("[{:2}] {}", i + 1, col), 1);
    }

    let preview = sheet.preview(config.preview_rows);

    // Step 2: Records
    log_info("⚙️  Extracting records...");
    let records = extract_records(&sheet, &config.columns)?;
    log_success(format!("{} records", records.len()));
    if records.is_empty() {
        log_warning("No records found below the header row");
    }
    let record_count = records.len();

    // Step 3: Normalize, pivot, filter
    let summary = summarize(records, config)?;

    Ok(PipelineOutput {
        source: sheet.source,
        preview,
        record_count,
        normalized_count: summary.normalized_count,
        pivot: summary.pivot,
        hospitals: summary.hospitals,
    })
}

/// Normalize, pivot and filter extracted records.
pub fn summarize(mut records: Vec<RawRecord>, config: &PipelineConfig) -> PipelineResult<Summary> {
    let normalizer = FacilityNormalizer::from_config(config)?;
    let filter = HospitalFilter::from_config(config)?;

    log_info(format!(
        "✏️  Replacing '{}' with '{}'...",
        config.alias_pattern, config.alias_replacement
    ));
    let normalized_count = normalizer.apply(&mut records);
    log_success(format!("{} facility names shortened", normalized_count));

    log_info("📦 Building pivot table...");
    let pivot = pivot(&records, &config.columns.facility)?;
    log_success(format!(
        "{} facilities x {} categories",
        pivot.len(),
        pivot.categories.len()
    ));

    log_info("🏥 Keeping hospitals only...");
    let hospitals = filter.apply(&pivot);
    if hospitals.is_empty() {
        log_warning("No facility matched the hospital pattern");
    } else {
        log_success(format!("{} hospitals", hospitals.len()));
    }

    Ok(Summary {
        pivot,
        hospitals,
        normalized_count,
    })
}
