//! Common types used across the frontend application.
//!
//! This module centralizes type definitions to avoid duplication
//! and ensure consistency across components.
//!
//! # Categories
//!
//! - **Table Types** - Preview and pivoted tables as sent by the backend
//! - **Log Types** - Real-time log streaming
//! - **API Types** - Backend response structures
//! - **Error Types** - Frontend error handling

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// =============================================================================
// Table Types
// =============================================================================

/// First rows of the uploaded sheet, before any processing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub headers: Vec<String>,
    /// Cells as plain JSON values (`null` for empty cells)
    pub rows: Vec<Vec<Value>>,
    pub total_rows: usize,
}

/// One facility and its count per category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PivotRow {
    pub facility: String,
    pub counts: Vec<u64>,
}

/// Facility x rating table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotTable {
    pub index_name: String,
    pub categories: Vec<String>,
    pub rows: Vec<PivotRow>,
}

impl PivotTable {
    /// Index column followed by the categories.
    pub fn headers(&self) -> Vec<String> {
        std::iter::once(self.index_name.clone())
            .chain(self.categories.iter().cloned())
            .collect()
    }
}

/// Render a preview cell for display.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

// =============================================================================
// Log Types
// =============================================================================

/// Log severity level.
///
/// Matches the backend's log levels for SSE streaming.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            LogLevel::Info => "log-info",
            LogLevel::Success => "log-success",
            LogLevel::Warning => "log-warning",
            LogLevel::Error => "log-error",
        }
    }
}

/// A single log entry.
///
/// Received via SSE from `/api/logs`, or added locally by the UI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    #[serde(default)]
    pub indent: u8,
    /// Local time of reception (HH:MM:SS)
    #[serde(default)]
    pub timestamp: String,
}

// =============================================================================
// API Response Types
// =============================================================================

/// Where the backend read the rows from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SourceFormat {
    Workbook { sheet: String },
    Csv { encoding: String, delimiter: String },
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Workbook { sheet } => write!(f, "Libro Excel, hoja «{}»", sheet),
            SourceFormat::Csv { encoding, delimiter } => {
                write!(f, "CSV ({}, separador «{}»)", encoding, delimiter)
            }
        }
    }
}

/// Name and type of the cleaned workbook.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadInfo {
    pub file_name: String,
    pub content_type: String,
}

/// Response from the backend upload endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub job_id: String,
    /// Status: "ready", "warning"
    pub status: String,
    pub processed_at: String,
    pub file_name: Option<String>,
    pub source: SourceFormat,
    pub preview: Preview,
    pub record_count: usize,
    pub normalized_count: usize,
    /// All facilities
    pub pivot: PivotTable,
    /// Hospitals only
    pub hospitals: PivotTable,
    pub chart_svg: Option<String>,
    pub chart_error: Option<String>,
    pub download: DownloadInfo,
}

// =============================================================================
// Error Types
// =============================================================================

/// Frontend application errors.
#[derive(Clone, Debug)]
pub enum AppError {
    /// File upload failed.
    Upload(String),
    /// Network/HTTP error.
    Network(String),
    /// Backend rejected the file.
    Server(String),
    /// Saving the export failed.
    Download(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Upload(msg) => write!(f, "Upload error: {}", msg),
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Server(msg) => write!(f, "{}", msg),
            AppError::Download(msg) => write!(f, "Download error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;
