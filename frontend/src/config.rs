//! Application configuration.
//!
//! Centralized configuration for the Hospivot frontend.
//! In development, these are hardcoded. In production, the backend serves
//! the built frontend itself and the URL can be left empty.

/// Backend API base URL.
pub const BACKEND_URL: &str = "http://localhost:3000";

/// Maximum file size for upload (in bytes).
///
/// Matches the backend body limit.
pub const MAX_FILE_SIZE: f64 = 20.0 * 1024.0 * 1024.0;

/// Accepted file extensions for the picker.
pub const ACCEPTED_FILES: &str = ".xlsx,.xls,.ods,.csv";

/// Maximum logs to keep in memory.
pub const MAX_LOG_ENTRIES: usize = 100;

/// Fallback download name if the backend does not send one.
pub const DEFAULT_DOWNLOAD_NAME: &str = "Datos_Limpios_Solicitudes.xlsx";

/// MIME type of the exported workbook.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
