//! UI Components for the Hospivot application.
//!
//! This module contains all Leptos components organized by function:
//!
//! # Layout Components
//! - [`Header`] - Top bar with the loaded file name
//! - [`Hero`] - Main title and description
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`UploadSection`] - Step 1, spreadsheet upload
//! - [`PreviewSection`] - Step 1, raw preview table
//! - [`PivotSection`] - Step 2, pivoted table
//! - [`DownloadSection`] - Step 3, cleaned workbook download
//! - [`ChartSection`] - Step 4, hospitals table and chart
//! - [`LogsPanel`] - Real-time processing logs (SSE)

mod chart;
mod download;
mod footer;
mod header;
mod hero;
mod logs;
mod preview;
mod upload;

pub use chart::*;
pub use download::*;
pub use footer::*;
pub use header::*;
pub use hero::*;
pub use logs::*;
pub use preview::*;
pub use upload::*;
