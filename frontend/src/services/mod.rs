//! Backend services.
//!
//! # Services
//!
//! - [`upload`] - Spreadsheet upload and export download

pub mod upload;

pub use upload::*;
