//! Transformation module.
//!
//! This module turns sheet rows into the pivoted summary:
//! - Records: sheet rows to survey records
//! - Normalize: shorten facility names
//! - Pivot: facility x rating sums
//! - Filter: hospitals only
//! - Pipeline: all of the above in order

pub mod filter;
pub mod normalize;
pub mod pipeline;
pub mod pivot;
pub mod records;

pub use filter::HospitalFilter;
pub use normalize::FacilityNormalizer;
pub use pipeline::*;
pub use pivot::pivot;
pub use records::extract_records;
