//! Input format readers: GeoJSON layers and facility CSV files.
//!
//! Readers validate shape and CRS tagging only; the evaluator re-checks
//! CRS agreement across layers before any computation.

pub mod facilities;
pub mod geojson;
