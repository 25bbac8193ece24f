//! Isoreach Geo - The nearest-facility grid evaluator
//!
//! Builds a regular grid over a study area, removes obstacle area from
//! every cell, assigns each remaining cell either straight-line distances
//! or travel-time bands per facility, and reduces to per-cell minima.
//! Classification of the reduced series lives here too.

pub mod classify;
pub mod distance;
pub mod grid;
pub mod isochrone;
pub mod obstacle;
pub mod pipeline;
