//! Isoreach Core - Domain models, errors, configuration, and input formats
//!
//! This crate holds everything the grid evaluator consumes: typed layers
//! (region, obstacles, facilities, isochrones), the error taxonomy, the
//! layered job configuration, and readers for the supported input files.

pub mod config;
pub mod error;
pub mod formats;
pub mod models;

pub use error::{IsoreachError, Result};
