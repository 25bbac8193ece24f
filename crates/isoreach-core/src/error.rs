//! Error types for isoreach

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IsoreachError {
    // Region / grid errors
    #[error("Invalid region: {reason}")]
    InvalidRegion { reason: String },

    #[error("Invalid geometry at cell {cell}: {reason}")]
    InvalidGeometry { cell: usize, reason: String },

    // Isochrone errors
    #[error("Inconsistent isochrone count: facility {facility} has {found} rings, expected {expected}")]
    InconsistentIsochroneCount {
        facility: String,
        expected: usize,
        found: usize,
    },

    // CRS errors
    #[error("CRS mismatch: expected {expected}, found {found}")]
    CrsMismatch { expected: String, found: String },

    // Layer errors
    #[error("Layer '{layer}' has no features")]
    EmptyLayer { layer: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Format errors
    #[error("{format} validation failed: {reason}")]
    FormatValidation { format: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, IsoreachError>;
