//! Layered job configuration.
//!
//! Defaults < config file < environment < CLI flags. The evaluator core
//! never reads ambient process state; a validated `JobConfig` is passed in
//! explicitly.

use crate::error::{IsoreachError, Result};
use crate::models::crs::{Crs, DistanceUnit};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Classification settings, file- or CLI-provided as a whole
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifyConfig {
    /// Explicit inclusive upper bin edges, ascending
    pub bins: Option<Vec<f64>>,
    /// Number of natural-breaks classes
    pub classes: Option<usize>,
}

/// Layered configuration for one evaluation job
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// EPSG code every input layer must share (must be projected)
    pub epsg: ConfigValue<u32>,
    /// Cell side length in CRS units
    pub cell_side: ConfigValue<f64>,
    /// Bounding rectangle snapping unit in CRS units
    pub rounding_unit: ConfigValue<f64>,
    /// Unit reduced distances are reported in
    pub distance_unit: ConfigValue<DistanceUnit>,
    /// Optional classification settings
    pub classify: ClassifyConfig,
}

/// TOML shape of a job config file
#[derive(Debug, Deserialize)]
struct FileConfig {
    epsg: Option<u32>,
    cell_side: Option<f64>,
    rounding_unit: Option<f64>,
    distance_unit: Option<DistanceUnit>,
    classify: Option<ClassifyConfig>,
}

impl JobConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            epsg: ConfigValue::new(3857, ConfigSource::Default),
            cell_side: ConfigValue::new(1000.0, ConfigSource::Default),
            rounding_unit: ConfigValue::new(1000.0, ConfigSource::Default),
            distance_unit: ConfigValue::new(DistanceUnit::Kilometers, ConfigSource::Default),
            classify: ClassifyConfig::default(),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| IsoreachError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| IsoreachError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(epsg) = file_config.epsg {
            self.epsg.update(epsg, ConfigSource::File);
        }
        if let Some(cell_side) = file_config.cell_side {
            self.cell_side.update(cell_side, ConfigSource::File);
        }
        if let Some(rounding_unit) = file_config.rounding_unit {
            self.rounding_unit.update(rounding_unit, ConfigSource::File);
        }
        if let Some(distance_unit) = file_config.distance_unit {
            self.distance_unit.update(distance_unit, ConfigSource::File);
        }
        if let Some(classify) = file_config.classify {
            self.classify = classify;
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        if let Ok(epsg_str) = env::var("ISOREACH_EPSG") {
            match epsg_str.parse::<u32>() {
                Ok(epsg) => self.epsg.update(epsg, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid ISOREACH_EPSG value '{}': expected integer EPSG code",
                    epsg_str
                ),
            }
        }

        if let Ok(side_str) = env::var("ISOREACH_CELL_SIDE") {
            match side_str.parse::<f64>() {
                Ok(side) => self.cell_side.update(side, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid ISOREACH_CELL_SIDE value '{}': expected number",
                    side_str
                ),
            }
        }

        if let Ok(unit_str) = env::var("ISOREACH_ROUNDING_UNIT") {
            match unit_str.parse::<f64>() {
                Ok(unit) => self.rounding_unit.update(unit, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid ISOREACH_ROUNDING_UNIT value '{}': expected number",
                    unit_str
                ),
            }
        }

        self
    }

    /// The configured CRS
    pub fn crs(&self) -> Crs {
        Crs::from_epsg(self.epsg.value)
    }

    /// Validate the assembled configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.cell_side.value.is_finite() && self.cell_side.value > 0.0) {
            return Err(IsoreachError::ConfigInvalid {
                key: "cell_side".to_string(),
                reason: format!("must be a positive number, got {}", self.cell_side.value),
            });
        }
        if !(self.rounding_unit.value.is_finite() && self.rounding_unit.value > 0.0) {
            return Err(IsoreachError::ConfigInvalid {
                key: "rounding_unit".to_string(),
                reason: format!("must be a positive number, got {}", self.rounding_unit.value),
            });
        }
        if self.crs().is_geographic() {
            return Err(IsoreachError::ConfigInvalid {
                key: "epsg".to_string(),
                reason: format!(
                    "{} is geographic; grid evaluation needs a projected CRS",
                    self.crs()
                ),
            });
        }
        if let Some(bins) = &self.classify.bins {
            if bins.is_empty() || bins.windows(2).any(|w| w[0] >= w[1]) {
                return Err(IsoreachError::ConfigInvalid {
                    key: "classify.bins".to_string(),
                    reason: "bin edges must be non-empty and strictly ascending".to_string(),
                });
            }
        }
        if let Some(classes) = self.classify.classes {
            if classes == 0 {
                return Err(IsoreachError::ConfigInvalid {
                    key: "classify.classes".to_string(),
                    reason: "at least one class is required".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = JobConfig::with_defaults();
        assert!(config.validate().is_ok());
        assert_eq!(config.epsg.value, 3857);
        assert_eq!(config.cell_side.value, 1000.0);
    }

    #[test]
    fn test_precedence() {
        let mut value = ConfigValue::new(1000.0, ConfigSource::File);
        value.update(500.0, ConfigSource::Default);
        assert_eq!(value.value, 1000.0);
        value.update(250.0, ConfigSource::Cli);
        assert_eq!(value.value, 250.0);
    }

    #[test]
    fn test_rejects_geographic_epsg() {
        let mut config = JobConfig::with_defaults();
        config.epsg.update(4326, ConfigSource::Cli);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, IsoreachError::ConfigInvalid { ref key, .. } if key == "epsg"));
    }

    #[test]
    fn test_rejects_non_positive_cell_side() {
        let mut config = JobConfig::with_defaults();
        config.cell_side.update(0.0, ConfigSource::Cli);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unsorted_bins() {
        let mut config = JobConfig::with_defaults();
        config.classify.bins = Some(vec![5.0, 5.0, 10.0]);
        assert!(config.validate().is_err());
        config.classify.bins = Some(vec![5.0, 10.0, 15.0]);
        assert!(config.validate().is_ok());
    }
}
