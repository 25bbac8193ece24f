//! Coordinate reference system identification.
//!
//! The evaluator never reprojects; it only checks that every input layer
//! already shares one projected (linear-unit) CRS. Straight-line distances
//! in a geographic CRS would be degrees, which is meaningless for the
//! accessibility surfaces this crate produces.

use crate::error::{IsoreachError, Result};
use serde::{Deserialize, Serialize};

/// Coordinate Reference System identified by EPSG code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    pub epsg: u32,
    pub name: String,
}

impl Default for Crs {
    fn default() -> Self {
        Self::web_mercator()
    }
}

impl Crs {
    pub fn new(epsg: u32, name: impl Into<String>) -> Self {
        Self { epsg, name: name.into() }
    }

    /// Build a CRS from its EPSG code, naming the codes this crate meets
    /// in practice.
    pub fn from_epsg(epsg: u32) -> Self {
        match epsg {
            4326 => Self::wgs84(),
            3857 => Self::web_mercator(),
            32188 => Self::nad83_mtm8(),
            3067 => Self::new(3067, "ETRS89 / TM35FIN"),
            _ => Self::new(epsg, format!("EPSG:{epsg}")),
        }
    }

    /// WGS 84 (EPSG:4326), geographic
    pub fn wgs84() -> Self {
        Self::new(4326, "WGS 84")
    }

    /// Web Mercator (EPSG:3857), projected, meters
    pub fn web_mercator() -> Self {
        Self::new(3857, "Web Mercator")
    }

    /// NAD83 / MTM zone 8 (EPSG:32188), projected, meters (Montreal area)
    pub fn nad83_mtm8() -> Self {
        Self::new(32188, "NAD83 / MTM zone 8")
    }

    /// Whether this CRS uses angular (degree) units.
    ///
    /// Recognizes the common geographic codes; everything else is assumed
    /// projected. Wrong assumptions surface as absurd distance values, not
    /// silent unit mixups, because all layers must still share the code.
    pub fn is_geographic(&self) -> bool {
        matches!(self.epsg, 4326 | 4267 | 4269 | 4258 | 4617)
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{} ({})", self.epsg, self.name)
    }
}

/// Fail with `CrsMismatch` unless the two CRS carry the same EPSG code.
pub fn require_match(expected: &Crs, found: &Crs) -> Result<()> {
    if expected.epsg != found.epsg {
        return Err(IsoreachError::CrsMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        });
    }
    Ok(())
}

/// Fail with `CrsMismatch` if the CRS is geographic.
pub fn require_projected(crs: &Crs) -> Result<()> {
    if crs.is_geographic() {
        return Err(IsoreachError::CrsMismatch {
            expected: "a projected CRS with linear units".to_string(),
            found: crs.to_string(),
        });
    }
    Ok(())
}

/// Distance units for reporting reduced values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Meters,
    Kilometers,
}

impl DistanceUnit {
    /// Convert a value in meters to this unit
    pub fn from_meters(&self, meters: f64) -> f64 {
        match self {
            DistanceUnit::Meters => meters,
            DistanceUnit::Kilometers => meters / 1000.0,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            DistanceUnit::Meters => "m",
            DistanceUnit::Kilometers => "km",
        }
    }
}
