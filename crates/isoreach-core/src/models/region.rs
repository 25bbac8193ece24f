//! Study area and obstacle layers.

use super::crs::Crs;
use geo::Polygon;

/// The area of interest: a polygon boundary with its CRS.
///
/// The grid covers the boundary's bounding rectangle, snapped outward to
/// the configured rounding unit.
#[derive(Debug, Clone)]
pub struct Region {
    pub crs: Crs,
    pub boundary: Polygon<f64>,
}

impl Region {
    pub fn new(crs: Crs, boundary: Polygon<f64>) -> Self {
        Self { crs, boundary }
    }
}

/// Exclusion polygons (water bodies and the like) subtracted from every
/// grid cell. Must already be in the grid's CRS; no reprojection happens.
#[derive(Debug, Clone)]
pub struct ObstacleLayer {
    pub crs: Crs,
    pub polygons: Vec<Polygon<f64>>,
}

impl ObstacleLayer {
    pub fn new(crs: Crs, polygons: Vec<Polygon<f64>>) -> Self {
        Self { crs, polygons }
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}
