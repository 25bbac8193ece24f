//! The full evaluation pipeline: grid, obstacles, assignment, reduction.
//!
//! One pass, no feedback loops. All CRS agreement is checked up front so
//! a mismatched layer never costs a grid build.

use isoreach_core::error::Result;
use isoreach_core::models::{
    crs, AccessTable, Band, Crs, FacilityLayer, Grid, IsochroneLayer, ObstacleLayer, Region,
};

use crate::distance::distance_field;
use crate::grid::build_grid;
use crate::isochrone::{band_field, validate_ring_counts};
use crate::obstacle::subtract_obstacles;

/// Grid parameters, both in CRS units
#[derive(Debug, Clone, Copy)]
pub struct GridSpec {
    pub cell_side: f64,
    pub rounding_unit: f64,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self { cell_side: 1000.0, rounding_unit: 1000.0 }
    }
}

/// Straight-line mode: distance surface from region to facilities
pub fn distance_surface(
    region: &Region,
    obstacles: Option<&ObstacleLayer>,
    facilities: &FacilityLayer,
    spec: GridSpec,
) -> Result<AccessTable<f64>> {
    check_crs(&region.crs, obstacles, Some(&facilities.crs), None)?;
    let grid = prepared_grid(region, obstacles, spec)?;
    distance_field(&grid, facilities)
}

/// Time mode: travel-time band surface from region to isochrone families
pub fn travel_time_surface(
    region: &Region,
    obstacles: Option<&ObstacleLayer>,
    isochrones: &IsochroneLayer,
    spec: GridSpec,
) -> Result<AccessTable<Band>> {
    check_crs(&region.crs, obstacles, None, Some(&isochrones.crs))?;
    // Count agreement is a precondition; fail before building anything
    validate_ring_counts(isochrones)?;
    let grid = prepared_grid(region, obstacles, spec)?;
    band_field(&grid, isochrones)
}

fn prepared_grid(
    region: &Region,
    obstacles: Option<&ObstacleLayer>,
    spec: GridSpec,
) -> Result<Grid> {
    let grid = build_grid(region, spec.cell_side, spec.rounding_unit)?;
    tracing::info!(
        cells = grid.len(),
        side = spec.cell_side,
        "built evaluation grid"
    );
    match obstacles {
        Some(layer) => subtract_obstacles(&grid, layer),
        None => Ok(grid),
    }
}

fn check_crs(
    region: &Crs,
    obstacles: Option<&ObstacleLayer>,
    facilities: Option<&Crs>,
    isochrones: Option<&Crs>,
) -> Result<()> {
    crs::require_projected(region)?;
    if let Some(layer) = obstacles {
        crs::require_match(region, &layer.crs)?;
    }
    if let Some(other) = facilities {
        crs::require_match(region, other)?;
    }
    if let Some(other) = isochrones {
        crs::require_match(region, other)?;
    }
    Ok(())
}
