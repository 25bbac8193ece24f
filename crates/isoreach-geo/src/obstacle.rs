//! Obstacle subtraction: remove exclusion area from every grid cell.

use geo::{BooleanOps, MultiPolygon, Validation};
use isoreach_core::error::{IsoreachError, Result};
use isoreach_core::models::{crs, Cell, Grid, ObstacleLayer};

/// Replace every cell's geometry with cell minus the union of obstacles.
///
/// A cell fully inside an obstacle becomes empty; it stays in the grid
/// with its index but is skipped by downstream per-cell work. Invalid
/// geometry after subtraction is an error, no repair is attempted.
/// Applying the same obstacle set twice is a no-op the second time.
pub fn subtract_obstacles(grid: &Grid, obstacles: &ObstacleLayer) -> Result<Grid> {
    crs::require_match(&grid.crs, &obstacles.crs)?;

    if obstacles.is_empty() {
        return Ok(grid.clone());
    }

    let union = union_of(obstacles);

    let mut emptied = 0usize;
    let mut cells = Vec::with_capacity(grid.cells.len());
    for cell in &grid.cells {
        if cell.is_empty() {
            cells.push(cell.clone());
            continue;
        }

        let clipped = cell.geometry.difference(&union);
        if !clipped.is_valid() {
            return Err(IsoreachError::InvalidGeometry {
                cell: cell.index,
                reason: "invalid geometry after obstacle subtraction".to_string(),
            });
        }
        if clipped.0.is_empty() {
            emptied += 1;
        }
        cells.push(Cell::new(cell.index, clipped));
    }

    tracing::info!(
        total = cells.len(),
        emptied,
        obstacles = obstacles.polygons.len(),
        "subtracted obstacles from grid"
    );

    Ok(Grid { cells, ..grid.clone() })
}

fn union_of(obstacles: &ObstacleLayer) -> MultiPolygon<f64> {
    let mut union = MultiPolygon::new(vec![]);
    for polygon in &obstacles.polygons {
        union = union.union(polygon);
    }
    union
}
