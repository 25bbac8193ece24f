//! Region bounds and grid generation.

use geo::algorithm::bounding_rect::BoundingRect;
use geo::{Coord, LineString, MultiPolygon, Polygon, Rect};
use isoreach_core::error::{IsoreachError, Result};
use isoreach_core::models::{Cell, Grid, Region};

/// Bounding rectangle of the region boundary, snapped outward to the
/// nearest multiple of `rounding_unit`.
pub fn snapped_bounds(region: &Region, rounding_unit: f64) -> Result<Rect<f64>> {
    require_positive("rounding_unit", rounding_unit)?;

    if region.boundary.exterior().0.is_empty() {
        return Err(IsoreachError::InvalidRegion {
            reason: "boundary polygon is empty".to_string(),
        });
    }

    let rect = region.boundary.bounding_rect().ok_or_else(|| IsoreachError::InvalidRegion {
        reason: "boundary has no bounding rectangle".to_string(),
    })?;

    // Checked before snapping: snapping outward would inflate a
    // degenerate extent into a plausible-looking rectangle.
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return Err(IsoreachError::InvalidRegion {
            reason: "bounding rectangle has zero area".to_string(),
        });
    }

    let x_min = (rect.min().x / rounding_unit).floor() * rounding_unit;
    let y_min = (rect.min().y / rounding_unit).floor() * rounding_unit;
    let x_max = (rect.max().x / rounding_unit).ceil() * rounding_unit;
    let y_max = (rect.max().y / rounding_unit).ceil() * rounding_unit;

    Ok(Rect::new(Coord { x: x_min, y: y_min }, Coord { x: x_max, y: y_max }))
}

/// Tile the snapped bounding rectangle with square cells of side `side`.
///
/// Cells run row-major from (x_min, y_min); `index = row * n_cols + col`.
/// When `side` does not divide the snapped extent evenly, the last
/// row/column overshoots the rectangle. Over-coverage is accepted.
pub fn build_grid(region: &Region, side: f64, rounding_unit: f64) -> Result<Grid> {
    require_positive("cell_side", side)?;
    let bounds = snapped_bounds(region, rounding_unit)?;

    let n_cols = (bounds.width() / side).ceil() as usize;
    let n_rows = (bounds.height() / side).ceil() as usize;

    let mut cells = Vec::with_capacity(n_rows * n_cols);
    for row in 0..n_rows {
        let y = bounds.min().y + row as f64 * side;
        for col in 0..n_cols {
            let x = bounds.min().x + col as f64 * side;
            cells.push(Cell::new(
                row * n_cols + col,
                MultiPolygon::new(vec![square(x, y, side)]),
            ));
        }
    }

    tracing::debug!(
        n_rows,
        n_cols,
        cells = cells.len(),
        "generated grid over snapped bounds ({}, {})..({}, {})",
        bounds.min().x,
        bounds.min().y,
        bounds.max().x,
        bounds.max().y,
    );

    Ok(Grid {
        crs: region.crs.clone(),
        bounds,
        side,
        n_cols,
        n_rows,
        cells,
    })
}

fn square(x: f64, y: f64, side: f64) -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![
            (x, y),
            (x + side, y),
            (x + side, y + side),
            (x, y + side),
            (x, y),
        ]),
        vec![],
    )
}

fn require_positive(key: &str, value: f64) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(IsoreachError::ConfigInvalid {
            key: key.to_string(),
            reason: format!("must be a positive number, got {value}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;
    use isoreach_core::models::Crs;

    fn region(x0: f64, y0: f64, x1: f64, y1: f64) -> Region {
        Region::new(
            Crs::nad83_mtm8(),
            polygon![
                (x: x0, y: y0),
                (x: x1, y: y0),
                (x: x1, y: y1),
                (x: x0, y: y1),
                (x: x0, y: y0),
            ],
        )
    }

    #[test]
    fn test_bounds_snap_outward_to_kilometer() {
        let bounds = snapped_bounds(&region(250.0, 1400.0, 3600.0, 2100.0), 1000.0).unwrap();
        assert_eq!(bounds.min().x, 0.0);
        assert_eq!(bounds.min().y, 1000.0);
        assert_eq!(bounds.max().x, 4000.0);
        assert_eq!(bounds.max().y, 3000.0);
    }

    #[test]
    fn test_negative_coordinates_snap_away_from_zero() {
        let bounds = snapped_bounds(&region(-250.0, -1400.0, 600.0, 100.0), 1000.0).unwrap();
        assert_eq!(bounds.min().x, -1000.0);
        assert_eq!(bounds.min().y, -2000.0);
        assert_eq!(bounds.max().x, 1000.0);
        assert_eq!(bounds.max().y, 1000.0);
    }

    #[test]
    fn test_four_cell_grid_corner_coordinates() {
        // (0,0)-(2000,2000) at side 1000 is exactly four cells, 0..4
        let grid = build_grid(&region(0.0, 0.0, 2000.0, 2000.0), 1000.0, 1000.0).unwrap();
        assert_eq!(grid.len(), 4);
        assert_eq!(grid.n_cols, 2);
        assert_eq!(grid.n_rows, 2);

        let expected_origins = [(0.0, 0.0), (1000.0, 0.0), (0.0, 1000.0), (1000.0, 1000.0)];
        for (cell, (x, y)) in grid.cells.iter().zip(expected_origins) {
            let rect = cell.geometry.bounding_rect().unwrap();
            assert_eq!(rect.min().x, x);
            assert_eq!(rect.min().y, y);
            assert_eq!(rect.max().x, x + 1000.0);
            assert_eq!(rect.max().y, y + 1000.0);
        }
    }

    #[test]
    fn test_indices_are_row_major() {
        let grid = build_grid(&region(0.0, 0.0, 3000.0, 2000.0), 1000.0, 1000.0).unwrap();
        assert_eq!(grid.n_cols, 3);
        for cell in &grid.cells {
            let (row, col) = grid.position(cell.index);
            let rect = cell.geometry.bounding_rect().unwrap();
            assert_eq!(rect.min().x, col as f64 * 1000.0);
            assert_eq!(rect.min().y, row as f64 * 1000.0);
        }
    }

    #[test]
    fn test_uneven_side_overshoots_bounds() {
        // 2000 wide at side 1500: two columns, last one ends at 3000
        let grid = build_grid(&region(0.0, 0.0, 2000.0, 2000.0), 1500.0, 1000.0).unwrap();
        assert_eq!(grid.n_cols, 2);
        let last = grid.cells.last().unwrap();
        let rect = last.geometry.bounding_rect().unwrap();
        assert_eq!(rect.max().x, 3000.0);
        assert!(rect.max().x > grid.bounds.max().x);
    }

    #[test]
    fn test_degenerate_region_fails() {
        // A "polygon" collapsed to a vertical segment has zero-area bounds
        let r = region(500.0, 0.0, 500.0, 2000.0);
        let err = snapped_bounds(&r, 1000.0).unwrap_err();
        assert!(matches!(err, IsoreachError::InvalidRegion { .. }));
    }

    #[test]
    fn test_empty_boundary_fails() {
        let r = Region::new(
            Crs::nad83_mtm8(),
            Polygon::new(LineString::new(vec![]), vec![]),
        );
        let err = build_grid(&r, 1000.0, 1000.0).unwrap_err();
        assert!(matches!(err, IsoreachError::InvalidRegion { .. }));
    }

    #[test]
    fn test_non_positive_side_fails() {
        let r = region(0.0, 0.0, 2000.0, 2000.0);
        assert!(build_grid(&r, 0.0, 1000.0).is_err());
        assert!(build_grid(&r, -5.0, 1000.0).is_err());
        assert!(build_grid(&r, f64::NAN, 1000.0).is_err());
    }
}
