//! The regular grid: square cells tiling the snapped study-area rectangle.

use super::crs::Crs;
use geo::algorithm::centroid::Centroid;
use geo::{MultiPolygon, Point, Rect};

/// One grid cell.
///
/// Starts life as a single square; obstacle subtraction may reduce it to
/// an arbitrary multipolygon or empty it entirely. An empty cell stays in
/// the grid (indices are stable) but is skipped by every per-cell
/// computation, since its centroid is undefined.
#[derive(Debug, Clone)]
pub struct Cell {
    pub index: usize,
    pub geometry: MultiPolygon<f64>,
}

impl Cell {
    pub fn new(index: usize, geometry: MultiPolygon<f64>) -> Self {
        Self { index, geometry }
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.0.is_empty()
    }

    /// Centroid of the (possibly obstacle-reduced) cell geometry.
    /// `None` for empty cells.
    pub fn centroid(&self) -> Option<Point<f64>> {
        if self.is_empty() {
            return None;
        }
        self.geometry.centroid()
    }
}

/// Square cells tiling the snapped bounding rectangle in row-major order
/// from (x_min, y_min): `index = row * n_cols + col`.
///
/// The last row/column may overshoot the rectangle when the side length
/// does not divide the snapped extent evenly; over-coverage is accepted.
#[derive(Debug, Clone)]
pub struct Grid {
    pub crs: Crs,
    /// Snapped bounding rectangle the cells tile
    pub bounds: Rect<f64>,
    /// Cell side length in CRS units
    pub side: f64,
    pub n_cols: usize,
    pub n_rows: usize,
    pub cells: Vec<Cell>,
}

impl Grid {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells that survived obstacle subtraction with a non-empty geometry
    pub fn active_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| !c.is_empty())
    }

    /// Row and column of a cell index
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.n_cols, index % self.n_cols)
    }
}
