//! The evaluator's output: a fixed, typed per-cell record.
//!
//! The per-facility values live in an ordered map keyed by facility id
//! rather than in dynamically named columns, so the record shape never
//! depends on how many facilities a run happens to have.

use super::crs::Crs;
use super::facility::FacilityId;
use geo::MultiPolygon;
use std::collections::BTreeMap;

/// One cell's evaluation result.
///
/// `V` is `f64` (meters) in distance mode and `Band` in time mode.
#[derive(Debug, Clone)]
pub struct CellRecord<V> {
    /// Stable index of the cell in its grid
    pub cell: usize,
    /// The (possibly obstacle-reduced) cell geometry
    pub geometry: MultiPolygon<f64>,
    /// Value per facility, ordered by facility id
    pub per_facility: BTreeMap<FacilityId, V>,
    /// The facility achieving the minimum value (lowest id on ties)
    pub nearest: FacilityId,
    /// Minimum value across all facilities
    pub minimum: V,
}

/// Per-cell records for every non-empty cell of a grid.
///
/// Cells emptied by obstacle subtraction carry no record; the `cell`
/// field preserves the original grid index.
#[derive(Debug, Clone)]
pub struct AccessTable<V> {
    pub crs: Crs,
    pub records: Vec<CellRecord<V>>,
}

impl<V: Copy> AccessTable<V> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The reduced minimum value of every record, in record order.
    /// This is the series classification runs on.
    pub fn minima(&self) -> Vec<V> {
        self.records.iter().map(|r| r.minimum).collect()
    }
}
