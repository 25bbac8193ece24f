//! Straight-line distance assignment.

use std::collections::BTreeMap;

use geo::{Distance, Euclidean};
use isoreach_core::error::{IsoreachError, Result};
use isoreach_core::models::{crs, AccessTable, CellRecord, FacilityLayer, Grid};

/// For every non-empty cell, the Euclidean distance from its centroid to
/// each facility, reduced to the per-cell minimum.
///
/// Distances are plain Cartesian values in the grid's CRS unit; both
/// layers must share one projected CRS. The output is a pure function of
/// centroids and facility points, with no randomness and no dependence
/// on iteration order.
/// Ties go to the lowest facility id.
pub fn distance_field(grid: &Grid, facilities: &FacilityLayer) -> Result<AccessTable<f64>> {
    crs::require_match(&grid.crs, &facilities.crs)?;
    crs::require_projected(&grid.crs)?;
    if facilities.is_empty() {
        return Err(IsoreachError::EmptyLayer { layer: "facilities".to_string() });
    }

    let mut records = Vec::new();
    for cell in grid.active_cells() {
        let Some(centroid) = cell.centroid() else { continue };

        let mut per_facility = BTreeMap::new();
        for facility in &facilities.facilities {
            per_facility.insert(facility.id, Euclidean.distance(centroid, facility.location));
        }

        // BTreeMap iterates by ascending id, so strict < keeps the lowest
        // id on ties
        let (nearest, minimum) = per_facility
            .iter()
            .fold(None::<(_, f64)>, |best, (id, d)| match best {
                Some((_, bd)) if bd <= *d => best,
                _ => Some((*id, *d)),
            })
            .ok_or_else(|| IsoreachError::EmptyLayer { layer: "facilities".to_string() })?;

        records.push(CellRecord {
            cell: cell.index,
            geometry: cell.geometry.clone(),
            per_facility,
            nearest,
            minimum,
        });
    }

    tracing::debug!(
        cells = records.len(),
        facilities = facilities.len(),
        "assigned straight-line distances"
    );

    Ok(AccessTable { crs: grid.crs.clone(), records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::build_grid;
    use geo::{polygon, Point};
    use isoreach_core::models::{Crs, Facility, FacilityId, Region};

    fn region(x1: f64, y1: f64) -> Region {
        Region::new(
            Crs::nad83_mtm8(),
            polygon![
                (x: 0.0, y: 0.0),
                (x: x1, y: 0.0),
                (x: x1, y: y1),
                (x: 0.0, y: y1),
                (x: 0.0, y: 0.0),
            ],
        )
    }

    fn layer(points: &[(f64, f64)]) -> FacilityLayer {
        FacilityLayer {
            crs: Crs::nad83_mtm8(),
            facilities: points
                .iter()
                .enumerate()
                .map(|(ix, (x, y))| {
                    Facility::new(ix as u32, format!("f{ix}"), Point::new(*x, *y))
                })
                .collect(),
        }
    }

    #[test]
    fn test_centroid_to_facility_distance_is_exact() {
        // One facility at (500, 500); the cell above has centroid (500, 1500)
        let grid = build_grid(&region(1000.0, 2000.0), 1000.0, 1000.0).unwrap();
        let table = distance_field(&grid, &layer(&[(500.0, 500.0)])).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].minimum, 0.0);
        assert_eq!(table.records[1].minimum, 1000.0);
        assert_eq!(table.records[1].per_facility[&FacilityId(0)], 1000.0);
    }

    #[test]
    fn test_minimum_over_all_facilities() {
        let grid = build_grid(&region(3000.0, 1000.0), 1000.0, 1000.0).unwrap();
        let facilities = layer(&[(500.0, 500.0), (2500.0, 500.0)]);
        let table = distance_field(&grid, &facilities).unwrap();

        for record in &table.records {
            let by_hand = record
                .per_facility
                .values()
                .cloned()
                .fold(f64::INFINITY, f64::min);
            assert_eq!(record.minimum, by_hand);
            assert_eq!(record.per_facility.len(), 2);
        }
        // Middle cell (centroid 1500,500) is equidistant: tie goes to id 0
        assert_eq!(table.records[1].nearest, FacilityId(0));
        // Rightmost cell belongs to the second facility
        assert_eq!(table.records[2].nearest, FacilityId(1));
    }

    #[test]
    fn test_distance_is_symmetric_and_non_negative() {
        let a = Point::new(120.0, -40.0);
        let b = Point::new(-30.0, 220.0);
        assert_eq!(Euclidean.distance(a, b), Euclidean.distance(b, a));
        assert!(Euclidean.distance(a, b) >= 0.0);
    }

    #[test]
    fn test_empty_facility_layer_fails() {
        let grid = build_grid(&region(1000.0, 1000.0), 1000.0, 1000.0).unwrap();
        let err = distance_field(&grid, &layer(&[])).unwrap_err();
        assert!(matches!(err, IsoreachError::EmptyLayer { .. }));
    }

    #[test]
    fn test_geographic_crs_fails() {
        let mut r = region(1000.0, 1000.0);
        r.crs = Crs::wgs84();
        let grid = build_grid(&r, 1000.0, 1000.0).unwrap();
        let mut facilities = layer(&[(500.0, 500.0)]);
        facilities.crs = Crs::wgs84();

        let err = distance_field(&grid, &facilities).unwrap_err();
        assert!(matches!(err, IsoreachError::CrsMismatch { .. }));
    }
}
