//! Travel-time band assignment from isochrone polygons.

use std::collections::BTreeMap;

use geo::Contains;
use isoreach_core::error::{IsoreachError, Result};
use isoreach_core::models::{
    crs, AccessTable, Band, CellRecord, Grid, IsochroneLayer, IsochroneSet,
};

/// Check that every facility supplies the same number of isochrone rings.
/// Returns the common ring count.
///
/// Runs before any assignment, so a bad layer never produces a partial
/// table.
pub fn validate_ring_counts(layer: &IsochroneLayer) -> Result<usize> {
    let Some(first) = layer.sets.first() else {
        return Err(IsoreachError::EmptyLayer { layer: "isochrones".to_string() });
    };

    let expected = first.ring_count();
    for set in &layer.sets {
        if set.ring_count() != expected {
            return Err(IsoreachError::InconsistentIsochroneCount {
                facility: set.facility.to_string(),
                expected,
                found: set.ring_count(),
            });
        }
    }
    Ok(expected)
}

/// For every non-empty cell, the travel-time band to each facility,
/// reduced to the per-cell minimum band.
///
/// Per facility the band starts at the unreachable sentinel
/// (ring count + 1) and drops by one for every ring, tested from the
/// largest time down, that contains the cell centroid. With properly
/// nested rings the result is the index of the smallest containing ring,
/// band 1 being the best.
pub fn band_field(grid: &Grid, isochrones: &IsochroneLayer) -> Result<AccessTable<Band>> {
    crs::require_match(&grid.crs, &isochrones.crs)?;
    crs::require_projected(&grid.crs)?;
    let ring_count = validate_ring_counts(isochrones)?;

    let mut records = Vec::new();
    for cell in grid.active_cells() {
        let Some(centroid) = cell.centroid() else { continue };

        let mut per_facility = BTreeMap::new();
        for set in &isochrones.sets {
            per_facility.insert(set.facility, band_for(set, &centroid, ring_count));
        }

        let (nearest, minimum) = per_facility
            .iter()
            .fold(None::<(_, Band)>, |best, (id, band)| match best {
                Some((_, bb)) if bb <= *band => best,
                _ => Some((*id, *band)),
            })
            .ok_or_else(|| IsoreachError::EmptyLayer { layer: "isochrones".to_string() })?;

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
        facilities = isochrones.sets.len(),
        rings = ring_count,
        "assigned travel-time bands"
    );

    Ok(AccessTable { crs: grid.crs.clone(), records })
}

fn band_for(set: &IsochroneSet, centroid: &geo::Point<f64>, ring_count: usize) -> Band {
    let mut band = ring_count as u32 + 1;
    for ring in set.rings_descending() {
        if ring.polygon.contains(centroid) {
            band -= 1;
        }
    }
    Band(band)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::build_grid;
    use geo::polygon;
    use isoreach_core::models::{Crs, FacilityId, IsochroneRing, Region};

    /// Square ring of half-side `reach` centered on (cx, cy)
    fn ring(minutes: u32, cx: f64, cy: f64, reach: f64) -> IsochroneRing {
        IsochroneRing {
            minutes,
            polygon: polygon![
                (x: cx - reach, y: cy - reach),
                (x: cx + reach, y: cy - reach),
                (x: cx + reach, y: cy + reach),
                (x: cx - reach, y: cy + reach),
                (x: cx - reach, y: cy - reach),
            ],
        }
    }

    fn nested_set(id: u32, cx: f64, cy: f64, reaches: &[(u32, f64)]) -> IsochroneSet {
        IsochroneSet {
            facility: FacilityId(id),
            rings: reaches.iter().map(|(m, r)| ring(*m, cx, cy, *r)).collect(),
        }
    }

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

    #[test]
    fn test_band_countdown_over_nested_rings() {
        // Facility at the center of a 1x3 grid; rings T=[5,10,15] reach
        // 600, 1600, 2600 from (500, 500). Centroids: 500/1500/2500.
        let grid = build_grid(&region(3000.0, 1000.0), 1000.0, 1000.0).unwrap();
        let layer = IsochroneLayer {
            crs: Crs::nad83_mtm8(),
            sets: vec![nested_set(
                0,
                500.0,
                500.0,
                &[(5, 600.0), (10, 1600.0), (15, 2600.0)],
            )],
        };

        let table = band_field(&grid, &layer).unwrap();
        assert_eq!(table.minima(), vec![Band(1), Band(2), Band(3)]);
    }

    #[test]
    fn test_centroid_inside_no_ring_gets_sentinel() {
        let grid = build_grid(&region(1000.0, 1000.0), 1000.0, 1000.0).unwrap();
        // Rings far away from the grid
        let layer = IsochroneLayer {
            crs: Crs::nad83_mtm8(),
            sets: vec![nested_set(
                0,
                90_000.0,
                90_000.0,
                &[(5, 100.0), (10, 200.0), (15, 300.0)],
            )],
        };

        let table = band_field(&grid, &layer).unwrap();
        assert_eq!(table.records[0].minimum, Band::unreachable(3));
        assert_eq!(table.records[0].minimum, Band(4));
    }

    #[test]
    fn test_band_no_worse_than_largest_ring_alone() {
        // Monotonicity: adding the smaller rings can only lower the band
        // relative to evaluating the T=40 ring by itself.
        let grid = build_grid(&region(2000.0, 2000.0), 1000.0, 1000.0).unwrap();
        let full = nested_set(0, 500.0, 500.0, &[(10, 700.0), (40, 3000.0)]);
        let outer_only = IsochroneSet {
            facility: FacilityId(0),
            rings: vec![ring(40, 500.0, 500.0, 3000.0)],
        };

        let full_table = band_field(
            &grid,
            &IsochroneLayer { crs: Crs::nad83_mtm8(), sets: vec![full] },
        )
        .unwrap();
        let outer_table = band_field(
            &grid,
            &IsochroneLayer { crs: Crs::nad83_mtm8(), sets: vec![outer_only] },
        )
        .unwrap();

        // Same sentinel scale: compare distance from the sentinel instead
        for (full_rec, outer_rec) in full_table.records.iter().zip(&outer_table.records) {
            let full_from_sentinel = 3 - full_rec.minimum.0;
            let outer_from_sentinel = 2 - outer_rec.minimum.0;
            assert!(full_from_sentinel >= outer_from_sentinel);
        }
        // Cell 0 centroid is inside both rings, so its band improves to 1
        assert_eq!(full_table.records[0].minimum, Band(1));
        assert_eq!(outer_table.records[0].minimum, Band(1));
    }

    #[test]
    fn test_minimum_band_across_facilities() {
        let grid = build_grid(&region(2000.0, 1000.0), 1000.0, 1000.0).unwrap();
        // Facility 0 covers the left cell tightly, facility 1 the right
        let layer = IsochroneLayer {
            crs: Crs::nad83_mtm8(),
            sets: vec![
                nested_set(0, 500.0, 500.0, &[(5, 600.0), (10, 5000.0)]),
                nested_set(1, 1500.0, 500.0, &[(5, 600.0), (10, 5000.0)]),
            ],
        };

        let table = band_field(&grid, &layer).unwrap();
        assert_eq!(table.records[0].minimum, Band(1));
        assert_eq!(table.records[0].nearest, FacilityId(0));
        assert_eq!(table.records[1].minimum, Band(1));
        assert_eq!(table.records[1].nearest, FacilityId(1));
        assert_eq!(table.records[0].per_facility[&FacilityId(1)], Band(2));
    }

    #[test]
    fn test_unequal_ring_counts_fail_before_assignment() {
        let grid = build_grid(&region(1000.0, 1000.0), 1000.0, 1000.0).unwrap();
        let eight: Vec<(u32, f64)> = (1..=8).map(|m| (m * 5, m as f64 * 100.0)).collect();
        let seven: Vec<(u32, f64)> = (1..=7).map(|m| (m * 5, m as f64 * 100.0)).collect();
        let layer = IsochroneLayer {
            crs: Crs::nad83_mtm8(),
            sets: vec![
                nested_set(0, 500.0, 500.0, &eight),
                nested_set(1, 500.0, 500.0, &seven),
            ],
        };

        let err = band_field(&grid, &layer).unwrap_err();
        match err {
            IsoreachError::InconsistentIsochroneCount { expected, found, .. } => {
                assert_eq!(expected, 8);
                assert_eq!(found, 7);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
