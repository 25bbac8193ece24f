//! End-to-end pipeline tests: region in, reduced access table out.

use geo::{polygon, Point, Polygon};
use isoreach_core::models::{
    Band, Crs, Facility, FacilityId, FacilityLayer, IsochroneLayer, IsochroneRing, IsochroneSet,
    ObstacleLayer, Region,
};
use isoreach_core::IsoreachError;
use isoreach_geo::classify::{classify, Scheme};
use isoreach_geo::pipeline::{distance_surface, travel_time_surface, GridSpec};

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
    polygon![
        (x: x0, y: y0),
        (x: x1, y: y0),
        (x: x1, y: y1),
        (x: x0, y: y1),
        (x: x0, y: y0),
    ]
}

fn montreal_like_region() -> Region {
    // Snaps to (0,0)..(4000,3000): a 4x3 kilometer grid
    Region::new(Crs::nad83_mtm8(), rect(150.0, 220.0, 3790.0, 2900.0))
}

fn facilities(points: &[(&str, f64, f64)]) -> FacilityLayer {
    FacilityLayer {
        crs: Crs::nad83_mtm8(),
        facilities: points
            .iter()
            .enumerate()
            .map(|(ix, (name, x, y))| Facility::new(ix as u32, *name, Point::new(*x, *y)))
            .collect(),
    }
}

#[test]
fn test_distance_surface_full_run() {
    let region = montreal_like_region();
    let layer = facilities(&[("west", 500.0, 500.0), ("east", 3500.0, 2500.0)]);
    // Water strip covering the middle column entirely
    let water = ObstacleLayer::new(
        Crs::nad83_mtm8(),
        vec![rect(1000.0, -100.0, 2000.0, 3100.0)],
    );

    let table =
        distance_surface(&region, Some(&water), &layer, GridSpec::default()).unwrap();

    // 12 cells minus the flooded middle column of 3
    assert_eq!(table.len(), 9);
    for record in &table.records {
        assert_eq!(record.per_facility.len(), 2);
        let by_hand = record
            .per_facility
            .values()
            .cloned()
            .fold(f64::INFINITY, f64::min);
        assert_eq!(record.minimum, by_hand);
    }

    // Cell 0 sits on the west facility
    let first = &table.records[0];
    assert_eq!(first.cell, 0);
    assert_eq!(first.nearest, FacilityId(0));
    assert_eq!(first.minimum, 0.0);

    // Last cell (index 11, centroid 3500/2500) sits on the east facility
    let last = table.records.last().unwrap();
    assert_eq!(last.cell, 11);
    assert_eq!(last.nearest, FacilityId(1));
    assert_eq!(last.minimum, 0.0);
}

#[test]
fn test_distance_surface_minima_classify() {
    let region = montreal_like_region();
    let layer = facilities(&[("west", 500.0, 500.0)]);

    let table = distance_surface(&region, None, &layer, GridSpec::default()).unwrap();
    assert_eq!(table.len(), 12);

    // Kilometers, with the course's flavor of explicit bins
    let km: Vec<f64> = table.minima().iter().map(|m| m / 1000.0).collect();
    let classified = classify(&km, &Scheme::UserDefined { edges: vec![1.0, 2.0, 3.0] }).unwrap();
    assert_eq!(classified.class_count(), 4);
    // The facility's own cell lands in the first class
    assert_eq!(classified.assignments[0], 0);
    assert_eq!(classified.assignments.len(), 12);
}

#[test]
fn test_travel_time_surface_full_run() {
    let region = Region::new(Crs::nad83_mtm8(), rect(0.0, 0.0, 3000.0, 1000.0));
    let rings = |cx: f64| {
        vec![
            IsochroneRing { minutes: 5, polygon: rect(cx - 600.0, -100.0, cx + 600.0, 1100.0) },
            IsochroneRing { minutes: 10, polygon: rect(cx - 1600.0, -100.0, cx + 1600.0, 1100.0) },
        ]
    };
    let layer = IsochroneLayer {
        crs: Crs::nad83_mtm8(),
        sets: vec![IsochroneSet { facility: FacilityId(0), rings: rings(500.0) }],
    };

    let table = travel_time_surface(&region, None, &layer, GridSpec::default()).unwrap();
    // Centroids at 500 (both rings), 1500 (10-min only), 2500 (neither)
    assert_eq!(table.minima(), vec![Band(1), Band(2), Band(3)]);
    assert!(table.records[2].minimum.is_unreachable(2));
}

#[test]
fn test_travel_time_surface_rejects_unequal_ring_counts() {
    let region = Region::new(Crs::nad83_mtm8(), rect(0.0, 0.0, 2000.0, 1000.0));
    let ring = |minutes: u32| IsochroneRing {
        minutes,
        polygon: rect(0.0, 0.0, 100.0, 100.0),
    };
    let layer = IsochroneLayer {
        crs: Crs::nad83_mtm8(),
        sets: vec![
            IsochroneSet { facility: FacilityId(0), rings: vec![ring(5), ring(10)] },
            IsochroneSet { facility: FacilityId(1), rings: vec![ring(5)] },
        ],
    };

    let err = travel_time_surface(&region, None, &layer, GridSpec::default()).unwrap_err();
    assert!(matches!(err, IsoreachError::InconsistentIsochroneCount { .. }));
}

#[test]
fn test_mismatched_layer_crs_fails_before_grid_build() {
    let region = montreal_like_region();
    let layer = FacilityLayer {
        crs: Crs::web_mercator(),
        facilities: vec![Facility::new(0, "elsewhere", Point::new(0.0, 0.0))],
    };

    let err = distance_surface(&region, None, &layer, GridSpec::default()).unwrap_err();
    assert!(matches!(err, IsoreachError::CrsMismatch { .. }));
}
