//! GeoJSON layer readers.
//!
//! Each reader parses one FeatureCollection into a typed layer. The CRS
//! comes from the collection's `crs` foreign member when present and
//! defaults to EPSG:4326 otherwise (the evaluator will then reject the
//! layer as geographic, which is the honest failure).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use geojson::{Feature, FeatureCollection, GeoJson};

use crate::error::{IsoreachError, Result};
use crate::models::crs::Crs;
use crate::models::facility::{Facility, FacilityId, FacilityLayer};
use crate::models::isochrone::{IsochroneLayer, IsochroneRing, IsochroneSet};
use crate::models::region::{ObstacleLayer, Region};

/// Read the study-area boundary: the collection's single polygon feature
pub fn read_region(path: &Path) -> Result<Region> {
    let (fc, crs) = parse_collection(path)?;
    let polygons = collect_polygons(&fc)?;
    let mut it = polygons.into_iter();
    match (it.next(), it.next()) {
        (Some(boundary), None) => Ok(Region::new(crs, boundary)),
        (None, _) => Err(validation(path, "expected one polygon feature, found none")),
        (Some(_), Some(_)) => Err(validation(
            path,
            &format!("expected one polygon feature, found {}", 2 + it.count()),
        )),
    }
}

/// Read obstacle polygons (Polygon and MultiPolygon features, flattened)
pub fn read_obstacles(path: &Path) -> Result<ObstacleLayer> {
    let (fc, crs) = parse_collection(path)?;
    let polygons = collect_polygons(&fc)?;
    if polygons.is_empty() {
        return Err(IsoreachError::EmptyLayer { layer: path.display().to_string() });
    }
    Ok(ObstacleLayer::new(crs, polygons))
}

/// Read facilities from point features.
///
/// Ids follow feature order; a `name` property is used when present.
pub fn read_facility_points(path: &Path) -> Result<FacilityLayer> {
    let (fc, crs) = parse_collection(path)?;

    let mut facilities = Vec::new();
    for (ix, feature) in fc.features.iter().enumerate() {
        let geometry = to_geo_geometry(feature, path)?;
        let point = match geometry {
            geo::Geometry::Point(p) => p,
            other => {
                return Err(validation(
                    path,
                    &format!("feature {ix}: expected Point, found {}", kind_of(&other)),
                ))
            }
        };
        let mut facility = Facility::new(
            ix as u32,
            prop_str(feature, "name").unwrap_or_else(|| format!("facility {ix:02}")),
            point,
        );
        facility.address = prop_str(feature, "address");
        facilities.push(facility);
    }

    if facilities.is_empty() {
        return Err(IsoreachError::EmptyLayer { layer: path.display().to_string() });
    }
    Ok(FacilityLayer { crs, facilities })
}

/// Read per-facility isochrone rings.
///
/// Every feature needs a polygonal geometry, a `group_index` property
/// naming its facility, and a time as either `minutes` or a `value` in
/// seconds (the shape routing services emit).
pub fn read_isochrones(path: &Path) -> Result<IsochroneLayer> {
    let (fc, crs) = parse_collection(path)?;

    let mut grouped: BTreeMap<u32, Vec<IsochroneRing>> = BTreeMap::new();
    for (ix, feature) in fc.features.iter().enumerate() {
        let geometry = to_geo_geometry(feature, path)?;
        let polygon = match geometry {
            geo::Geometry::Polygon(p) => p,
            other => {
                return Err(validation(
                    path,
                    &format!("feature {ix}: expected Polygon, found {}", kind_of(&other)),
                ))
            }
        };
        let group = prop_u64(feature, "group_index").ok_or_else(|| {
            validation(path, &format!("feature {ix}: missing 'group_index' property"))
        })? as u32;
        let minutes = ring_minutes(feature).ok_or_else(|| {
            validation(path, &format!("feature {ix}: missing 'minutes' or 'value' property"))
        })?;
        grouped.entry(group).or_default().push(IsochroneRing { minutes, polygon });
    }

    if grouped.is_empty() {
        return Err(IsoreachError::EmptyLayer { layer: path.display().to_string() });
    }

    let sets = grouped
        .into_iter()
        .map(|(group, rings)| IsochroneSet { facility: FacilityId(group), rings })
        .collect();
    Ok(IsochroneLayer { crs, sets })
}

fn ring_minutes(feature: &Feature) -> Option<u32> {
    if let Some(minutes) = prop_u64(feature, "minutes") {
        return Some(minutes as u32);
    }
    // Routing services tag isochrones with a 'value' in seconds
    prop_f64(feature, "value").map(|seconds| (seconds / 60.0).round() as u32)
}

/// Parse a file as a FeatureCollection and extract its CRS
fn parse_collection(path: &Path) -> Result<(FeatureCollection, Crs)> {
    let content = fs::read_to_string(path).map_err(IsoreachError::Io)?;
    let geojson: GeoJson = content.parse().map_err(|e| {
        validation(path, &format!("failed to parse GeoJSON: {e}"))
    })?;
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            let epsg = fc
                .foreign_members
                .as_ref()
                .and_then(|fm| fm.get("crs"))
                .and_then(extract_epsg_from_crs)
                .unwrap_or(4326);
            Ok((fc, Crs::from_epsg(epsg)))
        }
        _ => Err(validation(path, "expected a FeatureCollection")),
    }
}

/// Extract an EPSG code from a GeoJSON `crs` member
fn extract_epsg_from_crs(crs: &serde_json::Value) -> Option<u32> {
    let name = crs.get("properties")?.get("name")?.as_str()?;
    if name == "urn:ogc:def:crs:OGC:1.3:CRS84" {
        return Some(4326);
    }
    // "EPSG:32188" or "urn:ogc:def:crs:EPSG::32188"
    name.rsplit(':').next()?.parse().ok()
}

fn to_geo_geometry(feature: &Feature, path: &Path) -> Result<geo::Geometry<f64>> {
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| validation(path, "feature without geometry"))?;
    geo::Geometry::try_from(geometry.value.clone())
        .map_err(|e| validation(path, &format!("unsupported geometry: {e}")))
}

fn collect_polygons(fc: &FeatureCollection) -> Result<Vec<geo::Polygon<f64>>> {
    let mut polygons = Vec::new();
    for (ix, feature) in fc.features.iter().enumerate() {
        let Some(geometry) = feature.geometry.as_ref() else {
            tracing::warn!(feature = ix, "skipping feature without geometry");
            continue;
        };
        match geo::Geometry::try_from(geometry.value.clone()) {
            Ok(geo::Geometry::Polygon(p)) => polygons.push(p),
            Ok(geo::Geometry::MultiPolygon(mp)) => polygons.extend(mp.0),
            Ok(other) => {
                tracing::warn!(
                    feature = ix,
                    kind = kind_of(&other),
                    "skipping non-polygonal feature"
                );
            }
            Err(e) => {
                tracing::warn!(
                    feature = ix,
                    error = %e,
                    "skipping feature with unconvertible geometry"
                );
            }
        }
    }
    Ok(polygons)
}

fn kind_of(geometry: &geo::Geometry<f64>) -> &'static str {
    match geometry {
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::Line(_) => "Line",
        geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::Polygon(_) => "Polygon",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
        geo::Geometry::MultiPolygon(_) => "MultiPolygon",
        geo::Geometry::GeometryCollection(_) => "GeometryCollection",
        geo::Geometry::Rect(_) => "Rect",
        geo::Geometry::Triangle(_) => "Triangle",
    }
}

fn prop_str(feature: &Feature, key: &str) -> Option<String> {
    feature
        .properties
        .as_ref()?
        .get(key)?
        .as_str()
        .map(str::to_string)
}

fn prop_u64(feature: &Feature, key: &str) -> Option<u64> {
    feature.properties.as_ref()?.get(key)?.as_u64()
}

fn prop_f64(feature: &Feature, key: &str) -> Option<f64> {
    feature.properties.as_ref()?.get(key)?.as_f64()
}

fn validation(path: &Path, reason: &str) -> IsoreachError {
    IsoreachError::FormatValidation {
        format: format!("GeoJSON ({})", path.display()),
        reason: reason.to_string(),
    }
}
