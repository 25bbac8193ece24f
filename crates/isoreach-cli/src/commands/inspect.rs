//! `isoreach inspect` - summarize an input layer file

use std::collections::BTreeMap;
use std::fs;

use anyhow::{bail, Context, Result};
use geojson::GeoJson;
use isoreach_core::formats::facilities;
use isoreach_core::models::Crs;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::InspectArgs;
use crate::output::OutputWriter;

#[derive(Debug, Tabled, Serialize)]
struct GeometryRow {
    geometry: String,
    features: usize,
}

#[derive(Debug, Tabled, Serialize)]
struct FacilityRow {
    id: String,
    name: String,
    x: f64,
    y: f64,
}

pub fn run(args: InspectArgs, writer: &OutputWriter) -> Result<()> {
    let extension = args
        .path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "csv" | "txt" => inspect_csv(&args, writer),
        "json" | "geojson" => inspect_geojson(&args, writer),
        other => bail!("unsupported file extension '{other}'"),
    }
}

fn inspect_csv(args: &InspectArgs, writer: &OutputWriter) -> Result<()> {
    // The CRS is irrelevant for a listing; coordinates are shown raw
    let layer = facilities::read_facility_csv(&args.path, &Crs::default())
        .with_context(|| format!("reading {}", args.path.display()))?;

    writer.info(format!("facility CSV with {} rows", layer.len()));
    let rows: Vec<FacilityRow> = layer
        .facilities
        .iter()
        .map(|f| FacilityRow {
            id: f.id.to_string(),
            name: f.name.clone(),
            x: f.location.x(),
            y: f.location.y(),
        })
        .collect();
    writer.rows(&rows);
    Ok(())
}

fn inspect_geojson(args: &InspectArgs, writer: &OutputWriter) -> Result<()> {
    let content = fs::read_to_string(&args.path)
        .with_context(|| format!("reading {}", args.path.display()))?;
    let geojson: GeoJson = content.parse().context("parsing GeoJSON")?;

    let GeoJson::FeatureCollection(fc) = geojson else {
        bail!("expected a FeatureCollection");
    };

    let crs_name = fc
        .foreign_members
        .as_ref()
        .and_then(|fm| fm.get("crs"))
        .and_then(|crs| crs.get("properties"))
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unspecified (EPSG:4326 assumed)")
        .to_string();
    writer.info(format!(
        "FeatureCollection with {} features, CRS {}",
        fc.features.len(),
        crs_name
    ));

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for feature in &fc.features {
        let kind = feature
            .geometry
            .as_ref()
            .map(|g| g.value.type_name().to_string())
            .unwrap_or_else(|| "none".to_string());
        *counts.entry(kind).or_default() += 1;
    }
    let rows: Vec<GeometryRow> = counts
        .into_iter()
        .map(|(geometry, features)| GeometryRow { geometry, features })
        .collect();
    writer.rows(&rows);
    Ok(())
}
