//! Human and JSON output, plus GeoJSON serialization of access tables.

use console::style;
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject};
use isoreach_core::models::{AccessTable, Band, CellRecord, DistanceUnit};
use isoreach_geo::classify::Classification;
use serde::Serialize;
use serde_json::json;
use std::fmt::Display;
use tabled::{settings::Style, Table, Tabled};

/// Output format mode
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Human,
    Json,
}

pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self {
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Human
            },
        }
    }

    pub fn success(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                println!("{} {}", style("✓").green().bold(), message);
            }
            OutputFormat::Json => {
                let output = json!({
                    "status": "success",
                    "message": message.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&output).expect("valid json"));
            }
        }
    }

    pub fn info(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                println!("{} {}", style("ℹ").blue().bold(), message);
            }
            OutputFormat::Json => {
                let output = json!({
                    "status": "info",
                    "message": message.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&output).expect("valid json"));
            }
        }
    }

    /// Print a row set as a table (human) or a JSON array
    pub fn rows<T: Tabled + Serialize>(&self, rows: &[T]) {
        match self.format {
            OutputFormat::Human => {
                println!("{}", Table::new(rows).with(Style::rounded()));
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(rows).expect("valid json"));
            }
        }
    }
}

/// One class summary line
#[derive(Debug, Tabled, Serialize)]
pub struct ClassRow {
    pub class: String,
    pub cells: usize,
}

/// Summary rows for a classified distance surface
pub fn class_rows(classification: &Classification, unit: DistanceUnit) -> Vec<ClassRow> {
    let labels = edge_labels(&classification.edges, unit.suffix());
    classification
        .histogram()
        .into_iter()
        .zip(labels)
        .map(|(cells, class)| ClassRow { class, cells })
        .collect()
}

/// Summary rows for a band surface; `minutes` are the sorted ring times
pub fn band_rows(table: &AccessTable<Band>, minutes: &[u32]) -> Vec<ClassRow> {
    let labels = band_labels(minutes);
    let mut counts = vec![0usize; minutes.len() + 1];
    for record in &table.records {
        counts[(record.minimum.0 - 1) as usize] += 1;
    }
    counts
        .into_iter()
        .zip(labels)
        .map(|(cells, class)| ClassRow { class, cells })
        .collect()
}

/// Interval labels for class edges: "<= 5 km", "5 - 10 km", "> 10 km"
pub fn edge_labels(edges: &[f64], suffix: &str) -> Vec<String> {
    let mut labels = Vec::with_capacity(edges.len() + 1);
    for (ix, edge) in edges.iter().enumerate() {
        if ix == 0 {
            labels.push(format!("<= {edge} {suffix}"));
        } else {
            labels.push(format!("{} - {} {}", edges[ix - 1], edge, suffix));
        }
    }
    match edges.last() {
        Some(last) => labels.push(format!("> {last} {suffix}")),
        None => labels.push("all".to_string()),
    }
    labels
}

/// Interval labels for time bands: "0 - 5 min", ..., "40 + min"
pub fn band_labels(minutes: &[u32]) -> Vec<String> {
    let mut labels = Vec::with_capacity(minutes.len() + 1);
    let mut previous = 0;
    for &m in minutes {
        labels.push(format!("{previous} - {m} min"));
        previous = m;
    }
    labels.push(format!("{previous} + min"));
    labels
}

/// Serialize a distance table as a GeoJSON FeatureCollection.
///
/// The reduced minimum is emitted in meters and in the reporting unit;
/// per-facility distances stay in meters under a `dist` object keyed by
/// facility id.
pub fn distance_table_to_geojson(
    table: &AccessTable<f64>,
    unit: DistanceUnit,
    classification: Option<&Classification>,
) -> GeoJson {
    let features = table
        .records
        .iter()
        .enumerate()
        .map(|(ix, record)| {
            let mut properties = base_properties(record);
            properties.insert(
                "dist".to_string(),
                serde_json::Value::Object(
                    record
                        .per_facility
                        .iter()
                        .map(|(id, d)| (id.to_string(), json!(*d)))
                        .collect(),
                ),
            );
            properties.insert("dist_min".to_string(), json!(record.minimum));
            properties.insert(
                format!("dist_min_{}", unit.suffix()),
                json!(unit.from_meters(record.minimum)),
            );
            if let Some(classification) = classification {
                properties.insert("class".to_string(), json!(classification.assignments[ix]));
            }
            feature(record, properties)
        })
        .collect();

    collection(features, table.crs.epsg)
}

/// Serialize a band table as a GeoJSON FeatureCollection
pub fn band_table_to_geojson(table: &AccessTable<Band>, minutes: &[u32]) -> GeoJson {
    let labels = band_labels(minutes);
    let features = table
        .records
        .iter()
        .map(|record| {
            let mut properties = base_properties(record);
            properties.insert(
                "band".to_string(),
                serde_json::Value::Object(
                    record
                        .per_facility
                        .iter()
                        .map(|(id, band)| (id.to_string(), json!(band.0)))
                        .collect(),
                ),
            );
            properties.insert("band_min".to_string(), json!(record.minimum.0));
            properties.insert(
                "band_label".to_string(),
                json!(labels[(record.minimum.0 - 1) as usize]),
            );
            feature(record, properties)
        })
        .collect();

    collection(features, table.crs.epsg)
}

fn base_properties<V>(record: &CellRecord<V>) -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert("cell".to_string(), json!(record.cell));
    properties.insert("nearest".to_string(), json!(record.nearest.0));
    properties
}

fn feature<V>(record: &CellRecord<V>, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(&record.geometry))),
        id: Some(geojson::feature::Id::Number(record.cell.into())),
        properties: Some(properties),
        foreign_members: None,
    }
}

fn collection(features: Vec<Feature>, epsg: u32) -> GeoJson {
    let mut foreign_members = JsonObject::new();
    foreign_members.insert(
        "crs".to_string(),
        json!({ "type": "name", "properties": { "name": format!("EPSG:{epsg}") } }),
    );
    GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(foreign_members),
    })
}
