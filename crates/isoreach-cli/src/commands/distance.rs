//! `isoreach distance` - straight-line distance surface

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use isoreach_core::config::ClassifyConfig;
use isoreach_core::formats::{facilities, geojson};
use isoreach_geo::classify::{classify, Scheme};
use isoreach_geo::pipeline::{distance_surface, GridSpec};

use crate::cli::DistanceArgs;
use crate::output::{class_rows, distance_table_to_geojson, OutputWriter};

pub fn run(args: DistanceArgs, config_path: Option<&Path>, writer: &OutputWriter) -> Result<()> {
    let config = super::job_config(config_path, &args.grid)?;
    config.validate()?;
    let crs = config.crs();

    let region = geojson::read_region(&args.region)
        .with_context(|| format!("reading region {}", args.region.display()))?;
    let obstacles = args
        .obstacles
        .as_deref()
        .map(geojson::read_obstacles)
        .transpose()
        .context("reading obstacles")?;

    let facility_layer = if is_csv(&args.facilities) {
        facilities::read_facility_csv(&args.facilities, &crs)
    } else {
        geojson::read_facility_points(&args.facilities)
    }
    .with_context(|| format!("reading facilities {}", args.facilities.display()))?;

    let spec = GridSpec {
        cell_side: config.cell_side.value,
        rounding_unit: config.rounding_unit.value,
    };
    let table = distance_surface(&region, obstacles.as_ref(), &facility_layer, spec)?;
    writer.info(format!(
        "{} cells evaluated against {} facilities in {}",
        table.len(),
        facility_layer.len(),
        table.crs,
    ));

    // Classify the reduced minima in the reporting unit
    let unit = config.distance_unit.value;
    let minima: Vec<f64> = table.minima().iter().map(|m| unit.from_meters(*m)).collect();
    let scheme = select_scheme(args.bins, args.classes, &config.classify, &minima);
    let classification = classify(&minima, &scheme)?;
    writer.rows(&class_rows(&classification, unit));

    if let Some(path) = &args.output {
        let geojson = distance_table_to_geojson(&table, unit, Some(&classification));
        fs::write(path, geojson.to_string())
            .with_context(|| format!("writing {}", path.display()))?;
        writer.success(format!("wrote per-cell table to {}", path.display()));
    }

    Ok(())
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv") || e.eq_ignore_ascii_case("txt"))
}

/// Pick the classification scheme. Either CLI flag beats either file
/// value, mirroring the precedence the config layer enforces.
fn select_scheme(
    bins: Option<Vec<f64>>,
    classes: Option<usize>,
    file: &ClassifyConfig,
    minima: &[f64],
) -> Scheme {
    if let Some(edges) = bins {
        Scheme::UserDefined { edges }
    } else if let Some(classes) = classes {
        Scheme::NaturalBreaks { classes }
    } else if let Some(edges) = file.bins.clone() {
        Scheme::UserDefined { edges }
    } else if let Some(classes) = file.classes {
        Scheme::NaturalBreaks { classes }
    } else {
        Scheme::NaturalBreaks { classes: default_classes(minima) }
    }
}

/// At most five classes, never more than the series has distinct values
fn default_classes(values: &[f64]) -> usize {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted.len().clamp(1, 5)
}
