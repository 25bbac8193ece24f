//! `isoreach time` - travel-time band surface

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use isoreach_core::formats::geojson;
use isoreach_geo::pipeline::{travel_time_surface, GridSpec};

use crate::cli::TimeArgs;
use crate::output::{band_rows, band_table_to_geojson, OutputWriter};

pub fn run(args: TimeArgs, config_path: Option<&Path>, writer: &OutputWriter) -> Result<()> {
    let config = super::job_config(config_path, &args.grid)?;
    config.validate()?;

    let region = geojson::read_region(&args.region)
        .with_context(|| format!("reading region {}", args.region.display()))?;
    let obstacles = args
        .obstacles
        .as_deref()
        .map(geojson::read_obstacles)
        .transpose()
        .context("reading obstacles")?;
    let isochrones = geojson::read_isochrones(&args.isochrones)
        .with_context(|| format!("reading isochrones {}", args.isochrones.display()))?;

    let spec = GridSpec {
        cell_side: config.cell_side.value,
        rounding_unit: config.rounding_unit.value,
    };
    let table = travel_time_surface(&region, obstacles.as_ref(), &isochrones, spec)?;
    writer.info(format!(
        "{} cells evaluated against {} isochrone families in {}",
        table.len(),
        isochrones.sets.len(),
        table.crs,
    ));

    // Ring counts are equal across facilities; label bands off the first
    let minutes = isochrones.sets[0].minutes_ascending();
    writer.rows(&band_rows(&table, &minutes));

    if let Some(path) = &args.output {
        let geojson = band_table_to_geojson(&table, &minutes);
        fs::write(path, geojson.to_string())
            .with_context(|| format!("writing {}", path.display()))?;
        writer.success(format!("wrote per-cell table to {}", path.display()));
    }

    Ok(())
}
