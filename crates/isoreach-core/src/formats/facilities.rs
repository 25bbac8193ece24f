//! Facility CSV reader.
//!
//! The expected shape is the course's facility file: comma-separated with
//! `name, address, x, y` headers and optional whitespace after commas.
//! `longitude`/`latitude` are accepted as column aliases, but the values
//! are always interpreted in the caller's CRS; nothing is geocoded or
//! reprojected here.

use std::path::Path;

use geo::Point;
use serde::Deserialize;

use crate::error::{IsoreachError, Result};
use crate::models::crs::Crs;
use crate::models::facility::{Facility, FacilityId, FacilityLayer};

#[derive(Debug, Deserialize)]
struct FacilityRow {
    name: String,
    address: Option<String>,
    #[serde(alias = "longitude", alias = "lon")]
    x: f64,
    #[serde(alias = "latitude", alias = "lat")]
    y: f64,
}

/// Read a facility CSV, numbering facilities by row order
pub fn read_facility_csv(path: &Path, crs: &Crs) -> Result<FacilityLayer> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;

    let mut facilities = Vec::new();
    for (ix, row) in reader.deserialize::<FacilityRow>().enumerate() {
        let row = row.map_err(|e| csv_error(path, e))?;
        if !(row.x.is_finite() && row.y.is_finite()) {
            return Err(IsoreachError::FormatValidation {
                format: format!("CSV ({})", path.display()),
                reason: format!("row {}: non-finite coordinates", ix + 1),
            });
        }
        facilities.push(Facility {
            id: FacilityId(ix as u32),
            name: row.name,
            address: row.address,
            location: Point::new(row.x, row.y),
        });
    }

    if facilities.is_empty() {
        return Err(IsoreachError::EmptyLayer { layer: path.display().to_string() });
    }

    tracing::debug!(count = facilities.len(), path = %path.display(), "read facility CSV");
    Ok(FacilityLayer { crs: crs.clone(), facilities })
}

fn csv_error(path: &Path, e: csv::Error) -> IsoreachError {
    IsoreachError::FormatValidation {
        format: format!("CSV ({})", path.display()),
        reason: e.to_string(),
    }
}
