//! Domain models shared across all isoreach crates

pub mod crs;
pub mod facility;
pub mod grid;
pub mod isochrone;
pub mod region;
pub mod table;

pub use crs::{Crs, DistanceUnit};
pub use facility::{Facility, FacilityId, FacilityLayer};
pub use grid::{Cell, Grid};
pub use isochrone::{Band, IsochroneLayer, IsochroneRing, IsochroneSet};
pub use region::{ObstacleLayer, Region};
pub use table::{AccessTable, CellRecord};
