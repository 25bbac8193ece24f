//! Facilities: the points the grid measures access to.

use super::crs::Crs;
use geo::Point;
use serde::{Deserialize, Serialize};

/// Stable facility identity, assigned by input order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FacilityId(pub u32);

impl std::fmt::Display for FacilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// A single facility with a point location in a projected CRS
#[derive(Debug, Clone)]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    /// Street address from the source file, carried through for display.
    /// Never geocoded here; the location always comes from coordinates.
    pub address: Option<String>,
    pub location: Point<f64>,
}

impl Facility {
    pub fn new(id: u32, name: impl Into<String>, location: Point<f64>) -> Self {
        Self {
            id: FacilityId(id),
            name: name.into(),
            address: None,
            location,
        }
    }
}

/// An ordered set of facilities sharing one CRS
#[derive(Debug, Clone)]
pub struct FacilityLayer {
    pub crs: Crs,
    pub facilities: Vec<Facility>,
}

impl FacilityLayer {
    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    /// Look up a facility by id
    pub fn get(&self, id: FacilityId) -> Option<&Facility> {
        self.facilities.iter().find(|f| f.id == id)
    }
}
