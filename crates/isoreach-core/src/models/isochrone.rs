//! Travel-time isochrones and the band values derived from them.

use super::crs::Crs;
use super::facility::FacilityId;
use geo::Polygon;
use serde::{Deserialize, Serialize};

/// One isochrone polygon: the area reachable from a facility within
/// `minutes`. Rings of the same facility are assumed nested by time
/// (a larger time fully contains a smaller one); this is a service
/// assumption, not separately verified.
#[derive(Debug, Clone)]
pub struct IsochroneRing {
    pub minutes: u32,
    pub polygon: Polygon<f64>,
}

/// The family of isochrone rings for one facility
#[derive(Debug, Clone)]
pub struct IsochroneSet {
    pub facility: FacilityId,
    pub rings: Vec<IsochroneRing>,
}

impl IsochroneSet {
    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// Rings ordered from largest to smallest time, the order the band
    /// countdown tests them in
    pub fn rings_descending(&self) -> Vec<&IsochroneRing> {
        let mut rings: Vec<&IsochroneRing> = self.rings.iter().collect();
        rings.sort_by(|a, b| b.minutes.cmp(&a.minutes));
        rings
    }

    /// Ring times sorted ascending, for labelling band intervals
    pub fn minutes_ascending(&self) -> Vec<u32> {
        let mut minutes: Vec<u32> = self.rings.iter().map(|r| r.minutes).collect();
        minutes.sort_unstable();
        minutes
    }
}

/// Per-facility isochrone sets sharing one CRS
#[derive(Debug, Clone)]
pub struct IsochroneLayer {
    pub crs: Crs,
    pub sets: Vec<IsochroneSet>,
}

impl IsochroneLayer {
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// A travel-time band: 1 is the shortest (best) band, counting up per
/// ring; `ring_count + 1` is the sentinel for "not reachable within the
/// largest queried time".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Band(pub u32);

impl Band {
    /// The sentinel band for a given ring count
    pub fn unreachable(ring_count: usize) -> Self {
        Band(ring_count as u32 + 1)
    }

    pub fn is_unreachable(&self, ring_count: usize) -> bool {
        *self == Self::unreachable(ring_count)
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
