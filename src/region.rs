//! Query regions and their cell coverings.
//!
//! A region is the query shape handed to the store: a disc around a center
//! point or a latitude/longitude rectangle spanning two corners. Both shapes
//! reduce to the same capability, a bounded set of cells whose union contains
//! the region, which the store turns into key range scans.

use s2::cap::Cap;
use s2::cellid::CellID;
use s2::latlng::LatLng;
use s2::point::Point;
use s2::rect::Rect;
use s2::region::RegionCoverer;
use smallvec::SmallVec;

use crate::cell::validate_lat_lng;
use crate::error::{CellStoreError, Result};
use crate::types::CovererParams;

/// Circumference of the reference sphere in meters, used to convert a radius
/// in meters into a fraction of the sphere.
const EARTH_CIRCUMFERENCE_METERS: f64 = 40_075_017.0;

/// Cells covering one query region. Inline capacity matches the default
/// covering budget.
pub type Covering = SmallVec<[CellID; 8]>;

/// A query shape to be covered by cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Region {
    /// Disc of `radius_m` meters around a center point.
    Circle { lat: f64, lng: f64, radius_m: f64 },
    /// Minimal latitude/longitude rectangle spanning two corners.
    Rect {
        lat1: f64,
        lng1: f64,
        lat2: f64,
        lng2: f64,
    },
}

impl Region {
    /// Disc of `radius_m` meters around `(lat, lng)`.
    pub fn circle(lat: f64, lng: f64, radius_m: f64) -> Self {
        Region::Circle { lat, lng, radius_m }
    }

    /// Rectangle spanning the corners `(lat1, lng1)` and `(lat2, lng2)`.
    /// Corner order does not matter.
    pub fn rect(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> Self {
        Region::Rect {
            lat1,
            lng1,
            lat2,
            lng2,
        }
    }

    /// Checks the region's coordinates and dimensions.
    ///
    /// A zero radius or a zero-area rectangle passes: both degenerate to a
    /// point query. Negative or non-finite radii and out-of-range corners
    /// are rejected.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Region::Circle { lat, lng, radius_m } => {
                validate_lat_lng(lat, lng)?;
                if !radius_m.is_finite() || radius_m < 0.0 {
                    return Err(CellStoreError::InvalidRegion(format!(
                        "radius must be finite and non-negative, got {}",
                        radius_m
                    )));
                }
                Ok(())
            }
            Region::Rect {
                lat1,
                lng1,
                lat2,
                lng2,
            } => {
                validate_lat_lng(lat1, lng1)?;
                validate_lat_lng(lat2, lng2)?;
                Ok(())
            }
        }
    }

    /// Computes the cells covering this region within the given budget.
    ///
    /// The covering is an over-approximation: its union always contains the
    /// region, and with a tight cell budget it may extend well past it. It
    /// never excludes a cell containing a point of the region; callers that
    /// need exact boundaries post-filter the scan results. Zero cells for a
    /// valid region is reported as [`CellStoreError::EmptyCovering`].
    pub fn covering_cells(&self, params: &CovererParams) -> Result<Covering> {
        self.validate()?;

        let coverer = RegionCoverer {
            min_level: params.min_level,
            max_level: params.max_level,
            level_mod: 1,
            max_cells: params.max_cells,
        };

        let union = match *self {
            Region::Circle { lat, lng, radius_m } => {
                let center = Point::from(&LatLng::from_degrees(lat, lng));
                let cap = Cap::from_center_area(&center, radial_area(radius_m));
                coverer.covering(&cap)
            }
            Region::Rect {
                lat1,
                lng1,
                lat2,
                lng2,
            } => {
                let rect = Rect::from_point_pair(
                    &LatLng::from_degrees(lat1, lng1),
                    &LatLng::from_degrees(lat2, lng2),
                );
                coverer.covering(&rect)
            }
        };

        let cells: Covering = union.0.into_iter().collect();
        if cells.is_empty() {
            return Err(CellStoreError::EmptyCovering);
        }
        Ok(cells)
    }
}

/// Solid-angle area of a disc of `radius_m` meters on the reference sphere.
fn radial_area(radius_m: f64) -> f64 {
    let r = (radius_m / EARTH_CIRCUMFERENCE_METERS) * std::f64::consts::PI * 2.0;
    std::f64::consts::PI * (r * r)
}
