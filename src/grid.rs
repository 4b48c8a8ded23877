//! Grid generation over a bounding box.
//!
//! Points are emitted latitude-major, longitude-minor, with both coordinates
//! rounded to six decimal places so they compare and sort stably.

use serde::{Deserialize, Serialize};

/// Miles per degree of latitude (and of longitude at the equator).
pub const MILES_PER_DEGREE: f64 = 69.0;

/// Decimal places kept on every generated coordinate.
pub const COORD_DECIMALS: i32 = 6;

/// Coverage area in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    pub fn validate(&self) -> Result<(), String> {
        for (name, lat) in [("north", self.north), ("south", self.south)] {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(format!("bounding box {name} ({lat}) must be within [-90, 90]"));
            }
        }
        for (name, lon) in [("east", self.east), ("west", self.west)] {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(format!("bounding box {name} ({lon}) must be within [-180, 180]"));
            }
        }
        if !(self.north > self.south) {
            return Err(format!(
                "bounding box north ({}) must be greater than south ({})",
                self.north, self.south
            ));
        }
        if !(self.east > self.west) {
            return Err(format!(
                "bounding box east ({}) must be greater than west ({})",
                self.east, self.west
            ));
        }
        Ok(())
    }

    pub fn mid_lat(&self) -> f64 {
        (self.north + self.south) / 2.0
    }

    pub fn center(&self) -> GridPoint {
        GridPoint::new(self.mid_lat(), (self.east + self.west) / 2.0)
    }
}

/// Angular step between neighbouring grid points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpacing {
    pub step_lat: f64,
    pub step_lon: f64,
}

impl GridSpacing {
    pub fn new(step_lat: f64, step_lon: f64) -> Self {
        Self { step_lat, step_lon }
    }

    /// Derive degree steps from a physical spacing in miles.
    ///
    /// A degree of longitude shrinks with `cos(latitude)`, so the longitude
    /// step is scaled at `reference_lat` to keep columns roughly the same
    /// physical width as rows.
    pub fn from_miles(spacing_miles: f64, reference_lat: f64) -> Self {
        let lon_scale = MILES_PER_DEGREE * reference_lat.to_radians().cos();
        Self {
            step_lat: spacing_miles / MILES_PER_DEGREE,
            step_lon: spacing_miles / lon_scale,
        }
    }
}

/// A candidate sample location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GridPoint {
    /// Builds a point with both coordinates rounded to [`COORD_DECIMALS`].
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat: round_coord(lat),
            lon: round_coord(lon),
        }
    }
}

impl std::fmt::Display for GridPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

pub fn round_coord(value: f64) -> f64 {
    let scale = 10f64.powi(COORD_DECIMALS);
    (value * scale).round() / scale
}

/// Generate the grid covering `bbox` at `spacing`.
///
/// Both bounds are inclusive. Steps accumulate in floating point, so the last
/// row or column may land slightly past the edge; that extra sample is kept.
pub fn generate(bbox: &BoundingBox, spacing: &GridSpacing) -> Vec<GridPoint> {
    let mut points = Vec::new();
    let mut lat = bbox.south;
    while lat <= bbox.north {
        let mut lon = bbox.west;
        while lon <= bbox.east {
            points.push(GridPoint::new(lat, lon));
            lon += spacing.step_lon;
        }
        lat += spacing.step_lat;
    }
    points
}
