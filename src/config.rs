//! Run configuration.
//!
//! Every knob of a run lives in [`EtaGridConfig`], which is passed explicitly
//! into the pipeline. Defaults describe the Fluvanna County, VA coverage area
//! and its two Charlottesville hospitals.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EtaGridError, Result};
use crate::grid::{BoundingBox, GridPoint, GridSpacing};

/// A fixed target facility. Order in the config is the column order of
/// every result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    /// Field name used for this destination in the output table.
    pub key: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Destination {
    pub fn new(key: impl Into<String>, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            lat,
            lon,
        }
    }

    pub fn location(&self) -> GridPoint {
        GridPoint::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtaGridConfig {
    /// Base address of the OSRM-compatible routing service.
    pub service_url: String,
    /// Routing profile segment of the table URL.
    pub profile: String,
    pub bbox: BoundingBox,
    /// Target physical distance between neighbouring grid points.
    pub spacing_miles: f64,
    pub destinations: Vec<Destination>,
    /// Maximum number of sources per table request.
    pub batch_size: usize,
    pub request_timeout_secs: u64,
    pub probe_timeout_secs: u64,
    pub output_path: PathBuf,
    /// Name of the constant the table is bound to in the output file.
    pub const_name: String,
}

impl Default for EtaGridConfig {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:5000".to_string(),
            profile: "driving".to_string(),
            // Fluvanna County plus the corridor north to the hospitals
            bbox: BoundingBox {
                north: 38.05,
                south: 37.77,
                east: -78.20,
                west: -78.55,
            },
            spacing_miles: 0.125,
            destinations: vec![
                Destination::new("uva", "UVA Medical Center", 38.030610, -78.497376),
                Destination::new("mjh", "Martha Jefferson", 38.021012, -78.444239),
            ],
            batch_size: 100,
            request_timeout_secs: 30,
            probe_timeout_secs: 5,
            output_path: PathBuf::from("data/eta-grid.js"),
            const_name: "ETA_GRID".to_string(),
        }
    }
}

impl EtaGridConfig {
    /// Load a JSON config file. Keys missing from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    pub fn spacing(&self) -> GridSpacing {
        GridSpacing::from_miles(self.spacing_miles, self.bbox.mid_lat())
    }

    pub fn validate(&self) -> Result<()> {
        self.bbox.validate().map_err(EtaGridError::InvalidConfig)?;

        if !(self.spacing_miles > 0.0) || !self.spacing_miles.is_finite() {
            return Err(invalid(format!(
                "spacing_miles must be a positive number, got {}",
                self.spacing_miles
            )));
        }
        let spacing = self.spacing();
        if !is_positive_step(spacing.step_lat) || !is_positive_step(spacing.step_lon) {
            return Err(invalid(format!(
                "grid steps must be finite and positive, got {} lat / {} lon",
                spacing.step_lat, spacing.step_lon
            )));
        }
        if self.batch_size == 0 {
            return Err(invalid("batch_size must be at least 1"));
        }
        if self.request_timeout_secs == 0 || self.probe_timeout_secs == 0 {
            return Err(invalid("timeouts must be at least one second"));
        }
        if self.destinations.is_empty() {
            return Err(invalid("at least one destination is required"));
        }

        let mut keys = HashSet::new();
        for dest in &self.destinations {
            if dest.key.is_empty() {
                return Err(invalid(format!("destination {:?} has an empty key", dest.name)));
            }
            if dest.key == "lat" || dest.key == "lon" {
                return Err(invalid(format!(
                    "destination key {:?} collides with a coordinate field",
                    dest.key
                )));
            }
            if !keys.insert(dest.key.as_str()) {
                return Err(invalid(format!("duplicate destination key {:?}", dest.key)));
            }
        }

        if self.const_name.is_empty() {
            return Err(invalid("const_name must not be empty"));
        }

        Ok(())
    }
}

fn is_positive_step(step: f64) -> bool {
    step.is_finite() && step > 0.0
}

fn invalid(msg: impl Into<String>) -> EtaGridError {
    EtaGridError::InvalidConfig(msg.into())
}
