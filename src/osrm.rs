//! OSRM HTTP adapter for travel time matrices.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::config::{Destination, EtaGridConfig};
use crate::error::MatrixError;
use crate::grid::GridPoint;
use crate::traits::{DurationMatrix, TravelTimeProvider};

/// Success sentinel in the `code` field of an OSRM response.
const OSRM_OK: &str = "Ok";

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
    pub probe_timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 30,
            probe_timeout_secs: 5,
        }
    }
}

impl From<&EtaGridConfig> for OsrmConfig {
    fn from(config: &EtaGridConfig) -> Self {
        Self {
            base_url: config.service_url.trim_end_matches('/').to_string(),
            profile: config.profile.clone(),
            timeout_secs: config.request_timeout_secs,
            probe_timeout_secs: config.probe_timeout_secs,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Table URL for `sources` followed by `destinations`, selecting each
    /// group by index so the matrix comes back `sources × destinations`.
    pub fn table_url(&self, sources: &[GridPoint], destinations: &[Destination]) -> String {
        let coords = sources
            .iter()
            .copied()
            .chain(destinations.iter().map(Destination::location))
            .map(|p| format!("{:.6},{:.6}", p.lon, p.lat))
            .collect::<Vec<_>>()
            .join(";");

        let n_src = sources.len();
        let src_indices = join_indices(0..n_src);
        let dst_indices = join_indices(n_src..n_src + destinations.len());

        format!(
            "{}/table/v1/{}/{}?sources={}&destinations={}",
            self.config.base_url, self.config.profile, coords, src_indices, dst_indices
        )
    }
}

fn join_indices(range: std::ops::Range<usize>) -> String {
    range.map(|i| i.to_string()).collect::<Vec<_>>().join(";")
}

impl TravelTimeProvider for OsrmClient {
    fn query_matrix(
        &self,
        sources: &[GridPoint],
        destinations: &[Destination],
    ) -> Result<DurationMatrix, MatrixError> {
        if sources.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.table_url(sources, destinations);
        debug!(
            sources = sources.len(),
            destinations = destinations.len(),
            "querying OSRM table"
        );

        let response = self.client.get(url).send()?;
        let status = response.status();
        let body = response.text()?;

        let parsed = match serde_json::from_str::<OsrmTableResponse>(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(MatrixError::HttpStatus {
                    status: status.as_u16(),
                });
            }
            Err(err) => return Err(MatrixError::Malformed(err.to_string())),
        };

        if parsed.code != OSRM_OK {
            return Err(MatrixError::Status {
                code: parsed.code,
                message: parsed.message,
            });
        }
        if !status.is_success() {
            return Err(MatrixError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let durations = parsed
            .durations
            .ok_or_else(|| MatrixError::Malformed("missing durations".to_string()))?;
        check_shape(&durations, sources.len(), destinations.len())?;

        Ok(durations)
    }

    fn probe(&self, at: GridPoint) -> Result<(), MatrixError> {
        let coord = format!("{:.6},{:.6}", at.lon, at.lat);
        let url = format!(
            "{}/table/v1/{}/{};{}",
            self.config.base_url, self.config.profile, coord, coord
        );

        let response = self
            .client
            .get(url)
            .timeout(Duration::from_secs(self.config.probe_timeout_secs))
            .send()?;
        debug!(status = %response.status(), "OSRM probe answered");

        Ok(())
    }
}

fn check_shape(durations: &DurationMatrix, rows: usize, cols: usize) -> Result<(), MatrixError> {
    if durations.len() != rows {
        return Err(MatrixError::Malformed(format!(
            "expected {} rows, got {}",
            rows,
            durations.len()
        )));
    }
    if let Some((i, row)) = durations.iter().enumerate().find(|(_, row)| row.len() != cols) {
        return Err(MatrixError::Malformed(format!(
            "row {} has {} columns, expected {}",
            i,
            row.len(),
            cols
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    code: String,
    message: Option<String>,
    durations: Option<DurationMatrix>,
}
