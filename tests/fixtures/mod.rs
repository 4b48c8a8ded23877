//! Test fixtures for eta-grid.
//!
//! Provides a scripted routing provider, a wiremock OSRM stand-in, and small
//! grid configurations whose point counts are easy to reason about.

pub mod osrm_mock;

use std::cell::{Cell, RefCell};

use eta_grid::config::{Destination, EtaGridConfig};
use eta_grid::error::MatrixError;
use eta_grid::grid::{BoundingBox, GridPoint};
use eta_grid::traits::{DurationMatrix, TravelTimeProvider};

type RowFn = Box<dyn Fn(&GridPoint) -> Vec<Option<f64>>>;

/// Deterministic stand-in for the routing service.
///
/// Every source gets the row produced by `row_for`; batches listed in
/// `failing_batches` (1-based) fail as a whole.
pub struct ScriptedProvider {
    row_for: RowFn,
    failing_batches: Vec<usize>,
    reachable: bool,
    pub batch_sizes: RefCell<Vec<usize>>,
    pub probes: Cell<usize>,
}

impl ScriptedProvider {
    pub fn new(row_for: impl Fn(&GridPoint) -> Vec<Option<f64>> + 'static) -> Self {
        Self {
            row_for: Box::new(row_for),
            failing_batches: Vec::new(),
            reachable: true,
            batch_sizes: RefCell::new(Vec::new()),
            probes: Cell::new(0),
        }
    }

    /// Two destinations, durations derived from the point so runs are
    /// reproducible.
    pub fn distance_like() -> Self {
        Self::new(|p| {
            let base = (p.lat.abs() + p.lon.abs()) * 100.0;
            vec![Some(base + 0.4), Some(base + 30.6)]
        })
    }

    pub fn failing(mut self, batches: &[usize]) -> Self {
        self.failing_batches = batches.to_vec();
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }
}

impl TravelTimeProvider for ScriptedProvider {
    fn query_matrix(
        &self,
        sources: &[GridPoint],
        _destinations: &[Destination],
    ) -> Result<DurationMatrix, MatrixError> {
        self.batch_sizes.borrow_mut().push(sources.len());
        let call = self.batch_sizes.borrow().len();
        if self.failing_batches.contains(&call) {
            return Err(MatrixError::Malformed(format!("scripted failure on batch {call}")));
        }
        Ok(sources.iter().map(|p| (self.row_for)(p)).collect())
    }

    fn probe(&self, _at: GridPoint) -> Result<(), MatrixError> {
        self.probes.set(self.probes.get() + 1);
        if self.reachable {
            Ok(())
        } else {
            Err(MatrixError::Malformed("connection refused".to_string()))
        }
    }
}

pub fn two_destinations() -> Vec<Destination> {
    vec![
        Destination::new("uva", "UVA Medical Center", 38.030610, -78.497376),
        Destination::new("mjh", "Martha Jefferson", 38.021012, -78.444239),
    ]
}

/// A 3×3 grid on the equator: 17.25 miles is exactly a quarter degree there,
/// so the box spans two steps in each direction.
pub fn nine_point_config(batch_size: usize) -> EtaGridConfig {
    EtaGridConfig {
        bbox: BoundingBox {
            north: 0.25,
            south: -0.25,
            east: 10.5,
            west: 10.0,
        },
        spacing_miles: 17.25,
        destinations: two_destinations(),
        batch_size,
        ..EtaGridConfig::default()
    }
}
