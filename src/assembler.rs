//! Turns per-point outcomes into the final ETA table.

use crate::coordinator::{PointOutcome, PointResult, UnreachableReason};

/// Travel times from one reachable grid point, one entry per destination.
#[derive(Debug, Clone, PartialEq)]
pub struct EtaResult {
    pub lat: f64,
    pub lon: f64,
    /// Whole seconds, `None` where no route exists.
    pub durations: Vec<Option<u32>>,
}

/// Counts derived while assembling; never tracked separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableSummary {
    pub reachable: usize,
    pub unreachable: usize,
    pub no_route: usize,
    pub query_failed: usize,
}

/// Reachable points sorted by `(lat, lon)`, ready for binary search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EtaTable {
    pub rows: Vec<EtaResult>,
    pub summary: TableSummary,
}

impl EtaTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn assemble(results: Vec<PointResult>) -> EtaTable {
    let mut summary = TableSummary::default();
    let mut rows = Vec::with_capacity(results.len());

    for result in results {
        match to_eta(result) {
            Ok(eta) => rows.push(eta),
            Err(UnreachableReason::NoRoute) => summary.no_route += 1,
            Err(UnreachableReason::QueryFailed) => summary.query_failed += 1,
        }
    }

    rows.sort_by(|a, b| a.lat.total_cmp(&b.lat).then(a.lon.total_cmp(&b.lon)));

    summary.reachable = rows.len();
    summary.unreachable = summary.no_route + summary.query_failed;

    EtaTable { rows, summary }
}

fn to_eta(result: PointResult) -> Result<EtaResult, UnreachableReason> {
    let row = match result.outcome {
        PointOutcome::Reached(row) => row,
        PointOutcome::Unreachable(reason) => return Err(reason),
    };

    if row.iter().all(Option::is_none) {
        return Err(UnreachableReason::NoRoute);
    }

    Ok(EtaResult {
        lat: result.point.lat,
        lon: result.point.lon,
        durations: row.into_iter().map(|d| d.map(round_seconds)).collect(),
    })
}

/// Nearest whole second, ties to even.
fn round_seconds(seconds: f64) -> u32 {
    seconds.max(0.0).round_ties_even() as u32
}
