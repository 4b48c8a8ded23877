//! Sequential batch driver.
//!
//! Splits the grid into contiguous batches, queries the provider one batch at
//! a time and pairs every source point with its matrix row. A failed batch
//! never stops the run; its points are marked unreachable instead.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::config::Destination;
use crate::error::MatrixError;
use crate::grid::GridPoint;
use crate::traits::TravelTimeProvider;

/// Why a point has no usable travel times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnreachableReason {
    /// The service answered but found no route to any destination.
    NoRoute,
    /// The query for the point's batch failed.
    QueryFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointOutcome {
    /// Matrix row for this point, one cell per destination.
    Reached(Vec<Option<f64>>),
    Unreachable(UnreachableReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointResult {
    pub point: GridPoint,
    pub outcome: PointOutcome,
}

/// Progress after one batch, for operator feedback.
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress {
    pub batch: usize,
    pub total_batches: usize,
    pub processed: usize,
    pub total_points: usize,
    pub elapsed: Duration,
}

impl BatchProgress {
    pub fn percent(&self) -> f64 {
        if self.total_points == 0 {
            return 100.0;
        }
        (self.processed as f64 / self.total_points as f64 * 100.0).min(100.0)
    }
}

/// Contiguous batches of at most `batch_size` points, in generation order.
pub fn partition(points: &[GridPoint], batch_size: usize) -> std::slice::Chunks<'_, GridPoint> {
    points.chunks(batch_size.max(1))
}

pub fn batch_count(total_points: usize, batch_size: usize) -> usize {
    total_points.div_ceil(batch_size.max(1))
}

/// Query every batch in order and pair each point with its outcome.
///
/// The returned sequence has exactly one entry per input point, in input
/// order.
pub fn run<P: TravelTimeProvider>(
    points: &[GridPoint],
    destinations: &[Destination],
    batch_size: usize,
    provider: &P,
) -> Vec<PointResult> {
    run_with_progress(points, destinations, batch_size, provider, |progress| {
        info!(
            "Batch {}/{} done ({:.0}%) [{:.1}s elapsed]",
            progress.batch,
            progress.total_batches,
            progress.percent(),
            progress.elapsed.as_secs_f64()
        );
    })
}

/// Like [`run`], calling `on_progress` after each batch completes.
pub fn run_with_progress<P, F>(
    points: &[GridPoint],
    destinations: &[Destination],
    batch_size: usize,
    provider: &P,
    mut on_progress: F,
) -> Vec<PointResult>
where
    P: TravelTimeProvider,
    F: FnMut(BatchProgress),
{
    let total_batches = batch_count(points.len(), batch_size);
    let start = Instant::now();
    let mut results = Vec::with_capacity(points.len());

    for (index, batch) in partition(points, batch_size).enumerate() {
        let queried = provider
            .query_matrix(batch, destinations)
            .and_then(|matrix| {
                if matrix.len() == batch.len() {
                    Ok(matrix)
                } else {
                    Err(MatrixError::Malformed(format!(
                        "expected {} rows, got {}",
                        batch.len(),
                        matrix.len()
                    )))
                }
            });

        match queried {
            Ok(matrix) => {
                for (point, row) in batch.iter().zip(matrix) {
                    results.push(PointResult {
                        point: *point,
                        outcome: PointOutcome::Reached(row),
                    });
                }
            }
            Err(err) => {
                warn!(
                    batch = index + 1,
                    points = batch.len(),
                    error = %err,
                    "batch query failed; marking its points unreachable"
                );
                results.extend(batch.iter().map(|point| PointResult {
                    point: *point,
                    outcome: PointOutcome::Unreachable(UnreachableReason::QueryFailed),
                }));
            }
        }

        on_progress(BatchProgress {
            batch: index + 1,
            total_batches,
            processed: results.len(),
            total_points: points.len(),
            elapsed: start.elapsed(),
        });
    }

    results
}
