//! Routing service seam.
//!
//! The coordinator only talks to a [`TravelTimeProvider`], so tests can swap
//! the HTTP client for a scripted matrix.

use crate::config::Destination;
use crate::error::MatrixError;
use crate::grid::GridPoint;

/// Travel times indexed `[source][destination]` in seconds.
///
/// `None` means the service found no route for that pair.
pub type DurationMatrix = Vec<Vec<Option<f64>>>;

/// Provides a many-to-many travel time matrix.
pub trait TravelTimeProvider {
    /// Query travel times from every source to every destination.
    ///
    /// Rows follow `sources` order and columns follow `destinations` order.
    /// Any failure is reported as a single error with no partial data.
    fn query_matrix(
        &self,
        sources: &[GridPoint],
        destinations: &[Destination],
    ) -> Result<DurationMatrix, MatrixError>;

    /// Confirm the service answers at all.
    ///
    /// Only a missing response counts as failure; an error status is still a
    /// live service.
    fn probe(&self, at: GridPoint) -> Result<(), MatrixError>;
}
