//! Error types for the Voronoi engine.
//!
//! Per the propagation policy, the only caller-visible failure is
//! [`VoronoiError`]. Every other geometric edge case (a cell whose polygon
//! cannot be closed, an edge whose clip rejects entirely, a circle event
//! whose arc already vanished in a co-event run) is absorbed internally and
//! logged via the `log` facade rather than surfaced as an `Err`.

use thiserror::Error;

/// Failure modes visible to a caller of [`crate::compute`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoronoiError {
    /// The input site set was empty.
    #[error("cannot compute a Voronoi diagram over an empty site set")]
    EmptyInput,

    /// The bounding box did not satisfy `min.x < max.x && min.y < max.y`.
    #[error("bounding box is degenerate: min must be strictly less than max")]
    DegenerateBoundingBox,
}
