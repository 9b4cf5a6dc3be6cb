use thiserror::Error;

use crate::{prelude::SV, solutions::validator::InvalidationCause};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Less than 4 [SatelliteState]s were proposed: no attempt.
    #[error("not enough satellites provided ({0}), 4 at least are required")]
    NotEnoughSatellites(usize),

    /// All [SatelliteState]s of one resolution attempt must
    /// belong to the same [Constellation].
    #[error("mixed constellations are not supported")]
    MixedConstellations,

    /// Not enough satellites remain once unhealthy vehicles have been dropped.
    #[error("not enough healthy satellites ({0})")]
    NotEnoughHealthySatellites(usize),

    /// Clock correction, orbit propagation or masking left us with
    /// too few vehicles to form the navigation matrix.
    #[error("not enough candidates to form a solution ({0})")]
    NotEnoughCandidates(usize),

    /// Kepler's equation did not converge within the iteration cap.
    #[error("{0}: kepler solver did not converge")]
    KeplerDivergence(SV),

    /// Physically invalid or outdated [Ephemeris].
    #[error("{0}: invalid ephemeris")]
    InvalidEphemeris(SV),

    /// Normal equations could not be inverted.
    #[error("failed to invert matrix")]
    MatrixInversion,

    /// Normal matrix is (close to) singular: satellites are
    /// aligned, coplanar or too close to one another.
    #[error("ill conditioned geometry")]
    IllConditionedGeometry,

    /// Gauss-Newton iteration cap was reached.
    #[error("position solver did not converge after {0} iterations")]
    PositionDivergence(usize),

    /// Reception epoch could not be assembled from the week counter
    /// and the resolved time of week (week counter underflow).
    #[error("invalid reception time (week {0})")]
    InvalidReceptionTime(u32),

    /// Inputs of one least squares problem do not have matching dimensions.
    #[error("dimension mismatch: {rows} rows, {weights} weights, {observations} observations")]
    DimensionMismatch {
        rows: usize,
        weights: usize,
        observations: usize,
    },

    /// Solution was formed but invalidated.
    #[error("invalidated solution: {0}")]
    InvalidatedSolution(InvalidationCause),
}

impl Error {
    /// Returns true when this [Error] only means "no solution this epoch".
    /// The previous solution should then be maintained.
    /// Other errors relate to invalid input.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::NotEnoughSatellites(_) | Self::MixedConstellations)
    }
}
