#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod candidate;
mod cfg;
mod constants;
mod ephemeris;
mod error;
mod navigation;
mod pseudorange;
mod satellite;
mod solutions;
mod solver;
mod time;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::{
        Config, ElevationMappingFunction, KeplerOpts, Modeling, SolverOpts, WeightMatrix,
    };
    pub use crate::constants::{ConstellationParameters, SPEED_OF_LIGHT_M_S, WEEK_SECONDS};
    pub use crate::ephemeris::{
        clock::CorrectedTime, galileo::GalileoNavigation, gps::GpsNavigation,
        kepler::SatPositionVelocity, ClockPolynomial, Ephemeris, KeplerianElements,
        NavigationMessage, Perturbations,
    };
    pub use crate::error::Error;
    pub use crate::navigation::{
        dop::DilutionOfPrecision,
        velocity::{RangeRateObservation, VelocitySolution, VelocitySolver},
        PositionSolution, PositionSolver, RangeObservation,
    };
    pub use crate::pseudorange::{Pseudorange, PseudorangeFormer};
    pub use crate::satellite::SatelliteState;
    pub use crate::solutions::{validator::InvalidationCause, PVTSolution, SatInfo};
    pub use crate::solver::Solver;
    pub use crate::time::{absolute_epoch, epoch_origin, TimeOfWeek};
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale, Unit};
    pub use nalgebra::{Vector3, Vector4};
}
