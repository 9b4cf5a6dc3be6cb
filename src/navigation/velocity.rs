//! Velocity and clock drift estimation
use log::debug;
use nalgebra::{DMatrix, DVector, Matrix4, MatrixXx4, Vector3, Vector4};

use crate::{
    cfg::SolverOpts, constants::SPEED_OF_LIGHT_M_S, error::Error,
    navigation::normal_matrix_inverse,
};

/// Velocity solver input, for one vehicle
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RangeRateObservation {
    /// Vehicle velocity in m.s⁻¹ ECEF
    pub velocity_m_s: Vector3<f64>,
    /// Pseudo range rate (m.s⁻¹), corrected for the onboard clock drift
    pub range_rate_m_s: f64,
}

/// [VelocitySolver] output
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct VelocitySolution {
    /// Velocity in m.s⁻¹ ECEF
    pub velocity_m_s: Vector3<f64>,
    /// Clock drift, as a range rate (m.s⁻¹)
    pub drift_m_s: f64,
}

impl VelocitySolution {
    /// Relative (dimensionless) clock drift (s.s⁻¹)
    pub fn relative_drift(&self) -> f64 {
        self.drift_m_s / SPEED_OF_LIGHT_M_S
    }
}

/// [VelocitySolver] estimates [vx, vy, vz, d] in a single linear
/// least squares step. Range rates are linear in that state, once
/// the geometry is known: the rows of the geometry matrix
/// formed by the position solver are reused as is.
pub struct VelocitySolver<'a> {
    opts: &'a SolverOpts,
}

impl<'a> VelocitySolver<'a> {
    /// Creates a new [VelocitySolver]
    pub fn new(opts: &'a SolverOpts) -> Self {
        Self { opts }
    }

    /// Resolves [VelocitySolution].
    /// ## Input
    /// - geometry: H matrix of the converged position solution
    /// - weights: one weight per row of H
    /// - observations: one [RangeRateObservation] per row of H
    pub fn resolve(
        &self,
        geometry: &MatrixXx4<f64>,
        weights: &DVector<f64>,
        observations: &[RangeRateObservation],
    ) -> Result<VelocitySolution, Error> {
        let size = observations.len();
        if geometry.nrows() != size || weights.len() != size {
            return Err(Error::DimensionMismatch {
                rows: geometry.nrows(),
                weights: weights.len(),
                observations: size,
            });
        }

        // ρ̇ = -(v_sv - v_rx).g + d  <=>  ρ̇ + g.v_sv = g.v_rx + d
        let mut y = DVector::<f64>::zeros(size);

        for (i, obs) in observations.iter().enumerate() {
            let g = Vector3::new(geometry[(i, 0)], geometry[(i, 1)], geometry[(i, 2)]);
            y[i] = obs.range_rate_m_s + g.dot(&obs.velocity_m_s);
        }

        let w = DMatrix::<f64>::from_diagonal(weights);
        let ht_w = geometry.transpose() * w;
        let ht_w_h: Matrix4<f64> = &ht_w * geometry;
        let ht_w_h_inv = normal_matrix_inverse(&ht_w_h, self.opts.min_rcond)?;

        let eta: Vector4<f64> = ht_w_h_inv * (ht_w * y);

        if !eta.iter().all(|x| x.is_finite()) {
            return Err(Error::MatrixInversion);
        }

        debug!(
            "velocity=({:.3}, {:.3}, {:.3})m/s drift={:.3}m/s",
            eta[0], eta[1], eta[2], eta[3]
        );

        Ok(VelocitySolution {
            velocity_m_s: Vector3::new(eta[0], eta[1], eta[2]),
            drift_m_s: eta[3],
        })
    }
}
