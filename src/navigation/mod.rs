use log::trace;
use nalgebra::{DMatrix, DVector, Matrix1x4, Matrix4, MatrixXx4, Vector3, Vector4};

use crate::{cfg::SolverOpts, constants::MIN_SV, error::Error};

pub mod dop;
pub mod velocity;

/// Position solver input, for one vehicle
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RangeObservation {
    /// Vehicle position in meters ECEF
    pub position_m: Vector3<f64>,
    /// Pseudo range (m)
    pub pseudorange_m: f64,
    /// Weight of this observation
    pub weight: f64,
}

impl RangeObservation {
    /// Creates a new unit weight [RangeObservation]
    pub fn new(position_m: Vector3<f64>, pseudorange_m: f64) -> Self {
        Self {
            position_m,
            pseudorange_m,
            weight: 1.0,
        }
    }

    /// Copies and returns [RangeObservation] with updated weight
    pub fn with_weight(&self, weight: f64) -> Self {
        let mut s = *self;
        s.weight = weight;
        s
    }
}

/// Linearized contribution of one vehicle: one row of the geometry matrix
/// and the associated prefit residual.
pub(crate) struct MatrixContribution {
    pub h: Matrix1x4<f64>,
    pub b: f64,
}

impl MatrixContribution {
    /// Linearizes pseudo range = |sv - x| + clock around this state.
    fn new(x: &Vector4<f64>, obs: &RangeObservation) -> Result<Self, Error> {
        let rx = Vector3::new(x[0], x[1], x[2]);
        let los = rx - obs.position_m;
        let rho = los.norm();

        if !rho.is_finite() || rho < 1.0 {
            return Err(Error::IllConditionedGeometry);
        }

        let los = los / rho;

        Ok(Self {
            h: Matrix1x4::new(los[0], los[1], los[2], 1.0),
            b: obs.pseudorange_m - rho - x[3],
        })
    }
}

/// Inverts a normal matrix, unless it is ill conditioned.
pub(crate) fn normal_matrix_inverse(
    ht_h: &Matrix4<f64>,
    min_rcond: f64,
) -> Result<Matrix4<f64>, Error> {
    let eigen = ht_h.symmetric_eigenvalues();
    let (min, max) = (eigen.min(), eigen.max());

    if !min.is_finite() || !max.is_finite() || max <= 0.0 || min / max < min_rcond {
        trace!("ill conditioned normal matrix: eigenvalues {}", eigen.transpose());
        return Err(Error::IllConditionedGeometry);
    }

    let cholesky = ht_h.cholesky().ok_or(Error::MatrixInversion)?;
    Ok(cholesky.inverse())
}

/// Converged [PositionSolver] output
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSolution {
    /// [x, y, z, b]: position in meters ECEF and clock term (m)
    pub state: Vector4<f64>,
    /// Geometry matrix at the converged state, one row per vehicle
    pub geometry: MatrixXx4<f64>,
    /// Postfit residuals (m)
    pub residuals: DVector<f64>,
    /// Number of iterations that were needed
    pub iterations: usize,
}

impl PositionSolution {
    /// Position in meters ECEF
    pub fn position_m(&self) -> Vector3<f64> {
        Vector3::new(self.state[0], self.state[1], self.state[2])
    }

    /// Clock term (m)
    pub fn clock_bias_m(&self) -> f64 {
        self.state[3]
    }

    /// Root mean square of the postfit residuals (m)
    pub fn residual_rms_m(&self) -> f64 {
        let n = self.residuals.len();
        if n == 0 {
            return 0.0;
        }
        (self.residuals.norm_squared() / n as f64).sqrt()
    }
}

/// [PositionSolver] estimates [x, y, z, b] from pseudo ranges,
/// by Gauss-Newton (weighted) least squares.
pub struct PositionSolver<'a> {
    opts: &'a SolverOpts,
}

impl<'a> PositionSolver<'a> {
    /// Creates a new [PositionSolver]
    pub fn new(opts: &'a SolverOpts) -> Self {
        Self { opts }
    }

    /// Forms the geometry matrix and prefit residuals at this state.
    fn linearize(
        x: &Vector4<f64>,
        observations: &[RangeObservation],
    ) -> Result<(MatrixXx4<f64>, DVector<f64>), Error> {
        let size = observations.len();
        let mut b = DVector::<f64>::zeros(size);
        let mut h = MatrixXx4::<f64>::zeros(size);

        for (i, obs) in observations.iter().enumerate() {
            let contribution = MatrixContribution::new(x, obs)?;
            h.set_row(i, &contribution.h);
            b[i] = contribution.b;
        }

        Ok((h, b))
    }

    /// Iterates from this initial state until convergence.
    /// ## Input
    /// - observations: one [RangeObservation] per vehicle, 4 at least
    /// - initial: [x, y, z, b] warm start
    /// ## Returns
    /// - [PositionSolution], [Error]
    pub fn resolve(
        &self,
        observations: &[RangeObservation],
        initial: Vector4<f64>,
    ) -> Result<PositionSolution, Error> {
        if observations.len() < MIN_SV {
            return Err(Error::NotEnoughCandidates(observations.len()));
        }

        let w = DMatrix::<f64>::from_diagonal(&DVector::from_iterator(
            observations.len(),
            observations.iter().map(|obs| obs.weight),
        ));

        let mut x = initial;

        for iter in 0..self.opts.max_iterations {
            let (h, b) = Self::linearize(&x, observations)?;

            let ht_w = h.transpose() * &w;
            let ht_w_h: Matrix4<f64> = &ht_w * &h;
            let ht_w_h_inv = normal_matrix_inverse(&ht_w_h, self.opts.min_rcond)?;

            let dx: Vector4<f64> = ht_w_h_inv * (ht_w * b);

            if !dx.iter().all(|dx| dx.is_finite()) {
                return Err(Error::PositionDivergence(iter + 1));
            }

            x += dx;

            trace!(
                "gauss-newton iter={} |dx|={:.6E}m state={}",
                iter,
                dx.norm(),
                x.transpose()
            );

            if dx.norm() < self.opts.convergence_m {
                let (geometry, residuals) = Self::linearize(&x, observations)?;
                return Ok(PositionSolution {
                    state: x,
                    geometry,
                    residuals,
                    iterations: iter + 1,
                });
            }
        }

        Err(Error::PositionDivergence(self.opts.max_iterations))
    }
}
