//! Solver configuration preset

use nalgebra::DVector;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const fn default_max_iterations() -> usize {
    20
}

const fn default_convergence_m() -> f64 {
    1.0E-6
}

const fn default_min_rcond() -> f64 {
    1.0E-10
}

fn default_gdop_threshold() -> Option<f64> {
    None
}

fn default_tdop_threshold() -> Option<f64> {
    None
}

fn default_weight_matrix() -> Option<WeightMatrix> {
    None
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElevationMappingFunction {
    /// a + b * e-elev/c
    pub a: f64,
    /// a + b * e-elev/c
    pub b: f64,
    /// a + b * e-elev/c
    pub c: f64,
}

impl Default for ElevationMappingFunction {
    fn default() -> Self {
        Self {
            a: 5.0,
            b: 0.0,
            c: 10.0,
        }
    }
}

impl ElevationMappingFunction {
    /// Evaluates the measurement standard deviation at this elevation (degrees)
    pub(crate) fn eval(&self, elev_deg: f64) -> f64 {
        self.a + self.b * (-elev_deg / self.c).exp()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WeightMatrix {
    /// a + b e-elev/c
    MappingFunction(ElevationMappingFunction),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverOpts {
    /// Maximal number of Gauss-Newton iterations
    #[cfg_attr(feature = "serde", serde(default = "default_max_iterations"))]
    pub max_iterations: usize,
    /// Iteration stops once the state correction norm
    /// falls below this value (meters).
    #[cfg_attr(feature = "serde", serde(default = "default_convergence_m"))]
    pub convergence_m: f64,
    /// Minimal reciprocal condition number of the normal matrix.
    /// Geometries below that are considered degenerate.
    #[cfg_attr(feature = "serde", serde(default = "default_min_rcond"))]
    pub min_rcond: f64,
    /// GDOP threshold to invalidate ongoing GDOP
    #[cfg_attr(feature = "serde", serde(default = "default_gdop_threshold"))]
    pub gdop_threshold: Option<f64>,
    /// TDOP threshold to invalidate ongoing TDOP
    #[cfg_attr(feature = "serde", serde(default = "default_tdop_threshold"))]
    pub tdop_threshold: Option<f64>,
    /// Weight Matrix. Identity when not defined, or
    /// while vehicle elevations are still unknown.
    #[cfg_attr(feature = "serde", serde(default = "default_weight_matrix"))]
    pub weight_matrix: Option<WeightMatrix>,
}

impl Default for SolverOpts {
    fn default() -> Self {
        Self {
            min_rcond: default_min_rcond(),
            max_iterations: default_max_iterations(),
            convergence_m: default_convergence_m(),
            weight_matrix: default_weight_matrix(),
            gdop_threshold: default_gdop_threshold(),
            tdop_threshold: default_tdop_threshold(),
        }
    }
}

impl SolverOpts {
    /*
     * form the diagonal weights to be used in the solving process
     */
    pub(crate) fn weights(&self, sv_elev_deg: &[Option<f64>]) -> DVector<f64> {
        let mut w = DVector::<f64>::from_element(sv_elev_deg.len(), 1.0);
        if let Some(WeightMatrix::MappingFunction(mapf)) = &self.weight_matrix {
            for (i, elev) in sv_elev_deg.iter().enumerate() {
                if let Some(elev) = elev {
                    let sigma = mapf.eval(*elev);
                    if sigma > 0.0 {
                        w[i] = 1.0 / sigma.powi(2);
                    }
                }
            }
        }
        w
    }
}
