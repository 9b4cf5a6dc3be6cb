#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod modeling;
mod solver;

pub use modeling::Modeling;
pub use solver::{ElevationMappingFunction, SolverOpts, WeightMatrix};

const fn default_kepler_tolerance() -> f64 {
    1.0E-12
}

const fn default_kepler_iterations() -> usize {
    10
}

const fn default_transit_refinements() -> usize {
    1
}

const fn default_gps_week_rollovers() -> u32 {
    2
}

/// Kepler's equation solver settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeplerOpts {
    /// Newton-Raphson stops once |ΔE| falls below this value (radians)
    #[cfg_attr(feature = "serde", serde(default = "default_kepler_tolerance"))]
    pub tolerance_rad: f64,
    /// Newton-Raphson iteration cap. Reaching
    /// it disqualifies the vehicle for this epoch.
    #[cfg_attr(feature = "serde", serde(default = "default_kepler_iterations"))]
    pub max_iterations: usize,
}

impl Default for KeplerOpts {
    fn default() -> Self {
        Self {
            tolerance_rad: default_kepler_tolerance(),
            max_iterations: default_kepler_iterations(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Physical [Modeling] used to improve the accuracy of solution.
    #[cfg_attr(feature = "serde", serde(default))]
    pub modeling: Modeling,
    /// Solver customization
    #[cfg_attr(feature = "serde", serde(default))]
    pub solver: SolverOpts,
    /// Kepler's equation solver
    #[cfg_attr(feature = "serde", serde(default))]
    pub kepler: KeplerOpts,
    /// Number of additional orbit propagation passes, where the signal
    /// transit time (and the Earth rotation it implies) is refined
    /// from the position solved in the previous pass.
    /// Only effective if [Modeling.earth_rotation] is turned on.
    #[cfg_attr(feature = "serde", serde(default = "default_transit_refinements"))]
    pub transit_refinements: usize,
    /// Apriori position, in ECEF [m], used to initialize the
    /// solver when no previous solution exists. Earth center otherwise.
    #[cfg_attr(feature = "serde", serde(default))]
    pub apriori_ecef_m: Option<(f64, f64, f64)>,
    /// Number of 1024 weeks rollovers to apply to the
    /// truncated GPS week counter.
    #[cfg_attr(feature = "serde", serde(default = "default_gps_week_rollovers"))]
    pub gps_week_rollovers: u32,
    /// Minimal SV elevation angle (degrees) for an SV to contribute to the solution.
    /// Can only apply once a position is known (apriori or previous solution).
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_sv_elev: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            modeling: Modeling::default(),
            solver: SolverOpts::default(),
            kepler: KeplerOpts::default(),
            transit_refinements: default_transit_refinements(),
            apriori_ecef_m: None,
            gps_week_rollovers: default_gps_week_rollovers(),
            min_sv_elev: None,
        }
    }
}

impl Config {
    /// Returns [Config] for static receivers held at known coordinates,
    /// expressed in meters ECEF. You can then customize [Self] as you will.
    pub fn static_preset(apriori_ecef_m: (f64, f64, f64)) -> Self {
        let mut s = Self::default();
        s.apriori_ecef_m = Some(apriori_ecef_m);
        s.min_sv_elev = Some(10.0);
        s.solver.gdop_threshold = Some(6.0);
        s.solver.weight_matrix = Some(WeightMatrix::MappingFunction(
            ElevationMappingFunction {
                a: 0.3,
                b: 3.0,
                c: 10.0,
            },
        ));
        s
    }

    /// Returns [Config] for roaming receivers, without apriori knowledge.
    /// You can then customize [Self] as you will.
    pub fn dynamic_preset() -> Self {
        let mut s = Self::default();
        s.min_sv_elev = Some(5.0);
        s.solver.gdop_threshold = Some(10.0);
        s
    }
}
