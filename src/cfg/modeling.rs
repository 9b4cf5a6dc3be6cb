#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

fn default_sv_clock() -> bool {
    true
}

fn default_group_delay() -> bool {
    false
}

fn default_earth_rot() -> bool {
    true
}

fn default_relativistic_clock() -> bool {
    true
}

/// Physical phenomena accounted for when resolving
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Modeling {
    /// Compensate for onboard clock offset to system time (+/- 100km)
    #[cfg_attr(feature = "serde", serde(default = "default_sv_clock"))]
    pub sv_clock_bias: bool,

    /// Compensate for onboard transmission delay (+/- 1m).
    /// Only meaningful to single frequency users of the primary signal.
    #[cfg_attr(feature = "serde", serde(default = "default_group_delay"))]
    pub sv_total_group_delay: bool,

    /// Compensate for relativistic effect on onboard clock (+/- 1m)
    #[cfg_attr(feature = "serde", serde(default = "default_relativistic_clock"))]
    pub relativistic_clock_bias: bool,

    /// Compensate for Earth rotation during signal propagation
    /// (static +5/+10m eastern error).
    #[cfg_attr(feature = "serde", serde(default = "default_earth_rot"))]
    pub earth_rotation: bool,
}

impl Default for Modeling {
    fn default() -> Self {
        Self {
            sv_clock_bias: default_sv_clock(),
            earth_rotation: default_earth_rot(),
            sv_total_group_delay: default_group_delay(),
            relativistic_clock_bias: default_relativistic_clock(),
        }
    }
}

impl Modeling {
    /// Defines a null [Modeling] structure where all physical
    /// perturbations and phenomena are not accounted for.
    /// This is not the default value! Use this for teaching
    /// purposes only.
    pub fn no_modeling() -> Modeling {
        Modeling {
            sv_clock_bias: false,
            sv_total_group_delay: false,
            relativistic_clock_bias: false,
            earth_rotation: false,
        }
    }
}
