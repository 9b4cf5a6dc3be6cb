//! PVT Solutions
use std::collections::HashMap;

use map_3d::{ecef2aer, ecef2geodetic, rad2deg, Ellipsoid};

use crate::{
    constants::SPEED_OF_LIGHT_M_S,
    navigation::dop::DilutionOfPrecision,
    prelude::{Duration, Epoch, Vector3, SV},
};

pub mod validator;

/// Data attached to each individual SV that helped form the [PVTSolution].
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct SatInfo {
    /// Position at transmission time, in meters ECEF (frame at reception time)
    pub position_m: Vector3<f64>,
    /// Velocity at transmission time, in m.s⁻¹ ECEF
    pub velocity_m_s: Vector3<f64>,
    /// Corrected transmission time (seconds of week)
    pub corrected_tow_s: f64,
    /// Pseudo range that was used (m)
    pub pseudorange_m: f64,
    /// Accumulated carrier phase (cycles), as proposed
    pub carrier_phase_cycles: f64,
}

/// PVT Solution. [PVTSolution::default] is the unsolved state:
/// keep the latest [PVTSolution] and propose it on the next attempt,
/// for warm start and fallback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PVTSolution {
    /// Position in meters ECEF
    pub position_m: Vector3<f64>,
    /// Velocity in m.s⁻¹ ECEF
    pub velocity_m_s: Vector3<f64>,
    /// Clock term b (m): speed of light times the
    /// receiver clock offset, with opposite sign.
    pub clock_bias_m: f64,
    /// Absolute reception [Epoch], None until first resolved
    pub epoch: Option<Epoch>,
    /// Relative receiver clock drift (s.s⁻¹)
    pub clock_drift_s_s: f64,
    /// [DilutionOfPrecision], None until first resolved
    pub dop: Option<DilutionOfPrecision>,
    /// Root mean square of the postfit pseudo range residuals (m)
    pub residual_rms_m: f64,
    /// [SatInfo] per contributing [SV]
    pub sv: HashMap<SV, SatInfo>,
}

impl PVTSolution {
    /// True once this solution was actually resolved
    pub fn is_resolved(&self) -> bool {
        self.epoch.is_some()
    }

    /// Geodetic coordinates: latitude (rad), longitude (rad), altitude above ellipsoid (m)
    pub fn geodetic(&self) -> (f64, f64, f64) {
        let (x, y, z) = (self.position_m[0], self.position_m[1], self.position_m[2]);
        ecef2geodetic(x, y, z, Ellipsoid::WGS84)
    }

    /// Returns (azimuth, elevation) in degrees of this [SV] as seen from this solution,
    /// if it contributed.
    pub fn azimuth_elevation(&self, sv: SV) -> Option<(f64, f64)> {
        let info = self.sv.get(&sv)?;
        let (lat, lon, alt) = self.geodetic();
        let (x, y, z) = (info.position_m[0], info.position_m[1], info.position_m[2]);
        let (az, el, _) = ecef2aer(x, y, z, lat, lon, alt, Ellipsoid::WGS84);
        Some((rad2deg(az), rad2deg(el)))
    }

    /// Receiver clock offset
    pub fn clock_offset(&self) -> Duration {
        Duration::from_seconds(-self.clock_bias_m / SPEED_OF_LIGHT_M_S)
    }

    /// Receiver frequency offset (Hz) at this nominal frequency (Hz)
    pub fn frequency_offset_hz(&self, nominal_hz: f64) -> f64 {
        self.clock_drift_s_s * nominal_hz
    }

    /// Contributing [SV]s, sorted by PRN
    pub fn sv(&self) -> Vec<SV> {
        let mut sv = self.sv.keys().copied().collect::<Vec<_>>();
        sv.sort_by_key(|sv| sv.prn);
        sv
    }
}

impl std::fmt::Display for PVTSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let Some(epoch) = self.epoch else {
            return write!(f, "unresolved");
        };

        let (lat, lon, alt) = self.geodetic();

        write!(
            f,
            "{} lat={:.7}° lon={:.7}° alt={:.3}m v=({:.3}, {:.3}, {:.3})m/s dt={} drift={:.3E}s/s",
            epoch,
            rad2deg(lat),
            rad2deg(lon),
            alt,
            self.velocity_m_s[0],
            self.velocity_m_s[1],
            self.velocity_m_s[2],
            self.clock_offset(),
            self.clock_drift_s_s,
        )?;

        if let Some(dop) = self.dop {
            write!(f, " gdop={:.2}", dop.gdop)?;
        }

        write!(f, " nsv={}", self.sv.len())
    }
}
