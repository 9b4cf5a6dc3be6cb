use crate::prelude::Constellation;

/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Duration of one week, in seconds
pub const WEEK_SECONDS: f64 = 604_800.0;

/// Half a week, in seconds
pub(crate) const HALF_WEEK_SECONDS: f64 = WEEK_SECONDS / 2.0;

/// Minimal number of vehicles to resolve [x, y, z, dt]
pub(crate) const MIN_SV: usize = 4;

/// Signal time of flight from a MEO vehicle at zenith,
/// used as first guess before any position is known.
pub(crate) const NOMINAL_TRANSIT_S: f64 = 0.0675;

/// Physical constants and signal characteristics, per [Constellation].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ConstellationParameters {
    /// [Constellation] these parameters apply to
    pub constellation: Constellation,
    /// Earth gravitational constant (m³.s⁻²) as used by the control segment
    pub gm_m3_s2: f64,
    /// Earth angular velocity (rad.s⁻¹)
    pub earth_rotation_rad_s: f64,
    /// Relativistic clock correction factor: -2.sqrt(gm)/c², in s.m^-1/2
    pub dtr_f: f64,
    /// Primary ranging code chipping rate (Hz)
    pub chipping_rate_hz: f64,
    /// Primary code period (s)
    pub code_period_s: f64,
    /// Primary carrier frequency (Hz)
    pub carrier_frequency_hz: f64,
    /// Maximal |t - toe| for an ephemeris to remain valid (s)
    pub max_dtoe_s: f64,
    /// Week counter modulo, as broadcast
    pub week_modulo: u32,
}

impl ConstellationParameters {
    /// GPS (IS-GPS-200) L1 C/A parameters
    pub const GPS: Self = Self {
        constellation: Constellation::GPS,
        gm_m3_s2: 3.986005E14,
        earth_rotation_rad_s: 7.2921151467E-5,
        dtr_f: -4.442807633E-10,
        chipping_rate_hz: 1.023E6,
        code_period_s: 1.0E-3,
        carrier_frequency_hz: 1575.42E6,
        max_dtoe_s: 4.0 * 3600.0,
        week_modulo: 1024,
    };

    /// Galileo (OS-SIS-ICD) E1-B parameters
    pub const GALILEO: Self = Self {
        constellation: Constellation::Galileo,
        gm_m3_s2: 3.986004418E14,
        earth_rotation_rad_s: 7.2921151467E-5,
        dtr_f: -4.442807309E-10,
        chipping_rate_hz: 1.023E6,
        code_period_s: 4.0E-3,
        carrier_frequency_hz: 1575.42E6,
        max_dtoe_s: 4.0 * 3600.0,
        week_modulo: 4096,
    };

    /// Returns [ConstellationParameters] for supported [Constellation]s
    pub fn from_constellation(constellation: Constellation) -> Option<Self> {
        match constellation {
            Constellation::GPS => Some(Self::GPS),
            Constellation::Galileo => Some(Self::GALILEO),
            _ => None,
        }
    }

    /// Carrier wavelength (m)
    pub fn wavelength_m(&self) -> f64 {
        SPEED_OF_LIGHT_M_S / self.carrier_frequency_hz
    }
}
