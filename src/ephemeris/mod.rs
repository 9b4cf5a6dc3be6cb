use crate::{
    cfg::Config,
    constants::ConstellationParameters,
    prelude::{Constellation, SV},
    time::wrap_half_week,
};

pub mod clock;
pub mod galileo;
pub mod gps;
pub mod kepler;

use galileo::GalileoNavigation;
use gps::GpsNavigation;

/// Keplerian elements of a broadcast [Ephemeris], in SI units.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct KeplerianElements {
    /// Square root of the semi major axis (m^1/2)
    pub sqrt_a: f64,
    /// Eccentricity
    pub eccentricity: f64,
    /// Inclination angle at reference time (rad)
    pub i0_rad: f64,
    /// Longitude of ascending node of orbit plane at weekly epoch (rad)
    pub omega0_rad: f64,
    /// Argument of perigee (rad)
    pub omega_rad: f64,
    /// Mean anomaly at reference time (rad)
    pub m0_rad: f64,
    /// Reference time of ephemeris (seconds of week)
    pub toe_s: f64,
}

/// Orbital perturbations of a broadcast [Ephemeris], in SI units.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Perturbations {
    /// Mean motion difference from computed value (rad.s⁻¹)
    pub dn_rad_s: f64,
    /// Rate of inclination angle (rad.s⁻¹)
    pub idot_rad_s: f64,
    /// Rate of right ascension (rad.s⁻¹)
    pub omega_dot_rad_s: f64,
    /// Argument of latitude harmonic correction terms (sine, cosine), in radians
    pub cus_cuc_rad: (f64, f64),
    /// Inclination harmonic correction terms (sine, cosine), in radians
    pub cis_cic_rad: (f64, f64),
    /// Orbit radius harmonic correction terms (sine, cosine), in meters
    pub crs_crc_m: (f64, f64),
}

/// Onboard clock correction polynomial
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ClockPolynomial {
    /// Clock data reference time (seconds of week)
    pub toc_s: f64,
    /// Clock bias (s)
    pub bias_s: f64,
    /// Clock drift (s.s⁻¹)
    pub drift_s_s: f64,
    /// Clock drift rate (s.s⁻²)
    pub drift_rate_s_s2: f64,
}

/// Constellation agnostic [Ephemeris], in SI units, tied to the
/// [ConstellationParameters] that apply. Obtained from [NavigationMessage::ephemeris].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ephemeris {
    /// [SV]
    pub sv: SV,
    /// [KeplerianElements]
    pub keplerian: KeplerianElements,
    /// [Perturbations]
    pub perturbations: Perturbations,
    /// [ClockPolynomial]
    pub clock: ClockPolynomial,
    /// Group delay of the primary signal (s)
    pub group_delay_s: f64,
    /// [ConstellationParameters] that apply
    pub parameters: ConstellationParameters,
}

impl Ephemeris {
    /// Returns seconds elapsed since time of ephemeris, absorbing week rollovers.
    pub fn t_k(&self, t_s: f64) -> f64 {
        wrap_half_week(t_s - self.keplerian.toe_s)
    }

    /// Returns true if this [Ephemeris] may still be used at this instant
    /// (seconds of week).
    pub fn is_valid(&self, t_s: f64) -> bool {
        self.t_k(t_s).abs() <= self.parameters.max_dtoe_s
    }
}

/// Decoded navigation message: the latest [Ephemeris] frame and
/// associated status, as published by the navigation message decoder.
/// Each variant maps its own layout and conventions onto [Ephemeris].
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationMessage {
    /// GPS LNAV message
    GPS(GpsNavigation),
    /// Galileo I/NAV message
    Galileo(GalileoNavigation),
}

impl From<GpsNavigation> for NavigationMessage {
    fn from(nav: GpsNavigation) -> Self {
        Self::GPS(nav)
    }
}

impl From<GalileoNavigation> for NavigationMessage {
    fn from(nav: GalileoNavigation) -> Self {
        Self::Galileo(nav)
    }
}

impl NavigationMessage {
    /// [Constellation] of this message
    pub fn constellation(&self) -> Constellation {
        self.parameters().constellation
    }

    /// [ConstellationParameters] that apply to this message
    pub fn parameters(&self) -> ConstellationParameters {
        match self {
            Self::GPS(_) => ConstellationParameters::GPS,
            Self::Galileo(_) => ConstellationParameters::GALILEO,
        }
    }

    /// Emitting [SV]
    pub fn sv(&self) -> SV {
        let prn = match self {
            Self::GPS(nav) => nav.prn,
            Self::Galileo(nav) => nav.prn,
        };
        SV::new(self.constellation(), prn)
    }

    /// Health status, as published by the navigation message.
    pub fn is_healthy(&self) -> bool {
        match self {
            Self::GPS(nav) => nav.is_healthy(),
            Self::Galileo(nav) => nav.is_healthy(),
        }
    }

    /// Returns the full week counter in the constellation's
    /// own week numbering, resolving GPS week rollovers.
    pub fn week(&self, cfg: &Config) -> u32 {
        match self {
            Self::GPS(nav) => nav.week(cfg.gps_week_rollovers),
            Self::Galileo(nav) => nav.week(),
        }
    }

    /// Maps this message to constellation agnostic [Ephemeris].
    pub fn ephemeris(&self) -> Ephemeris {
        match self {
            Self::GPS(nav) => nav.ephemeris(),
            Self::Galileo(nav) => nav.ephemeris(),
        }
    }
}
