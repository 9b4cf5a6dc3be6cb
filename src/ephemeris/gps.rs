//! GPS LNAV navigation message (IS-GPS-200)
use std::f64::consts::PI;

use crate::{
    constants::ConstellationParameters,
    ephemeris::{ClockPolynomial, Ephemeris, KeplerianElements, Perturbations},
    prelude::{Constellation, SV},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Decoded GPS LNAV subframes 1 to 3.
/// Angles are expressed in semicircles, as broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsNavigation {
    /// PRN number
    pub prn: u8,
    /// Truncated (10 bit) week number
    pub week: u16,
    /// SV accuracy index
    pub ura: u8,
    /// 6 bit SV health, 0 means all signals OK
    pub health: u8,
    /// Issue of data, clock
    pub iodc: u16,
    /// Issue of data, ephemeris
    pub iode: u8,
    /// L1/L2 group delay differential (s)
    pub tgd: f64,
    /// Clock data reference time (s)
    pub toc: f64,
    /// Clock bias (s)
    pub af0: f64,
    /// Clock drift (s.s⁻¹)
    pub af1: f64,
    /// Clock drift rate (s.s⁻²)
    pub af2: f64,
    /// Reference time of ephemeris (s)
    pub toe: f64,
    /// Square root of the semi major axis (m^1/2)
    pub sqrt_a: f64,
    /// Eccentricity
    pub e: f64,
    /// Inclination angle at reference time (semicircles)
    pub i0: f64,
    /// Rate of inclination angle (semicircles.s⁻¹)
    pub idot: f64,
    /// Longitude of ascending node at weekly epoch (semicircles)
    pub omega0: f64,
    /// Rate of right ascension (semicircles.s⁻¹)
    pub omega_dot: f64,
    /// Argument of perigee (semicircles)
    pub omega: f64,
    /// Mean anomaly at reference time (semicircles)
    pub m0: f64,
    /// Mean motion difference (semicircles.s⁻¹)
    pub dn: f64,
    /// Argument of latitude, cosine harmonic (rad)
    pub cuc: f64,
    /// Argument of latitude, sine harmonic (rad)
    pub cus: f64,
    /// Orbit radius, cosine harmonic (m)
    pub crc: f64,
    /// Orbit radius, sine harmonic (m)
    pub crs: f64,
    /// Inclination, cosine harmonic (rad)
    pub cic: f64,
    /// Inclination, sine harmonic (rad)
    pub cis: f64,
}

impl GpsNavigation {
    /// [SV] broadcasting this message
    pub fn sv(&self) -> SV {
        SV::new(Constellation::GPS, self.prn)
    }

    /// All signals OK
    pub fn is_healthy(&self) -> bool {
        self.health == 0
    }

    /// Returns the full GPS week counter. Truncated values are completed
    /// with said number of 1024 weeks rollovers.
    pub fn week(&self, rollovers: u32) -> u32 {
        let week = u32::from(self.week);
        let modulo = ConstellationParameters::GPS.week_modulo;
        if week < modulo {
            week + rollovers * modulo
        } else {
            week
        }
    }

    /// Maps this frame to [Ephemeris]
    pub fn ephemeris(&self) -> Ephemeris {
        Ephemeris {
            sv: self.sv(),
            keplerian: KeplerianElements {
                sqrt_a: self.sqrt_a,
                eccentricity: self.e,
                i0_rad: self.i0 * PI,
                omega0_rad: self.omega0 * PI,
                omega_rad: self.omega * PI,
                m0_rad: self.m0 * PI,
                toe_s: self.toe,
            },
            perturbations: Perturbations {
                dn_rad_s: self.dn * PI,
                idot_rad_s: self.idot * PI,
                omega_dot_rad_s: self.omega_dot * PI,
                cus_cuc_rad: (self.cus, self.cuc),
                cis_cic_rad: (self.cis, self.cic),
                crs_crc_m: (self.crs, self.crc),
            },
            clock: ClockPolynomial {
                toc_s: self.toc,
                bias_s: self.af0,
                drift_s_s: self.af1,
                drift_rate_s_s2: self.af2,
            },
            group_delay_s: self.tgd,
            parameters: ConstellationParameters::GPS,
        }
    }
}
