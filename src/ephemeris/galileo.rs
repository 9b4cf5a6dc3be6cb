//! Galileo I/NAV navigation message (Galileo OS SIS ICD)
use std::f64::consts::PI;

use crate::{
    constants::ConstellationParameters,
    ephemeris::{ClockPolynomial, Ephemeris, KeplerianElements, Perturbations},
    prelude::{Constellation, SV},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Decoded Galileo I/NAV words 1 to 5 (E1-B).
/// Angles are expressed in semicircles, as broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GalileoNavigation {
    /// PRN number
    pub prn: u8,
    /// GST week number (12 bit)
    pub week: u16,
    /// Issue of data, navigation
    pub iodnav: u16,
    /// Signal in space accuracy index
    pub sisa: u8,
    /// E1-B signal health status (2 bit), 0 means signal OK
    pub e1b_hs: u8,
    /// E1-B data validity status, true means "working without guarantee"
    pub e1b_dvs: bool,
    /// E1/E5a broadcast group delay (s)
    pub bgd_e1_e5a: f64,
    /// E1/E5b broadcast group delay (s)
    pub bgd_e1_e5b: f64,
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

impl GalileoNavigation {
    /// [SV] broadcasting this message
    pub fn sv(&self) -> SV {
        SV::new(Constellation::Galileo, self.prn)
    }

    /// Signal OK and navigation data valid
    pub fn is_healthy(&self) -> bool {
        self.e1b_hs == 0 && !self.e1b_dvs
    }

    /// GST week counter. 4096 weeks will only roll over in 2078.
    pub fn week(&self) -> u32 {
        u32::from(self.week)
    }

    /// Maps this frame to [Ephemeris]. E1 single frequency
    /// users are to apply the E1/E5b group delay.
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
            group_delay_s: self.bgd_e1_e5b,
            parameters: ConstellationParameters::GALILEO,
        }
    }
}
