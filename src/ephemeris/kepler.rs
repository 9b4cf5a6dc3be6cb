//! Broadcast orbit propagation
use log::{debug, error};
use nalgebra::Vector3;

use crate::{cfg::KeplerOpts, ephemeris::Ephemeris, error::Error};

use std::f64::consts::PI;

/// ECEF state of one vehicle at one instant
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct SatPositionVelocity {
    /// Position in meters ECEF
    pub position_m: Vector3<f64>,
    /// Velocity in m.s⁻¹ ECEF
    pub velocity_m_s: Vector3<f64>,
}

/// Eccentric anomaly and its time derivative
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub(crate) struct EccentricAnomaly {
    /// E (rad)
    pub e_k: f64,
    /// dE/dt (rad.s⁻¹)
    pub e_k_dot: f64,
}

impl Ephemeris {
    /// Semi major axis (m)
    pub fn semi_major_axis_m(&self) -> f64 {
        self.keplerian.sqrt_a.powi(2)
    }

    /// Corrected mean motion (rad.s⁻¹)
    pub fn mean_motion_rad_s(&self) -> f64 {
        let a = self.semi_major_axis_m();
        (self.parameters.gm_m3_s2 / a.powi(3)).sqrt() + self.perturbations.dn_rad_s
    }

    /// Orbital period (s), from corrected mean motion
    pub fn orbital_period_s(&self) -> f64 {
        2.0 * PI / self.mean_motion_rad_s()
    }

    fn check_elements(&self) -> Result<(), Error> {
        let e = self.keplerian.eccentricity;
        let sqrt_a = self.keplerian.sqrt_a;
        if !(0.0..1.0).contains(&e) || !sqrt_a.is_finite() || sqrt_a <= 0.0 {
            return Err(Error::InvalidEphemeris(self.sv));
        }
        Ok(())
    }

    /// Solves Kepler's equation M = E - e.sin(E) at t (seconds of week)
    /// by Newton-Raphson iteration.
    pub(crate) fn eccentric_anomaly(
        &self,
        t_s: f64,
        opts: &KeplerOpts,
    ) -> Result<EccentricAnomaly, Error> {
        self.check_elements()?;

        let e = self.keplerian.eccentricity;
        let n = self.mean_motion_rad_s();
        let m_k = self.keplerian.m0_rad + n * self.t_k(t_s);

        let mut e_k = m_k;
        let mut converged = false;

        for _ in 0..opts.max_iterations {
            let de_k = (e_k - e * e_k.sin() - m_k) / (1.0 - e * e_k.cos());
            e_k -= de_k;
            if de_k.abs() < opts.tolerance_rad {
                converged = true;
                break;
            }
        }

        if !converged {
            error!("{}({:.3}) - kepler solver in failure", self.sv, t_s);
            return Err(Error::KeplerDivergence(self.sv));
        }

        Ok(EccentricAnomaly {
            e_k,
            e_k_dot: n / (1.0 - e * e_k.cos()),
        })
    }

    /// Propagates this [Ephemeris] to t (seconds of week, corrected transmission time).
    /// `transit_s` is the signal time of flight: the Earth rotation during
    /// that time is compensated, the resulting state is expressed in the ECEF frame
    /// at reception time. Velocity is obtained by analytical differentiation.
    pub fn propagate(
        &self,
        t_s: f64,
        transit_s: f64,
        opts: &KeplerOpts,
    ) -> Result<SatPositionVelocity, Error> {
        let EccentricAnomaly { e_k, e_k_dot } = self.eccentric_anomaly(t_s, opts)?;

        let e = self.keplerian.eccentricity;
        let a = self.semi_major_axis_m();
        let t_k = self.t_k(t_s);
        let omega_e = self.parameters.earth_rotation_rad_s;

        let (cus, cuc) = self.perturbations.cus_cuc_rad;
        let (cis, cic) = self.perturbations.cis_cic_rad;
        let (crs, crc) = self.perturbations.crs_crc_m;
        let (i0, idot) = (self.keplerian.i0_rad, self.perturbations.idot_rad_s);
        let (omega0, omega, omega_dot) = (
            self.keplerian.omega0_rad,
            self.keplerian.omega_rad,
            self.perturbations.omega_dot_rad_s,
        );

        let (sin_e_k, cos_e_k) = e_k.sin_cos();
        let one_e_cos = 1.0 - e * cos_e_k;
        let sqrt_1_e2 = (1.0 - e.powi(2)).sqrt();

        let v_k = (sqrt_1_e2 * sin_e_k).atan2(cos_e_k - e);
        let v_k_dot = e_k_dot * sqrt_1_e2 / one_e_cos;

        let phi = v_k + omega;
        let (sin_2phi, cos_2phi) = (2.0 * phi).sin_cos();

        // second harmonic corrections
        let u_k = phi + cuc * cos_2phi + cus * sin_2phi;
        let r_k = a * one_e_cos + crc * cos_2phi + crs * sin_2phi;
        let i_k = i0 + idot * t_k + cic * cos_2phi + cis * sin_2phi;

        let u_k_dot = v_k_dot * (1.0 + 2.0 * (cus * cos_2phi - cuc * sin_2phi));
        let r_k_dot = a * e * sin_e_k * e_k_dot + 2.0 * v_k_dot * (crs * cos_2phi - crc * sin_2phi);
        let i_k_dot = idot + 2.0 * v_k_dot * (cis * cos_2phi - cic * sin_2phi);

        // corrected longitude of ascending node,
        // including Earth rotation during signal transit
        let omega_k = omega0 + (omega_dot - omega_e) * t_k
            - omega_e * self.keplerian.toe_s
            - omega_e * transit_s;
        let omega_k_dot = omega_dot - omega_e;

        // orbital plane
        let (sin_u_k, cos_u_k) = u_k.sin_cos();
        let (x_p, y_p) = (r_k * cos_u_k, r_k * sin_u_k);
        let x_p_dot = r_k_dot * cos_u_k - r_k * u_k_dot * sin_u_k;
        let y_p_dot = r_k_dot * sin_u_k + r_k * u_k_dot * cos_u_k;

        // orbital plane to ECEF
        let (sin_i_k, cos_i_k) = i_k.sin_cos();
        let (sin_omega_k, cos_omega_k) = omega_k.sin_cos();

        let x = x_p * cos_omega_k - y_p * cos_i_k * sin_omega_k;
        let y = x_p * sin_omega_k + y_p * cos_i_k * cos_omega_k;
        let z = y_p * sin_i_k;

        let vx = x_p_dot * cos_omega_k - y_p_dot * cos_i_k * sin_omega_k
            + y_p * sin_i_k * sin_omega_k * i_k_dot
            - omega_k_dot * y;

        let vy = x_p_dot * sin_omega_k + y_p_dot * cos_i_k * cos_omega_k
            - y_p * sin_i_k * cos_omega_k * i_k_dot
            + omega_k_dot * x;

        let vz = y_p_dot * sin_i_k + y_p * cos_i_k * i_k_dot;

        debug!(
            "{}({:.3}) - kepler solving x={:.3}m y={:.3}m z={:.3}m t_k={:.3}s",
            self.sv, t_s, x, y, z, t_k
        );

        Ok(SatPositionVelocity {
            position_m: Vector3::new(x, y, z),
            velocity_m_s: Vector3::new(vx, vy, vz),
        })
    }
}
