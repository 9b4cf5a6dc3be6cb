//! Onboard clock correction
use log::debug;

use crate::{
    cfg::{KeplerOpts, Modeling},
    ephemeris::Ephemeris,
    error::Error,
    prelude::SV,
    time::{wrap_half_week, TimeOfWeek},
};

/// Transmission time of one vehicle, once corrected
/// for the onboard clock offset to system time.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CorrectedTime {
    /// [SV]
    pub sv: SV,
    /// Raw transmission time, as measured, in seconds of week
    pub raw_tow_s: f64,
    /// Corrected transmission time, in seconds of week
    pub tow_s: f64,
    /// Corrected transmission time, at full resolution
    pub transmit: TimeOfWeek,
    /// Total correction that was applied (s):
    /// clock polynomial, relativistic effect and possible group delay.
    pub correction_s: f64,
    /// Relativistic part of the correction (s)
    pub relativistic_s: f64,
    /// Instantaneous onboard clock drift (s.s⁻¹), derivative of the correction
    pub drift_s_s: f64,
}

impl Ephemeris {
    /// Corrects this raw transmission time ([TimeOfWeek] or seconds of week)
    /// with the broadcast clock polynomial and relativistic effect.
    pub fn clock_correction(
        &self,
        raw: impl Into<TimeOfWeek>,
        modeling: &Modeling,
        opts: &KeplerOpts,
    ) -> Result<CorrectedTime, Error> {
        let raw: TimeOfWeek = raw.into();
        let raw_tow_s = raw.to_seconds();
        let clock = &self.clock;
        let dt = wrap_half_week(raw_tow_s - clock.toc_s);

        let (mut correction_s, mut drift_s_s) = (0.0, 0.0);

        if modeling.sv_clock_bias {
            correction_s += clock.bias_s + clock.drift_s_s * dt + clock.drift_rate_s_s2 * dt.powi(2);
            drift_s_s += clock.drift_s_s + 2.0 * clock.drift_rate_s_s2 * dt;
        }

        let mut relativistic_s = 0.0;

        if modeling.relativistic_clock_bias {
            let anomaly = self.eccentric_anomaly(raw_tow_s, opts)?;
            let f_e_sqrt_a =
                self.parameters.dtr_f * self.keplerian.eccentricity * self.keplerian.sqrt_a;

            relativistic_s = f_e_sqrt_a * anomaly.e_k.sin();
            correction_s += relativistic_s;
            drift_s_s += f_e_sqrt_a * anomaly.e_k.cos() * anomaly.e_k_dot;
        }

        if modeling.sv_total_group_delay {
            correction_s -= self.group_delay_s;
        }

        debug!(
            "{}({:.3}) - clock correction: {:.6E}s (relativistic {:.6E}s) drift {:.6E}s/s",
            self.sv, raw_tow_s, correction_s, relativistic_s, drift_s_s
        );

        Ok(CorrectedTime {
            sv: self.sv,
            raw_tow_s,
            tow_s: raw_tow_s - correction_s,
            transmit: raw.shifted(-correction_s),
            correction_s,
            relativistic_s,
            drift_s_s,
        })
    }
}
