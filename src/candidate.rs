//! Position solving candidate
use log::debug;
use map_3d::{ecef2aer, rad2deg, Ellipsoid};

use crate::{
    cfg::KeplerOpts,
    constants::SPEED_OF_LIGHT_M_S,
    ephemeris::{clock::CorrectedTime, kepler::SatPositionVelocity, Ephemeris},
    error::Error,
    navigation::{velocity::RangeRateObservation, RangeObservation},
    prelude::{Vector3, SV},
    satellite::SatelliteState,
};

/// One vehicle going through the resolution process of one epoch.
#[derive(Debug, Clone)]
pub(crate) struct Candidate<'a> {
    /// [SatelliteState] as proposed
    pub state: SatelliteState<'a>,
    /// [Ephemeris] that applies
    pub ephemeris: Ephemeris,
    /// [CorrectedTime] of transmission
    pub corrected: CorrectedTime,
    /// Pseudo range (m), once formed
    pub pseudorange_m: f64,
    /// [SatPositionVelocity] at transmission time, once propagated
    pub orbit: Option<SatPositionVelocity>,
    /// Elevation at reception time (degrees), when the receiver position is known
    pub elevation_deg: Option<f64>,
}

impl<'a> Candidate<'a> {
    pub fn new(state: SatelliteState<'a>, ephemeris: Ephemeris, corrected: CorrectedTime) -> Self {
        Self {
            state,
            ephemeris,
            corrected,
            pseudorange_m: 0.0,
            orbit: None,
            elevation_deg: None,
        }
    }

    pub fn sv(&self) -> SV {
        self.corrected.sv
    }

    /// Propagates the orbit to the corrected transmission time,
    /// compensating this signal transit time.
    pub fn propagate(&mut self, transit_s: f64, opts: &KeplerOpts) -> Result<(), Error> {
        let orbit = self
            .ephemeris
            .propagate(self.corrected.tow_s, transit_s, opts)?;
        self.orbit = Some(orbit);
        Ok(())
    }

    /// Geometric range (m) to this ECEF position, once propagated
    pub fn range_m(&self, rx_ecef_m: &Vector3<f64>) -> Option<f64> {
        let orbit = self.orbit?;
        Some((orbit.position_m - rx_ecef_m).norm())
    }

    /// Updates the elevation angle, as seen from
    /// this position (geodetic, radians and meters).
    pub fn with_attitude(&mut self, rx_geodetic: (f64, f64, f64)) {
        let Some(orbit) = self.orbit else {
            return;
        };

        let (lat_rad, lon_rad, alt_m) = rx_geodetic;
        let (x, y, z) = (orbit.position_m[0], orbit.position_m[1], orbit.position_m[2]);

        let (az, el, _) = ecef2aer(x, y, z, lat_rad, lon_rad, alt_m, Ellipsoid::WGS84);
        let (az, el) = (rad2deg(az), rad2deg(el));

        debug!("{} - elevation {:.2}° azimuth {:.2}°", self.sv(), el, az);

        self.elevation_deg = Some(el);
    }

    pub fn range_observation(&self) -> Option<RangeObservation> {
        let orbit = self.orbit?;
        Some(RangeObservation::new(orbit.position_m, self.pseudorange_m))
    }

    /// Range rate observation, corrected for the onboard clock drift.
    pub fn range_rate_observation(&self) -> Option<RangeRateObservation> {
        let orbit = self.orbit?;
        Some(RangeRateObservation {
            velocity_m_s: orbit.velocity_m_s,
            range_rate_m_s: self.state.range_rate_m_s()
                + SPEED_OF_LIGHT_M_S * self.corrected.drift_s_s,
        })
    }
}
