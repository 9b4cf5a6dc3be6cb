//! Tracking channel state
use crate::{
    ephemeris::NavigationMessage,
    prelude::{Constellation, SV},
    time::TimeOfWeek,
};

/// Per satellite, per epoch snapshot produced by one tracking channel.
/// Refers to the latest [NavigationMessage] decoded on that channel.
#[derive(Debug, Clone, Copy)]
pub struct SatelliteState<'a> {
    /// Decoded [NavigationMessage]
    pub navigation: &'a NavigationMessage,
    /// Time of week (whole milliseconds) of the start of the code period
    /// being tracked, in satellite time, as maintained from the latest
    /// decoded time of week.
    pub code_epoch_tow_ms: u64,
    /// Code phase within that code period (chips)
    pub code_phase_chips: f64,
    /// Carrier Doppler shift (Hz), positive while approaching
    pub doppler_hz: f64,
    /// Accumulated carrier phase (cycles). Not used by the solver
    /// but carried through to the solution.
    pub carrier_phase_cycles: f64,
}

impl<'a> SatelliteState<'a> {
    /// Creates a new [SatelliteState] for this decoded [NavigationMessage].
    /// Measurements are to be defined with the other methods.
    pub fn new(navigation: &'a NavigationMessage) -> Self {
        Self {
            navigation,
            code_epoch_tow_ms: 0,
            code_phase_chips: 0.0,
            doppler_hz: 0.0,
            carrier_phase_cycles: 0.0,
        }
    }

    /// Copies and returns [SatelliteState] with updated code measurement
    pub fn with_code_phase(&self, code_epoch_tow_ms: u64, code_phase_chips: f64) -> Self {
        let mut s = *self;
        s.code_epoch_tow_ms = code_epoch_tow_ms;
        s.code_phase_chips = code_phase_chips;
        s
    }

    /// Copies and returns [SatelliteState] with updated Doppler measurement
    pub fn with_doppler(&self, doppler_hz: f64) -> Self {
        let mut s = *self;
        s.doppler_hz = doppler_hz;
        s
    }

    /// Copies and returns [SatelliteState] with updated carrier phase measurement
    pub fn with_carrier_phase(&self, carrier_phase_cycles: f64) -> Self {
        let mut s = *self;
        s.carrier_phase_cycles = carrier_phase_cycles;
        s
    }

    /// [Constellation] tag
    pub fn constellation(&self) -> Constellation {
        self.navigation.constellation()
    }

    /// [SV] being tracked
    pub fn sv(&self) -> SV {
        self.navigation.sv()
    }

    /// Raw transmission time (satellite time) derived from the code measurement.
    /// The code phase is kept apart from the code epoch.
    pub fn raw_transmit_time(&self) -> TimeOfWeek {
        let chipping_rate = self.navigation.parameters().chipping_rate_hz;
        TimeOfWeek::new(
            self.code_epoch_tow_ms,
            self.code_phase_chips / chipping_rate,
        )
    }

    /// Raw transmission time (seconds of week, satellite time)
    pub fn raw_transmit_tow_s(&self) -> f64 {
        self.raw_transmit_time().to_seconds()
    }

    /// Pseudo range rate (m.s⁻¹) observed through the carrier Doppler shift.
    pub fn range_rate_m_s(&self) -> f64 {
        -self.doppler_hz * self.navigation.parameters().wavelength_m()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prelude::{GalileoNavigation, GpsNavigation, SPEED_OF_LIGHT_M_S};

    #[test]
    fn raw_transmission_time() {
        let nav = NavigationMessage::from(GpsNavigation {
            prn: 1,
            ..Default::default()
        });

        let state = SatelliteState::new(&nav).with_code_phase(1_000_001, 511.5);
        assert_eq!(state.sv(), SV::new(Constellation::GPS, 1));
        assert!((state.raw_transmit_tow_s() - (1000.001 + 0.5E-3)).abs() < 1.0E-9);

        let raw = state.raw_transmit_time();
        assert_eq!(raw.millis, 1_000_001);
        assert!((raw.residual_s - 0.5E-3).abs() < 1.0E-18);

        let nav = NavigationMessage::from(GalileoNavigation {
            prn: 3,
            ..Default::default()
        });

        let state = SatelliteState::new(&nav).with_code_phase(20_004, 2046.0);
        assert_eq!(state.constellation(), Constellation::Galileo);
        assert!((state.raw_transmit_tow_s() - (20.004 + 2.0E-3)).abs() < 1.0E-12);
        assert!((state.raw_transmit_time().residual_s - 2.0E-3).abs() < 1.0E-18);
    }

    #[test]
    fn doppler_range_rate() {
        let nav = NavigationMessage::from(GpsNavigation::default());
        let state = SatelliteState::new(&nav).with_doppler(1000.0);

        let expected = -1000.0 * SPEED_OF_LIGHT_M_S / 1575.42E6;
        assert!((state.range_rate_m_s() - expected).abs() < 1.0E-9);
        assert!(state.range_rate_m_s() < 0.0, "approaching vehicle");
    }
}
