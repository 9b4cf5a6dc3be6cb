//! Pseudo range formation
use log::debug;

use crate::{
    constants::SPEED_OF_LIGHT_M_S, ephemeris::clock::CorrectedTime, prelude::SV,
    time::TimeOfWeek,
};

/// Pseudo range of one vehicle, relative to a reference time
/// shared by all vehicles of the same epoch.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Pseudorange {
    /// [SV]
    pub sv: SV,
    /// Range (m)
    pub range_m: f64,
    /// Shared reference time
    pub reference: TimeOfWeek,
}

/// [PseudorangeFormer] aligns corrected transmission times
/// of one epoch onto a common reference.
pub struct PseudorangeFormer {}

impl PseudorangeFormer {
    /// Forms one [Pseudorange] per [CorrectedTime], in the same order.
    ///
    /// The reference is the latest transmission time of the batch,
    /// which is a provisional reception time: the position solver
    /// resolves the actual time of flight as part of the clock term.
    /// Transmission times are compared relative to the first one,
    /// whole milliseconds and residuals apart, and wrapped to ±half a week
    /// so batches straddling the week rollover are consistent. In that case,
    /// the reference may exceed one week (time of week of the first vehicle's week).
    ///
    /// Returns the reference time, or None for empty batches.
    pub fn form(times: &[CorrectedTime]) -> Option<(TimeOfWeek, Vec<Pseudorange>)> {
        let anchor = times.first()?.transmit;

        let offsets = times
            .iter()
            .map(|t| t.transmit.wrapped_difference_s(&anchor))
            .collect::<Vec<_>>();

        let latest = offsets.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let reference = anchor.shifted(latest);

        let pseudoranges = times
            .iter()
            .zip(offsets.iter())
            .map(|(t, offset)| {
                let range_m = (latest - offset) * SPEED_OF_LIGHT_M_S;
                debug!(
                    "{}({:.9}) - pseudo range {:.3}m (reference {:.9})",
                    t.sv,
                    t.tow_s,
                    range_m,
                    reference.to_seconds()
                );
                Pseudorange {
                    sv: t.sv,
                    range_m,
                    reference,
                }
            })
            .collect();

        Some((reference, pseudoranges))
    }
}
