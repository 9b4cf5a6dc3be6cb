//! Constellation time keeping: week counters and epoch origins
use crate::{
    constants::{HALF_WEEK_SECONDS, WEEK_SECONDS},
    prelude::{Constellation, Duration, Epoch},
};

const WEEK_MILLIS: i64 = 604_800_000;
const HALF_WEEK_MILLIS: i64 = WEEK_MILLIS / 2;

/// Time of week, split into whole milliseconds and a residual (s).
/// Seconds of week lose resolution as the week goes by (0.1 ns, that is
/// 3 cm of range, at the end of the week). Differences between two [TimeOfWeek]
/// keep the resolution of the residuals instead.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TimeOfWeek {
    /// Whole milliseconds of week
    pub millis: u64,
    /// Residual (s). Not normalized: may be negative or exceed one millisecond.
    pub residual_s: f64,
}

impl From<f64> for TimeOfWeek {
    /// Splits seconds of week. Resolution is that of the input.
    fn from(tow_s: f64) -> Self {
        let millis = (tow_s * 1.0E3).floor().max(0.0) as u64;
        Self {
            millis,
            residual_s: tow_s - millis as f64 * 1.0E-3,
        }
    }
}

impl TimeOfWeek {
    /// Builds a new [TimeOfWeek]
    pub fn new(millis: u64, residual_s: f64) -> Self {
        Self { millis, residual_s }
    }

    /// Seconds of week, at reduced resolution
    pub fn to_seconds(&self) -> f64 {
        self.millis as f64 * 1.0E-3 + self.residual_s
    }

    /// Returns a copy shifted by dt (s), at full resolution
    pub fn shifted(&self, dt_s: f64) -> Self {
        Self {
            millis: self.millis,
            residual_s: self.residual_s + dt_s,
        }
    }

    /// Returns (self - rhs) in seconds, wrapped to ±half a week
    /// to absorb week rollovers.
    pub fn wrapped_difference_s(&self, rhs: &Self) -> f64 {
        let mut dt_ms = self.millis as i64 - rhs.millis as i64;

        if dt_ms > HALF_WEEK_MILLIS {
            dt_ms -= WEEK_MILLIS;
        } else if dt_ms < -HALF_WEEK_MILLIS {
            dt_ms += WEEK_MILLIS;
        }

        dt_ms as f64 * 1.0E-3 + (self.residual_s - rhs.residual_s)
    }
}

/// Returns the fixed origin of this [Constellation]'s week counter,
/// expressed in UTC. Leap seconds at the time of the origin are baked in:
/// - GPST starts 1980-01-06T00:00:00 UTC
/// - GST starts 1999-08-22T00:00:00 GST, that is 1999-08-21T23:59:47 UTC
///   (13 leap seconds since GPST origin).
pub fn epoch_origin(constellation: Constellation) -> Option<Epoch> {
    match constellation {
        Constellation::GPS => Some(Epoch::from_gregorian_utc(1980, 1, 6, 0, 0, 0, 0)),
        Constellation::Galileo => Some(Epoch::from_gregorian_utc(1999, 8, 21, 23, 59, 47, 0)),
        _ => None,
    }
}

/// Brings any time difference (s) back within ±half a week,
/// to absorb week rollovers between two seconds of week values.
pub(crate) fn wrap_half_week(dt_s: f64) -> f64 {
    if dt_s > HALF_WEEK_SECONDS {
        dt_s - WEEK_SECONDS
    } else if dt_s < -HALF_WEEK_SECONDS {
        dt_s + WEEK_SECONDS
    } else {
        dt_s
    }
}

/// Carries seconds of week that overflow (or underflow) a week
/// into the week counter. Returns None on week counter underflow.
pub(crate) fn normalize_time_of_week(week: u32, tow_s: f64) -> Option<(u32, f64)> {
    if !tow_s.is_finite() {
        return None;
    }

    let carry = (tow_s / WEEK_SECONDS).floor();
    let week = i64::from(week) + carry as i64;
    let week = u32::try_from(week).ok()?;

    Some((week, tow_s - carry * WEEK_SECONDS))
}

/// Assembles an absolute [Epoch] from a week counter and seconds within that week,
/// expressed in the [Constellation]'s own timescale.
/// Returns None for non supported [Constellation]s or week counter underflow.
pub fn absolute_epoch(constellation: Constellation, week: u32, tow_s: f64) -> Option<Epoch> {
    let timescale = constellation.timescale()?;
    let origin = epoch_origin(constellation)?.to_time_scale(timescale);

    let (week, tow_s) = normalize_time_of_week(week, tow_s)?;

    let t = origin + Duration::from_days(7.0 * f64::from(week)) + Duration::from_seconds(tow_s);
    Some(t)
}
