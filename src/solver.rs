//! PVT solver
use itertools::Itertools;
use log::{debug, error, info, warn};
use map_3d::{ecef2geodetic, rad2deg, Ellipsoid};
use nalgebra::DVector;

use crate::{
    candidate::Candidate,
    constants::{HALF_WEEK_SECONDS, MIN_SV, NOMINAL_TRANSIT_S, SPEED_OF_LIGHT_M_S},
    navigation::{
        dop::DilutionOfPrecision, velocity::VelocitySolver, PositionSolution, PositionSolver,
        RangeObservation,
    },
    prelude::{
        Config, Constellation, Epoch, Error, PVTSolution, SatelliteState, Vector3, Vector4,
    },
    pseudorange::PseudorangeFormer,
    solutions::{validator::SolutionValidator, SatInfo},
    time::{absolute_epoch, TimeOfWeek},
};

/// [Solver] to resolve [PVTSolution]s.
/// [Solver] holds no state: the latest [PVTSolution] is
/// to be proposed on each attempt, it serves as warm start and fallback.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    /// Solver parametrization
    pub cfg: Config,
}

impl Solver {
    /// Creates a new [Solver] from this [Config] preset
    pub fn new(cfg: &Config) -> Self {
        if cfg.min_sv_elev.is_some() && cfg.apriori_ecef_m.is_none() {
            info!("elevation mask will only apply once a first solution is obtained");
        }
        Self { cfg: cfg.clone() }
    }

    /// Resolves a [PVTSolution] from the [SatelliteState]s of one epoch.
    ///
    /// Whenever the epoch cannot be resolved (not enough healthy vehicles,
    /// degenerate geometry, solver divergence..), the previous
    /// [PVTSolution] is returned unchanged.
    ///
    /// The week of the reception epoch is the one most vehicles agree on,
    /// once their decoded week counters are brought to the week of the
    /// first vehicle. A minority of stale week counters (decoder lagging
    /// behind a week rollover) is therefore tolerated.
    ///
    /// ## Errors
    /// - [Error::NotEnoughSatellites] when less than 4 states are proposed
    /// - [Error::MixedConstellations] when states do not share the same [Constellation]
    pub fn resolve(
        &self,
        states: &[SatelliteState],
        previous: &PVTSolution,
    ) -> Result<PVTSolution, Error> {
        match self.try_resolve(states, previous) {
            Ok(solution) => Ok(solution),
            Err(e) if e.is_recoverable() => {
                warn!("{} - maintaining previous solution", e);
                Ok(previous.clone())
            },
            Err(e) => Err(e),
        }
    }

    /// Same as [Self::resolve], except that the reason
    /// for not resolving the epoch is exposed.
    pub fn try_resolve(
        &self,
        states: &[SatelliteState],
        previous: &PVTSolution,
    ) -> Result<PVTSolution, Error> {
        if states.len() < MIN_SV {
            return Err(Error::NotEnoughSatellites(states.len()));
        }

        let constellation = states
            .iter()
            .map(|state| state.constellation())
            .all_equal_value()
            .map_err(|_| Error::MixedConstellations)?;

        let healthy = states
            .iter()
            .filter(|state| {
                let healthy = state.navigation.is_healthy();
                if !healthy {
                    debug!("{} - unhealthy", state.sv());
                }
                healthy
            })
            .collect::<Vec<_>>();

        if healthy.len() < MIN_SV {
            return Err(Error::NotEnoughHealthySatellites(healthy.len()));
        }

        let mut pool = self.corrected_pool(&healthy);

        if pool.len() < MIN_SV {
            return Err(Error::NotEnoughCandidates(pool.len()));
        }

        let times = pool.iter().map(|cd| cd.corrected).collect::<Vec<_>>();

        let (reference, pseudoranges) =
            PseudorangeFormer::form(&times).ok_or(Error::NotEnoughCandidates(0))?;

        for (cd, pr) in pool.iter_mut().zip(pseudoranges.iter()) {
            cd.pseudorange_m = pr.range_m;
        }

        // reference time is expressed in the week of the first vehicle
        let week = self.anchor_week(&pool).ok_or(Error::NotEnoughCandidates(0))?;

        // warm start
        let apriori = if previous.is_resolved() {
            Some(previous.position_m)
        } else {
            self.cfg
                .apriori_ecef_m
                .map(|(x0, y0, z0)| Vector3::new(x0, y0, z0))
        };

        let mut x0 = Vector4::<f64>::zeros();

        if let Some(apriori) = apriori {
            x0[0] = apriori[0];
            x0[1] = apriori[1];
            x0[2] = apriori[2];
        }

        if previous.is_resolved() {
            x0[3] = previous.clock_bias_m;
        }

        // first propagation, using a nominal time of flight
        pool.retain_mut(|cd| {
            let transit_s = if self.cfg.modeling.earth_rotation {
                NOMINAL_TRANSIT_S + cd.pseudorange_m / SPEED_OF_LIGHT_M_S
            } else {
                0.0
            };
            match cd.propagate(transit_s, &self.cfg.kepler) {
                Ok(_) => true,
                Err(e) => {
                    error!("{} - orbit propagation failure: {}", cd.sv(), e);
                    false
                },
            }
        });

        if let Some(apriori) = apriori {
            let (lat_rad, lon_rad, alt_m) =
                ecef2geodetic(apriori[0], apriori[1], apriori[2], Ellipsoid::WGS84);

            for cd in pool.iter_mut() {
                cd.with_attitude((lat_rad, lon_rad, alt_m));
            }

            if let Some(min_elev) = self.cfg.min_sv_elev {
                pool.retain(|cd| {
                    let elev = cd.elevation_deg.unwrap_or(0.0);
                    if elev < min_elev {
                        debug!("{} - below elevation mask ({:.2}°)", cd.sv(), elev);
                        false
                    } else {
                        true
                    }
                });
            }
        }

        if pool.len() < MIN_SV {
            return Err(Error::NotEnoughCandidates(pool.len()));
        }

        let elevations = pool.iter().map(|cd| cd.elevation_deg).collect::<Vec<_>>();
        let weights = self.cfg.solver.weights(&elevations);

        let solver = PositionSolver::new(&self.cfg.solver);

        let mut position = solver.resolve(&Self::range_observations(&pool, &weights)?, x0)?;

        if self.cfg.modeling.earth_rotation {
            for _ in 0..self.cfg.transit_refinements {
                let rx_m = position.position_m();

                for cd in pool.iter_mut() {
                    let transit_s = cd.range_m(&rx_m).unwrap_or_default() / SPEED_OF_LIGHT_M_S;
                    cd.propagate(transit_s, &self.cfg.kepler)?;
                }

                position =
                    solver.resolve(&Self::range_observations(&pool, &weights)?, position.state)?;
            }
        }

        let solution = self.solution(&pool, &position, &weights)?;

        // reception time: t_rx = t_ref - b/c
        let rx = reference.shifted(-solution.clock_bias_m / SPEED_OF_LIGHT_M_S);
        let epoch = reception_epoch(constellation, week, &rx)?;

        let solution = PVTSolution {
            epoch: Some(epoch),
            ..solution
        };

        info!("{}", solution);
        Ok(solution)
    }

    /// Applies the onboard clock correction,
    /// dropping vehicles that may not contribute.
    fn corrected_pool<'a>(&self, states: &[&SatelliteState<'a>]) -> Vec<Candidate<'a>> {
        let mut pool = Vec::with_capacity(states.len());

        for state in states.iter() {
            let ephemeris = state.navigation.ephemeris();
            let raw = state.raw_transmit_time();
            let raw_tow_s = raw.to_seconds();

            if !ephemeris.is_valid(raw_tow_s) {
                warn!(
                    "{}({:.3}) - ephemeris out of validity period",
                    state.sv(),
                    raw_tow_s
                );
                continue;
            }

            match ephemeris.clock_correction(raw, &self.cfg.modeling, &self.cfg.kepler) {
                Ok(corrected) => pool.push(Candidate::new(**state, ephemeris, corrected)),
                Err(e) => error!("{} - clock correction failure: {}", state.sv(), e),
            }
        }

        pool
    }

    /// Week counter of the first vehicle of the pool, as voted by all vehicles.
    /// Each decoded week is brought to the week of the first vehicle,
    /// absorbing rollovers between transmission times. Ties go to the latest week.
    fn anchor_week(&self, pool: &[Candidate]) -> Option<u32> {
        let anchor_tow_s = pool.first()?.corrected.tow_s;

        pool.iter()
            .map(|cd| {
                let week = cd.state.navigation.week(&self.cfg);
                let dt_s = cd.corrected.tow_s - anchor_tow_s;
                if dt_s > HALF_WEEK_SECONDS {
                    week + 1
                } else if dt_s < -HALF_WEEK_SECONDS {
                    week.saturating_sub(1)
                } else {
                    week
                }
            })
            .counts()
            .into_iter()
            .max_by_key(|(week, count)| (*count, *week))
            .map(|(week, _)| week)
    }

    fn range_observations(
        pool: &[Candidate],
        weights: &DVector<f64>,
    ) -> Result<Vec<RangeObservation>, Error> {
        pool.iter()
            .zip(weights.iter())
            .map(|(cd, w)| {
                cd.range_observation()
                    .map(|obs| obs.with_weight(*w))
                    .ok_or(Error::NotEnoughCandidates(pool.len()))
            })
            .collect()
    }

    /// Validates and forms the [PVTSolution], epoch excepted
    fn solution(
        &self,
        pool: &[Candidate],
        position: &PositionSolution,
        weights: &DVector<f64>,
    ) -> Result<PVTSolution, Error> {
        let position_m = position.position_m();
        let clock_bias_m = position.clock_bias_m();

        let (lat_rad, lon_rad, _) =
            ecef2geodetic(position_m[0], position_m[1], position_m[2], Ellipsoid::WGS84);

        let dop = DilutionOfPrecision::new(
            &position.geometry,
            lat_rad,
            lon_rad,
            self.cfg.solver.min_rcond,
        );

        let dop = SolutionValidator::new(dop)
            .validate(&self.cfg.solver)
            .map_err(Error::InvalidatedSolution)?;

        debug!(
            "lat={:.7}° lon={:.7}° gdop={:.3} pdop={:.3} hdop={:.3} vdop={:.3} tdop={:.3}",
            rad2deg(lat_rad),
            rad2deg(lon_rad),
            dop.gdop,
            dop.pdop,
            dop.hdop,
            dop.vdop,
            dop.tdop
        );

        let observations = pool
            .iter()
            .map(|cd| {
                cd.range_rate_observation()
                    .ok_or(Error::NotEnoughCandidates(pool.len()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let velocity =
            VelocitySolver::new(&self.cfg.solver).resolve(&position.geometry, weights, &observations)?;

        let sv = pool
            .iter()
            .filter_map(|cd| {
                let orbit = cd.orbit?;
                Some((
                    cd.sv(),
                    SatInfo {
                        position_m: orbit.position_m,
                        velocity_m_s: orbit.velocity_m_s,
                        corrected_tow_s: cd.corrected.tow_s,
                        pseudorange_m: cd.pseudorange_m,
                        carrier_phase_cycles: cd.state.carrier_phase_cycles,
                    },
                ))
            })
            .collect();

        Ok(PVTSolution {
            position_m,
            velocity_m_s: velocity.velocity_m_s,
            clock_bias_m,
            epoch: None,
            clock_drift_s_s: velocity.relative_drift(),
            dop: Some(dop),
            residual_rms_m: position.residual_rms_m(),
            sv,
        })
    }
}

/// Assembles the absolute reception [Epoch]
fn reception_epoch(
    constellation: Constellation,
    week: u32,
    rx: &TimeOfWeek,
) -> Result<Epoch, Error> {
    let rx_tow_s = rx.to_seconds();
    absolute_epoch(constellation, week, rx_tow_s).ok_or_else(|| {
        error!(
            "{} week {} - invalid reception time {:.9}",
            constellation, week, rx_tow_s
        );
        Error::InvalidReceptionTime(week)
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reception_epoch_assembly() {
        let rx = TimeOfWeek::new(3_600_000, 2.5E-4);
        let epoch = reception_epoch(Constellation::GPS, 2300, &rx).unwrap();
        let expected = absolute_epoch(Constellation::GPS, 2300, 3600.00025).unwrap();
        assert!((epoch - expected).to_seconds().abs() < 1.0E-9);

        // late by one week
        let rx = TimeOfWeek::new(604_799_999, 2.0E-3);
        let epoch = reception_epoch(Constellation::Galileo, 1276, &rx).unwrap();
        let expected = absolute_epoch(Constellation::Galileo, 1277, 1.0E-3).unwrap();
        assert!((epoch - expected).to_seconds().abs() < 1.0E-9);
    }

    #[test]
    fn week_counter_underflow() {
        let rx = TimeOfWeek::new(0, -1.0E-3);
        assert_eq!(
            reception_epoch(Constellation::GPS, 0, &rx),
            Err(Error::InvalidReceptionTime(0))
        );
        assert!(Error::InvalidReceptionTime(0).is_recoverable());
    }
}
