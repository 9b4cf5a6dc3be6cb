use crate::{
    prelude::{
        Error, PositionSolver, RangeObservation, RangeRateObservation, SolverOpts, Vector3,
        Vector4, VelocitySolver, SPEED_OF_LIGHT_M_S,
    },
    tests::{init_logger, position::random_geometry, user_ecef},
};

use nalgebra::DVector;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use rstest::*;

#[rstest]
#[case(1, 5, Vector3::new(0.0, 0.0, 0.0), 0.0)]
#[case(2, 8, Vector3::new(12.0, -4.0, 1.5), 150.0)]
#[case(3, 11, Vector3::new(-230.0, 120.0, 35.0), -42.0)]
fn noiseless_round_trip(
    #[case] seed: u64,
    #[case] size: usize,
    #[case] velocity_m_s: Vector3<f64>,
    #[case] drift_m_s: f64,
) {
    init_logger();

    let rx = user_ecef();
    let vehicles = random_geometry(seed, size, &rx);

    let observations = vehicles
        .iter()
        .map(|sv| RangeObservation::new(*sv, (sv - rx).norm()))
        .collect::<Vec<_>>();

    let opts = SolverOpts::default();

    let position = PositionSolver::new(&opts)
        .resolve(&observations, Vector4::zeros())
        .unwrap();

    // random vehicle velocities
    let mut rng = SmallRng::seed_from_u64(seed);

    let rates = vehicles
        .iter()
        .map(|sv| {
            let sv_velocity = Vector3::new(
                rng.random_range(-3000.0..3000.0),
                rng.random_range(-3000.0..3000.0),
                rng.random_range(-3000.0..3000.0),
            );

            let los = (sv - rx) / (sv - rx).norm();

            RangeRateObservation {
                velocity_m_s: sv_velocity,
                range_rate_m_s: los.dot(&(sv_velocity - velocity_m_s)) + drift_m_s,
            }
        })
        .collect::<Vec<_>>();

    let weights = DVector::from_element(size, 1.0);

    let solution = VelocitySolver::new(&opts)
        .resolve(&position.geometry, &weights, &rates)
        .unwrap();

    let error_m_s = (solution.velocity_m_s - velocity_m_s).norm();
    assert!(error_m_s < 1.0E-6, "velocity error {:.3E}m/s", error_m_s);

    assert!((solution.drift_m_s - drift_m_s).abs() < 1.0E-6);
    assert!((solution.relative_drift() - drift_m_s / SPEED_OF_LIGHT_M_S).abs() < 1.0E-14);
}

#[test]
fn dimension_mismatch() {
    let rx = user_ecef();
    let vehicles = random_geometry(4, 6, &rx);

    let observations = vehicles
        .iter()
        .map(|sv| RangeObservation::new(*sv, (sv - rx).norm()))
        .collect::<Vec<_>>();

    let opts = SolverOpts::default();

    let position = PositionSolver::new(&opts)
        .resolve(&observations, Vector4::zeros())
        .unwrap();

    let rates = vec![RangeRateObservation::default(); 5];
    let weights = DVector::from_element(5, 1.0);

    assert_eq!(
        VelocitySolver::new(&opts).resolve(&position.geometry, &weights, &rates),
        Err(Error::DimensionMismatch {
            rows: 6,
            weights: 5,
            observations: 5,
        })
    );

    let rates = vec![RangeRateObservation::default(); 6];
    assert_eq!(
        VelocitySolver::new(&opts).resolve(&position.geometry, &weights, &rates),
        Err(Error::DimensionMismatch {
            rows: 6,
            weights: 5,
            observations: 6,
        })
    );
}
