use crate::{
    prelude::{
        ConstellationParameters, Error, GalileoNavigation, GpsNavigation, KeplerOpts, Modeling,
        NavigationMessage, TimeOfWeek, Vector3, SV,
    },
    tests::init_logger,
};

use rstest::*;

fn gps_frame() -> GpsNavigation {
    GpsNavigation {
        prn: 12,
        toe: 7200.0,
        toc: 7200.0,
        af0: 1.0E-4,
        af1: -2.0E-12,
        af2: 1.0E-19,
        sqrt_a: 5153.65,
        e: 0.012,
        i0: 0.31,
        idot: 1.0E-10,
        omega0: -0.42,
        omega_dot: -2.6E-9,
        omega: 0.27,
        m0: 0.63,
        dn: 1.4E-9,
        cuc: -1.2E-6,
        cus: 8.5E-6,
        crc: 230.0,
        crs: -45.0,
        cic: 6.0E-8,
        cis: -9.0E-8,
        ..Default::default()
    }
}

/// Same orbit, without any drift of the orbital plane
fn unperturbed_gps_frame() -> GpsNavigation {
    GpsNavigation {
        idot: 0.0,
        omega_dot: 0.0,
        ..gps_frame()
    }
}

fn galileo_frame() -> GalileoNavigation {
    GalileoNavigation {
        prn: 5,
        toe: 7200.0,
        toc: 7200.0,
        af0: -3.0E-4,
        sqrt_a: 5440.6,
        e: 0.0003,
        i0: 0.311,
        omega0: 0.77,
        omega: -0.61,
        m0: -0.12,
        dn: 9.0E-10,
        cus: 4.0E-6,
        crc: 160.0,
        ..Default::default()
    }
}

fn rotate_z(v: &Vector3<f64>, angle_rad: f64) -> Vector3<f64> {
    let (sin, cos) = angle_rad.sin_cos();
    Vector3::new(cos * v[0] - sin * v[1], sin * v[0] + cos * v[1], v[2])
}

#[rstest]
#[case(NavigationMessage::from(unperturbed_gps_frame()))]
#[case(NavigationMessage::from(galileo_frame()))]
fn one_orbital_period(#[case] nav: NavigationMessage) {
    init_logger();

    let ephemeris = nav.ephemeris();
    let opts = KeplerOpts::default();

    let t_s = 7300.0;
    let period_s = ephemeris.orbital_period_s();
    let omega_e = ephemeris.parameters.earth_rotation_rad_s;

    let initial = ephemeris.propagate(t_s, 0.0, &opts).unwrap();
    let final_ = ephemeris.propagate(t_s + period_s, 0.0, &opts).unwrap();

    // ECEF frame rotated meanwhile
    let expected = rotate_z(&initial.position_m, -omega_e * period_s);

    let error_m = (final_.position_m - expected).norm();
    assert!(error_m < 1.0E-3, "{}: error {:.6}m", ephemeris.sv, error_m);

    let radius_m = initial.position_m.norm();
    let a = ephemeris.semi_major_axis_m();
    let e = ephemeris.keplerian.eccentricity;
    assert!(radius_m > a * (1.0 - e) - 1000.0);
    assert!(radius_m < a * (1.0 + e) + 1000.0);
}

#[rstest]
#[case(NavigationMessage::from(gps_frame()), 7300.0)]
#[case(NavigationMessage::from(gps_frame()), 18_000.0)]
#[case(NavigationMessage::from(galileo_frame()), 100.0)]
fn analytic_velocity(#[case] nav: NavigationMessage, #[case] t_s: f64) {
    init_logger();

    let ephemeris = nav.ephemeris();
    let opts = KeplerOpts::default();
    let dt = 0.01;

    let state = ephemeris.propagate(t_s, 0.0, &opts).unwrap();
    let before = ephemeris.propagate(t_s - dt, 0.0, &opts).unwrap();
    let after = ephemeris.propagate(t_s + dt, 0.0, &opts).unwrap();

    let finite_diff = (after.position_m - before.position_m) / (2.0 * dt);
    let error_m_s = (state.velocity_m_s - finite_diff).norm();

    assert!(
        error_m_s < 1.0E-3,
        "{}: velocity error {:.6}m/s",
        ephemeris.sv,
        error_m_s
    );

    // MEO orbital speed, in rotating frame
    let speed = state.velocity_m_s.norm();
    assert!(speed > 2000.0 && speed < 4500.0, "speed {}", speed);
}

#[test]
fn earth_rotation_during_transit() {
    let ephemeris = NavigationMessage::from(gps_frame()).ephemeris();
    let opts = KeplerOpts::default();
    let omega_e = ephemeris.parameters.earth_rotation_rad_s;

    let transit_s = 0.075;
    let fixed = ephemeris.propagate(7300.0, 0.0, &opts).unwrap();
    let rotated = ephemeris.propagate(7300.0, transit_s, &opts).unwrap();

    let expected = rotate_z(&fixed.position_m, -omega_e * transit_s);
    assert!((rotated.position_m - expected).norm() < 1.0E-6);

    // ω.τ.r, at most 145m
    let offset_m = (rotated.position_m - fixed.position_m).norm();
    assert!(offset_m > 1.0 && offset_m < 150.0, "offset {}", offset_m);
}

#[test]
fn kepler_divergence() {
    init_logger();

    let ephemeris = NavigationMessage::from(gps_frame()).ephemeris();
    let sv = SV::new(ephemeris.sv.constellation, 12);

    let opts = KeplerOpts {
        tolerance_rad: 1.0E-12,
        max_iterations: 1,
    };

    assert_eq!(
        ephemeris.propagate(7300.0, 0.0, &opts),
        Err(Error::KeplerDivergence(sv))
    );

    assert_eq!(
        ephemeris.clock_correction(7300.0, &Modeling::default(), &opts),
        Err(Error::KeplerDivergence(sv))
    );
}

#[test]
fn invalid_elements() {
    let mut frame = gps_frame();
    frame.e = 1.2;

    let ephemeris = NavigationMessage::from(frame).ephemeris();

    assert_eq!(
        ephemeris.propagate(7300.0, 0.0, &KeplerOpts::default()),
        Err(Error::InvalidEphemeris(ephemeris.sv))
    );
}

#[test]
fn validity_period() {
    let ephemeris = NavigationMessage::from(gps_frame()).ephemeris();
    let max_dtoe = ConstellationParameters::GPS.max_dtoe_s;

    assert!(ephemeris.is_valid(7200.0));
    assert!(ephemeris.is_valid(7200.0 + max_dtoe));
    assert!(!ephemeris.is_valid(7200.0 + max_dtoe + 1.0));
    assert!(!ephemeris.is_valid(7200.0 - max_dtoe - 1.0));
}

#[test]
fn clock_polynomial() {
    let ephemeris = NavigationMessage::from(gps_frame()).ephemeris();
    let opts = KeplerOpts::default();

    let modeling = Modeling {
        relativistic_clock_bias: false,
        ..Default::default()
    };

    let dt = 100.0;
    let corrected = ephemeris
        .clock_correction(7200.0 + dt, &modeling, &opts)
        .unwrap();

    let expected = 1.0E-4 - 2.0E-12 * dt + 1.0E-19 * dt * dt;
    assert!((corrected.correction_s - expected).abs() < 1.0E-15);
    assert!((corrected.tow_s - (7200.0 + dt - expected)).abs() < 1.0E-9);

    let raw = TimeOfWeek::from(7200.0 + dt);
    let applied_s = corrected.transmit.wrapped_difference_s(&raw);
    assert!((applied_s + expected).abs() < 1.0E-15);
    assert_eq!(corrected.relativistic_s, 0.0);
    assert!((corrected.drift_s_s - (-2.0E-12 + 2.0E-19 * dt)).abs() < 1.0E-20);

    let no_modeling = Modeling::no_modeling();
    let corrected = ephemeris
        .clock_correction(7200.0 + dt, &no_modeling, &opts)
        .unwrap();
    assert_eq!(corrected.correction_s, 0.0);
    assert_eq!(corrected.tow_s, 7200.0 + dt);
}

#[test]
fn clock_week_rollover() {
    let mut frame = gps_frame();
    frame.toc = 604_700.0;

    let ephemeris = NavigationMessage::from(frame).ephemeris();

    let modeling = Modeling {
        relativistic_clock_bias: false,
        ..Default::default()
    };

    // 200s past toc, in the following week
    let corrected = ephemeris
        .clock_correction(100.0, &modeling, &KeplerOpts::default())
        .unwrap();

    let expected = 1.0E-4 - 2.0E-12 * 200.0 + 1.0E-19 * 200.0 * 200.0;
    assert!((corrected.correction_s - expected).abs() < 1.0E-15);
}

#[test]
fn relativistic_correction() {
    let ephemeris = NavigationMessage::from(gps_frame()).ephemeris();

    let modeling = Modeling {
        sv_clock_bias: false,
        ..Default::default()
    };

    let corrected = ephemeris
        .clock_correction(7300.0, &modeling, &KeplerOpts::default())
        .unwrap();

    // F.e.sqrt(A): at most 27ns for e=0.012
    let bound = 4.442807633E-10 * 0.012 * 5153.65;
    assert!(corrected.relativistic_s.abs() <= bound);
    assert!(corrected.relativistic_s != 0.0);
    assert_eq!(corrected.correction_s, corrected.relativistic_s);
}

#[test]
fn group_delay() {
    let mut frame = gps_frame();
    frame.tgd = -1.0E-8;

    let ephemeris = NavigationMessage::from(frame).ephemeris();
    let opts = KeplerOpts::default();

    let without = ephemeris
        .clock_correction(7300.0, &Modeling::default(), &opts)
        .unwrap();

    let modeling = Modeling {
        sv_total_group_delay: true,
        ..Default::default()
    };

    let with = ephemeris.clock_correction(7300.0, &modeling, &opts).unwrap();

    assert!((with.correction_s - without.correction_s - 1.0E-8).abs() < 1.0E-15);
}
