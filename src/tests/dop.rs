use crate::{
    prelude::DilutionOfPrecision,
    tests::{
        position::{random_geometry, vehicle_at},
        user_ecef,
    },
};

use map_3d::{deg2rad, Ellipsoid};
use nalgebra::{MatrixXx4, Vector3};
use rstest::*;

fn geometry(vehicles: &[Vector3<f64>], rx: &Vector3<f64>) -> MatrixXx4<f64> {
    let mut h = MatrixXx4::<f64>::zeros(vehicles.len());
    for (i, sv) in vehicles.iter().enumerate() {
        let los = (rx - sv) / (rx - sv).norm();
        h[(i, 0)] = los[0];
        h[(i, 1)] = los[1];
        h[(i, 2)] = los[2];
        h[(i, 3)] = 1.0;
    }
    h
}

fn user_geodetic() -> (f64, f64) {
    let rx = user_ecef();
    let (lat, lon, _) = map_3d::ecef2geodetic(rx[0], rx[1], rx[2], Ellipsoid::WGS84);
    (lat, lon)
}

#[rstest]
#[case(1, 5)]
#[case(7, 6)]
#[case(11, 9)]
#[case(42, 14)]
fn identities(#[case] seed: u64, #[case] size: usize) {
    let rx = user_ecef();
    let (lat, lon) = user_geodetic();

    let h = geometry(&random_geometry(seed, size, &rx), &rx);
    let dop = DilutionOfPrecision::new(&h, lat, lon, 1.0E-10).unwrap();

    for value in [dop.gdop, dop.pdop, dop.hdop, dop.vdop, dop.tdop] {
        assert!(value.is_finite() && value >= 0.0);
    }

    let pdop2 = dop.hdop.powi(2) + dop.vdop.powi(2);
    assert!(((dop.pdop.powi(2) - pdop2) / pdop2).abs() < 1.0E-9);

    let gdop2 = dop.pdop.powi(2) + dop.tdop.powi(2);
    assert!(((dop.gdop.powi(2) - gdop2) / gdop2).abs() < 1.0E-9);

    assert!(dop.gdop >= dop.pdop);
    assert!(dop.pdop >= dop.hdop);
    assert!(dop.pdop >= dop.vdop);
}

#[test]
fn reference_geometry() {
    let rx = user_ecef();
    let (lat, lon) = user_geodetic();

    // one vehicle at zenith, three evenly spread at the horizon
    let vehicles = [
        vehicle_at(&rx, 0.0, 90.0, 20_000_000.0),
        vehicle_at(&rx, 0.0, 0.0, 20_000_000.0),
        vehicle_at(&rx, 120.0, 0.0, 20_000_000.0),
        vehicle_at(&rx, 240.0, 0.0, 20_000_000.0),
    ];

    let h = geometry(&vehicles, &rx);
    let dop = DilutionOfPrecision::new(&h, lat, lon, 1.0E-10).unwrap();

    // closed form for this tetrahedron
    let hdop = (4.0_f64 / 3.0).sqrt();
    let vdop = (4.0_f64 / 3.0).sqrt();
    let tdop = (1.0_f64 / 3.0).sqrt();

    assert!((dop.hdop - hdop).abs() < 1.0E-6, "hdop={}", dop.hdop);
    assert!((dop.vdop - vdop).abs() < 1.0E-6, "vdop={}", dop.vdop);
    assert!((dop.tdop - tdop).abs() < 1.0E-6, "tdop={}", dop.tdop);
    assert!((dop.gdop - 3.0_f64.sqrt()).abs() < 1.0E-6, "gdop={}", dop.gdop);
}

#[test]
fn rotation_invariance() {
    // horizontal and vertical DOPs depend on the local frame,
    // position and geometric DOPs do not.
    let rx = user_ecef();
    let (lat, lon) = user_geodetic();

    let h = geometry(&random_geometry(3, 8, &rx), &rx);

    let local = DilutionOfPrecision::new(&h, lat, lon, 1.0E-10).unwrap();
    let remote = DilutionOfPrecision::new(&h, deg2rad(-30.0), deg2rad(120.0), 1.0E-10).unwrap();

    assert!((local.gdop - remote.gdop).abs() < 1.0E-9);
    assert!((local.pdop - remote.pdop).abs() < 1.0E-9);
    assert!((local.tdop - remote.tdop).abs() < 1.0E-9);
    assert!((local.hdop - remote.hdop).abs() > 1.0E-6);
}

#[rstest]
#[case(20.0)]
#[case(45.0)]
#[case(70.0)]
fn same_elevation_is_untrustworthy(#[case] elevation_deg: f64) {
    let rx = user_ecef();
    let (lat, lon) = user_geodetic();

    let vehicles = (0..6)
        .map(|i| vehicle_at(&rx, 60.0 * i as f64, elevation_deg, 21_000_000.0))
        .collect::<Vec<_>>();

    let h = geometry(&vehicles, &rx);
    assert!(DilutionOfPrecision::new(&h, lat, lon, 1.0E-10).is_none());
}

#[test]
fn aligned_vehicles_are_untrustworthy() {
    let rx = user_ecef();
    let (lat, lon) = user_geodetic();

    let vehicles = [20_000_000.0, 21_000_000.0, 22_000_000.0, 23_000_000.0]
        .iter()
        .map(|range| vehicle_at(&rx, 10.0, 50.0, *range))
        .collect::<Vec<_>>();

    let h = geometry(&vehicles, &rx);
    assert!(DilutionOfPrecision::new(&h, lat, lon, 1.0E-10).is_none());
}

#[test]
fn not_enough_rows() {
    let rx = user_ecef();
    let (lat, lon) = user_geodetic();

    let h = geometry(&random_geometry(5, 3, &rx), &rx);
    assert!(DilutionOfPrecision::new(&h, lat, lon, 1.0E-10).is_none());
}
