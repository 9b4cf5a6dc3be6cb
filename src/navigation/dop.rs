use log::debug;
use nalgebra::{Matrix3, Matrix4, MatrixXx4};

use crate::navigation::normal_matrix_inverse;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rotation from ECEF to the local East North Up frame,
/// columns are the East, North and Up unit vectors.
pub(crate) fn enu_rotation(lat_rad: f64, lon_rad: f64) -> Matrix3<f64> {
    let (sin_lat, cos_lat) = lat_rad.sin_cos();
    let (sin_lon, cos_lon) = lon_rad.sin_cos();

    Matrix3::<f64>::new(
        -sin_lon,
        -cos_lon * sin_lat,
        cos_lat * cos_lon,
        cos_lon,
        -sin_lat * sin_lon,
        cos_lat * sin_lon,
        0.0_f64,
        cos_lat,
        sin_lat,
    )
}

/// Dilution of Precision, resolved from the geometry matrix.
#[derive(Debug, Clone, Default, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DilutionOfPrecision {
    /// Geometric DOP
    pub gdop: f64,

    /// Position DOP
    pub pdop: f64,

    /// Horizontal DOP
    pub hdop: f64,

    /// Vertical DOP
    pub vdop: f64,

    /// Temporal DOP
    pub tdop: f64,
}

impl DilutionOfPrecision {
    /// Rotates the position block of (HᵀH)⁻¹ to the local ENU frame
    pub(crate) fn q_enu(q: &Matrix4<f64>, lat_rad: f64, lon_rad: f64) -> Matrix3<f64> {
        let r = enu_rotation(lat_rad, lon_rad);
        let q_3: Matrix3<f64> = q.fixed_view::<3, 3>(0, 0).into_owned();
        r.transpose() * q_3 * r
    }

    /// Creates new [DilutionOfPrecision].
    ///
    /// ## Input
    /// - geometry: H matrix at the solved state
    /// - lat_rad, lon_rad: geodetic coordinates of the solved state
    /// - min_rcond: minimal reciprocal condition number of HᵀH
    ///
    /// ## Returns
    /// - None when HᵀH is singular, ill conditioned, or any term
    ///   is not a positive real number: this geometry is not to be trusted.
    pub fn new(
        geometry: &MatrixXx4<f64>,
        lat_rad: f64,
        lon_rad: f64,
        min_rcond: f64,
    ) -> Option<Self> {
        let ht_h: Matrix4<f64> = geometry.transpose() * geometry;

        let q = match normal_matrix_inverse(&ht_h, min_rcond) {
            Ok(q) => q,
            Err(e) => {
                debug!("dop: {}", e);
                return None;
            },
        };

        let q_enu = Self::q_enu(&q, lat_rad, lon_rad);

        let terms = [
            q.trace(),
            q[(0, 0)] + q[(1, 1)] + q[(2, 2)],
            q_enu[(0, 0)] + q_enu[(1, 1)],
            q_enu[(2, 2)],
            q[(3, 3)],
        ];

        if terms.iter().any(|term| !term.is_finite() || *term < 0.0) {
            debug!("dop: negative or undefined terms {:?}", terms);
            return None;
        }

        Some(Self {
            gdop: terms[0].sqrt(),
            pdop: terms[1].sqrt(),
            hdop: terms[2].sqrt(),
            vdop: terms[3].sqrt(),
            tdop: terms[4].sqrt(),
        })
    }
}
