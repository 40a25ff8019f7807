//! Calibration records.
//!
//! Matrices and vectors are fixed-size `nalgebra` values, so records compare
//! component-wise with the derived `PartialEq`.

use std::hash::{Hash, Hasher};

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

pub type Mat3 = Matrix3<f64>;
pub type Vec3 = Vector3<f64>;

/// Pinhole projection parameters of one camera.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntrinsicParameters {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
    pub image_width: u32,
    pub image_height: u32,
    pub fov_horizontal_deg: f64,
    pub fov_vertical_deg: f64,
}

impl IntrinsicParameters {
    /// Camera matrix `K`.
    pub fn camera_matrix(&self) -> Mat3 {
        Mat3::new(
            self.fx, 0.0, self.cx, //
            0.0, self.fy, self.cy, //
            0.0, 0.0, 1.0,
        )
    }
}

/// Brown-Conrady coefficients: radial `k1..k3`, tangential `p1, p2`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DistortionCoefficients {
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
    pub p1: f64,
    pub p2: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorCalibrationData {
    /// Per-channel white-balance gains in R, G, B order.
    pub white_balance: Vec3,
    pub color_matrix: Mat3,
    pub gamma: f64,
    /// Reference color temperature in Kelvin.
    pub reference_temperature_k: f64,
    pub tint: f64,
}

impl ColorCalibrationData {
    /// Unit gains, identity matrix, gamma 2.2 at 5500 K.
    pub fn neutral() -> Self {
        Self {
            white_balance: Vec3::new(1.0, 1.0, 1.0),
            color_matrix: Mat3::identity(),
            gamma: 2.2,
            reference_temperature_k: 5500.0,
            tint: 0.0,
        }
    }
}

/// Full calibration of a single camera.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraCalibration {
    pub camera_id: String,
    pub intrinsics: IntrinsicParameters,
    pub distortion: DistortionCoefficients,
    pub color: ColorCalibrationData,
    /// In `[0, 1]`.
    pub quality_score: f64,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

impl CameraCalibration {
    pub fn camera_matrix(&self) -> Mat3 {
        self.intrinsics.camera_matrix()
    }
}

/// Rigid transform from the left camera frame into the right one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtrinsicParameters {
    pub rotation: Mat3,
    /// Translation in millimetres.
    pub translation: Vec3,
    pub baseline_mm: f64,
    pub convergence_angle_deg: f64,
}

// Consistent with the derived `PartialEq`: `-0.0` hashes like `0.0`.
fn hash_f64<H: Hasher>(v: f64, state: &mut H) {
    let bits = if v == 0.0 { 0 } else { v.to_bits() };
    bits.hash(state);
}

// NaN components are outside the equality contract.
impl Eq for ExtrinsicParameters {}

impl Hash for ExtrinsicParameters {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for &v in self.rotation.iter().chain(self.translation.iter()) {
            hash_f64(v, state);
        }
        hash_f64(self.baseline_mm, state);
        hash_f64(self.convergence_angle_deg, state);
    }
}

/// Relative pose and epipolar geometry of a camera pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StereoCalibration {
    pub left: CameraCalibration,
    pub right: CameraCalibration,
    pub extrinsics: ExtrinsicParameters,
    pub fundamental: Mat3,
    pub essential: Mat3,
    pub rectification_quality: f64,
    /// Mean epipolar residual in pixels.
    pub epipolar_error_px: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;

    fn digest<T: Hash>(v: &T) -> u64 {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    fn extrinsics(tx: f64) -> ExtrinsicParameters {
        ExtrinsicParameters {
            rotation: Mat3::identity(),
            translation: Vec3::new(tx, 0.0, 0.0),
            baseline_mm: tx.abs(),
            convergence_angle_deg: 0.0,
        }
    }

    #[test]
    fn extrinsics_equality_is_by_content() {
        let a = extrinsics(50.0);
        let b = extrinsics(50.0);
        assert_eq!(a, b);
        assert_eq!(digest(&a), digest(&b));
        assert_ne!(a, extrinsics(51.0));

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn signed_zero_hashes_consistently() {
        let mut a = extrinsics(50.0);
        let mut b = a;
        a.convergence_angle_deg = 0.0;
        b.convergence_angle_deg = -0.0;
        assert_eq!(a, b);
        assert_eq!(digest(&a), digest(&b));
    }

    #[test]
    fn camera_matrix_layout() {
        let intr = IntrinsicParameters {
            fx: 800.0,
            fy: 810.0,
            cx: 320.0,
            cy: 240.0,
            image_width: 640,
            image_height: 480,
            fov_horizontal_deg: 0.0,
            fov_vertical_deg: 0.0,
        };
        let k = intr.camera_matrix();
        approx::assert_relative_eq!(k[(0, 0)], 800.0);
        approx::assert_relative_eq!(k[(1, 1)], 810.0);
        approx::assert_relative_eq!(k[(0, 2)], 320.0);
        approx::assert_relative_eq!(k[(1, 2)], 240.0);
        approx::assert_relative_eq!(k[(2, 2)], 1.0);
    }

    #[test]
    fn records_serialize_through_json() {
        let color = ColorCalibrationData::neutral();
        let json = serde_json::to_string(&color).expect("serialize");
        let back: ColorCalibrationData = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(color, back);
    }
}
