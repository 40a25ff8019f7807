//! Relative pose and epipolar geometry of a camera pair.

use camcal_core::{CalibrationPattern, CameraCalibration, ExtrinsicParameters, Mat3, Vec3};

use crate::SolveError;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Inputs of a stereo solve: both single-camera calibrations and the
/// per-frame detections of each side, in capture order.
#[derive(Clone, Copy, Debug)]
pub struct StereoInput<'a> {
    pub left: &'a CameraCalibration,
    pub right: &'a CameraCalibration,
    pub left_patterns: &'a [CalibrationPattern],
    pub right_patterns: &'a [CalibrationPattern],
}

/// Output of a stereo solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StereoGeometry {
    pub extrinsics: ExtrinsicParameters,
    pub fundamental: Mat3,
    pub essential: Mat3,
    pub rectification_quality: f64,
    pub epipolar_error_px: f64,
}

pub trait StereoSolver: Send + Sync {
    fn solve(&self, input: &StereoInput<'_>) -> Result<StereoGeometry, SolveError>;
}

/// Fixed rig geometry: identity rotation, 50 mm baseline along +x, parallel
/// optical axes.
///
/// Fundamental and essential matrices are identity placeholders, so the
/// epipolar constraint is not meaningful; an 8-point solve would replace
/// this behind [`StereoSolver`].
#[derive(Clone, Copy, Debug)]
pub struct ReferenceStereo {
    pub baseline_mm: f64,
    pub rectification_quality: f64,
    pub epipolar_error_px: f64,
}

impl Default for ReferenceStereo {
    fn default() -> Self {
        Self {
            baseline_mm: 50.0,
            rectification_quality: 0.90,
            epipolar_error_px: 0.5,
        }
    }
}

impl StereoSolver for ReferenceStereo {
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, input), fields(left = %input.left.camera_id, right = %input.right.camera_id))
    )]
    fn solve(&self, input: &StereoInput<'_>) -> Result<StereoGeometry, SolveError> {
        if input.left_patterns.is_empty() && input.right_patterns.is_empty() {
            log::debug!(
                "{}/{}: no paired detections, geometry is nominal",
                input.left.camera_id,
                input.right.camera_id
            );
        }
        Ok(StereoGeometry {
            extrinsics: ExtrinsicParameters {
                rotation: Mat3::identity(),
                translation: Vec3::new(self.baseline_mm, 0.0, 0.0),
                baseline_mm: self.baseline_mm,
                convergence_angle_deg: 0.0,
            },
            fundamental: Mat3::identity(),
            essential: Mat3::identity(),
            rectification_quality: self.rectification_quality,
            epipolar_error_px: self.epipolar_error_px,
        })
    }
}
