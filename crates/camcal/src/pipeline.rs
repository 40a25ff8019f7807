//! Single-camera and stereo calibration runs.
//!
//! A run is a pure function of its inputs: it never touches the store.
//! Publication is the engine's job.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use camcal_core::{CalibrationPattern, CameraCalibration, PatternKind, RgbImage, StereoCalibration};
use camcal_pattern::PatternDetector;
use camcal_solve::{
    assess_quality, total_points, CoarseIntrinsics, ColorCalibrator, DistortionEstimator,
    FixedDistortion, IntrinsicEstimator, NeutralColor, ReferenceStereo, StereoInput, StereoSolver,
};
use log::{debug, info};

use crate::cancel::CancelToken;
use crate::config::CalibrationConfig;
use crate::CalibrationError;

#[cfg(feature = "tracing")]
use tracing::instrument;

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Common size of all frames.
fn frame_dims(images: &[RgbImage]) -> Result<(usize, usize), CalibrationError> {
    let Some(first) = images.first() else {
        return Err(CalibrationError::InsufficientFrames {
            got: 0,
            required: 1,
        });
    };
    let expected = (first.width, first.height);
    for (index, img) in images.iter().enumerate() {
        if img.is_empty() {
            return Err(CalibrationError::EmptyFrame { index });
        }
        let got = (img.width, img.height);
        if got != expected {
            return Err(CalibrationError::DimensionMismatch {
                index,
                expected,
                got,
            });
        }
    }
    Ok(expected)
}

/// Detector plus the four estimators used by a run.
#[derive(Clone)]
pub struct CalibrationPipeline {
    pub detector: PatternDetector,
    pub min_frames: usize,
    intrinsics: Arc<dyn IntrinsicEstimator>,
    distortion: Arc<dyn DistortionEstimator>,
    color: Arc<dyn ColorCalibrator>,
    stereo: Arc<dyn StereoSolver>,
}

impl std::fmt::Debug for CalibrationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalibrationPipeline")
            .field("detector", &self.detector)
            .field("min_frames", &self.min_frames)
            .finish_non_exhaustive()
    }
}

impl Default for CalibrationPipeline {
    fn default() -> Self {
        Self::from_config(&CalibrationConfig::default())
    }
}

impl CalibrationPipeline {
    /// Bundled estimators with the detector and frame minimum from `config`.
    pub fn from_config(config: &CalibrationConfig) -> Self {
        Self {
            detector: PatternDetector::new(config.chessboard.clone()),
            min_frames: config.min_frames,
            intrinsics: Arc::new(CoarseIntrinsics),
            distortion: Arc::new(FixedDistortion::default()),
            color: Arc::new(NeutralColor),
            stereo: Arc::new(ReferenceStereo::default()),
        }
    }

    pub fn with_intrinsics(mut self, estimator: impl IntrinsicEstimator + 'static) -> Self {
        self.intrinsics = Arc::new(estimator);
        self
    }

    pub fn with_distortion(mut self, estimator: impl DistortionEstimator + 'static) -> Self {
        self.distortion = Arc::new(estimator);
        self
    }

    pub fn with_color(mut self, calibrator: impl ColorCalibrator + 'static) -> Self {
        self.color = Arc::new(calibrator);
        self
    }

    pub fn with_stereo(mut self, solver: impl StereoSolver + 'static) -> Self {
        self.stereo = Arc::new(solver);
        self
    }

    fn require_frames(&self, got: usize) -> Result<(), CalibrationError> {
        if got < self.min_frames {
            return Err(CalibrationError::InsufficientFrames {
                got,
                required: self.min_frames,
            });
        }
        Ok(())
    }

    /// Detections of the frames where the target was found, in frame order.
    fn detected(&self, images: &[RgbImage], kind: PatternKind) -> Vec<CalibrationPattern> {
        self.detector
            .detect_all(images, kind)
            .into_iter()
            .filter(CalibrationPattern::is_detected)
            .collect()
    }

    /// Calibrate one camera from at least `min_frames` frames.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, images, cancel), fields(frames = images.len()))
    )]
    pub fn calibrate_camera(
        &self,
        camera_id: &str,
        images: &[RgbImage],
        kind: PatternKind,
        cancel: &CancelToken,
    ) -> Result<CameraCalibration, CalibrationError> {
        self.require_frames(images.len())?;
        frame_dims(images)?;
        cancel.check()?;
        let patterns = self.detected(images, kind);
        self.estimate(camera_id, images, &patterns, cancel)
    }

    /// Estimate a camera record from already-detected patterns.
    fn estimate(
        &self,
        camera_id: &str,
        images: &[RgbImage],
        patterns: &[CalibrationPattern],
        cancel: &CancelToken,
    ) -> Result<CameraCalibration, CalibrationError> {
        let (width, height) = frame_dims(images)?;
        debug!(
            "{camera_id}: pattern found in {}/{} frames",
            patterns.len(),
            images.len()
        );
        cancel.check()?;

        let intrinsics = self
            .intrinsics
            .estimate(patterns, width as u32, height as u32)?;
        let distortion = self.distortion.estimate(patterns, &intrinsics)?;
        cancel.check()?;
        let color = self.color.calibrate(images, camera_id)?;
        let points = total_points(patterns);
        let quality_score = assess_quality(points);
        info!("{camera_id}: calibrated from {points} points, quality {quality_score:.2}");

        Ok(CameraCalibration {
            camera_id: camera_id.to_string(),
            intrinsics,
            distortion,
            color,
            quality_score,
            timestamp_ms: now_ms(),
        })
    }

    /// Calibrate a camera pair. Both sides are calibrated first, left then
    /// right; either failing fails the whole run.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, left_images, right_images, cancel),
            fields(left_frames = left_images.len(), right_frames = right_images.len())
        )
    )]
    pub fn calibrate_stereo(
        &self,
        left_id: &str,
        right_id: &str,
        left_images: &[RgbImage],
        right_images: &[RgbImage],
        kind: PatternKind,
        cancel: &CancelToken,
    ) -> Result<StereoCalibration, CalibrationError> {
        if left_id == right_id {
            return Err(CalibrationError::SameCamera {
                id: left_id.to_string(),
            });
        }
        if left_images.len() != right_images.len() {
            return Err(CalibrationError::FrameCountMismatch {
                left: left_images.len(),
                right: right_images.len(),
            });
        }
        self.require_frames(left_images.len())?;
        frame_dims(left_images)?;
        frame_dims(right_images)?;
        cancel.check()?;

        let left_patterns = self.detected(left_images, kind);
        let right_patterns = self.detected(right_images, kind);
        if left_patterns.len() != right_patterns.len() {
            return Err(CalibrationError::DetectionCountMismatch {
                left: left_patterns.len(),
                right: right_patterns.len(),
            });
        }
        cancel.check()?;

        let left = self.estimate(left_id, left_images, &left_patterns, cancel)?;
        let right = self.estimate(right_id, right_images, &right_patterns, cancel)?;
        cancel.check()?;

        let geometry = self.stereo.solve(&StereoInput {
            left: &left,
            right: &right,
            left_patterns: &left_patterns,
            right_patterns: &right_patterns,
        })?;
        info!(
            "{left_id}/{right_id}: stereo baseline {:.1} mm, epipolar error {:.2} px",
            geometry.extrinsics.baseline_mm, geometry.epipolar_error_px
        );

        Ok(StereoCalibration {
            left,
            right,
            extrinsics: geometry.extrinsics,
            fundamental: geometry.fundamental,
            essential: geometry.essential,
            rectification_quality: geometry.rectification_quality,
            epipolar_error_px: geometry.epipolar_error_px,
        })
    }
}
