//! Core value types for multi-camera calibration.
//!
//! This crate holds only data: images, calibration targets and the
//! calibration records produced by the estimators. It does not run any
//! estimation itself and carries no concurrency.

mod image;
mod logger;
mod pattern;
mod types;

pub use image::{luminance, GrayImage, RgbImage};
pub use pattern::{CalibrationPattern, PatternKind};
pub use types::{
    CameraCalibration, ColorCalibrationData, DistortionCoefficients, ExtrinsicParameters,
    IntrinsicParameters, Mat3, StereoCalibration, Vec3,
};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
