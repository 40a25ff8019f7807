//! Multi-camera calibration: estimation, storage and correction.
//!
//! Frames go through pattern detection, intrinsic/distortion/color
//! estimation and quality scoring; the resulting records are kept per camera
//! id and per unordered camera pair, and later used to undistort and
//! color-correct new frames.
//!
//! ## Quickstart
//!
//! ```
//! use camcal::{CalibrationConfig, CalibrationEngine};
//! use camcal::core::PatternKind;
//! use camcal::pattern::synthetic;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = CalibrationEngine::new(CalibrationConfig::default())?;
//! let frames = vec![synthetic::chessboard_image(200, 200, 9); 12];
//!
//! let record = engine
//!     .calibrate_single_camera("cam0", frames, PatternKind::Chessboard)
//!     .wait()
//!     .expect("calibrated");
//! assert_eq!(record.quality_score, 0.95);
//! assert_eq!(engine.get_calibration_data("cam0"), Some(record));
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `camcal::core`: images, targets and calibration records.
//! - `camcal::pattern`: target detection.
//! - `camcal::solve`: estimator traits and the bundled estimators.
//! - [`CalibrationEngine`]: worker pool, store and the public operations.
//! - [`ImageCorrector`]: synchronous undistort / color correction.
//! - `camcal::convert` (feature `image`): `image::RgbImage` interop.

mod cancel;
mod config;
mod corrector;
mod engine;
mod error;
mod pipeline;
mod snapshot;
mod store;
mod task;

#[cfg(feature = "image")]
pub mod convert;

pub use camcal_core as core;
pub use camcal_pattern as pattern;
pub use camcal_solve as solve;

pub use cancel::CancelToken;
pub use config::{CalibrationConfig, ConfigError};
pub use corrector::{apply_white_balance, undistort_image, ImageCorrector};
pub use engine::CalibrationEngine;
pub use error::{CalibrationError, EngineError};
pub use pipeline::CalibrationPipeline;
pub use snapshot::{CalibrationSnapshot, SnapshotError};
pub use store::{CalibrationStore, StereoKey};
pub use task::CalibrationTask;

pub use camcal_core::{CameraCalibration, PatternKind, RgbImage, StereoCalibration};

#[cfg(feature = "tracing")]
pub use camcal_core::init_tracing;
pub use camcal_core::init_with_level;
