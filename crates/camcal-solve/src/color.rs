use camcal_core::{ColorCalibrationData, RgbImage};

use crate::SolveError;

/// Derives white balance, color matrix and tone response for a camera.
pub trait ColorCalibrator: Send + Sync {
    fn calibrate(&self, images: &[RgbImage], camera_id: &str)
        -> Result<ColorCalibrationData, SolveError>;
}

/// Neutral response: unit gains, identity matrix, gamma 2.2 at 5500 K.
///
/// Image content is ignored; chart-patch sampling would replace this.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeutralColor;

impl ColorCalibrator for NeutralColor {
    fn calibrate(
        &self,
        _images: &[RgbImage],
        camera_id: &str,
    ) -> Result<ColorCalibrationData, SolveError> {
        log::debug!("{camera_id}: using neutral color response");
        Ok(ColorCalibrationData::neutral())
    }
}
