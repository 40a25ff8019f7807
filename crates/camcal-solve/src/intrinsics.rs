use camcal_core::{CalibrationPattern, IntrinsicParameters};

use crate::SolveError;

/// Derives projection parameters from per-frame point sets.
pub trait IntrinsicEstimator: Send + Sync {
    fn estimate(
        &self,
        patterns: &[CalibrationPattern],
        width: u32,
        height: u32,
    ) -> Result<IntrinsicParameters, SolveError>;
}

/// Full field of view in degrees for a sensor extent and focal length (pixels).
pub fn field_of_view_deg(extent: f64, focal: f64) -> f64 {
    2.0 * (extent / (2.0 * focal)).atan() * 180.0 / std::f64::consts::PI
}

/// Size-based approximation: `f = (w + h) / 2` for both axes and the
/// principal point at the image centre.
///
/// Good enough for coarse alignment of camera feeds, not for metrology. The
/// point sets are accepted but do not influence the result.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoarseIntrinsics;

impl IntrinsicEstimator for CoarseIntrinsics {
    fn estimate(
        &self,
        _patterns: &[CalibrationPattern],
        width: u32,
        height: u32,
    ) -> Result<IntrinsicParameters, SolveError> {
        if width == 0 || height == 0 {
            return Err(SolveError::DegenerateImage { width, height });
        }
        let (w, h) = (width as f64, height as f64);
        let focal = (w + h) / 2.0;
        Ok(IntrinsicParameters {
            fx: focal,
            fy: focal,
            cx: w / 2.0,
            cy: h / 2.0,
            image_width: width,
            image_height: height,
            fov_horizontal_deg: field_of_view_deg(w, focal),
            fov_vertical_deg: field_of_view_deg(h, focal),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn coarse_intrinsics_for_vga() {
        let k = CoarseIntrinsics.estimate(&[], 640, 480).expect("estimate");
        assert_relative_eq!(k.fx, 560.0);
        assert_relative_eq!(k.fy, 560.0);
        assert_relative_eq!(k.cx, 320.0);
        assert_relative_eq!(k.cy, 240.0);
        assert_eq!((k.image_width, k.image_height), (640, 480));
        let hfov = 2.0 * (640.0_f64 / 1120.0).atan().to_degrees();
        let vfov = 2.0 * (480.0_f64 / 1120.0).atan().to_degrees();
        assert_relative_eq!(k.fov_horizontal_deg, hfov, epsilon = 1e-9);
        assert_relative_eq!(k.fov_vertical_deg, vfov, epsilon = 1e-9);
    }

    #[test]
    fn square_sensor_fov() {
        // f = w, so fov = 2 atan(1/2)
        let fov = field_of_view_deg(100.0, 100.0);
        assert_relative_eq!(fov, 53.130102354155985, epsilon = 1e-9);
    }

    #[test]
    fn zero_size_is_rejected() {
        let err = CoarseIntrinsics.estimate(&[], 0, 480).unwrap_err();
        assert_eq!(
            err,
            SolveError::DegenerateImage {
                width: 0,
                height: 480
            }
        );
    }
}
