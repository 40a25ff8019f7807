//! Applies stored calibrations to new frames.
//!
//! Every function works on a private copy; the source frame is never touched.

use std::sync::Arc;

use camcal_core::{ColorCalibrationData, DistortionCoefficients, IntrinsicParameters, RgbImage};
use log::debug;

use crate::store::CalibrationStore;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Single-coefficient radial remap around the principal point.
///
/// For an output pixel at offset `(dx, dy)` from the principal point, the
/// source is sampled at `c + (dx, dy) * (1 + k1 * r^2)`, where `r` is the
/// offset in focal-length units, rounded to the nearest pixel and clamped to
/// the frame. Only `k1` is used.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip_all, fields(width = image.width, height = image.height))
)]
pub fn undistort_image(
    image: &RgbImage,
    intrinsics: &IntrinsicParameters,
    distortion: &DistortionCoefficients,
) -> RgbImage {
    let mut out = image.clone();
    if image.is_empty() {
        return out;
    }
    let (cx, cy) = (intrinsics.cx, intrinsics.cy);
    let (fx, fy) = (intrinsics.fx.max(f64::EPSILON), intrinsics.fy.max(f64::EPSILON));
    let max_x = (image.width - 1) as f64;
    let max_y = (image.height - 1) as f64;

    for y in 0..image.height {
        for x in 0..image.width {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let r2 = (dx / fx).powi(2) + (dy / fy).powi(2);
            let factor = 1.0 + distortion.k1 * r2;
            let sx = (cx + dx * factor).round().clamp(0.0, max_x) as usize;
            let sy = (cy + dy * factor).round().clamp(0.0, max_y) as usize;
            out.put_pixel(x, y, image.pixel(sx, sy));
        }
    }
    out
}

/// Scale each channel by its white-balance gain, clamped to `0..=255`.
pub fn apply_white_balance(image: &RgbImage, color: &ColorCalibrationData) -> RgbImage {
    let gains = [
        color.white_balance.x,
        color.white_balance.y,
        color.white_balance.z,
    ];
    let mut out = image.clone();
    for px in out.data.chunks_exact_mut(3) {
        for (v, gain) in px.iter_mut().zip(gains) {
            *v = (*v as f64 * gain).round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Store-backed corrector.
///
/// A camera without a stored calibration yields `None`: the caller keeps
/// the frame unchanged.
#[derive(Clone, Debug)]
pub struct ImageCorrector {
    store: Arc<CalibrationStore>,
}

impl ImageCorrector {
    pub fn new(store: Arc<CalibrationStore>) -> Self {
        Self { store }
    }

    pub fn undistort(&self, image: &RgbImage, camera_id: &str) -> Option<RgbImage> {
        let Some(calib) = self.store.camera(camera_id) else {
            debug!("{camera_id}: no calibration, undistort is a pass-through");
            return None;
        };
        Some(undistort_image(image, &calib.intrinsics, &calib.distortion))
    }

    pub fn color_correct(&self, image: &RgbImage, camera_id: &str) -> Option<RgbImage> {
        let Some(calib) = self.store.camera(camera_id) else {
            debug!("{camera_id}: no calibration, color correction is a pass-through");
            return None;
        };
        Some(apply_white_balance(image, &calib.color))
    }

    /// Undistort followed by color correction, from a single record.
    pub fn correct(&self, image: &RgbImage, camera_id: &str) -> Option<RgbImage> {
        let calib = self.store.camera(camera_id)?;
        let geometric = undistort_image(image, &calib.intrinsics, &calib.distortion);
        Some(apply_white_balance(&geometric, &calib.color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::camera;
    use camcal_core::Vec3;
    use camcal_pattern::synthetic;

    fn intrinsics_200() -> IntrinsicParameters {
        camera("c", 0.95).intrinsics
    }

    #[test]
    fn zero_k1_is_identity() {
        let img = synthetic::gradient_image(200, 200);
        let out = undistort_image(&img, &intrinsics_200(), &DistortionCoefficients::default());
        assert_eq!(out, img);
    }

    #[test]
    fn barrel_remap_pulls_corners_inward() {
        let img = synthetic::gradient_image(200, 200);
        let d = DistortionCoefficients {
            k1: -0.1,
            ..DistortionCoefficients::default()
        };
        let out = undistort_image(&img, &intrinsics_200(), &d);
        // (0,0): offset (-100,-100), r^2 = 0.5, factor 0.95 -> source (5,5)
        assert_eq!(out.pixel(0, 0), img.pixel(5, 5));
        // principal point maps onto itself
        assert_eq!(out.pixel(100, 100), img.pixel(100, 100));
        assert_ne!(out, img);
    }

    #[test]
    fn strong_pincushion_is_clamped() {
        let img = synthetic::gradient_image(50, 40);
        let mut k = intrinsics_200();
        k.cx = 25.0;
        k.cy = 20.0;
        let d = DistortionCoefficients {
            k1: 500.0,
            ..DistortionCoefficients::default()
        };
        let out = undistort_image(&img, &k, &d);
        assert_eq!(out.pixel(0, 0), img.pixel(0, 0));
        assert_eq!(out.pixel(49, 39), img.pixel(49, 39));
    }

    #[test]
    fn white_balance_scales_and_clamps() {
        let img = RgbImage::from_raw(2, 1, vec![100, 100, 100, 200, 10, 0]).expect("buffer");
        let color = ColorCalibrationData {
            white_balance: Vec3::new(2.0, 0.5, 1.0),
            ..ColorCalibrationData::neutral()
        };
        let out = apply_white_balance(&img, &color);
        assert_eq!(out.data, vec![200, 50, 100, 255, 5, 0]);
    }

    #[test]
    fn corrector_passes_through_without_record() {
        let store = Arc::new(CalibrationStore::new());
        let corrector = ImageCorrector::new(store.clone());
        let img = synthetic::gradient_image(32, 32);
        let before = img.checksum();
        assert!(corrector.undistort(&img, "nope").is_none());
        assert!(corrector.color_correct(&img, "nope").is_none());
        assert!(corrector.correct(&img, "nope").is_none());
        assert_eq!(img.checksum(), before);
    }

    #[test]
    fn corrector_uses_stored_record() {
        let store = Arc::new(CalibrationStore::new());
        let mut record = camera("cam0", 0.95);
        record.distortion.k1 = -0.1;
        record.color.white_balance = Vec3::new(1.0, 1.0, 0.0);
        assert!(store.publish_camera(0, record));
        let corrector = ImageCorrector::new(store);

        let img = synthetic::gradient_image(200, 200);
        let before = img.checksum();
        let undistorted = corrector.undistort(&img, "cam0").expect("calibrated");
        assert_eq!(undistorted.pixel(0, 0), img.pixel(5, 5));

        let corrected = corrector.correct(&img, "cam0").expect("calibrated");
        assert!(corrected.data.chunks_exact(3).all(|px| px[2] == 0));
        assert_eq!(img.checksum(), before);
    }
}
