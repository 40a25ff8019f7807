use camcal_core::{CalibrationPattern, PatternKind, RgbImage};
use log::debug;
use nalgebra::Point2;
use rayon::prelude::*;

use crate::chessboard::detect_chessboard_corners;
use crate::params::ChessboardParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Extracts calibration-target points from frames.
#[derive(Clone, Debug, Default)]
pub struct PatternDetector {
    pub params: ChessboardParams,
}

impl PatternDetector {
    pub fn new(params: ChessboardParams) -> Self {
        Self { params }
    }

    /// Detect `kind` in one frame.
    ///
    /// The result is never an error: a frame without the target yields an
    /// empty point list.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, image), fields(width = image.width, height = image.height))
    )]
    pub fn detect(&self, image: &RgbImage, kind: PatternKind) -> CalibrationPattern {
        let points = self.points(image, kind);
        debug!("{:?}: {} points in {}x{} frame", kind, points.len(), image.width, image.height);
        CalibrationPattern {
            kind,
            grid_size: self.params.grid_size,
            square_size: self.params.square_size,
            points,
        }
    }

    /// Detect `kind` in every frame, in parallel on the current rayon pool.
    pub fn detect_all(&self, images: &[RgbImage], kind: PatternKind) -> Vec<CalibrationPattern> {
        images.par_iter().map(|img| self.detect(img, kind)).collect()
    }

    fn points(&self, image: &RgbImage, kind: PatternKind) -> Vec<Point2<f32>> {
        match kind {
            PatternKind::Chessboard => detect_chessboard_corners(&image.to_gray(), &self.params),
            // No detector exists for these targets yet.
            PatternKind::CirclesGrid | PatternKind::AsymmetricCircles | PatternKind::ColorChecker => {
                debug!("no detector for {:?}; reporting no points", kind);
                Vec::new()
            }
        }
    }
}
