use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Kind of calibration target visible in the frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Chessboard,
    CirclesGrid,
    AsymmetricCircles,
    ColorChecker,
}

/// Feature points extracted from a single frame.
///
/// An empty `points` list means the target was not found in the frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPattern {
    pub kind: PatternKind,
    /// Number of interior grid intersections per side.
    pub grid_size: u32,
    /// Physical side length of one square, in board units.
    pub square_size: f32,
    /// Detected points in pixel coordinates.
    pub points: Vec<Point2<f32>>,
}

impl CalibrationPattern {
    pub fn is_detected(&self) -> bool {
        !self.points.is_empty()
    }
}
