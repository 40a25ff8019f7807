//! Calibration target detection.
//!
//! ## Quickstart
//!
//! ```
//! use camcal_core::PatternKind;
//! use camcal_pattern::{synthetic, ChessboardParams, PatternDetector};
//!
//! let detector = PatternDetector::new(ChessboardParams::default());
//! let frame = synthetic::chessboard_image(200, 200, 9);
//! let pattern = detector.detect(&frame, PatternKind::Chessboard);
//! assert_eq!(pattern.points.len(), 81);
//! ```
//!
//! Chessboard detection is a coarse saddle test evaluated at a fixed lattice:
//! 1. Convert the frame to luminance.
//! 2. Tile it into `(N+1) x (N+1)` cells and visit the `N x N` interior
//!    intersections.
//! 3. Sample an 8-neighbour ring around each intersection and count the sign
//!    changes of `neighbour > centre` around the ring.
//! 4. Accept the intersection as a corner when there are at least 4 changes.
//!
//! Circle grids and color checkers are recognised kinds without a detector;
//! they always report no points.

mod chessboard;
mod detector;
mod params;
pub mod synthetic;

pub use chessboard::{count_sign_changes, detect_chessboard_corners, lattice_points};
pub use detector::PatternDetector;
pub use params::ChessboardParams;
