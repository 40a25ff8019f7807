use camcal_core::GrayImage;
use nalgebra::Point2;

use crate::params::ChessboardParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Cyclic 8-neighbour ring, clockwise from the top-left neighbour.
const RING: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

/// Interior intersections of an `(n+1) x (n+1)` tiling, row-major.
pub fn lattice_points(width: usize, height: usize, n: u32) -> Vec<(usize, usize)> {
    let cells = n as usize + 1;
    let mut out = Vec::with_capacity((n as usize).pow(2));
    for j in 1..cells {
        for i in 1..cells {
            out.push((i * width / cells, j * height / cells));
        }
    }
    out
}

/// Number of adjacent ring positions that disagree on `neighbour > centre`.
pub fn count_sign_changes(gray: &GrayImage, x: usize, y: usize, radius: u32) -> usize {
    let (x, y, r) = (x as i64, y as i64, radius as i64);
    let centre = gray.get_clamped(x, y);
    let brighter = RING.map(|(dx, dy)| gray.get_clamped(x + dx * r, y + dy * r) > centre);
    (0..RING.len())
        .filter(|&k| brighter[k] != brighter[(k + 1) % RING.len()])
        .count()
}

/// Lattice intersections that pass the saddle test, in lattice order.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(gray, params), fields(width = gray.width, height = gray.height))
)]
pub fn detect_chessboard_corners(gray: &GrayImage, params: &ChessboardParams) -> Vec<Point2<f32>> {
    if gray.width == 0
        || gray.height == 0
        || params.grid_size == 0
        || params.grid_size > ChessboardParams::MAX_GRID_SIZE
    {
        return Vec::new();
    }

    lattice_points(gray.width, gray.height, params.grid_size)
        .into_iter()
        .filter(|&(x, y)| count_sign_changes(gray, x, y, params.ring_radius) >= params.min_sign_changes)
        .map(|(x, y)| Point2::new(x as f32, y as f32))
        .collect()
}
