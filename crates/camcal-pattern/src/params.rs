use serde::{Deserialize, Serialize};

/// Parameters of the lattice saddle detector.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChessboardParams {
    /// Interior intersections per side (`N`); the frame is tiled into
    /// `(N+1) x (N+1)` cells.
    pub grid_size: u32,

    /// Pixel offset of the sampling ring from the candidate.
    pub ring_radius: u32,

    /// Minimal number of brighter/darker transitions around the ring.
    pub min_sign_changes: usize,

    /// Physical square size reported with each detection.
    pub square_size: f32,
}

impl ChessboardParams {
    /// Largest accepted `grid_size`.
    pub const MAX_GRID_SIZE: u32 = 1024;
}

impl Default for ChessboardParams {
    fn default() -> Self {
        Self {
            grid_size: 9,
            ring_radius: 1,
            min_sign_changes: 4,
            square_size: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let p: ChessboardParams = serde_json::from_str(r#"{"ring_radius": 2}"#).expect("parse");
        assert_eq!(p.ring_radius, 2);
        assert_eq!(p.grid_size, 9);
        assert_eq!(p.min_sign_changes, 4);
    }
}
