//! Synthetic frames for tests and demos.

use camcal_core::RgbImage;

const DARK: [u8; 3] = [0, 0, 0];
const LIGHT: [u8; 3] = [255, 255, 255];
const EDGE: [u8; 3] = [128, 128, 128];

fn boundaries(len: usize, n: u32) -> Vec<usize> {
    let cells = n as usize + 1;
    (1..cells).map(|k| k * len / cells).collect()
}

/// Chessboard whose square boundaries fall on the detector lattice of a
/// `grid_size` detector.
///
/// Boundary pixels are mid-gray, as an anti-aliased edge would be.
pub fn chessboard_image(width: usize, height: usize, grid_size: u32) -> RgbImage {
    let xs = boundaries(width, grid_size);
    let ys = boundaries(height, grid_size);
    RgbImage::from_fn(width, height, |x, y| {
        if xs.contains(&x) || ys.contains(&y) {
            return EDGE;
        }
        let cx = xs.iter().filter(|&&b| b < x).count();
        let cy = ys.iter().filter(|&&b| b < y).count();
        if (cx + cy) % 2 == 0 {
            DARK
        } else {
            LIGHT
        }
    })
}

pub fn uniform_image(width: usize, height: usize, rgb: [u8; 3]) -> RgbImage {
    RgbImage::from_fn(width, height, |_, _| rgb)
}

/// Horizontal RGB ramp; every pixel differs from its neighbours.
pub fn gradient_image(width: usize, height: usize) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        [r, g, r / 2 + g / 2]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_follow_lattice() {
        assert_eq!(boundaries(200, 9), (1..10).map(|k| k * 20).collect::<Vec<_>>());
    }

    #[test]
    fn board_alternates_between_cells() {
        let img = chessboard_image(200, 200, 9);
        assert_eq!(img.pixel(10, 10), DARK);
        assert_eq!(img.pixel(30, 10), LIGHT);
        assert_eq!(img.pixel(30, 30), DARK);
        assert_eq!(img.pixel(20, 5), EDGE);
    }
}
