//! Minimal owned image buffers.
//!
//! Both buffers are row-major and tightly packed. `RgbImage` stores three
//! interleaved 8-bit channels per pixel.

/// ITU-R BT.601 luma of an RGB triple.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RgbImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>, // len = w*h*3
}

#[derive(Clone, Debug, PartialEq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>, // len = w*h
}

impl RgbImage {
    /// Black image of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 3],
        }
    }

    /// Wrap a raw interleaved RGB buffer; `None` if the length does not match.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        let expected = width.checked_mul(height)?.checked_mul(3)?;
        (data.len() == expected).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = (y * self.width + x) * 3;
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    /// Luminance image using [`luminance`].
    pub fn to_gray(&self) -> GrayImage {
        let data = self
            .data
            .chunks_exact(3)
            .map(|px| luminance(px[0], px[1], px[2]))
            .collect();
        GrayImage {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// FNV-1a digest over dimensions and pixel bytes.
    pub fn checksum(&self) -> u64 {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0100_0000_01b3;
        let dims = [self.width as u64, self.height as u64];
        let mut h = OFFSET;
        for b in dims
            .iter()
            .flat_map(|d| d.to_le_bytes())
            .chain(self.data.iter().copied())
        {
            h ^= b as u64;
            h = h.wrapping_mul(PRIME);
        }
        h
    }
}

impl GrayImage {
    /// Brightness at `(x, y)` with coordinates clamped to the image.
    #[inline]
    pub fn get_clamped(&self, x: i64, y: i64) -> f32 {
        let xc = x.clamp(0, self.width as i64 - 1) as usize;
        let yc = y.clamp(0, self.height as i64 - 1) as usize;
        self.data[yc * self.width + xc]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_uses_bt601_weights() {
        let img = RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 0, 255]).expect("valid buffer");
        let gray = img.to_gray();
        assert!((gray.data[0] - 76.245).abs() < 1e-3);
        assert!((gray.data[1] - 29.07).abs() < 1e-3);
    }

    #[test]
    fn from_raw_rejects_wrong_length() {
        assert!(RgbImage::from_raw(2, 2, vec![0; 11]).is_none());
        assert!(RgbImage::from_raw(2, 2, vec![0; 12]).is_some());
    }

    #[test]
    fn checksum_tracks_content_and_shape() {
        let a = RgbImage::new(4, 2);
        let b = RgbImage::new(2, 4);
        let mut c = a.clone();
        assert_eq!(a.checksum(), c.checksum());
        c.put_pixel(1, 1, [1, 2, 3]);
        assert_ne!(a.checksum(), c.checksum());
        assert_ne!(a.checksum(), b.checksum());
    }

    #[test]
    fn clamped_lookup_stays_in_bounds() {
        let img = RgbImage::from_fn(3, 3, |x, y| {
            let v = (y * 3 + x) as u8 * 10;
            [v, v, v]
        })
        .to_gray();
        assert!((img.get_clamped(-5, -5) - 0.0).abs() < 1e-3);
        assert!((img.get_clamped(10, 10) - 80.0).abs() < 1e-3);
    }
}
