//! Conversions to and from `image` crate buffers.

use camcal_core::RgbImage;

pub fn from_image(img: &::image::RgbImage) -> RgbImage {
    RgbImage {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw().clone(),
    }
}

pub fn to_image(img: &RgbImage) -> Option<::image::RgbImage> {
    let width = u32::try_from(img.width).ok()?;
    let height = u32::try_from(img.height).ok()?;
    ::image::RgbImage::from_raw(width, height, img.data.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_survive_conversion() {
        let src = ::image::RgbImage::from_fn(5, 3, |x, y| ::image::Rgb([x as u8, y as u8, 9]));
        let ours = from_image(&src);
        assert_eq!((ours.width, ours.height), (5, 3));
        assert_eq!(ours.pixel(4, 2), [4, 2, 9]);
        assert_eq!(to_image(&ours).expect("convert"), src);
    }
}
