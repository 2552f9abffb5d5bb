use crate::error::RecognitionError;
use image::{DynamicImage, GrayImage, Luma};

/// Convert image to an 8-bit luminance map
///
/// Color is reduced to luminance. Images with a translucent alpha channel are
/// read through that channel instead, since glyph sheets exported with a
/// transparent background carry the glyph shape only in alpha.
pub fn apply(image: &DynamicImage) -> Result<GrayImage, RecognitionError> {
    match image {
        DynamicImage::ImageLuma8(gray) => Ok(gray.clone()),
        DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgb32F(_) => Ok(image.to_luma8()),
        DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgba8(_)
        | DynamicImage::ImageRgba16(_)
        | DynamicImage::ImageRgba32F(_) => {
            let luma_alpha = image.to_luma_alpha8();
            if luma_alpha.pixels().all(|p| p.0[1] == u8::MAX) {
                return Ok(image.to_luma8());
            }
            Ok(GrayImage::from_fn(
                luma_alpha.width(),
                luma_alpha.height(),
                |x, y| Luma([luma_alpha.get_pixel(x, y).0[1]]),
            ))
        }
        other => Err(RecognitionError::UnsupportedImageFormat(format!(
            "{:?}",
            other.color()
        ))),
    }
}
