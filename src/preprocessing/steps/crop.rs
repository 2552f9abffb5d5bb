use crate::error::RecognitionError;
use image::{DynamicImage, GenericImageView};
use imageproc::rect::Rect;
use std::borrow::Cow;

/// Restrict the image to `region`, renumbering coordinates to start at (0, 0)
/// in the region's own frame. Without a region the image is borrowed as is.
pub fn apply(
    image: &DynamicImage,
    region: Option<Rect>,
) -> Result<Cow<'_, DynamicImage>, RecognitionError> {
    let Some(rect) = region else {
        return Ok(Cow::Borrowed(image));
    };

    let (image_width, image_height) = image.dimensions();
    let invalid = || RecognitionError::InvalidRegion {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
        image_width,
        image_height,
    };

    if rect.left() < 0 || rect.top() < 0 {
        return Err(invalid());
    }
    let (left, top) = (rect.left() as u32, rect.top() as u32);

    // u64 so that huge rectangles cannot wrap around
    let fits_x = left as u64 + rect.width() as u64 <= image_width as u64;
    let fits_y = top as u64 + rect.height() as u64 <= image_height as u64;
    if !fits_x || !fits_y {
        return Err(invalid());
    }

    Ok(Cow::Owned(
        image.crop_imm(left, top, rect.width(), rect.height()),
    ))
}
