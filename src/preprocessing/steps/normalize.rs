use image::{GrayImage, Luma};

/// Stretch glyph contrast so its values use the full 0-255 range
pub fn apply(glyph: GrayImage) -> GrayImage {
    let (min_val, max_val) = find_min_max(&glyph);

    // Avoid division by zero
    if max_val <= min_val || (min_val == 0 && max_val == 255) {
        return glyph;
    }

    let min_val = min_val as u32;
    let range = max_val as u32 - min_val;
    GrayImage::from_fn(glyph.width(), glyph.height(), |x, y| {
        let pixel = glyph.get_pixel(x, y).0[0] as u32;
        Luma([(((pixel - min_val) * 255 + range / 2) / range) as u8])
    })
}

fn find_min_max(img: &GrayImage) -> (u8, u8) {
    let mut min = 255u8;
    let mut max = 0u8;

    for pixel in img.pixels() {
        let val = pixel.0[0];
        min = min.min(val);
        max = max.max(val);
    }

    (min, max)
}
