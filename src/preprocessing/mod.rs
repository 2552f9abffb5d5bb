//! Image preprocessing for glyph segmentation
//!
//! Turns a full image, or a sub-rectangle of it, into an [`IntensityMap`] of
//! ink strength in crop-local coordinates.

pub mod pipeline;
pub mod steps;

pub use pipeline::{Pipeline, PreprocessingResult, StepTiming};
pub use steps::threshold::{InkSplit, Polarity};

use image::GrayImage;
use imageproc::rect::Rect;

/// Ink strength map of a preprocessed image
///
/// Every pixel holds how strongly it belongs to the foreground: 0 is pure
/// background, 255 is full ink, regardless of whether the source rendered
/// dark text on a light background or the reverse. A pixel is ink when its
/// strength is strictly above `split`.
#[derive(Debug, Clone)]
pub struct IntensityMap {
    pixels: GrayImage,
    split: u8,
}

impl IntensityMap {
    pub fn new(pixels: GrayImage, split: u8) -> Self {
        Self { pixels, split }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &GrayImage {
        &self.pixels
    }

    pub fn strength(&self, x: u32, y: u32) -> u8 {
        self.pixels.get_pixel(x, y).0[0]
    }

    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        self.strength(x, y) > self.split
    }

    /// Tightest rectangle containing every ink pixel, `None` for a blank map
    pub fn ink_bounds(&self) -> Option<Rect> {
        let (mut min_x, mut min_y) = (u32::MAX, u32::MAX);
        let (mut max_x, mut max_y) = (0u32, 0u32);
        let mut found = false;

        for (x, y, pixel) in self.pixels.enumerate_pixels() {
            if pixel.0[0] > self.split {
                found = true;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }

        found.then(|| {
            Rect::at(min_x as i32, min_y as i32).of_size(max_x - min_x + 1, max_y - min_y + 1)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_ink_bounds_is_tight() {
        let mut pixels = GrayImage::new(10, 8);
        pixels.put_pixel(2, 3, Luma([255]));
        pixels.put_pixel(6, 5, Luma([200]));
        pixels.put_pixel(8, 1, Luma([10])); // below split, not ink

        let map = IntensityMap::new(pixels, 127);
        let bounds = map.ink_bounds().unwrap();

        assert_eq!((bounds.left(), bounds.top()), (2, 3));
        assert_eq!((bounds.width(), bounds.height()), (5, 3));
    }

    #[test]
    fn test_blank_map_has_no_ink_bounds() {
        let map = IntensityMap::new(GrayImage::new(4, 4), 0);
        assert!(map.ink_bounds().is_none());
    }
}
