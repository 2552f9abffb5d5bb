use crate::error::RecognitionError;
use image::DynamicImage;
use imageproc::rect::Rect;
use serde::Serialize;
use std::time::Instant;

use super::steps;
use super::{IntensityMap, Polarity};

/// Timing information for a single pipeline step
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_us: u64,
}

/// Result of preprocessing including timing stats
#[derive(Debug, Clone)]
pub struct PreprocessingResult {
    /// Ink strength map in crop-local coordinates
    pub map: IntensityMap,
    /// Total preprocessing time in microseconds
    pub total_time_us: u64,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
}

/// Preprocessing pipeline: crop, grayscale, threshold
pub struct Pipeline {
    region: Option<Rect>,
    polarity_hint: Option<Polarity>,
}

impl Pipeline {
    pub fn new(region: Option<Rect>) -> Self {
        Self {
            region,
            polarity_hint: None,
        }
    }

    /// Polarity to assume when the image has no clear background class
    pub fn polarity_hint(mut self, hint: Option<Polarity>) -> Self {
        self.polarity_hint = hint;
        self
    }

    /// Process an image into an ink strength map restricted to the configured region
    pub fn process(&self, image: &DynamicImage) -> Result<PreprocessingResult, RecognitionError> {
        let start = Instant::now();
        let mut steps_timing = Vec::new();

        let cropped = self.run_step("crop", &mut steps_timing, || {
            steps::crop::apply(image, self.region)
        })?;
        let gray = self.run_step("grayscale", &mut steps_timing, || {
            steps::grayscale::apply(&cropped)
        })?;
        let map = self.run_step("threshold", &mut steps_timing, || {
            Ok(steps::threshold::apply_hinted(&gray, self.polarity_hint))
        })?;

        Ok(PreprocessingResult {
            map,
            total_time_us: start.elapsed().as_micros() as u64,
            steps: steps_timing,
        })
    }

    fn run_step<T, F>(
        &self,
        name: &str,
        timings: &mut Vec<StepTiming>,
        step_fn: F,
    ) -> Result<T, RecognitionError>
    where
        F: FnOnce() -> Result<T, RecognitionError>,
    {
        let step_start = Instant::now();
        let result = step_fn()?;
        timings.push(StepTiming {
            name: name.to_string(),
            time_us: step_start.elapsed().as_micros() as u64,
        });
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, RgbImage, Rgb};

    #[test]
    fn test_pipeline_records_every_step() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([255])));
        let result = Pipeline::new(None).process(&img).unwrap();

        let names: Vec<&str> = result.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["crop", "grayscale", "threshold"]);
        assert_eq!(result.map.width(), 8);
        assert_eq!(result.map.height(), 8);
    }

    #[test]
    fn test_pipeline_crops_to_region_frame() {
        let mut img = RgbImage::from_pixel(40, 20, Rgb([250, 250, 250]));
        img.put_pixel(25, 12, Rgb([0, 0, 0]));
        img.put_pixel(26, 12, Rgb([0, 0, 0]));

        let region = Rect::at(20, 10).of_size(10, 5);
        let result = Pipeline::new(Some(region))
            .process(&DynamicImage::ImageRgb8(img))
            .unwrap();

        assert_eq!((result.map.width(), result.map.height()), (10, 5));
        assert!(result.map.is_ink(5, 2), "ink should be renumbered into crop frame");
        assert!(result.map.is_ink(6, 2));
        assert!(!result.map.is_ink(0, 0));
    }

    #[test]
    fn test_pipeline_tight_crop_uses_hint() {
        // Dark ink covering 60% of the crop
        let mut img = GrayImage::from_pixel(20, 20, Luma([255]));
        for y in 5..15 {
            for x in 5..11 {
                img.put_pixel(x, y, Luma([0]));
            }
        }
        let img = DynamicImage::ImageLuma8(img);
        let region = Some(Rect::at(5, 5).of_size(10, 10));

        let unhinted = Pipeline::new(region).process(&img).unwrap();
        assert!(unhinted.map.is_ink(9, 0), "majority rule reads the paper as ink");

        let hinted = Pipeline::new(region)
            .polarity_hint(Some(Polarity::DarkOnLight))
            .process(&img)
            .unwrap();
        assert!(hinted.map.is_ink(0, 0));
        assert!(!hinted.map.is_ink(9, 0));
    }

    #[test]
    fn test_pipeline_propagates_invalid_region() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(10, 10));
        let err = Pipeline::new(Some(Rect::at(5, 5).of_size(10, 2)))
            .process(&img)
            .unwrap_err();
        assert!(matches!(err, RecognitionError::InvalidRegion { .. }));
    }
}
