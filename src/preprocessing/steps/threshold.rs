use image::{GrayImage, Luma};
use imageproc::stats::histogram;

use crate::preprocessing::IntensityMap;

/// Which side of the split the glyphs are drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Dark glyphs on a light background
    DarkOnLight,
    /// Light glyphs on a dark background
    LightOnDark,
}

/// A class needs more than this share of the pixels to be taken as
/// background on its own
const CLEAR_MAJORITY: f64 = 2.0 / 3.0;

/// Background/foreground split of a luminance histogram
///
/// Luminance values `<= level` form one class and values `> level` the other.
/// The class holding the majority of pixels is the background; on a tie the
/// darker class is taken as ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkSplit {
    pub level: u8,
    pub polarity: Polarity,
}

impl InkSplit {
    pub fn from_histogram(hist: &[u32; 256]) -> Self {
        Self::from_histogram_hinted(hist, None)
    }

    /// Like [`InkSplit::from_histogram`], but when neither class holds a clear
    /// majority (a crop drawn tightly around bold glyphs) the polarity falls
    /// back to `hint`
    pub fn from_histogram_hinted(hist: &[u32; 256], hint: Option<Polarity>) -> Self {
        let level = otsu_level(hist);
        let dark: u64 = hist[..=level as usize].iter().map(|&c| c as u64).sum();
        let total: u64 = hist.iter().map(|&c| c as u64).sum();
        let light = total - dark;

        let by_majority = if dark <= light {
            Polarity::DarkOnLight
        } else {
            Polarity::LightOnDark
        };
        let clear = dark.max(light) as f64 > total as f64 * CLEAR_MAJORITY;

        let polarity = match hint {
            Some(hint) if !clear => hint,
            _ => by_majority,
        };

        Self { level, polarity }
    }

    pub fn from_image(gray: &GrayImage) -> Self {
        Self::from_histogram(&luma_histogram(gray))
    }

    /// Ink strength of a luminance value: 0 is background, 255 full ink
    pub fn strength(&self, luma: u8) -> u8 {
        match self.polarity {
            Polarity::DarkOnLight => 255 - luma,
            Polarity::LightOnDark => luma,
        }
    }

    /// Strength above which a pixel counts as ink
    pub fn strength_split(&self) -> u8 {
        match self.polarity {
            // luma <= level  <=>  255 - luma > 254 - level
            Polarity::DarkOnLight => 254u8.saturating_sub(self.level),
            Polarity::LightOnDark => self.level,
        }
    }
}

/// Split a luminance map into ink strength using its own histogram
pub fn apply(gray: &GrayImage) -> IntensityMap {
    apply_hinted(gray, None)
}

/// Split with the image's own histogram, taking the polarity from `hint`
/// when the histogram has no clear background class
pub fn apply_hinted(gray: &GrayImage, hint: Option<Polarity>) -> IntensityMap {
    apply_with(gray, InkSplit::from_histogram_hinted(&luma_histogram(gray), hint))
}

/// Split a luminance map with a split computed elsewhere (e.g. pooled over a font family)
pub fn apply_with(gray: &GrayImage, split: InkSplit) -> IntensityMap {
    let pixels = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        Luma([split.strength(gray.get_pixel(x, y).0[0])])
    });
    IntensityMap::new(pixels, split.strength_split())
}

pub fn luma_histogram(gray: &GrayImage) -> [u32; 256] {
    histogram(gray).channels[0]
}

/// Otsu's method: the level maximizing between-class variance
///
/// Returns 0 for an empty or single-valued histogram.
pub fn otsu_level(hist: &[u32; 256]) -> u8 {
    let total: u64 = hist.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return 0;
    }

    let sum_all: f64 = hist
        .iter()
        .enumerate()
        .map(|(value, &count)| value as f64 * count as f64)
        .sum();

    let mut weight_dark = 0u64;
    let mut sum_dark = 0.0f64;
    let mut best_level = 0u8;
    let mut best_variance = -1.0f64;

    for (level, &count) in hist.iter().enumerate() {
        weight_dark += count as u64;
        sum_dark += level as f64 * count as f64;
        if weight_dark == 0 {
            continue;
        }
        let weight_light = total - weight_dark;
        if weight_light == 0 {
            break;
        }

        let mean_dark = sum_dark / weight_dark as f64;
        let mean_light = (sum_all - sum_dark) / weight_light as f64;
        let variance =
            weight_dark as f64 * weight_light as f64 * (mean_dark - mean_light).powi(2);

        if variance > best_variance {
            best_variance = variance;
            best_level = level as u8;
        }
    }

    best_level
}
