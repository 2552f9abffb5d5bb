use crate::error::ConfigError;

/// Default minimum similarity score for a template to be accepted
pub const DEFAULT_THRESHOLD: f32 = 0.8;
/// Default intensity agreement band, on the 0-255 ink strength scale
pub const DEFAULT_TOLERANCE: u8 = 64;
/// Default maximum relative aspect-ratio difference between region and template
pub const DEFAULT_MAX_ASPECT_DEVIATION: f32 = 0.5;

/// Recognizer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizerConfig {
    /// Minimum similarity score in (0, 1]
    pub threshold: f32,
    /// Size of the glyph matching worker pool (1 = sequential)
    pub workers: usize,
    /// Two aligned pixels agree when their ink strengths differ by at most this much
    pub tolerance: u8,
    /// Templates whose width/height ratio differs from the region's by more than
    /// this fraction are not scored.
    ///
    /// The gate keeps thin noise specks and bars from matching wide glyphs
    /// after resizing. It also rejects glyphs rendered with a different
    /// horizontal stretch than their templates: at 0.5 a font drawn 1.6x as
    /// wide as its templates no longer matches. Raise it for such renderings.
    pub max_aspect_deviation: f32,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            workers: 1,
            tolerance: DEFAULT_TOLERANCE,
            max_aspect_deviation: DEFAULT_MAX_ASPECT_DEVIATION,
        }
    }
}

impl RecognizerConfig {
    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn tolerance(mut self, tolerance: u8) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn max_aspect_deviation(mut self, deviation: f32) -> Self {
        self.max_aspect_deviation = deviation;
        self
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        // NaN fails both comparisons
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        if self.workers == 0 {
            return Err(ConfigError::InvalidWorkerCount(self.workers));
        }
        if !(self.max_aspect_deviation > 0.0) {
            return Err(ConfigError::InvalidAspectDeviation(self.max_aspect_deviation));
        }
        Ok(())
    }
}
