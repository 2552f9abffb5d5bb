use crate::config::RecognizerConfig;
use crate::error::{ConfigError, LoadError, RecognitionError};
use crate::font::{self, FontFamily, FontProvider, FsProvider, TemplateIndex};
use crate::matcher::Matcher;
use crate::preprocessing::{Pipeline, StepTiming};
use crate::segment;
use image::{DynamicImage, GrayImage};
use imageproc::rect::Rect;
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

/// Recognition result
#[derive(Debug, Clone, Serialize)]
pub struct Recognition {
    /// Recognized lines, top to bottom. Lines where nothing matched are left out.
    pub lines: Vec<String>,
    /// Number of segmented glyph regions
    pub glyphs: usize,
    /// Glyph regions that no template matched
    pub unmatched: usize,
    /// Preprocessing steps, then segmentation and matching
    pub timings: Vec<StepTiming>,
}

impl Recognition {
    /// Lines joined with `\n`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Template-matching recognizer
///
/// Loading fonts needs `&mut self` and recognizing needs `&self`: any number
/// of recognitions may run at once against a loaded recognizer, but loads
/// are exclusive.
#[derive(Debug)]
pub struct Recognizer {
    config: RecognizerConfig,
    index: TemplateIndex,
    /// Matching pool, `None` when running with a single worker
    pool: Option<rayon::ThreadPool>,
}

impl Recognizer {
    /// Sequential recognizer with the given similarity threshold
    pub fn new(threshold: f32) -> Result<Self, ConfigError> {
        Self::with_config(RecognizerConfig::with_threshold(threshold))
    }

    /// Recognizer matching glyphs on `workers` threads
    pub fn with_workers(threshold: f32, workers: usize) -> Result<Self, ConfigError> {
        Self::with_config(RecognizerConfig::with_threshold(threshold).workers(workers))
    }

    pub fn with_config(config: RecognizerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let pool = if config.workers > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(config.workers)
                    .thread_name(|i| format!("lookup-match-{}", i))
                    .build()?,
            )
        } else {
            None
        };

        tracing::debug!(
            "Created recognizer (threshold {}, {} worker(s))",
            config.threshold,
            config.workers
        );

        Ok(Self {
            config,
            index: TemplateIndex::new(),
            pool,
        })
    }

    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    pub fn threshold(&self) -> f32 {
        self.config.threshold
    }

    pub fn workers(&self) -> usize {
        self.config.workers
    }

    /// Load the font family stored in directory `path` on the host filesystem.
    /// Paths without a final component such as `.` are resolved first.
    pub fn load_font(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        if family_name(path).is_some() {
            return self.load_font_from_provider(&FsProvider, path);
        }

        let resolved = std::fs::canonicalize(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LoadError::PathNotFound(path.to_path_buf()),
            _ => LoadError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        self.load_font_from_provider(&FsProvider, resolved)
    }

    /// Load the font family stored in directory `path` of `provider`.
    ///
    /// The family is named after the directory and replaces any loaded family
    /// of the same name. A path with no final name (`""`, `.`, `..`) is
    /// rejected with [`LoadError::PathNotFound`]. On error nothing changes.
    pub fn load_font_from_provider<P>(
        &mut self,
        provider: &P,
        path: impl AsRef<Path>,
    ) -> Result<(), LoadError>
    where
        P: FontProvider + ?Sized,
    {
        let path = path.as_ref();
        let name = family_name(path).ok_or_else(|| LoadError::PathNotFound(path.to_path_buf()))?;

        let entries = provider.list_entries(path)?;
        let family = font::build_family(&name, entries)?;
        let count = family.len();

        match self.index.insert(family) {
            Some(previous) => tracing::warn!(
                "Replaced font family {} ({} -> {} symbols, {} in index)",
                name,
                previous.len(),
                count,
                self.index.len()
            ),
            None => tracing::info!(
                "Loaded font family {} with {} symbols ({} in index)",
                name,
                count,
                self.index.len()
            ),
        }

        Ok(())
    }

    pub fn family_count(&self) -> usize {
        self.index.family_count()
    }

    /// Number of templates across all loaded families
    pub fn template_count(&self) -> usize {
        self.index.len()
    }

    /// Loaded family names in registration order
    pub fn family_names(&self) -> Vec<&str> {
        self.index.families().iter().map(FontFamily::name).collect()
    }

    pub fn family(&self, name: &str) -> Option<&FontFamily> {
        self.index.get(name)
    }

    /// Recognize the text in `image`, or in `region` of it
    pub fn recognize(
        &self,
        image: &DynamicImage,
        region: Option<Rect>,
    ) -> Result<String, RecognitionError> {
        Ok(self.recognize_detailed(image, region)?.text())
    }

    /// Like [`Recognizer::recognize`], with per-line output and statistics
    pub fn recognize_detailed(
        &self,
        image: &DynamicImage,
        region: Option<Rect>,
    ) -> Result<Recognition, RecognitionError> {
        if self.index.is_empty() {
            return Err(RecognitionError::NoFontsLoaded);
        }

        let preprocessed = Pipeline::new(region)
            .polarity_hint(self.index.polarity())
            .process(image)?;
        let preprocess_us = preprocessed.total_time_us;
        let mut timings = preprocessed.steps;

        let step_start = Instant::now();
        let bands = segment::segment(&preprocessed.map);
        timings.push(StepTiming {
            name: "segment".to_string(),
            time_us: step_start.elapsed().as_micros() as u64,
        });

        let glyphs: Vec<&GrayImage> = bands
            .iter()
            .flat_map(|band| band.glyphs.iter().map(|glyph| &glyph.pixels))
            .collect();

        let step_start = Instant::now();
        let labels = self.match_glyphs(&glyphs);
        timings.push(StepTiming {
            name: "match".to_string(),
            time_us: step_start.elapsed().as_micros() as u64,
        });

        // Labels are in band order, then left to right within a band
        let mut labels = labels.into_iter();
        let mut lines = Vec::with_capacity(bands.len());
        let mut unmatched = 0;
        for band in &bands {
            let mut line = String::new();
            for label in labels.by_ref().take(band.glyphs.len()) {
                match label {
                    Some(label) => line.push_str(label),
                    None => unmatched += 1,
                }
            }
            if !line.is_empty() {
                lines.push(line);
            }
        }

        tracing::debug!(
            "Recognized {} line(s) from {} band(s), {} glyph(s), {} unmatched (preprocess {}us, match {}us)",
            lines.len(),
            bands.len(),
            glyphs.len(),
            unmatched,
            preprocess_us,
            timings.last().map_or(0, |t| t.time_us)
        );

        Ok(Recognition {
            lines,
            glyphs: glyphs.len(),
            unmatched,
            timings,
        })
    }

    /// Best label per glyph, in the order of `glyphs` whatever the worker
    /// completion order
    fn match_glyphs(&self, glyphs: &[&GrayImage]) -> Vec<Option<&str>> {
        let matcher = Matcher::new(&self.index, &self.config);
        let best = |glyph: &&GrayImage| matcher.best_match(glyph).map(|found| found.label());

        match &self.pool {
            // Indexed collect writes each result into its own slot
            Some(pool) => pool.install(|| glyphs.par_iter().map(best).collect()),
            None => glyphs.iter().map(best).collect(),
        }
    }
}

/// Family name: the directory's base name
fn family_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}
