//! Template matching of segmented glyphs
//!
//! A glyph is resized to each template's dimensions and scored by the
//! fraction of aligned pixels whose ink strengths agree within a tolerance.
//! The highest score at or above the threshold wins; on equal scores the
//! template registered first wins. Templates without ink are never scored.

use crate::config::RecognizerConfig;
use crate::font::{SymbolTemplate, TemplateIndex};
use crate::preprocessing::steps::normalize;
use image::{imageops, imageops::FilterType, GrayImage};

/// Best template for one glyph
#[derive(Debug, Clone, Copy)]
pub struct GlyphMatch<'a> {
    pub template: &'a SymbolTemplate,
    pub score: f32,
}

impl<'a> GlyphMatch<'a> {
    pub fn label(&self) -> &'a str {
        self.template.label()
    }
}

/// Scores glyphs against a read-only template index
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    index: &'a TemplateIndex,
    threshold: f32,
    tolerance: u8,
    max_aspect_deviation: f32,
}

impl<'a> Matcher<'a> {
    pub fn new(index: &'a TemplateIndex, config: &RecognizerConfig) -> Self {
        Self {
            index,
            threshold: config.threshold,
            tolerance: config.tolerance,
            max_aspect_deviation: config.max_aspect_deviation,
        }
    }

    /// Best template scoring at least the threshold, `None` if nothing clears it
    pub fn best_match(&self, glyph: &GrayImage) -> Option<GlyphMatch<'a>> {
        let glyph = normalize::apply(glyph.clone());
        let mut aligned: Vec<GrayImage> = Vec::new();
        let mut best: Option<GlyphMatch<'a>> = None;

        for template in self.index.iter() {
            if template.is_blank() || !self.aspect_compatible(&glyph, template) {
                continue;
            }

            // Templates of one font usually share a size; resize once per size
            let dims = template.pixels().dimensions();
            let slot = match aligned.iter().position(|img| img.dimensions() == dims) {
                Some(slot) => slot,
                None => {
                    aligned.push(align(&glyph, dims));
                    aligned.len() - 1
                }
            };

            let score = similarity(&aligned[slot], template.pixels(), self.tolerance);
            if score < self.threshold {
                continue;
            }
            // Strictly greater: the earlier registration keeps a tie
            if best.map_or(true, |b| score > b.score) {
                best = Some(GlyphMatch { template, score });
            }
        }

        if let Some(found) = &best {
            tracing::trace!("Matched glyph as {:?} (score {:.3})", found.label(), found.score);
        }
        best
    }

    fn aspect_compatible(&self, glyph: &GrayImage, template: &SymbolTemplate) -> bool {
        let glyph_ratio = glyph.width() as f32 / glyph.height() as f32;
        let template_ratio = template.width() as f32 / template.height() as f32;
        (glyph_ratio - template_ratio).abs() / template_ratio <= self.max_aspect_deviation
    }
}

/// Bring the glyph into the template's frame
fn align(glyph: &GrayImage, (width, height): (u32, u32)) -> GrayImage {
    if glyph.dimensions() == (width, height) {
        return glyph.clone();
    }
    imageops::resize(glyph, width, height, FilterType::Triangle)
}

/// Fraction of positions whose values differ by at most `tolerance`.
/// Both images must have the same dimensions.
pub fn similarity(a: &GrayImage, b: &GrayImage, tolerance: u8) -> f32 {
    if a.dimensions() != b.dimensions() {
        return 0.0;
    }
    let total = a.width() as usize * a.height() as usize;
    if total == 0 {
        return 0.0;
    }

    let agreeing = a
        .pixels()
        .zip(b.pixels())
        .filter(|(p, q)| p.0[0].abs_diff(q.0[0]) <= tolerance)
        .count();

    agreeing as f32 / total as f32
}
