//! Font families and the template index
//!
//! A font family is one directory of glyph bitmaps; each file's stem is the
//! label of the symbol it draws. Every loaded family is flattened into a
//! [`TemplateIndex`] in registration order, which the matcher scans.

mod loader;
pub mod provider;

pub use provider::{FontEntry, FontProvider, FsProvider, MemoryProvider};

pub(crate) use loader::build_family;

use crate::preprocessing::Polarity;
use image::GrayImage;

/// Reference bitmap for one symbol of a font family
///
/// Pixels are ink strength (0 background, 255 full ink), trimmed to the
/// glyph's ink bounding box and contrast-normalized.
#[derive(Debug, Clone)]
pub struct SymbolTemplate {
    label: String,
    pixels: GrayImage,
    blank: bool,
}

impl SymbolTemplate {
    pub fn new(label: impl Into<String>, pixels: GrayImage) -> Self {
        Self {
            label: label.into(),
            pixels,
            blank: false,
        }
    }

    /// Template whose source image holds no ink. It is part of its family
    /// but never matched, since every segmented glyph has ink.
    pub fn blank(label: impl Into<String>, pixels: GrayImage) -> Self {
        Self {
            blank: true,
            ..Self::new(label, pixels)
        }
    }

    pub fn is_blank(&self) -> bool {
        self.blank
    }

    pub fn label(&self) -> &str {
        &self.label
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
}

/// Named, ordered set of symbol templates loaded together
#[derive(Debug, Clone)]
pub struct FontFamily {
    name: String,
    templates: Vec<SymbolTemplate>,
    polarity: Polarity,
}

impl FontFamily {
    pub fn new(name: impl Into<String>, templates: Vec<SymbolTemplate>) -> Self {
        Self {
            name: name.into(),
            templates,
            polarity: Polarity::DarkOnLight,
        }
    }

    /// Set how the family's source images draw their glyphs
    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn templates(&self) -> &[SymbolTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.label())
    }
}

/// Registry of loaded font families
///
/// Families keep the slot of their first registration; reloading a name
/// replaces the family in place. Iteration yields templates in family order,
/// then in-family order, which is the tie-break order of the matcher.
#[derive(Debug, Default)]
pub struct TemplateIndex {
    families: Vec<FontFamily>,
    total: usize,
}

impl TemplateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a family, replacing any family with the same name.
    /// Returns the replaced family.
    pub fn insert(&mut self, family: FontFamily) -> Option<FontFamily> {
        let replaced = match self.families.iter_mut().find(|f| f.name == family.name) {
            Some(slot) => Some(std::mem::replace(slot, family)),
            None => {
                self.families.push(family);
                None
            }
        };
        self.total = self.families.iter().map(FontFamily::len).sum();
        replaced
    }

    pub fn get(&self, name: &str) -> Option<&FontFamily> {
        self.families.iter().find(|f| f.name == name)
    }

    pub fn families(&self) -> &[FontFamily] {
        &self.families
    }

    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    /// Number of templates across all families
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Polarity of the first registered family, the best guess for images
    /// whose own histogram has no clear background
    pub fn polarity(&self) -> Option<Polarity> {
        self.families.first().map(FontFamily::polarity)
    }

    /// All templates in registration order
    pub fn iter(&self) -> impl Iterator<Item = &SymbolTemplate> {
        self.families.iter().flat_map(|f| f.templates.iter())
    }
}
