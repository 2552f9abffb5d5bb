use crate::error::LoadError;
use crate::font::{FontEntry, FontFamily, SymbolTemplate};
use crate::preprocessing::steps::{grayscale, normalize, threshold};
use crate::preprocessing::InkSplit;
use image::{imageops, GrayImage};
use std::path::Path;

/// Decode every entry and turn it into a template. Nothing is returned
/// unless every entry decodes.
pub(crate) fn build_family(name: &str, entries: Vec<FontEntry>) -> Result<FontFamily, LoadError> {
    let mut decoded = Vec::with_capacity(entries.len());
    for entry in entries {
        let decode_failure = |reason: String| LoadError::DecodeFailure {
            entry: entry.name.clone(),
            reason,
        };

        let image =
            image::load_from_memory(&entry.bytes).map_err(|e| decode_failure(e.to_string()))?;
        let gray = grayscale::apply(&image).map_err(|e| decode_failure(e.to_string()))?;

        tracing::trace!(
            "Decoded font entry {} ({}x{})",
            entry.name,
            gray.width(),
            gray.height()
        );
        decoded.push((label_of(&entry.name), gray));
    }

    if decoded.is_empty() {
        return Err(LoadError::EmptyFontFamily(name.to_string()));
    }

    // One split for the whole family: glyphs of one font share a rendering,
    // and a tightly cropped bold glyph alone can be mostly ink.
    let mut pooled = [0u32; 256];
    for (_, gray) in &decoded {
        for (total, count) in pooled.iter_mut().zip(threshold::luma_histogram(gray)) {
            *total = total.saturating_add(count);
        }
    }
    let split = InkSplit::from_histogram(&pooled);

    let templates = decoded
        .into_iter()
        .map(|(label, gray)| template(label, &gray, split))
        .collect();

    Ok(FontFamily::new(name, templates).with_polarity(split.polarity))
}

/// Ink strength of the glyph, trimmed to its ink and contrast-normalized.
/// An image without ink becomes a blank template, kept untrimmed.
fn template(label: String, gray: &GrayImage, split: InkSplit) -> SymbolTemplate {
    let map = threshold::apply_with(gray, split);
    match map.ink_bounds() {
        Some(bounds) => {
            let trimmed = imageops::crop_imm(
                map.pixels(),
                bounds.left() as u32,
                bounds.top() as u32,
                bounds.width(),
                bounds.height(),
            )
            .to_image();
            SymbolTemplate::new(label, normalize::apply(trimmed))
        }
        None => SymbolTemplate::blank(label, map.pixels().clone()),
    }
}

/// Symbol label: the file name without its extension, percent-decoded so
/// that symbols such as `/` can be stored as `%2F.png`
fn label_of(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());

    match urlencoding::decode(&stem) {
        Ok(label) => label.into_owned(),
        Err(_) => stem,
    }
}
