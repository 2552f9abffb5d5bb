//! Row/column band segmentation of an ink strength map
//!
//! A row pass finds text lines as runs of rows containing ink; a column pass
//! inside each line finds glyphs as runs of columns containing ink. Touching
//! glyphs are not separated.

use crate::preprocessing::IntensityMap;
use image::{imageops, GrayImage};
use imageproc::rect::Rect;

/// One segmented candidate glyph
#[derive(Debug, Clone)]
pub struct GlyphRegion {
    /// Tightest box around the glyph's ink, in crop-local coordinates
    pub bounds: Rect,
    /// Ink strength inside `bounds`
    pub pixels: GrayImage,
}

/// One text line: its row span and glyphs, left to right
#[derive(Debug, Clone)]
pub struct LineBand {
    /// Full-width box covering the line's rows
    pub bounds: Rect,
    pub glyphs: Vec<GlyphRegion>,
}

/// Split the map into line bands (top to bottom) of glyph regions (left to right).
/// A blank map yields no bands.
pub fn segment(map: &IntensityMap) -> Vec<LineBand> {
    let (width, height) = (map.width(), map.height());

    let ink_rows = (0..height).map(|y| (0..width).any(|x| map.is_ink(x, y)));

    ink_runs(ink_rows)
        .into_iter()
        .map(|(top, bottom)| {
            let ink_columns = (0..width).map(|x| (top..bottom).any(|y| map.is_ink(x, y)));
            let glyphs = ink_runs(ink_columns)
                .into_iter()
                .map(|(left, right)| glyph_region(map, left, right, top, bottom))
                .collect();

            LineBand {
                bounds: Rect::at(0, top as i32).of_size(width, bottom - top),
                glyphs,
            }
        })
        .collect()
}

/// Cut out the glyph between columns `left..right` of the band `top..bottom`,
/// shrinking the rows to the ones that actually hold its ink
fn glyph_region(map: &IntensityMap, left: u32, right: u32, top: u32, bottom: u32) -> GlyphRegion {
    let row_has_ink = |y: u32| (left..right).any(|x| map.is_ink(x, y));

    // The column run guarantees at least one ink row in the band
    let first = (top..bottom).find(|&y| row_has_ink(y)).unwrap_or(top);
    let last = (top..bottom).rev().find(|&y| row_has_ink(y)).unwrap_or(bottom - 1);

    let (glyph_width, glyph_height) = (right - left, last - first + 1);
    let pixels =
        imageops::crop_imm(map.pixels(), left, first, glyph_width, glyph_height).to_image();

    GlyphRegion {
        bounds: Rect::at(left as i32, first as i32).of_size(glyph_width, glyph_height),
        pixels,
    }
}

/// Half-open ranges of consecutive `true` flags
fn ink_runs(flags: impl Iterator<Item = bool>) -> Vec<(u32, u32)> {
    let mut runs = Vec::new();
    let mut start: Option<u32> = None;
    let mut end = 0u32;

    for (i, ink) in flags.enumerate() {
        let i = i as u32;
        match (ink, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i));
                start = None;
            }
            _ => {}
        }
        end = i + 1;
    }

    // Run extending to the edge
    if let Some(s) = start {
        runs.push((s, end));
    }

    runs
}
