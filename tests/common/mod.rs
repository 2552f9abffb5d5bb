//! Synthetic bitmap font and text rendering shared by the integration tests

#![allow(dead_code)]

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Pixel size of one font cell
pub const SCALE: u32 = 2;
/// Blank columns between glyphs
pub const GAP: u32 = 2 * SCALE;
/// Blank rows between lines
pub const LEADING: u32 = 4 * SCALE;

const CELL_WIDTH: u32 = 5;
const CELL_HEIGHT: u32 = 7;

/// 5x7 glyphs, every one with ink in each of its columns
pub const GLYPHS: [(&str, [&str; 7]); 13] = [
    ("0", [".###.", "#...#", "#..##", "#.#.#", "##..#", "#...#", ".###."]),
    ("1", ["..#..", ".##..", "..#..", "..#..", "..#..", "..#..", "#####"]),
    ("2", [".###.", "#...#", "....#", "...#.", "..#..", ".#...", "#####"]),
    ("3", ["#####", "...#.", "..#..", "...#.", "....#", "#...#", ".###."]),
    ("4", ["...#.", "..##.", ".#.#.", "#..#.", "#####", "...#.", "...#."]),
    ("5", ["#####", "#....", "####.", "....#", "....#", "#...#", ".###."]),
    ("6", ["..##.", ".#...", "#....", "####.", "#...#", "#...#", ".###."]),
    ("7", ["#####", "....#", "...#.", "..#..", ".#...", ".#...", ".#..."]),
    ("8", [".###.", "#...#", "#...#", ".###.", "#...#", "#...#", ".###."]),
    ("9", [".###.", "#...#", "#...#", ".####", "....#", "...#.", ".##.."]),
    ("€", ["..###", ".#...", "####.", ".#...", "####.", ".#...", "..###"]),
    ("/", ["....#", "....#", "...#.", "..#..", ".#...", "#....", "#...."]),
    ("%", ["##..#", "##..#", "...#.", "..#..", ".#...", "#..##", "#..##"]),
];

pub fn bitmap(symbol: &str) -> &'static [&'static str; 7] {
    GLYPHS
        .iter()
        .find(|(label, _)| *label == symbol)
        .map(|(_, rows)| rows)
        .unwrap_or_else(|| panic!("no glyph for {:?}", symbol))
}

/// Width in pixels of `text` rendered on one line
pub fn text_width(text: &str) -> u32 {
    let count = text.chars().count() as u32;
    count * CELL_WIDTH * SCALE + count.saturating_sub(1) * GAP
}

pub fn line_height() -> u32 {
    CELL_HEIGHT * SCALE
}

/// Paint one glyph in black with its top-left corner at (left, top)
pub fn draw_glyph(img: &mut GrayImage, rows: &[&str], left: u32, top: u32) {
    for (y, row) in rows.iter().enumerate() {
        for (x, cell) in row.bytes().enumerate() {
            if cell != b'#' {
                continue;
            }
            for dy in 0..SCALE {
                for dx in 0..SCALE {
                    img.put_pixel(
                        left + x as u32 * SCALE + dx,
                        top + y as u32 * SCALE + dy,
                        Luma([0]),
                    );
                }
            }
        }
    }
}

/// Paint `text` on one line starting at (left, top); returns the x just past it
pub fn draw_text(img: &mut GrayImage, text: &str, left: u32, top: u32) -> u32 {
    let mut x = left;
    for symbol in text.chars() {
        draw_glyph(img, bitmap(&symbol.to_string()), x, top);
        x += CELL_WIDTH * SCALE + GAP;
    }
    x - GAP
}

/// White page with `lines` rendered top to bottom under a small margin
pub fn render_lines(lines: &[&str]) -> GrayImage {
    let margin = 6;
    let width = lines.iter().map(|l| text_width(l)).max().unwrap_or(0) + 2 * margin;
    let height = lines.len() as u32 * (line_height() + LEADING) + 2 * margin;

    let mut img = GrayImage::from_pixel(width, height, Luma([255]));
    for (i, line) in lines.iter().enumerate() {
        let top = margin + i as u32 * (line_height() + LEADING);
        draw_text(&mut img, line, margin, top);
    }
    img
}

/// Template file for one glyph: black on white with a two pixel margin
pub fn template_image(rows: &[&str]) -> GrayImage {
    let mut img = GrayImage::from_pixel(
        CELL_WIDTH * SCALE + 4,
        CELL_HEIGHT * SCALE + 4,
        Luma([255]),
    );
    draw_glyph(&mut img, rows, 2, 2);
    img
}

pub fn png(img: &GrayImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(img.clone())
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode png");
    bytes
}

/// File name storing `label`; `/` cannot appear in a file name
pub fn file_name(label: &str) -> String {
    format!("{}.png", urlencoding::encode(label))
}

/// Write the given symbols as template files into `root/name`
pub fn write_font(root: &Path, name: &str, symbols: &[(&str, &[&str])]) -> PathBuf {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).expect("create font dir");
    for (label, rows) in symbols {
        std::fs::write(dir.join(file_name(label)), png(&template_image(rows)))
            .expect("write template");
    }
    dir
}

/// Write the full 13-symbol font into `root/name`
pub fn write_digits_font(root: &Path, name: &str) -> PathBuf {
    let symbols: Vec<(&str, &[&str])> = GLYPHS
        .iter()
        .map(|(label, rows)| (*label, &rows[..]))
        .collect();
    write_font(root, name, &symbols)
}
