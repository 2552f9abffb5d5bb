//! Template-matching recognizer for text rendered in known bitmap fonts
//!
//! Font families are loaded from directories of glyph images, one file per
//! symbol. An image (or a rectangle of it) is split into text lines and
//! glyphs, and every glyph is matched against the loaded templates.
//!
//! ```no_run
//! use lookup_ocr::Recognizer;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut recognizer = Recognizer::with_workers(0.8, 4)?;
//! recognizer.load_font("fonts/seven_segment")?;
//!
//! let image = image::open("display.png")?;
//! println!("{}", recognizer.recognize(&image, None)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod font;
pub mod matcher;
pub mod preprocessing;
pub mod segment;

pub use config::RecognizerConfig;
pub use engine::{Recognition, Recognizer};
pub use error::{ConfigError, LoadError, RecognitionError};
pub use font::{FontEntry, FontFamily, FontProvider, FsProvider, MemoryProvider, SymbolTemplate};
pub use imageproc::rect::Rect;
