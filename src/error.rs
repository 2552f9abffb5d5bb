use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a font family. A failed load never changes
/// the recognizer's state.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Font path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Font path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to decode font entry {entry}: {reason}")]
    DecodeFailure { entry: String, reason: String },

    #[error("Font family {0} contains no symbols")]
    EmptyFontFamily(String),

    #[error("Failed to read font directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by a recognition call. No partial text is returned.
#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error("No fonts loaded")]
    NoFontsLoaded,

    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    #[error(
        "Invalid region: {width}x{height} at ({left}, {top}) does not fit inside a {image_width}x{image_height} image"
    )]
    InvalidRegion {
        left: i32,
        top: i32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },
}

/// Errors raised when building a recognizer from a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f32),

    #[error("Worker count must be at least 1, got {0}")]
    InvalidWorkerCount(usize),

    #[error("Aspect deviation must be a positive number, got {0}")]
    InvalidAspectDeviation(f32),

    #[error("Failed to build matching thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
