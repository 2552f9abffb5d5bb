//! Individual preprocessing steps

pub mod crop;
pub mod grayscale;
pub mod normalize;
pub mod threshold;
