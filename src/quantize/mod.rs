//! Color quantization of source pixels into a fixed-size palette

/// Fixed-budget k-means clustering in RGB space
pub mod kmeans;

pub use kmeans::{Quantization, quantize};
