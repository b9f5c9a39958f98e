//! Paint-by-numbers instruction generation from photographs
//!
//! The pipeline clusters image colors into a fixed palette, samples the image
//! onto a coarse cell grid, splits the grid into connected same-color regions
//! and numbers the resulting painting steps by color or by region.

#![forbid(unsafe_code)]

/// Palette entries and nearest-color lookup
pub mod color;
/// Color and region grouping into numbered painting steps
pub mod instructions;
/// Input/output operations, configuration and error handling
pub mod io;
/// Color distance and averaging utilities
pub mod math;
/// K-means color quantization
pub mod quantize;
/// Cell grid sampling and region segmentation
pub mod spatial;

pub use io::error::{PipelineError, Result};
