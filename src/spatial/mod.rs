//! Spatial data structures built from the quantized image
//!
//! This module contains:
//! - The cell grid and its sampling from an image
//! - Connected-region segmentation of the grid

/// Cell grid construction and palette mapping
pub mod grid;
/// Breadth-first connected-component extraction
pub mod regions;

pub use grid::{Cell, CellGrid, GridDocument, build_grid};
pub use regions::{Region, segment_regions};
