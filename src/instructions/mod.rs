//! Painting instructions derived from the segmented grid

/// First-seen ordered grouping of cells by color
pub mod grouping;
/// Step numbering for color, region and per-cell instructions
pub mod steps;

pub use grouping::ColorGroups;
pub use steps::{CellStep, Step, StepKind, serialize_steps, steps_by_color, steps_by_region};
