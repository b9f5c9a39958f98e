//! Numbered painting steps built from grouped cells
//!
//! Steps are numbered from zero in emission order with no gaps. Nothing is
//! reordered, filtered or merged after numbering.

use crate::instructions::grouping::ColorGroups;
use crate::spatial::grid::{Cell, CellGrid};
use crate::spatial::regions::Region;
use serde::{Deserialize, Serialize};

/// How the cells of a step were grouped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// Every cell of one color
    Color,
    /// One connected region
    Region,
}

/// One numbered unit of painting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Position in the painting order, starting at zero
    pub step: usize,
    /// Grouping that produced this step
    #[serde(rename = "type")]
    pub kind: StepKind,
    /// Palette color to paint
    pub color_id: usize,
    /// Cells painted in this step
    pub cells: Vec<Cell>,
}

/// Single-cell painting step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStep {
    /// Position in the painting order, starting at zero
    pub step: usize,
    /// Column index
    pub x: usize,
    /// Row index
    pub y: usize,
    /// Palette color to paint
    pub color_id: usize,
}

/// Number `groups` in the order they are yielded
pub fn serialize_steps<I>(kind: StepKind, groups: I) -> Vec<Step>
where
    I: IntoIterator<Item = (usize, Vec<Cell>)>,
{
    groups
        .into_iter()
        .enumerate()
        .map(|(step, (color_id, cells))| Step {
            step,
            kind,
            color_id,
            cells,
        })
        .collect()
}

/// One step per distinct color, in first-seen order
pub fn steps_by_color(groups: &ColorGroups) -> Vec<Step> {
    serialize_steps(
        StepKind::Color,
        groups
            .iter()
            .map(|(color_id, cells)| (color_id, cells.to_vec())),
    )
}

/// One step per region, in region discovery order
pub fn steps_by_region(regions: &[Region]) -> Vec<Step> {
    serialize_steps(
        StepKind::Region,
        regions
            .iter()
            .map(|region| (region.color_id, region.cells.clone())),
    )
}

/// One step per cell, in row-major order
pub fn cell_steps(grid: &CellGrid) -> Vec<CellStep> {
    grid.cells()
        .enumerate()
        .map(|(step, cell)| CellStep {
            step,
            x: cell.x,
            y: cell.y,
            color_id: cell.color_id,
        })
        .collect()
}
