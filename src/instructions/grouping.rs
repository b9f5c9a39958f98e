//! Color groups that remember the order colors were first seen

use crate::spatial::grid::{Cell, CellGrid};
use std::collections::HashMap;

/// Mapping from color id to its cells, ordered by first appearance
///
/// Groups live in a vector in insertion order with a side index for lookup,
/// so iteration order never depends on hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorGroups {
    groups: Vec<(usize, Vec<Cell>)>,
    index: HashMap<usize, usize>,
}

impl ColorGroups {
    /// Create an empty grouping
    pub fn new() -> Self {
        Self::default()
    }

    /// Group the cells of `grid`, visiting them in row-major order
    pub fn from_grid(grid: &CellGrid) -> Self {
        let mut groups = Self::new();
        for cell in grid.cells() {
            groups.push(cell);
        }
        groups
    }

    /// Append a cell to its color's group, creating the group if needed
    pub fn push(&mut self, cell: Cell) {
        let position = *self.index.entry(cell.color_id).or_insert_with(|| {
            self.groups.push((cell.color_id, Vec::new()));
            self.groups.len() - 1
        });
        if let Some((_, cells)) = self.groups.get_mut(position) {
            cells.push(cell);
        }
    }

    /// Cells of one color, if that color has been seen
    pub fn get(&self, color_id: usize) -> Option<&[Cell]> {
        self.index
            .get(&color_id)
            .and_then(|&position| self.groups.get(position))
            .map(|(_, cells)| cells.as_slice())
    }

    /// Color ids in first-seen order
    pub fn color_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.groups.iter().map(|(color_id, _)| *color_id)
    }

    /// Number of distinct colors
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no cell has been grouped
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate `(color_id, cells)` pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Cell])> + '_ {
        self.groups
            .iter()
            .map(|(color_id, cells)| (*color_id, cells.as_slice()))
    }
}

impl IntoIterator for ColorGroups {
    type Item = (usize, Vec<Cell>);
    type IntoIter = std::vec::IntoIter<(usize, Vec<Cell>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}
