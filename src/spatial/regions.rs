//! Connected-component segmentation of the cell grid
//!
//! A region is a maximal set of same-color cells connected through
//! left/right/up/down neighbors. Segmentation is a breadth-first flood fill
//! seeded from each unvisited cell in row-major order, so an unchanged grid
//! always yields the same regions in the same order.

use crate::spatial::grid::{Cell, CellGrid};
use bitvec::vec::BitVec;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximal 4-connected group of cells sharing one color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Palette color shared by every cell
    pub color_id: usize,
    /// Cells in breadth-first visitation order, seed first
    pub cells: Vec<Cell>,
}

impl Region {
    /// Number of cells in the region
    pub fn area(&self) -> usize {
        self.cells.len()
    }
}

// Expansion order: left, right, up, down
const NEIGHBOR_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Partition `grid` into its maximal 4-connected same-color regions
///
/// Regions are returned in discovery order: the region holding the first
/// unvisited cell in row-major order comes first. Every cell of the grid
/// belongs to exactly one region.
pub fn segment_regions(grid: &CellGrid) -> Vec<Region> {
    let size = grid.size();
    let mut visited: BitVec = BitVec::repeat(false, grid.cell_count());
    let mut regions = Vec::new();
    let mut queue = VecDeque::new();

    for seed in grid.cells() {
        let seed_index = seed.y * size + seed.x;
        if visited.get(seed_index).is_none_or(|bit| *bit) {
            continue;
        }

        visited.set(seed_index, true);
        queue.push_back(seed);
        let mut cells = Vec::new();

        while let Some(cell) = queue.pop_front() {
            cells.push(cell);

            for (dx, dy) in NEIGHBOR_OFFSETS {
                let Some(neighbor) = neighbor_of(grid, cell, dx, dy) else {
                    continue;
                };
                if neighbor.color_id != seed.color_id {
                    continue;
                }
                let index = neighbor.y * size + neighbor.x;
                if visited.get(index).is_some_and(|bit| !*bit) {
                    visited.set(index, true);
                    queue.push_back(neighbor);
                }
            }
        }

        regions.push(Region {
            color_id: seed.color_id,
            cells,
        });
    }

    log::debug!("segmented {size}x{size} grid into {} regions", regions.len());
    regions
}

/// Region index of every cell, indexed `[y][x]` in row-major layout
///
/// Cells not covered by `regions` map to `None`.
pub fn region_lookup(grid: &CellGrid, regions: &[Region]) -> Vec<Option<usize>> {
    let size = grid.size();
    let mut lookup = vec![None; grid.cell_count()];
    for (region_index, region) in regions.iter().enumerate() {
        for cell in &region.cells {
            if let Some(slot) = lookup.get_mut(cell.y * size + cell.x) {
                *slot = Some(region_index);
            }
        }
    }
    lookup
}

fn neighbor_of(grid: &CellGrid, cell: Cell, dx: isize, dy: isize) -> Option<Cell> {
    let x = cell.x.checked_add_signed(dx)?;
    let y = cell.y.checked_add_signed(dy)?;
    grid.cell(x, y)
}
