//! Coarse cell grid sampled from a quantized image
//!
//! The image is split into `grid_size × grid_size` equal blocks by integer
//! division. Pixels left over at the right and bottom edges belong to no block
//! and are ignored. Each block's mean color is matched to the nearest palette
//! entry, which becomes the cell's color id.

use crate::color::Palette;
use crate::io::error::{PipelineError, Result, invalid_parameter, malformed};
use crate::math::distance::{ChannelSum, to_f64};
use image::RgbImage;
use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One grid position and the palette color painted there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Column index
    pub x: usize,
    /// Row index
    pub y: usize,
    /// Id of the palette entry for this cell
    pub color_id: usize,
}

impl Cell {
    /// Create a cell
    pub const fn new(x: usize, y: usize, color_id: usize) -> Self {
        Self { x, y, color_id }
    }
}

/// Serialized form of a grid: cells listed row by row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridDocument {
    /// Cells per grid side
    pub grid_size: usize,
    /// Every cell, outer loop over rows, inner loop over columns
    pub cells: Vec<Cell>,
}

/// Dense square grid of palette color ids
///
/// Storage is indexed `[y, x]`, so iterating the array in its natural order
/// visits cells row by row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    color_ids: Array2<usize>,
}

impl CellGrid {
    /// Build a grid from color ids listed in row-major order
    ///
    /// # Errors
    ///
    /// Returns an error if `grid_size` is zero or the id count is not `grid_size²`
    pub fn from_color_ids(grid_size: usize, color_ids: Vec<usize>) -> Result<Self> {
        if grid_size == 0 {
            return Err(invalid_parameter(
                "grid_size",
                &grid_size,
                &"must be positive",
            ));
        }
        let len = color_ids.len();
        let color_ids = Array2::from_shape_vec((grid_size, grid_size), color_ids).map_err(|e| {
            invalid_parameter(
                "color_ids",
                &len,
                &format!("expected {} ids: {e}", grid_size * grid_size),
            )
        })?;
        Ok(Self { color_ids })
    }

    /// Grid where every cell has the same color
    pub fn uniform(grid_size: usize, color_id: usize) -> Self {
        Self {
            color_ids: Array2::from_elem((grid_size, grid_size), color_id),
        }
    }

    /// Rebuild a grid from an unordered cell list
    ///
    /// # Errors
    ///
    /// Returns a malformed data error if the cell count is not `grid_size²`, or
    /// naming the offending cell if it lies outside the grid or repeats a position
    pub fn from_cells(grid_size: usize, cells: &[Cell]) -> Result<Self> {
        if grid_size == 0 {
            return Err(malformed("gridSize", &"must be positive"));
        }
        if grid_size.checked_mul(grid_size) != Some(cells.len()) {
            return Err(malformed(
                "gridSize",
                &format!(
                    "a {grid_size}x{grid_size} grid does not match {} cells",
                    cells.len()
                ),
            ));
        }

        let mut slots: Array2<Option<usize>> = Array2::from_elem((grid_size, grid_size), None);
        for (i, cell) in cells.iter().enumerate() {
            let slot = slots.get_mut([cell.y, cell.x]).ok_or_else(|| {
                malformed(
                    format!("cells[{i}]"),
                    &format!(
                        "position ({}, {}) is outside a {grid_size}x{grid_size} grid",
                        cell.x, cell.y
                    ),
                )
            })?;
            if slot.is_some() {
                return Err(malformed(
                    format!("cells[{i}]"),
                    &format!("position ({}, {}) appears more than once", cell.x, cell.y),
                ));
            }
            *slot = Some(cell.color_id);
        }

        // Matching count, in-bounds and no duplicates leave no empty slot
        Ok(Self {
            color_ids: slots.mapv(|slot| slot.unwrap_or_default()),
        })
    }

    /// Rebuild and validate a grid read back from a grid document
    ///
    /// # Errors
    ///
    /// Returns a malformed data error if the cells do not cover the grid or a
    /// cell references a color id missing from `palette`
    pub fn from_document(document: &GridDocument, palette: &Palette) -> Result<Self> {
        if let Some((i, cell)) = document
            .cells
            .iter()
            .enumerate()
            .find(|(_, cell)| !palette.contains(cell.color_id))
        {
            return Err(malformed(
                format!("cells[{i}].colorId"),
                &format!(
                    "unknown color id {} (palette has {} entries)",
                    cell.color_id,
                    palette.len()
                ),
            ));
        }
        Self::from_cells(document.grid_size, &document.cells)
    }

    /// Cells per grid side
    pub fn size(&self) -> usize {
        self.color_ids.nrows()
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.color_ids.len()
    }

    /// Color id at column `x`, row `y`
    pub fn color_at(&self, x: usize, y: usize) -> Option<usize> {
        self.color_ids.get([y, x]).copied()
    }

    /// Cell at column `x`, row `y`
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.color_at(x, y).map(|color_id| Cell::new(x, y, color_id))
    }

    /// Raw color id array indexed `[y, x]`
    pub const fn color_ids(&self) -> &Array2<usize> {
        &self.color_ids
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.color_ids
            .indexed_iter()
            .map(|((y, x), &color_id)| Cell::new(x, y, color_id))
    }

    /// Serializable form with cells in row-major order
    pub fn to_document(&self) -> GridDocument {
        GridDocument {
            grid_size: self.size(),
            cells: self.cells().collect(),
        }
    }
}

/// Pixel size of one grid block for an image of the given dimensions
///
/// # Errors
///
/// Returns an error if `grid_size` is zero or exceeds either image dimension
pub fn cell_dimensions(width: u32, height: u32, grid_size: usize) -> Result<(u32, u32)> {
    let size = u32::try_from(grid_size).unwrap_or(u32::MAX);
    if size == 0 || size > width || size > height {
        return Err(invalid_parameter(
            "grid_size",
            &grid_size,
            &format!("must be between 1 and the image dimensions {width}x{height}"),
        ));
    }
    Ok((width / size, height / size))
}

/// Sample `image` into a grid of nearest-palette-color cells
///
/// Blocks are averaged in parallel and collected in row-major order; exact
/// distance ties between palette entries resolve to the lowest id.
///
/// # Errors
///
/// Returns an error if the palette is empty or `grid_size` is zero or larger
/// than the image width or height
pub fn build_grid(image: &RgbImage, palette: &Palette, grid_size: usize) -> Result<CellGrid> {
    if palette.is_empty() {
        return Err(PipelineError::InvalidSourceData {
            reason: "cannot map cells onto an empty palette".to_string(),
        });
    }

    let (width, height) = image.dimensions();
    let (cell_w, cell_h) = cell_dimensions(width, height, grid_size)?;
    let size = grid_size as u32;

    if width % size != 0 || height % size != 0 {
        log::warn!(
            "{width}x{height} image is not divisible by grid size {grid_size}; dropping {} columns and {} rows",
            width % size,
            height % size
        );
    }

    let color_ids: Option<Vec<usize>> = (0..grid_size * grid_size)
        .into_par_iter()
        .map(|index| {
            let x = (index % grid_size) as u32;
            let y = (index / grid_size) as u32;
            let mean = block_mean(image, x * cell_w, y * cell_h, cell_w, cell_h)?;
            palette.nearest(mean).map(|entry| entry.id)
        })
        .collect();

    let color_ids = color_ids.ok_or_else(|| PipelineError::InvalidSourceData {
        reason: "a grid block contained no pixels".to_string(),
    })?;

    CellGrid::from_color_ids(grid_size, color_ids)
}

/// Mean color of the `w × h` block whose top-left pixel is `(x0, y0)`
pub fn block_mean(image: &RgbImage, x0: u32, y0: u32, w: u32, h: u32) -> Option<[f64; 3]> {
    let mut sum = ChannelSum::default();
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            if let Some(pixel) = image.get_pixel_checked(x, y) {
                sum.add(to_f64(pixel.0));
            }
        }
    }
    sum.mean()
}
