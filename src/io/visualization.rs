//! Preview rendering for palettes, grids and painting order

use crate::color::Palette;
use crate::io::configuration::{GIF_FINAL_FRAME_HOLD, HIGHLIGHT_FADE, MAX_ANIMATION_FRAMES};
use crate::io::error::{PipelineError, Result};
use crate::spatial::grid::CellGrid;
use crate::spatial::regions::{Region, region_lookup};
use bitvec::vec::BitVec;
use image::{DynamicImage, Frame, Rgb, RgbImage};
use std::path::Path;

const GRID_LINE: Rgb<u8> = Rgb([0, 0, 0]);
const BLANK: Rgb<u8> = Rgb([255, 255, 255]);

/// Horizontal strip with one square swatch per palette entry, in id order
pub fn render_palette(palette: &Palette, swatch_size: u32) -> RgbImage {
    let count = palette.len() as u32;
    let mut img = RgbImage::new((swatch_size * count).max(1), swatch_size.max(1));
    for (i, entry) in palette.iter().enumerate() {
        let x0 = i as u32 * swatch_size;
        fill_rect(&mut img, x0, 0, swatch_size, swatch_size, Rgb(entry.rgb));
    }
    img
}

/// Render every cell as a `cell_size × cell_size` block with black grid lines
///
/// # Errors
///
/// Returns an error if a cell references a color missing from `palette`
pub fn render_grid_preview(grid: &CellGrid, palette: &Palette, cell_size: u32) -> Result<RgbImage> {
    render_cells(grid, cell_size, |_, _, color_id| {
        palette.rgb(color_id).map(|rgb| Some(Rgb(rgb)))
    })
}

/// Render the grid with one region in full color and every other cell faded
///
/// # Errors
///
/// Returns an error if a cell references a color missing from `palette`
pub fn render_region_highlight(
    grid: &CellGrid,
    palette: &Palette,
    region: &Region,
    cell_size: u32,
) -> Result<RgbImage> {
    let size = grid.size();
    let mut highlighted: BitVec = BitVec::repeat(false, grid.cell_count());
    for cell in &region.cells {
        if let Some(mut bit) = highlighted.get_mut(cell.y * size + cell.x) {
            *bit = true;
        }
    }

    render_cells(grid, cell_size, |x, y, color_id| {
        let rgb = palette.rgb(color_id)?;
        let in_region = highlighted.get(y * size + x).is_some_and(|bit| *bit);
        Ok(Some(if in_region { Rgb(rgb) } else { fade(rgb) }))
    })
}

/// Encode an animated GIF that paints one region per frame in step order
///
/// Long step lists are thinned so the animation keeps at most
/// `MAX_ANIMATION_FRAMES` frames; the final frame always shows the full grid
/// and is held longer. `path` only labels encoding errors.
///
/// # Errors
///
/// Returns an error if there are no regions, a color id is unknown, or the
/// frames cannot be encoded
pub fn encode_step_animation(
    path: &Path,
    grid: &CellGrid,
    palette: &Palette,
    regions: &[Region],
    cell_size: u32,
    frame_delay_ms: u32,
) -> Result<Vec<u8>> {
    if regions.is_empty() {
        return Err(PipelineError::InvalidSourceData {
            reason: "No regions available for the step animation".to_string(),
        });
    }

    let lookup = region_lookup(grid, regions);
    let size = grid.size();
    let skip_factor = regions.len().div_ceil(MAX_ANIMATION_FRAMES).max(1);

    let mut frames = Vec::new();
    for painted in 0..=regions.len() {
        let is_last = painted == regions.len();
        if painted % skip_factor != 0 && !is_last {
            continue;
        }

        let img = render_cells(grid, cell_size, |x, y, color_id| {
            let visible = lookup
                .get(y * size + x)
                .copied()
                .flatten()
                .is_some_and(|region_index| region_index < painted);
            if visible {
                palette.rgb(color_id).map(|rgb| Some(Rgb(rgb)))
            } else {
                Ok(None)
            }
        })?;

        let delay = if is_last {
            frame_delay_ms * GIF_FINAL_FRAME_HOLD
        } else {
            frame_delay_ms
        };
        frames.push(Frame::from_parts(
            DynamicImage::ImageRgb8(img).into_rgba8(),
            0,
            0,
            image::Delay::from_numer_denom_ms(delay, 1),
        ));
    }

    let mut bytes = Vec::new();
    {
        let mut encoder = image::codecs::gif::GifEncoder::new(&mut bytes);
        encoder
            .encode_frames(frames)
            .map_err(|e| PipelineError::ImageExport {
                path: path.to_path_buf(),
                source: e,
            })?;
    }
    Ok(bytes)
}

// Cells for which `color_of` yields `None` are left blank
fn render_cells<F>(grid: &CellGrid, cell_size: u32, mut color_of: F) -> Result<RgbImage>
where
    F: FnMut(usize, usize, usize) -> Result<Option<Rgb<u8>>>,
{
    let cell_size = cell_size.max(1);
    let side = (grid.size() as u32 * cell_size).max(1);
    let mut img = RgbImage::from_pixel(side, side, BLANK);

    for cell in grid.cells() {
        if let Some(color) = color_of(cell.x, cell.y, cell.color_id)? {
            let x0 = cell.x as u32 * cell_size;
            let y0 = cell.y as u32 * cell_size;
            fill_rect(&mut img, x0, y0, cell_size, cell_size, color);
        }
    }

    draw_grid_lines(&mut img, grid.size() as u32, cell_size);
    Ok(img)
}

fn draw_grid_lines(img: &mut RgbImage, grid_size: u32, cell_size: u32) {
    let (width, height) = img.dimensions();
    for i in 0..=grid_size {
        // Closing lines sit on the last pixel row/column
        let offset = (i * cell_size).min(width.saturating_sub(1));
        for y in 0..height {
            img.put_pixel(offset, y, GRID_LINE);
        }
        let offset = (i * cell_size).min(height.saturating_sub(1));
        for x in 0..width {
            img.put_pixel(x, offset, GRID_LINE);
        }
    }
}

fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) {
    for y in y0..y0.saturating_add(h) {
        for x in x0..x0.saturating_add(w) {
            if let Some(pixel) = img.get_pixel_mut_checked(x, y) {
                *pixel = color;
            }
        }
    }
}

fn fade(rgb: [u8; 3]) -> Rgb<u8> {
    Rgb(rgb.map(|c| {
        let c = f32::from(c);
        HIGHLIGHT_FADE.mul_add(255.0 - c, c) as u8
    }))
}
