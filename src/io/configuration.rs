//! Pipeline constants and runtime configuration

use crate::io::error::{Result, invalid_parameter};
use std::path::{Path, PathBuf};

// Defaults for the quantization stage
/// Number of palette colors produced by clustering
pub const DEFAULT_COLOR_COUNT: usize = 8;
/// Fixed number of k-means rounds (no convergence check)
pub const DEFAULT_ITERATIONS: usize = 10;

/// Number of cells along each side of the instruction grid
pub const DEFAULT_GRID_SIZE: usize = 32;

/// Side length of the square image fed into quantization
pub const DEFAULT_TARGET_SIZE: u32 = 256;

// Preprocessing enhancement
/// Gaussian blur sigma applied before contrast enhancement
pub const BLUR_SIGMA: f32 = 1.0;
/// Contrast adjustment passed to `image::imageops::contrast`
pub const CONTRAST_BOOST: f32 = 15.0;

// Rendering settings
/// Width and height of one palette swatch in pixels
pub const SWATCH_SIZE: u32 = 64;
/// Share of white blended into regions that are not highlighted
pub const HIGHLIGHT_FADE: f32 = 0.75;
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 120;
/// Upper bound on animation frames; longer step lists are thinned
pub const MAX_ANIMATION_FRAMES: usize = 120;
/// Multiplier applied to the final frame delay
pub const GIF_FINAL_FRAME_HOLD: u32 = 10;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

/// Directory receiving per-image artifact folders
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

// Artifact file names inside each per-image folder
/// Copy of the input converted to RGB
pub const ORIGINAL_IMAGE: &str = "original.png";
/// Center-cropped and resized input
pub const RESIZED_IMAGE: &str = "resized.png";
/// Blurred and contrast-enhanced input
pub const ENHANCED_IMAGE: &str = "enhanced.png";
/// Image with every pixel replaced by its cluster color
pub const QUANTIZED_IMAGE: &str = "quantized.png";
/// Palette records
pub const PALETTE_JSON: &str = "palette.json";
/// Palette swatch strip
pub const PALETTE_IMAGE: &str = "palette.png";
/// Cell grid document
pub const GRID_JSON: &str = "pixel_grid.json";
/// Rendered cell grid with grid lines
pub const GRID_PREVIEW_IMAGE: &str = "grid_preview.png";
/// One step per cell in row-major order
pub const CELL_STEPS_JSON: &str = "steps.json";
/// One step per color in first-seen order
pub const STEPS_BY_COLOR_JSON: &str = "steps_by_color.json";
/// One step per region in discovery order
pub const STEPS_BY_REGION_JSON: &str = "steps_by_region.json";
/// Grid preview with a single region highlighted
pub const INSTRUCTIONS_PREVIEW_IMAGE: &str = "instructions_preview.png";
/// Animated region-by-region painting order
pub const INSTRUCTIONS_ANIMATION: &str = "instructions.gif";

/// Explicit settings handed to every pipeline stage
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Number of palette colors
    pub color_count: usize,
    /// Number of k-means rounds
    pub iterations: usize,
    /// Cells per grid side
    pub grid_size: usize,
    /// Side length of the preprocessed square image
    pub target_size: u32,
    /// Whether blur and contrast enhancement run after resizing
    pub enhance: bool,
    /// Seed for clustering; drawn from the OS when absent
    pub seed: Option<u64>,
    /// Region index rendered in the instructions preview
    pub highlight_region: usize,
    /// Whether the region animation is exported
    pub animate: bool,
    /// Root directory for artifacts
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            color_count: DEFAULT_COLOR_COUNT,
            iterations: DEFAULT_ITERATIONS,
            grid_size: DEFAULT_GRID_SIZE,
            target_size: DEFAULT_TARGET_SIZE,
            enhance: true,
            seed: None,
            highlight_region: 0,
            animate: false,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl PipelineConfig {
    /// Check parameter ranges before any stage runs
    ///
    /// # Errors
    ///
    /// Returns an error if the color count, grid size or target size is zero,
    /// or if the grid has more cells per side than the image has pixels
    pub fn validate(&self) -> Result<()> {
        if self.color_count == 0 {
            return Err(invalid_parameter(
                "colors",
                &self.color_count,
                &"at least one palette color is required",
            ));
        }
        if self.target_size == 0 {
            return Err(invalid_parameter(
                "target_size",
                &self.target_size,
                &"must be positive",
            ));
        }
        if self.grid_size == 0 {
            return Err(invalid_parameter(
                "grid_size",
                &self.grid_size,
                &"must be positive",
            ));
        }
        if self.grid_size > self.target_size as usize {
            return Err(invalid_parameter(
                "grid_size",
                &self.grid_size,
                &format!("cannot exceed the target size {}", self.target_size),
            ));
        }
        Ok(())
    }

    /// Folder holding all artifacts derived from `input`
    pub fn artifact_dir(&self, input: &Path) -> PathBuf {
        let stem = input.file_stem().unwrap_or_default();
        self.output_dir.join(stem)
    }
}
