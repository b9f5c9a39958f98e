//! File-to-file orchestration of the preprocessing, quantization, grid and step stages
//!
//! Each stage persists its artifacts into the image's artifact folder before
//! the next stage starts. A run may resume from any stage, in which case the
//! upstream artifacts are read back from disk and validated. Every input the
//! first stage needs is checked before anything runs.

use crate::color::Palette;
use crate::instructions::{ColorGroups, steps::cell_steps, steps_by_color, steps_by_region};
use crate::io::configuration::{
    CELL_STEPS_JSON, ENHANCED_IMAGE, GIF_FRAME_DELAY_MS, GRID_JSON, GRID_PREVIEW_IMAGE,
    INSTRUCTIONS_ANIMATION, INSTRUCTIONS_PREVIEW_IMAGE, ORIGINAL_IMAGE, PALETTE_IMAGE,
    PALETTE_JSON, PipelineConfig, QUANTIZED_IMAGE, RESIZED_IMAGE, STEPS_BY_COLOR_JSON,
    STEPS_BY_REGION_JSON, SWATCH_SIZE,
};
use crate::io::error::{PipelineError, Result, invalid_parameter};
use crate::io::image::{image_from_pixels, load_rgb, pixels_of, preprocess};
use crate::io::persistence::{ArtifactBatch, read_grid, read_palette};
use crate::io::visualization::{
    encode_step_animation, render_grid_preview, render_palette, render_region_highlight,
};
use crate::quantize::quantize;
use crate::spatial::{CellGrid, Region, build_grid, segment_regions};
use clap::ValueEnum;
use image::RgbImage;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum Stage {
    /// Crop, resize and enhance the input image
    Preprocess,
    /// Cluster colors and write the palette
    Quantize,
    /// Sample the cell grid
    Grid,
    /// Segment regions and write painting steps
    Steps,
}

impl Stage {
    /// Every stage in execution order
    pub const ALL: [Self; 4] = [Self::Preprocess, Self::Quantize, Self::Grid, Self::Steps];

    /// Short lowercase name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Preprocess => "preprocess",
            Self::Quantize => "quantize",
            Self::Grid => "grid",
            Self::Steps => "steps",
        }
    }

    /// Files that must exist to start the pipeline at this stage
    pub fn required_inputs(self, input: &Path, artifact_dir: &Path) -> Vec<PathBuf> {
        match self {
            Self::Preprocess => vec![input.to_path_buf()],
            Self::Quantize => vec![artifact_dir.join(ENHANCED_IMAGE)],
            Self::Grid => vec![
                artifact_dir.join(QUANTIZED_IMAGE),
                artifact_dir.join(PALETTE_JSON),
            ],
            Self::Steps => vec![
                artifact_dir.join(PALETTE_JSON),
                artifact_dir.join(GRID_JSON),
            ],
        }
    }

    /// Stages run when starting at this stage
    pub fn remaining(self) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |stage| *stage >= self)
    }
}

/// Counts describing a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Palette entries used by the grid
    pub palette_size: usize,
    /// Cells per grid side
    pub grid_size: usize,
    /// Steps in the by-color instructions
    pub color_steps: usize,
    /// Steps in the by-region instructions
    pub region_steps: usize,
}

// Artifacts handed from one stage to the next within a single run
#[derive(Default)]
struct Carry {
    enhanced: Option<RgbImage>,
    quantized: Option<RgbImage>,
    palette: Option<Palette>,
    grid: Option<CellGrid>,
}

/// Runs the stages for one input image
pub struct Pipeline {
    config: PipelineConfig,
    rng: StdRng,
}

impl Pipeline {
    /// Create a pipeline, seeding clustering from the config or the OS
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Ok(Self { config, rng })
    }

    /// Active configuration
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Check that every input needed to start at `from` exists
    ///
    /// # Errors
    ///
    /// Returns a missing input error for the first absent file
    pub fn check_inputs(&self, input: &Path, from: Stage) -> Result<()> {
        let artifact_dir = self.config.artifact_dir(input);
        match from
            .required_inputs(input, &artifact_dir)
            .into_iter()
            .find(|path| !path.is_file())
        {
            Some(path) => Err(PipelineError::MissingInput {
                path,
                stage: from.name(),
            }),
            None => Ok(()),
        }
    }

    /// Run every stage from `from` onwards for `input`
    ///
    /// `on_stage` is called with each stage before it starts.
    ///
    /// # Errors
    ///
    /// Returns an error if an input is missing, a persisted artifact is
    /// malformed, or any stage fails to compute or write its artifacts
    pub fn run<F>(&mut self, input: &Path, from: Stage, mut on_stage: F) -> Result<RunSummary>
    where
        F: FnMut(Stage),
    {
        self.check_inputs(input, from)?;
        let dir = self.config.artifact_dir(input);
        let mut carry = Carry::default();
        let mut summary = RunSummary::default();

        for stage in from.remaining() {
            on_stage(stage);
            log::info!("{}: running stage '{}'", input.display(), stage.name());
            match stage {
                Stage::Preprocess => self.run_preprocess(input, &dir, &mut carry)?,
                Stage::Quantize => self.run_quantize(&dir, &mut carry)?,
                Stage::Grid => self.run_grid(&dir, &mut carry)?,
                Stage::Steps => summary = self.run_steps(&dir, &mut carry)?,
            }
        }

        Ok(summary)
    }

    fn run_preprocess(&self, input: &Path, dir: &Path, carry: &mut Carry) -> Result<()> {
        let original = load_rgb(input)?;
        let prepared = preprocess(&original, self.config.target_size, self.config.enhance)?;

        let mut batch = ArtifactBatch::new();
        batch.stage_png(&dir.join(ORIGINAL_IMAGE), &original)?;
        batch.stage_png(&dir.join(RESIZED_IMAGE), &prepared.resized)?;
        batch.stage_png(&dir.join(ENHANCED_IMAGE), &prepared.enhanced)?;
        batch.commit()?;

        carry.enhanced = Some(prepared.enhanced);
        Ok(())
    }

    fn run_quantize(&mut self, dir: &Path, carry: &mut Carry) -> Result<()> {
        let enhanced = match carry.enhanced.take() {
            Some(image) => image,
            None => load_rgb(dir.join(ENHANCED_IMAGE))?,
        };

        let quantization = quantize(
            &pixels_of(&enhanced),
            self.config.color_count,
            self.config.iterations,
            &mut self.rng,
        )?;
        let quantized = image_from_pixels(
            enhanced.width(),
            enhanced.height(),
            &quantization.quantized_pixels()?,
        )?;

        log::debug!("cluster sizes: {:?}", quantization.cluster_sizes());

        let mut batch = ArtifactBatch::new();
        batch.stage_png(&dir.join(QUANTIZED_IMAGE), &quantized)?;
        batch.stage_png(
            &dir.join(PALETTE_IMAGE),
            &render_palette(&quantization.palette, SWATCH_SIZE),
        )?;
        batch.stage_json(&dir.join(PALETTE_JSON), &quantization.palette)?;
        batch.commit()?;

        carry.quantized = Some(quantized);
        carry.palette = Some(quantization.palette);
        Ok(())
    }

    fn run_grid(&self, dir: &Path, carry: &mut Carry) -> Result<()> {
        let quantized = match carry.quantized.take() {
            Some(image) => image,
            None => load_rgb(dir.join(QUANTIZED_IMAGE))?,
        };
        let palette = match carry.palette.take() {
            Some(palette) => palette,
            None => read_palette(&dir.join(PALETTE_JSON))?,
        };

        let grid = build_grid(&quantized, &palette, self.config.grid_size)?;
        let preview = render_grid_preview(&grid, &palette, self.preview_cell_size(&grid))?;

        let mut batch = ArtifactBatch::new();
        batch.stage_png(&dir.join(GRID_PREVIEW_IMAGE), &preview)?;
        batch.stage_json(&dir.join(CELL_STEPS_JSON), &cell_steps(&grid))?;
        batch.stage_json(&dir.join(GRID_JSON), &grid.to_document())?;
        batch.commit()?;

        carry.palette = Some(palette);
        carry.grid = Some(grid);
        Ok(())
    }

    fn run_steps(&self, dir: &Path, carry: &mut Carry) -> Result<RunSummary> {
        let palette = match carry.palette.take() {
            Some(palette) => palette,
            None => read_palette(&dir.join(PALETTE_JSON))?,
        };
        let grid = match carry.grid.take() {
            Some(grid) => grid,
            None => read_grid(&dir.join(GRID_JSON), &palette)?,
        };

        let regions = segment_regions(&grid);
        let groups = ColorGroups::from_grid(&grid);
        let by_color = steps_by_color(&groups);
        let by_region = steps_by_region(&regions);
        let cell_size = self.preview_cell_size(&grid);

        let highlight = regions.get(self.config.highlight_region).ok_or_else(|| {
            invalid_parameter(
                "highlight_region",
                &self.config.highlight_region,
                &format!("grid has {} regions", regions.len()),
            )
        })?;
        let preview = render_region_highlight(&grid, &palette, highlight, cell_size)?;

        let mut batch = ArtifactBatch::new();
        batch.stage_png(&dir.join(INSTRUCTIONS_PREVIEW_IMAGE), &preview)?;
        if self.config.animate {
            let animation_path = dir.join(INSTRUCTIONS_ANIMATION);
            let animation = encode_step_animation(
                &animation_path,
                &grid,
                &palette,
                &regions,
                cell_size,
                GIF_FRAME_DELAY_MS,
            )?;
            batch.stage_bytes(&animation_path, &animation)?;
        }
        batch.stage_json(&dir.join(STEPS_BY_COLOR_JSON), &by_color)?;
        // Marks the image as done for skip-existing, so it is placed last
        batch.stage_json(&dir.join(STEPS_BY_REGION_JSON), &by_region)?;
        batch.commit()?;

        log::info!(
            "{} colors, {} regions on a {}x{} grid, largest region {} cells",
            by_color.len(),
            by_region.len(),
            grid.size(),
            grid.size(),
            regions.iter().map(Region::area).max().unwrap_or(0)
        );

        Ok(RunSummary {
            palette_size: palette.len(),
            grid_size: grid.size(),
            color_steps: by_color.len(),
            region_steps: by_region.len(),
        })
    }

    fn preview_cell_size(&self, grid: &CellGrid) -> u32 {
        let cells = u32::try_from(grid.size()).unwrap_or(u32::MAX).max(1);
        (self.config.target_size / cells).max(1)
    }
}
