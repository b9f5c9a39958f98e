//! Command-line interface for batch processing images into paint-by-numbers instructions

use crate::io::configuration::{
    DEFAULT_COLOR_COUNT, DEFAULT_GRID_SIZE, DEFAULT_ITERATIONS, DEFAULT_OUTPUT_DIR,
    DEFAULT_TARGET_SIZE, PipelineConfig, STEPS_BY_REGION_JSON,
};
use crate::io::error::{PipelineError, Result, invalid_parameter};
use crate::io::pipeline::{Pipeline, Stage};
use crate::io::progress::ProgressManager;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Extensions accepted when scanning a directory
const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Parser)]
#[command(name = "numberpaint")]
#[command(
    author,
    version,
    about = "Turn photographs into paint-by-numbers palettes, grids and steps"
)]
/// Command-line arguments for the instruction generator
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input image file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Directory receiving one artifact folder per image
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Number of palette colors
    #[arg(short = 'k', long, default_value_t = DEFAULT_COLOR_COUNT)]
    pub colors: usize,

    /// Number of k-means rounds (always run in full)
    #[arg(short, long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: usize,

    /// Cells per grid side
    #[arg(short, long, default_value_t = DEFAULT_GRID_SIZE)]
    pub grid_size: usize,

    /// Side length of the square image used for quantization
    #[arg(short, long, default_value_t = DEFAULT_TARGET_SIZE)]
    pub target_size: u32,

    /// Random seed for reproducible clustering (drawn from the OS if omitted)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Skip blur and contrast enhancement
    #[arg(long)]
    pub no_enhance: bool,

    /// Resume from this stage using previously written artifacts
    #[arg(short, long, value_enum, default_value_t = Stage::Preprocess)]
    pub from: Stage,

    /// Region highlighted in the instructions preview
    #[arg(long, default_value_t = 0)]
    pub highlight_region: usize,

    /// Export an animated GIF of the region painting order
    #[arg(short, long)]
    pub animate: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process images even if their instructions already exist
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Pipeline settings described by the arguments
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            color_count: self.colors,
            iterations: self.iterations,
            grid_size: self.grid_size,
            target_size: self.target_size,
            enhance: !self.no_enhance,
            seed: self.seed,
            highlight_region: self.highlight_region,
            animate: self.animate,
            output_dir: self.output_dir.clone(),
        }
    }
}

/// Orchestrates batch processing of images with progress tracking
pub struct FileProcessor {
    cli: Cli,
    config: PipelineConfig,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);
        let config = cli.pipeline_config();

        Self {
            cli,
            config,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or target is invalid, or if any
    /// image fails to process
    pub fn process(&mut self) -> Result<()> {
        self.config.validate()?;
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(file, index)?;
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;
        if target.is_file() {
            if !is_image_path(target) {
                return Err(invalid_parameter(
                    "target",
                    &target.display(),
                    &"file must be a png or jpeg image",
                ));
            }
            Ok(if self.should_process_file(target) {
                vec![target.clone()]
            } else {
                vec![]
            })
        } else if target.is_dir() {
            let entries = std::fs::read_dir(target).map_err(|e| PipelineError::FileSystem {
                path: target.clone(),
                operation: "read directory",
                source: e,
            })?;
            let mut files = Vec::new();
            for entry in entries {
                let path = entry
                    .map_err(|e| PipelineError::FileSystem {
                        path: target.clone(),
                        operation: "read directory entry",
                        source: e,
                    })?
                    .path();
                if is_image_path(&path) && self.should_process_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(PipelineError::MissingInput {
                path: target.clone(),
                stage: self.cli.from.name(),
            })
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = self.config.artifact_dir(input_path).join(STEPS_BY_REGION_JSON);
        if output_path.exists() {
            log::info!("Skipping: {} (output exists)", input_path.display());
            false
        } else {
            true
        }
    }

    fn process_file(&mut self, input_path: &Path, index: usize) -> Result<()> {
        let start_time = Instant::now();
        let from = self.cli.from;

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path, from.remaining().count());
        }

        // Fresh pipeline per image so a seed reproduces each image independently
        let mut pipeline = Pipeline::new(self.config.clone())?;
        let mut progress = self.progress_manager.as_mut();
        let mut started = false;
        let summary = pipeline.run(input_path, from, |stage| {
            if let Some(pm) = progress.as_deref_mut() {
                if started {
                    pm.finish_stage(index);
                }
                pm.start_stage(index, stage.name());
            }
            started = true;
        })?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index);
        }

        log::info!(
            "{}: {} palette colors, {} color steps, {} region steps in {:.2?}",
            input_path.display(),
            summary.palette_size,
            summary.color_steps,
            summary.region_steps,
            start_time.elapsed()
        );

        Ok(())
    }
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
