//! Input/output operations and pipeline orchestration

/// Command-line parsing and batch file processing
pub mod cli;
/// Pipeline constants and runtime configuration
pub mod configuration;
/// Error types for all pipeline operations
pub mod error;
/// Image loading and preprocessing
pub mod image;
/// Atomic artifact writing and validated reading
pub mod persistence;
/// Stage orchestration for a single image
pub mod pipeline;
/// Terminal progress display
pub mod progress;
/// Palette, grid and instruction previews
pub mod visualization;
