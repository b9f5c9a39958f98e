//! Canonical palette representation shared by every stage after quantization

/// Palette entries, hex formatting and nearest-color lookup
pub mod palette;

pub use palette::{Palette, PaletteEntry};
