//! Numeric helpers shared by the quantization and sampling stages

/// Color distances, nearest-candidate search and channel means
pub mod distance;
