//! Atomic artifact writing and validated reading of persisted snapshots
//!
//! A stage stages all of its artifacts as temporary files in their destination
//! directories and renames them into place only once every one of them has been
//! written, so a failed stage leaves none of its artifacts behind.

use crate::color::{Palette, PaletteEntry};
use crate::io::error::{PipelineError, Result, WithPath, malformed};
use crate::spatial::grid::{CellGrid, GridDocument};
use image::{ImageFormat, RgbImage};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Artifacts of one stage, staged in temporary files and moved into place together
///
/// Each artifact is fully written to a temporary file next to its destination
/// when staged. [`ArtifactBatch::commit`] renames them in staging order; if a
/// rename fails, the artifacts this batch already placed are removed again and
/// the remaining temporary files are discarded.
#[derive(Debug, Default)]
pub struct ArtifactBatch {
    staged: Vec<(NamedTempFile, PathBuf)>,
}

impl ArtifactBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Write an artifact for `path` through `write` into a temporary file
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or temporary file cannot be created,
    /// or if `write` fails
    pub fn stage<F>(&mut self, path: &Path, write: F) -> Result<()>
    where
        F: FnOnce(&mut File) -> Result<()>,
    {
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        std::fs::create_dir_all(parent).map_err(|e| PipelineError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;

        let mut temp = NamedTempFile::new_in(parent).map_err(|e| PipelineError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create temporary file",
            source: e,
        })?;

        write(temp.as_file_mut())?;
        self.staged.push((temp, path.to_path_buf()));
        Ok(())
    }

    /// Stage `value` as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or any file operation fails
    pub fn stage_json<T: Serialize + ?Sized>(&mut self, path: &Path, value: &T) -> Result<()> {
        self.stage(path, |file| {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value).map_err(|e| {
                PipelineError::Serialization {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
            writer.flush().map_err(|e| PipelineError::FileSystem {
                path: path.to_path_buf(),
                operation: "write",
                source: e,
            })
        })
    }

    /// Stage `image` encoded as PNG
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or any file operation fails
    pub fn stage_png(&mut self, path: &Path, image: &RgbImage) -> Result<()> {
        self.stage(path, |file| {
            image
                .write_to(file, ImageFormat::Png)
                .map_err(|e| PipelineError::ImageExport {
                    path: path.to_path_buf(),
                    source: e,
                })
        })
    }

    /// Stage already encoded bytes
    ///
    /// # Errors
    ///
    /// Returns an error if any file operation fails
    pub fn stage_bytes(&mut self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.stage(path, |file| {
            file.write_all(bytes).map_err(|e| PipelineError::FileSystem {
                path: path.to_path_buf(),
                operation: "write",
                source: e,
            })
        })
    }

    /// Move every staged artifact into place, in staging order
    ///
    /// # Errors
    ///
    /// Returns an error for the first artifact that cannot be moved into place,
    /// after removing the artifacts of this batch that were already placed
    pub fn commit(self) -> Result<()> {
        let mut placed: Vec<PathBuf> = Vec::with_capacity(self.staged.len());

        for (temp, path) in self.staged {
            if let Err(e) = temp.persist(&path) {
                for done in &placed {
                    if let Err(remove_error) = std::fs::remove_file(done) {
                        log::warn!("Failed to roll back '{}': {remove_error}", done.display());
                    }
                }
                return Err(PipelineError::FileSystem {
                    path,
                    operation: "persist",
                    source: e.error,
                });
            }
            placed.push(path);
        }

        Ok(())
    }
}

/// Read and decode a JSON artifact
///
/// # Errors
///
/// Returns a file system error if the file cannot be read, or a malformed
/// data error locating the first decoding problem
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|e| PipelineError::FileSystem {
        path: path.to_path_buf(),
        operation: "read",
        source: e,
    })?;
    serde_json::from_str(&text)
        .map_err(|e| {
            malformed(
                format!("line {} column {}", e.line(), e.column()),
                &e,
            )
        })
        .with_path(path)
}

/// Read a palette file and check its entries
///
/// # Errors
///
/// Returns an error if the file is unreadable, not valid palette JSON, or its
/// ids and hex strings are inconsistent
pub fn read_palette(path: &Path) -> Result<Palette> {
    let entries: Vec<PaletteEntry> = read_json(path)?;
    Palette::from_entries(entries).with_path(path)
}

/// Read a grid file and check it against `palette`
///
/// # Errors
///
/// Returns an error if the file is unreadable, not valid grid JSON, does not
/// cover every grid position exactly once, or references an unknown color id
pub fn read_grid(path: &Path, palette: &Palette) -> Result<CellGrid> {
    let document: GridDocument = read_json(path)?;
    CellGrid::from_document(&document, palette).with_path(path)
}
