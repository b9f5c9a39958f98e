//! Error types and context management for pipeline operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all pipeline operations
#[derive(Debug)]
pub enum PipelineError {
    /// Failed to load an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// A required upstream artifact does not exist
    ///
    /// Raised before any stage runs, so nothing is written when it occurs.
    MissingInput {
        /// Path where the artifact was expected
        path: PathBuf,
        /// Stage that needs the artifact
        stage: &'static str,
    },

    /// A persisted palette or grid could not be used
    MalformedPersistedData {
        /// File the data was read from
        path: PathBuf,
        /// Offending field, e.g. `cells[12].colorId`
        field: String,
        /// Description of what is wrong with the field
        reason: String,
    },

    /// Source data doesn't meet pipeline requirements
    InvalidSourceData {
        /// Description of what's wrong with the source data
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Color id does not reference a palette entry
    InvalidColorId {
        /// The invalid color id
        id: usize,
        /// Number of entries in the palette
        palette_len: usize,
    },

    /// Failed to save a rendered image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// Failed to encode an artifact as JSON
    Serialization {
        /// Path of the artifact being written
        path: PathBuf,
        /// Underlying encoder error
        source: serde_json::Error,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::MissingInput { path, stage } => {
                write!(
                    f,
                    "Missing input for stage '{stage}': '{}' does not exist",
                    path.display()
                )
            }
            Self::MalformedPersistedData {
                path,
                field,
                reason,
            } => {
                write!(
                    f,
                    "Malformed data in '{}' at '{field}': {reason}",
                    path.display()
                )
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidColorId { id, palette_len } => {
                write!(
                    f,
                    "Color id {id} is out of bounds (palette has {palette_len} entries)"
                )
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::Serialization { path, source } => {
                write!(f, "Failed to encode '{}': {source}", path.display())
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for pipeline results
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Attaches the file being read to persisted-data errors
pub trait WithPath<T> {
    /// Replace the placeholder path of a malformed-data or I/O error
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path applied
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T, E> WithPath<T> for std::result::Result<T, E>
where
    E: Into<PipelineError>,
{
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            match &mut error {
                PipelineError::MalformedPersistedData { path: p, .. }
                | PipelineError::FileSystem { path: p, .. }
                | PipelineError::ImageLoad { path: p, .. } => *p = path.into(),
                _ => {}
            }
            error
        })
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> PipelineError {
    PipelineError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a malformed persisted data error for a named field
///
/// The path is a placeholder until [`WithPath::with_path`] supplies the file.
pub fn malformed(field: impl Into<String>, reason: &impl ToString) -> PipelineError {
    PipelineError::MalformedPersistedData {
        path: PathBuf::from("<unknown>"),
        field: field.into(),
        reason: reason.to_string(),
    }
}
