//! Error types for centerline I/O.

use std::path::PathBuf;

use centerline_types::CenterlineError;
use thiserror::Error;

/// Result type for centerline I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while reading centerlines, writing tables or
/// running the extraction toolkit.
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Unknown file format (unrecognized extension).
    #[error("unknown file format: .{extension}")]
    UnknownFormat {
        /// The unrecognized extension.
        extension: String,
    },

    /// Invalid file content (parse error).
    #[error("invalid file content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// A required data array is missing from the centerline file.
    #[error("missing data array '{name}'")]
    MissingArray {
        /// Name of the missing array.
        name: String,
    },

    /// The external extraction tool failed or could not be started.
    #[error("{tool} failed: {message}")]
    ExternalTool {
        /// Executable that was run.
        tool: String,
        /// What went wrong, including captured stderr where available.
        message: String,
    },

    /// Point arrays that do not line up.
    #[error(transparent)]
    Centerline(#[from] CenterlineError),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Float parsing error.
    #[error("float parsing error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    /// Integer parsing error.
    #[error("integer parsing error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),
}

impl IoError {
    /// Create an `InvalidContent` error with the given message.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }

    /// Create an `ExternalTool` error.
    #[must_use]
    pub fn external_tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Map an error from opening `path`, turning `NotFound` into [`IoError::FileNotFound`].
    pub(crate) fn open(path: &std::path::Path, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(error)
        }
    }
}
