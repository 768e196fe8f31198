//! Error types for centerline construction.

use thiserror::Error;

/// Result type alias for centerline construction.
pub type CenterlineResult<T> = Result<T, CenterlineError>;

/// Errors that can occur while assembling centerline data.
#[derive(Debug, Error)]
pub enum CenterlineError {
    /// A per-point array does not have one entry per point.
    #[error("array '{array}' has {got} entries, expected {expected}")]
    LengthMismatch {
        /// Name of the offending array.
        array: String,
        /// Number of points.
        expected: usize,
        /// Number of entries found.
        got: usize,
    },

    /// Two auxiliary arrays share a name.
    #[error("duplicate point array '{0}'")]
    DuplicateArray(String),
}

impl CenterlineError {
    /// Create a length mismatch error.
    #[must_use]
    pub fn length_mismatch(array: impl Into<String>, expected: usize, got: usize) -> Self {
        Self::LengthMismatch {
            array: array.into(),
            expected,
            got,
        }
    }
}
