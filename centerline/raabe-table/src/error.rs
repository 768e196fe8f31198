//! Error types for Raabe table construction.

use thiserror::Error;

/// Result type alias for Raabe table operations.
pub type RaabeResult<T> = Result<T, RaabeError>;

/// Errors that can occur while building or merging Raabe tables.
#[derive(Debug, Error)]
pub enum RaabeError {
    /// Malformed input: bad gravity vector, empty connectivity, or a
    /// connectivity that is not a tree rooted at segment 0.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A segment references a point that is not in the attribute table.
    #[error("segment {segment} references point {index}, but only {len} points exist")]
    OutOfRange {
        /// Offending segment.
        segment: usize,
        /// Offending point index.
        index: usize,
        /// Number of points in the attribute table.
        len: usize,
    },

    /// A zero-length direction vector was needed to compute an angle.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// No parent endpoint lies within the configured match distance of a child tree.
    #[error("no parent endpoint within {max} of child '{child}' (nearest is {distance})")]
    NoMatchFound {
        /// Provenance name of the child tree.
        child: String,
        /// Distance to the nearest parent endpoint.
        distance: f64,
        /// Configured maximum distance.
        max: f64,
    },
}

impl RaabeError {
    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(details: impl Into<String>) -> Self {
        Self::InvalidArgument(details.into())
    }

    /// Create a degenerate geometry error.
    #[must_use]
    pub fn degenerate(details: impl Into<String>) -> Self {
        Self::DegenerateGeometry(details.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RaabeError::invalid_argument("gravity vector must have 3 components");
        assert!(format!("{err}").contains("3 components"));

        let err = RaabeError::OutOfRange {
            segment: 2,
            index: 40,
            len: 12,
        };
        let msg = format!("{err}");
        assert!(msg.contains("segment 2"));
        assert!(msg.contains("40"));

        let err = RaabeError::degenerate("direction of segment 5");
        assert!(format!("{err}").contains("segment 5"));

        let err = RaabeError::NoMatchFound {
            child: "right_lower".to_string(),
            distance: 12.5,
            max: 2.0,
        };
        assert!(format!("{err}").contains("right_lower"));
    }
}
