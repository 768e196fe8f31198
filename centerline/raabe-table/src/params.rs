//! Parameters for Raabe table generation.

use nalgebra::Vector3;

use crate::error::{RaabeError, RaabeResult};

/// Parameters shared by [`build_table`](crate::build_table) and
/// [`merge_tables`](crate::merge_tables).
#[derive(Debug, Clone, PartialEq)]
pub struct RaabeParams {
    /// Gravity direction. Must have exactly three components and non-zero
    /// length. Default: `[0, -1, 0]`
    pub gravity: Vec<f64>,

    /// Whether the inlet segment is an artificial extrusion. When set, the
    /// geometric fields of the root row are left empty. Default: false
    pub extruded: bool,

    /// Number of leading points skipped when taking the median radius of a
    /// non-root segment, to keep the bifurcation bulge out of the diameter.
    /// Default: 2
    pub bifurcation_trim: usize,

    /// Maximum distance between a child tree's first point and the parent
    /// endpoint it attaches to. If None, the nearest endpoint is always used.
    pub max_match_distance: Option<f64>,
}

impl Default for RaabeParams {
    fn default() -> Self {
        Self {
            gravity: vec![0.0, -1.0, 0.0],
            extruded: false,
            bifurcation_trim: 2,
            max_match_distance: None,
        }
    }
}

impl RaabeParams {
    /// Create params with the given gravity direction.
    #[must_use]
    pub fn with_gravity(gravity: impl Into<Vec<f64>>) -> Self {
        Self {
            gravity: gravity.into(),
            ..Default::default()
        }
    }

    /// Set the extruded-inlet flag.
    #[must_use]
    pub fn with_extruded(mut self, extruded: bool) -> Self {
        self.extruded = extruded;
        self
    }

    /// Set the number of points trimmed before the median radius.
    #[must_use]
    pub fn with_bifurcation_trim(mut self, trim: usize) -> Self {
        self.bifurcation_trim = trim;
        self
    }

    /// Set the maximum attachment distance for merged child trees.
    #[must_use]
    pub fn with_max_match_distance(mut self, distance: f64) -> Self {
        self.max_match_distance = Some(distance);
        self
    }

    /// Validate the gravity direction and return it as a vector.
    ///
    /// # Errors
    ///
    /// Returns [`RaabeError::InvalidArgument`] if the gravity vector does not
    /// have exactly three finite components, and
    /// [`RaabeError::DegenerateGeometry`] if it has zero length.
    pub fn gravity_vector(&self) -> RaabeResult<Vector3<f64>> {
        let &[x, y, z] = self.gravity.as_slice() else {
            return Err(RaabeError::invalid_argument(format!(
                "gravity vector must have 3 components, got {}",
                self.gravity.len()
            )));
        };
        let gravity = Vector3::new(x, y, z);
        if !gravity.iter().all(|c| c.is_finite()) {
            return Err(RaabeError::invalid_argument(
                "gravity vector components must be finite",
            ));
        }
        if gravity.norm() <= 0.0 {
            return Err(RaabeError::degenerate("gravity vector has zero length"));
        }
        Ok(gravity)
    }
}
