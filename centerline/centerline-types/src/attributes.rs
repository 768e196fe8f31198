//! Per-point centerline attributes.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CenterlineError, CenterlineResult};

/// A named per-point scalar array carried through unchanged.
///
/// Extraction toolkits attach arrays such as abscissas or group ids to
/// every centerline point. They play no part in the metrics but are kept so
/// downstream tools can see them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScalarArray {
    /// Array name as it appeared in the source file.
    pub name: String,
    /// One value per point.
    pub values: Vec<f64>,
}

impl ScalarArray {
    /// Create a named array.
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Point attribute table of a centerline.
///
/// Point `i` has position `positions()[i]` and maximum inscribed sphere
/// radius `radii()[i]`. All arrays have the same length; this is checked on
/// construction, after which the table is read-only.
///
/// # Example
///
/// ```
/// use centerline_types::{PointAttributes, ScalarArray, Point3};
///
/// let points = PointAttributes::new(
///     vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)],
///     vec![0.5, 0.4],
/// )
/// .unwrap()
/// .with_scalar(ScalarArray::new("Abscissas", vec![0.0, 1.0]))
/// .unwrap();
///
/// assert_eq!(points.len(), 2);
/// assert_eq!(points.radius(1), Some(0.4));
/// assert!(points.scalar("Abscissas").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointAttributes {
    positions: Vec<Point3<f64>>,
    radii: Vec<f64>,
    scalars: Vec<ScalarArray>,
}

impl PointAttributes {
    /// Create a point table from positions and radii.
    ///
    /// # Errors
    ///
    /// Returns [`CenterlineError::LengthMismatch`] if the two arrays differ in length.
    pub fn new(positions: Vec<Point3<f64>>, radii: Vec<f64>) -> CenterlineResult<Self> {
        if positions.len() != radii.len() {
            return Err(CenterlineError::length_mismatch(
                "radius",
                positions.len(),
                radii.len(),
            ));
        }
        Ok(Self {
            positions,
            radii,
            scalars: Vec::new(),
        })
    }

    /// Attach an auxiliary scalar array.
    ///
    /// # Errors
    ///
    /// Returns an error if the array length differs from the point count or
    /// an array with the same name is already attached.
    pub fn with_scalar(mut self, array: ScalarArray) -> CenterlineResult<Self> {
        if array.values.len() != self.positions.len() {
            return Err(CenterlineError::length_mismatch(
                array.name,
                self.positions.len(),
                array.values.len(),
            ));
        }
        if self.scalar(&array.name).is_some() {
            return Err(CenterlineError::DuplicateArray(array.name));
        }
        self.scalars.push(array);
        Ok(self)
    }

    /// Number of points.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the table has no points.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of point `index`.
    #[inline]
    #[must_use]
    pub fn position(&self, index: usize) -> Option<Point3<f64>> {
        self.positions.get(index).copied()
    }

    /// Inscribed-sphere radius at point `index`.
    #[inline]
    #[must_use]
    pub fn radius(&self, index: usize) -> Option<f64> {
        self.radii.get(index).copied()
    }

    /// All positions, in point order.
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// All radii, in point order.
    #[inline]
    #[must_use]
    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    /// Auxiliary arrays, in attachment order.
    #[inline]
    #[must_use]
    pub fn scalars(&self) -> &[ScalarArray] {
        &self.scalars
    }

    /// Look up an auxiliary array by name.
    #[must_use]
    pub fn scalar(&self, name: &str) -> Option<&ScalarArray> {
        self.scalars.iter().find(|s| s.name == name)
    }
}
