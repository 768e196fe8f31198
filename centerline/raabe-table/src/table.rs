//! Raabe table rows and containers.

use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::RaabeCode;

/// Metrics of one branch segment.
///
/// Geometric fields are `None` only when they were deliberately cleared
/// (the root of an extruded inlet) or are undefined for the segment
/// (bifurcation angle of the root, branching angle of a segment with fewer
/// than two daughters).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentMetrics {
    /// Hierarchical label.
    pub raabe: RaabeCode,

    /// Twice the median inscribed-sphere radius.
    pub diameter: Option<f64>,

    /// Arc length, shortened by the parent's bulge for non-root segments.
    pub length: Option<f64>,

    /// Angle to the parent segment's direction, in degrees.
    pub bifurcation_angle: Option<f64>,

    /// Angle to the gravity direction, in degrees.
    pub gravity_angle: Option<f64>,

    /// Volume of a cylinder with this segment's length and diameter.
    pub approx_volume: Option<f64>,

    /// Angle between the two largest daughters at the distal bifurcation, in degrees.
    pub branching_angle: Option<f64>,

    /// Row indices of the daughters, largest diameter first.
    pub daughter_branches: Vec<usize>,

    /// Last point index of the segment.
    pub endpoint: usize,

    /// Name of the centerline this row was built from.
    pub source: Option<String>,
}

impl SegmentMetrics {
    /// Whether the segment has no daughters.
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.daughter_branches.is_empty()
    }

    /// Clear the geometric fields, keeping label, daughters and branching angle.
    pub fn clear_geometry(&mut self) {
        self.diameter = None;
        self.length = None;
        self.bifurcation_angle = None;
        self.gravity_angle = None;
        self.approx_volume = None;
    }
}

/// Volume of a cylinder with the given length and diameter.
#[must_use]
pub fn cylinder_volume(length: f64, diameter: f64) -> f64 {
    let radius = diameter / 2.0;
    length * PI * radius * radius
}

/// A Raabe table: one row per segment.
///
/// Row `i` of a freshly built table describes segment `i` of the centerline
/// it was built from; daughter lists refer to rows of the same table.
///
/// # Example
///
/// ```
/// use centerline_types::y_bifurcation;
/// use raabe_table::{build_table, RaabeParams};
///
/// let table = build_table(&y_bifurcation(), &RaabeParams::default()).unwrap();
/// assert_eq!(table.len(), 3);
/// assert_eq!(table.root().unwrap().daughter_branches, vec![1, 2]);
/// assert_eq!(table.find("01"), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RaabeTable {
    rows: Vec<SegmentMetrics>,
}

impl RaabeTable {
    /// Create a table from rows.
    #[inline]
    #[must_use]
    pub const fn from_rows(rows: Vec<SegmentMetrics>) -> Self {
        Self { rows }
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row `index`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SegmentMetrics> {
        self.rows.get(index)
    }

    /// The root row.
    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<&SegmentMetrics> {
        self.rows.first()
    }

    /// All rows in order.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[SegmentMetrics] {
        &self.rows
    }

    /// Iterate over rows in order.
    pub fn iter(&self) -> std::slice::Iter<'_, SegmentMetrics> {
        self.rows.iter()
    }

    /// Consume the table, returning its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<SegmentMetrics> {
        self.rows
    }

    /// Index of the first row carrying `code`.
    ///
    /// Codes are unique within a single built table. In a merged table a
    /// child's root row repeats the code of the parent row it continues, and
    /// this returns the parent row; filter on [`SegmentMetrics::source`] to
    /// reach the child's row.
    #[must_use]
    pub fn find(&self, code: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.raabe.as_str() == code)
    }

    /// Clear the geometric fields of the root row.
    ///
    /// Used when the inlet segment is an artificial extrusion. Applying it
    /// more than once has no further effect.
    pub fn null_inlet(&mut self) {
        if let Some(root) = self.rows.first_mut() {
            root.clear_geometry();
        }
    }

    /// Tag every row with a provenance name.
    #[must_use]
    pub fn with_source(mut self, source: &str) -> Self {
        for row in &mut self.rows {
            row.source = Some(source.to_string());
        }
        self
    }
}

impl<'a> IntoIterator for &'a RaabeTable {
    type Item = &'a SegmentMetrics;
    type IntoIter = std::slice::Iter<'a, SegmentMetrics>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
