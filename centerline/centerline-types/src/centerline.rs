//! Branch-split centerline: points plus segment connectivity.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::PointAttributes;

/// A centerline split into branch segments.
///
/// `segments[i]` lists the point indices of segment `i` from its proximal
/// end to its distal end. Indices are not validated here; consumers that
/// need every index in range check it themselves and report the offending
/// segment.
///
/// # Example
///
/// ```
/// use centerline_types::y_bifurcation;
///
/// let centerline = y_bifurcation();
/// assert_eq!(centerline.segment_count(), 3);
/// assert_eq!(centerline.start(1), Some(2));
/// assert_eq!(centerline.endpoint(0), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Centerline {
    /// Per-point attributes.
    pub points: PointAttributes,

    /// Ordered point indices of each segment. Segment 0 is the root.
    pub segments: Vec<Vec<usize>>,
}

impl Centerline {
    /// Create a centerline from its parts.
    #[inline]
    #[must_use]
    pub const fn new(points: PointAttributes, segments: Vec<Vec<usize>>) -> Self {
        Self { points, segments }
    }

    /// Number of segments.
    #[inline]
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Whether there are no segments.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Point indices of segment `index`.
    #[inline]
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<&[usize]> {
        self.segments.get(index).map(Vec::as_slice)
    }

    /// First point index of segment `index`.
    #[must_use]
    pub fn start(&self, index: usize) -> Option<usize> {
        self.segment(index)?.first().copied()
    }

    /// Last point index of segment `index`.
    #[must_use]
    pub fn endpoint(&self, index: usize) -> Option<usize> {
        self.segment(index)?.last().copied()
    }

    /// Positions of the points of segment `index`, in order.
    ///
    /// Returns `None` if the segment does not exist or references a point
    /// outside the attribute table.
    #[must_use]
    pub fn segment_positions(&self, index: usize) -> Option<Vec<Point3<f64>>> {
        self.segment(index)?
            .iter()
            .map(|&p| self.points.position(p))
            .collect()
    }

    /// Radii of the points of segment `index`, in order.
    #[must_use]
    pub fn segment_radii(&self, index: usize) -> Option<Vec<f64>> {
        self.segment(index)?
            .iter()
            .map(|&p| self.points.radius(p))
            .collect()
    }
}

/// A centerline tagged with its provenance.
///
/// The name ends up in the `source` column of merged tables, so it is
/// usually the stem of the file the centerline was read from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NamedCenterline {
    /// Provenance name.
    pub name: String,
    /// The centerline itself.
    pub centerline: Centerline,
}

impl NamedCenterline {
    /// Tag a centerline with a name.
    #[must_use]
    pub fn new(name: impl Into<String>, centerline: Centerline) -> Self {
        Self {
            name: name.into(),
            centerline,
        }
    }
}

/// A three-segment Y bifurcation pointing down the -Y axis.
///
/// Segment 0 runs `p0 -> p1 -> p2` along -Y with radius 3. Segment 1
/// (`p2 -> p3 -> p4`) bends towards -X with radius 2 and segment 2
/// (`p2 -> p5 -> p6`) mirrors it towards +X with radius 1. Both daughters
/// are 10 units long and meet at `p2 = (0, -10, 0)`.
///
/// Useful for examples and tests.
///
/// # Example
///
/// ```
/// use centerline_types::y_bifurcation;
///
/// let centerline = y_bifurcation();
/// assert_eq!(centerline.points.len(), 7);
/// assert_eq!(centerline.segments[2], vec![2, 5, 6]);
/// ```
#[must_use]
pub fn y_bifurcation() -> Centerline {
    let positions = vec![
        Point3::new(0.0, 0.0, 0.0),    // 0
        Point3::new(0.0, -5.0, 0.0),   // 1
        Point3::new(0.0, -10.0, 0.0),  // 2 bifurcation
        Point3::new(-3.0, -14.0, 0.0), // 3
        Point3::new(-6.0, -18.0, 0.0), // 4
        Point3::new(3.0, -14.0, 0.0),  // 5
        Point3::new(6.0, -18.0, 0.0),  // 6
    ];
    let radii = vec![3.0, 3.0, 3.0, 2.0, 2.0, 1.0, 1.0];

    // Lengths match by construction, so this never takes the default branch.
    let points = PointAttributes::new(positions, radii).unwrap_or_default();
    Centerline::new(points, vec![vec![0, 1, 2], vec![2, 3, 4], vec![2, 5, 6]])
}
