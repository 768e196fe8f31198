//! Geometry helpers for branch metrics.

use nalgebra::{Point3, Vector3};

/// Angle between two vectors, in degrees within `[0, 180]`.
///
/// Returns `None` if either vector has zero (or non-finite) length.
///
/// # Example
///
/// ```
/// use raabe_table::angle_between;
/// use nalgebra::Vector3;
///
/// let angle = angle_between(&Vector3::x(), &Vector3::y()).unwrap();
/// assert!((angle - 90.0).abs() < 1e-10);
///
/// assert!(angle_between(&Vector3::zeros(), &Vector3::y()).is_none());
/// ```
#[must_use]
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> Option<f64> {
    let denom = a.norm() * b.norm();
    if !(denom.is_finite() && denom > 0.0) {
        return None;
    }
    // Rounding can push the cosine just outside [-1, 1] for parallel vectors
    let cos = (a.dot(b) / denom).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Angle `a - vertex - c` at `vertex`, in degrees.
///
/// Returns `None` if `a` or `c` coincides with `vertex`.
#[must_use]
pub fn angle_at(a: &Point3<f64>, vertex: &Point3<f64>, c: &Point3<f64>) -> Option<f64> {
    angle_between(&(a - vertex), &(c - vertex))
}

/// Euclidean arc length of an ordered point sequence.
///
/// Zero for fewer than two points.
///
/// # Example
///
/// ```
/// use raabe_table::arc_length;
/// use nalgebra::Point3;
///
/// let points = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(3.0, 4.0, 0.0),
///     Point3::new(3.0, 4.0, 2.0),
/// ];
/// assert!((arc_length(&points) - 7.0).abs() < 1e-10);
/// ```
#[must_use]
pub fn arc_length(points: &[Point3<f64>]) -> f64 {
    points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
}

/// Median of a set of samples.
///
/// For an even count the two central values are averaged. Returns `None`
/// for an empty slice.
///
/// # Example
///
/// ```
/// use raabe_table::median;
///
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// assert_eq!(median(&[]), None);
/// ```
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some(f64::midpoint(sorted[mid - 1], sorted[mid]))
    } else {
        Some(sorted[mid])
    }
}

/// Centroid of a point set, or `None` if it is empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Some(Point3::from(sum / points.len() as f64))
}

/// Chord direction of a polyline: last point minus first point.
///
/// Zero for fewer than two points.
#[must_use]
pub fn chord(points: &[Point3<f64>]) -> Vector3<f64> {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => last - first,
        _ => Vector3::zeros(),
    }
}
