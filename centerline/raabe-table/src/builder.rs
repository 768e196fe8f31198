//! Tree traversal and per-segment metrics.
//!
//! Segments are linked implicitly: segment `j` is a daughter of segment `i`
//! when its first point index equals the last point index of `i`. A single
//! breadth-first pass from segment 0 assigns Raabe codes, records daughter
//! lists and fills in the angles that depend on the parent.

use std::collections::VecDeque;

use centerline_types::Centerline;
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};
use tracing::{debug, info};

use crate::RaabeCode;
use crate::error::{RaabeError, RaabeResult};
use crate::geometry::{angle_at, angle_between, arc_length, centroid, chord, median};
use crate::params::RaabeParams;
use crate::table::{RaabeTable, SegmentMetrics, cylinder_volume};

/// Geometry of one segment, independent of its place in the tree.
#[derive(Debug, Clone)]
struct SegmentGeometry {
    positions: Vec<Point3<f64>>,
    diameter: f64,
    length: f64,
    direction: Vector3<f64>,
}

impl SegmentGeometry {
    /// Measure segment `index`. Point indices must already be validated.
    fn measure(centerline: &Centerline, index: usize, trim: usize) -> RaabeResult<Self> {
        let out_of_range = || RaabeError::invalid_argument(format!("segment {index} is invalid"));
        let positions = centerline
            .segment_positions(index)
            .ok_or_else(out_of_range)?;
        let radii = centerline.segment_radii(index).ok_or_else(out_of_range)?;

        // The first points of a daughter sit inside the parent's bifurcation bulge
        let samples = if index == 0 || radii.len() <= trim {
            &radii[..]
        } else {
            &radii[trim..]
        };
        let diameter = 2.0 * median(samples).ok_or_else(out_of_range)?;

        let mut length = arc_length(&positions);
        if index != 0 {
            length = (length - radii[0]).max(0.0);
        }

        let direction = chord(&positions);
        Ok(Self {
            positions,
            diameter,
            length,
            direction,
        })
    }
}

/// Check that the connectivity is non-empty and every index is in range.
fn validate_connectivity(centerline: &Centerline) -> RaabeResult<()> {
    if centerline.is_empty() {
        return Err(RaabeError::invalid_argument("connectivity has no segments"));
    }
    let len = centerline.points.len();
    for (segment, indices) in centerline.segments.iter().enumerate() {
        if indices.is_empty() {
            return Err(RaabeError::invalid_argument(format!(
                "segment {segment} has no points"
            )));
        }
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(RaabeError::OutOfRange {
                segment,
                index,
                len,
            });
        }
    }
    Ok(())
}

/// Map each first point index to the segments starting there, in connectivity order.
fn start_lookup(centerline: &Centerline) -> HashMap<usize, Vec<usize>> {
    let mut lookup: HashMap<usize, Vec<usize>> = HashMap::new();
    for (segment, indices) in centerline.segments.iter().enumerate() {
        if let Some(&first) = indices.first() {
            lookup.entry(first).or_default().push(segment);
        }
    }
    lookup
}

/// Result of the breadth-first labeling pass.
struct Traversal {
    codes: Vec<RaabeCode>,
    parents: Vec<Option<usize>>,
    daughters: Vec<Vec<usize>>,
}

/// Label every segment breadth-first from segment 0.
///
/// Daughters are numbered in order of decreasing diameter; equal diameters
/// keep connectivity order.
fn traverse(centerline: &Centerline, geometry: &[SegmentGeometry]) -> RaabeResult<Traversal> {
    let count = centerline.segment_count();
    let lookup = start_lookup(centerline);

    let mut codes: Vec<Option<RaabeCode>> = vec![None; count];
    let mut parents = vec![None; count];
    let mut daughters = vec![Vec::new(); count];

    codes[0] = Some(RaabeCode::root());
    let mut queue = VecDeque::from([0_usize]);

    while let Some(segment) = queue.pop_front() {
        let (Some(end), Some(code)) = (centerline.endpoint(segment), codes[segment].clone()) else {
            continue;
        };

        let mut found = lookup.get(&end).cloned().unwrap_or_default();
        // Stable sort: ties keep connectivity order
        found.sort_by(|&a, &b| geometry[b].diameter.total_cmp(&geometry[a].diameter));

        for (sibling, &daughter) in found.iter().enumerate() {
            if codes[daughter].is_some() {
                return Err(RaabeError::invalid_argument(format!(
                    "segment {daughter} is reached twice; connectivity is not a tree"
                )));
            }
            codes[daughter] = Some(code.daughter(sibling));
            parents[daughter] = Some(segment);
            queue.push_back(daughter);
        }

        debug!(segment, code = %code, daughters = ?found, "Labelled daughters");
        daughters[segment] = found;
    }

    let codes = codes
        .into_iter()
        .enumerate()
        .map(|(segment, code)| {
            code.ok_or_else(|| {
                RaabeError::invalid_argument(format!(
                    "segment {segment} is not connected to the root"
                ))
            })
        })
        .collect::<RaabeResult<Vec<_>>>()?;

    Ok(Traversal {
        codes,
        parents,
        daughters,
    })
}

/// Angle between the first two daughters, seen from the parent's endpoint.
///
/// `None` with fewer than two daughters, or when a daughter's centroid sits
/// on the parent's endpoint and the angle is undefined.
fn branching_angle(
    segment: usize,
    geometry: &[SegmentGeometry],
    daughters: &[usize],
) -> Option<f64> {
    let [first, second, ..] = daughters else {
        return None;
    };
    let vertex = geometry[segment].positions.last()?;
    let a = centroid(&geometry[*first].positions)?;
    let c = centroid(&geometry[*second].positions)?;
    let angle = angle_at(&a, vertex, &c);
    if angle.is_none() {
        debug!(segment, "Branching angle undefined; daughter centroid on the bifurcation");
    }
    angle
}

/// Build the Raabe table of a centerline.
///
/// Row `i` of the result describes `centerline.segments[i]`.
///
/// # Arguments
///
/// * `centerline` - Points and segment connectivity; segment 0 is the root
/// * `params` - Gravity direction, extrusion flag and trimming
///
/// # Errors
///
/// - [`RaabeError::InvalidArgument`] for a gravity vector without three
///   components, empty connectivity or segments, or connectivity that is
///   not a tree rooted at segment 0
/// - [`RaabeError::OutOfRange`] if a segment references a missing point
/// - [`RaabeError::DegenerateGeometry`] if a segment's first and last
///   points coincide or the gravity vector has zero length
///
/// # Example
///
/// ```
/// use centerline_types::y_bifurcation;
/// use raabe_table::{build_table, RaabeParams};
///
/// let table = build_table(&y_bifurcation(), &RaabeParams::default()).unwrap();
///
/// let codes: Vec<&str> = table.iter().map(|row| row.raabe.as_str()).collect();
/// assert_eq!(codes, vec!["0", "00", "01"]);
///
/// let root = table.root().unwrap();
/// assert!(root.bifurcation_angle.is_none());
/// assert!((root.diameter.unwrap() - 6.0).abs() < 1e-10);
/// ```
pub fn build_table(centerline: &Centerline, params: &RaabeParams) -> RaabeResult<RaabeTable> {
    let gravity = params.gravity_vector()?;
    validate_connectivity(centerline)?;

    info!(
        segments = centerline.segment_count(),
        points = centerline.points.len(),
        "Building Raabe table"
    );

    let geometry = (0..centerline.segment_count())
        .map(|i| SegmentGeometry::measure(centerline, i, params.bifurcation_trim))
        .collect::<RaabeResult<Vec<_>>>()?;

    let Traversal {
        codes,
        parents,
        daughters,
    } = traverse(centerline, &geometry)?;

    let mut rows = Vec::with_capacity(geometry.len());
    for (segment, (code, daughter_branches)) in codes.into_iter().zip(daughters).enumerate() {
        let geom = &geometry[segment];

        let gravity_angle = angle_between(&geom.direction, &gravity).ok_or_else(|| {
            RaabeError::degenerate(format!("segment {segment} has zero-length direction"))
        })?;

        let bifurcation_angle = match parents[segment] {
            Some(parent) => Some(
                angle_between(&geom.direction, &geometry[parent].direction).ok_or_else(|| {
                    RaabeError::degenerate(format!(
                        "segment {segment} or its parent {parent} has zero-length direction"
                    ))
                })?,
            ),
            None => None,
        };

        let branching_angle = branching_angle(segment, &geometry, &daughter_branches);

        rows.push(SegmentMetrics {
            raabe: code,
            diameter: Some(geom.diameter),
            length: Some(geom.length),
            bifurcation_angle,
            gravity_angle: Some(gravity_angle),
            approx_volume: Some(cylinder_volume(geom.length, geom.diameter)),
            branching_angle,
            daughter_branches,
            endpoint: centerline.endpoint(segment).unwrap_or_default(),
            source: None,
        });
    }

    let mut table = RaabeTable::from_rows(rows);
    if params.extruded {
        table.null_inlet();
    }

    info!(
        segments = table.len(),
        terminal = table.iter().filter(|row| row.is_terminal()).count(),
        extruded = params.extruded,
        "Raabe table complete"
    );

    Ok(table)
}
