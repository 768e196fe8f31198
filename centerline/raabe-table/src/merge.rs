//! Merging separately extracted sub-trees into one Raabe table.
//!
//! When a surface cannot be processed as a single connected piece, each
//! piece yields its own centerline. The first piece is the parent tree;
//! every other piece is a child whose root continues one of the parent's
//! segments across the cut. Children are attached to the parent segment
//! whose endpoint lies nearest to the child's first point.

use centerline_types::{Centerline, NamedCenterline};
use nalgebra::Point3;
use tracing::{debug, info, warn};

use crate::builder::build_table;
use crate::error::{RaabeError, RaabeResult};
use crate::params::RaabeParams;
use crate::table::RaabeTable;

/// Parent segment a child tree attaches to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    /// Index of the parent segment.
    pub segment: usize,
    /// Distance from that segment's endpoint to the child's first point.
    pub distance: f64,
}

/// Output of [`merge_tables`].
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTables {
    /// Parent rows followed by the relabelled, re-indexed rows of each child.
    ///
    /// Each child's root row carries the same code as the parent row it
    /// continues across the cut, so codes are not unique here; `source`
    /// tells the two rows apart.
    pub combined: RaabeTable,

    /// The table of each source as built on its own: parent first, then
    /// children in input order. Rows carry their source name but are
    /// otherwise untouched.
    pub tables: Vec<RaabeTable>,
}

/// Find the parent segment whose endpoint is nearest to `point`.
///
/// Ties go to the lowest segment index. Segments that are empty or whose
/// endpoint is missing from the point table are skipped; returns `None` if
/// no segment qualifies.
///
/// # Example
///
/// ```
/// use centerline_types::{y_bifurcation, Point3};
/// use raabe_table::find_attachment;
///
/// let parent = y_bifurcation();
/// let attachment = find_attachment(&parent, &Point3::new(6.5, -18.0, 0.0)).unwrap();
/// assert_eq!(attachment.segment, 2);
/// assert!((attachment.distance - 0.5).abs() < 1e-10);
/// ```
#[must_use]
pub fn find_attachment(parent: &Centerline, point: &Point3<f64>) -> Option<Attachment> {
    let mut best: Option<Attachment> = None;
    for segment in 0..parent.segment_count() {
        let Some(end) = parent
            .endpoint(segment)
            .and_then(|i| parent.points.position(i))
        else {
            continue;
        };
        let distance = (end - point).norm();
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(Attachment { segment, distance });
        }
    }
    best
}

/// First point of a child's root segment, with the radius there.
fn child_origin(child: &Centerline) -> Option<(Point3<f64>, f64)> {
    let first = child.start(0)?;
    Some((child.points.position(first)?, child.points.radius(first)?))
}

/// Build the parent and every child, then graft the children onto the parent.
///
/// For each child, in order:
///
/// 1. The nearest parent endpoint to the child's first point is found
///    ([`find_attachment`]).
/// 2. Child codes are re-rooted onto the matched parent code, so the child
///    root carries the matched segment's code and its descendants extend it.
/// 3. Child rows are appended after everything placed so far and their
///    daughter indices shifted by the same offset.
/// 4. The matched parent row takes the branching and bifurcation angles the
///    child root recorded, since the bifurcation past the cut only exists
///    in the child's geometry.
///
/// The inputs are not modified. Parent rows other than matched ones are
/// identical to a standalone [`build_table`] of the parent, apart from
/// their `source` tag.
///
/// # Errors
///
/// Any error from [`build_table`] on any source, and
/// [`RaabeError::NoMatchFound`] if `params.max_match_distance` is set and a
/// child's first point is farther than that from every parent endpoint.
///
/// # Example
///
/// ```
/// use centerline_types::{y_bifurcation, Centerline, NamedCenterline, PointAttributes, Point3};
/// use raabe_table::{merge_tables, RaabeParams};
///
/// let parent = NamedCenterline::new("trunk", y_bifurcation());
///
/// // One straight segment continuing segment 2 of the parent
/// let points = PointAttributes::new(
///     vec![Point3::new(6.0, -18.0, 0.0), Point3::new(9.0, -22.0, 0.0)],
///     vec![1.0, 1.0],
/// )
/// .unwrap();
/// let child = NamedCenterline::new("lobe", Centerline::new(points, vec![vec![0, 1]]));
///
/// let merged = merge_tables(&parent, &[child], &RaabeParams::default()).unwrap();
/// assert_eq!(merged.combined.len(), 4);
/// assert_eq!(merged.combined.rows()[3].raabe.as_str(), "01");
/// assert_eq!(merged.tables.len(), 2);
/// ```
pub fn merge_tables(
    parent: &NamedCenterline,
    children: &[NamedCenterline],
    params: &RaabeParams,
) -> RaabeResult<MergedTables> {
    info!(
        parent = %parent.name,
        children = children.len(),
        "Merging Raabe tables"
    );

    let parent_table = build_table(&parent.centerline, params)?.with_source(&parent.name);
    let child_tables = children
        .iter()
        .map(|child| Ok(build_table(&child.centerline, params)?.with_source(&child.name)))
        .collect::<RaabeResult<Vec<_>>>()?;

    let mut combined = parent_table.rows().to_vec();

    for (child, table) in children.iter().zip(&child_tables) {
        // Both were validated by build_table
        let (Some((origin, origin_radius)), Some(child_root)) =
            (child_origin(&child.centerline), table.root())
        else {
            continue;
        };

        let attachment = find_attachment(&parent.centerline, &origin).ok_or_else(|| {
            RaabeError::invalid_argument(format!("parent '{}' has no endpoints", parent.name))
        })?;
        if let Some(max) = params.max_match_distance {
            if attachment.distance > max {
                return Err(RaabeError::NoMatchFound {
                    child: child.name.clone(),
                    distance: attachment.distance,
                    max,
                });
            }
        }
        if attachment.distance > origin_radius {
            warn!(
                child = %child.name,
                segment = attachment.segment,
                distance = attachment.distance,
                "Child attaches farther from the parent endpoint than its own radius"
            );
        }

        let anchor = &mut combined[attachment.segment];
        let anchor_code = anchor.raabe.clone();
        if child_root.branching_angle.is_some() {
            anchor.branching_angle = child_root.branching_angle;
        }
        if child_root.bifurcation_angle.is_some() {
            anchor.bifurcation_angle = child_root.bifurcation_angle;
        }

        let offset = combined.len();
        debug!(
            child = %child.name,
            segment = attachment.segment,
            code = %anchor_code,
            offset,
            "Attaching child tree"
        );

        combined.extend(table.iter().map(|row| {
            let mut row = row.clone();
            row.raabe = row.raabe.rebase(&anchor_code);
            for daughter in &mut row.daughter_branches {
                *daughter += offset;
            }
            row
        }));
    }

    let mut tables = Vec::with_capacity(child_tables.len() + 1);
    tables.push(parent_table);
    tables.extend(child_tables);

    info!(rows = combined.len(), sources = tables.len(), "Merge complete");

    Ok(MergedTables {
        combined: RaabeTable::from_rows(combined),
        tables,
    })
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use centerline_types::{PointAttributes, y_bifurcation};

    /// A child tree: one straight segment from `start` heading -Y.
    fn stub(start: Point3<f64>) -> Centerline {
        let points = PointAttributes::new(
            vec![start, start + nalgebra::Vector3::new(0.0, -4.0, 0.0)],
            vec![1.0, 1.0],
        )
        .unwrap();
        Centerline::new(points, vec![vec![0, 1]])
    }

    /// A child tree that bifurcates: root plus two daughters.
    fn forked(start: Point3<f64>) -> Centerline {
        let offsets = [
            (0.0, 0.0),
            (0.0, -4.0),
            (-2.0, -6.0),
            (-4.0, -8.0),
            (2.0, -6.0),
            (4.0, -8.0),
        ];
        let positions = offsets
            .iter()
            .map(|&(dx, dy)| Point3::new(start.x + dx, start.y + dy, start.z))
            .collect();
        let points =
            PointAttributes::new(positions, vec![1.0, 1.0, 0.8, 0.8, 0.6, 0.6]).unwrap();
        Centerline::new(points, vec![vec![0, 1], vec![1, 2, 3], vec![1, 4, 5]])
    }

    #[test]
    fn test_find_attachment_nearest() {
        let parent = y_bifurcation();
        let a = find_attachment(&parent, &Point3::new(-6.0, -18.5, 0.0)).unwrap();
        assert_eq!(a.segment, 1);
        assert!((a.distance - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_find_attachment_tie_goes_first() {
        let parent = y_bifurcation();
        // Equidistant from the endpoints of segments 1 and 2
        let a = find_attachment(&parent, &Point3::new(0.0, -18.0, 0.0)).unwrap();
        assert_eq!(a.segment, 1);
    }

    #[test]
    fn test_find_attachment_empty_parent() {
        assert!(find_attachment(&Centerline::default(), &Point3::origin()).is_none());
    }

    #[test]
    fn test_merge_single_child() {
        let parent = NamedCenterline::new("trunk", y_bifurcation());
        let child = NamedCenterline::new("right", forked(Point3::new(6.0, -18.0, 0.0)));

        let merged = merge_tables(&parent, &[child], &RaabeParams::default()).unwrap();
        let rows = merged.combined.rows();

        assert_eq!(rows.len(), 6);
        let codes: Vec<&str> = rows.iter().map(|r| r.raabe.as_str()).collect();
        assert_eq!(codes, vec!["0", "00", "01", "01", "010", "011"]);

        // Child daughters shifted past the three parent rows
        assert_eq!(rows[3].daughter_branches, vec![4, 5]);
        assert!(rows[4].is_terminal());

        assert_eq!(rows[0].source.as_deref(), Some("trunk"));
        assert_eq!(rows[3].source.as_deref(), Some("right"));
    }

    #[test]
    fn test_merged_codes_repeat_at_cut() {
        let parent = NamedCenterline::new("trunk", y_bifurcation());
        let child = NamedCenterline::new("right", forked(Point3::new(6.0, -18.0, 0.0)));

        let merged = merge_tables(&parent, &[child], &RaabeParams::default()).unwrap();
        let combined = &merged.combined;

        // Lookup by code lands on the parent row; the child root shares it
        assert_eq!(combined.find("01"), Some(2));
        let sources: Vec<Option<&str>> = combined
            .iter()
            .filter(|row| row.raabe.as_str() == "01")
            .map(|row| row.source.as_deref())
            .collect();
        assert_eq!(sources, vec![Some("trunk"), Some("right")]);
    }

    #[test]
    fn test_merge_copies_branching_angle_to_anchor() {
        let parent = NamedCenterline::new("trunk", y_bifurcation());
        let child = NamedCenterline::new("right", forked(Point3::new(6.0, -18.0, 0.0)));

        let merged = merge_tables(&parent, &[child], &RaabeParams::default()).unwrap();
        let rows = merged.combined.rows();

        assert!(merged.tables[0].rows()[2].branching_angle.is_none());
        assert!(rows[3].branching_angle.is_some());
        assert_eq!(rows[2].branching_angle, rows[3].branching_angle);
        // Child root has no parent of its own, so the anchor keeps its angle
        assert_eq!(
            rows[2].bifurcation_angle,
            merged.tables[0].rows()[2].bifurcation_angle
        );
    }

    #[test]
    fn test_merge_leaves_other_parent_rows_alone() {
        let parent = NamedCenterline::new("trunk", y_bifurcation());
        let child = NamedCenterline::new("right", forked(Point3::new(6.0, -18.0, 0.0)));
        let params = RaabeParams::default();

        let standalone = build_table(&parent.centerline, &params).unwrap().with_source("trunk");
        let merged = merge_tables(&parent, &[child], &params).unwrap();

        assert_eq!(merged.combined.rows()[0], standalone.rows()[0]);
        assert_eq!(merged.combined.rows()[1], standalone.rows()[1]);
        assert_eq!(merged.tables[0], standalone);
    }

    #[test]
    fn test_merge_offsets_accumulate() {
        let parent = NamedCenterline::new("trunk", y_bifurcation());
        let left = NamedCenterline::new("left", forked(Point3::new(-6.0, -18.0, 0.0)));
        let right = NamedCenterline::new("right", stub(Point3::new(6.0, -18.0, 0.0)));

        let merged = merge_tables(&parent, &[left, right], &RaabeParams::default()).unwrap();
        let rows = merged.combined.rows();

        assert_eq!(rows.len(), 3 + 3 + 1);
        assert_eq!(rows[3].raabe.as_str(), "00");
        assert_eq!(rows[3].daughter_branches, vec![4, 5]);
        assert_eq!(rows[6].raabe.as_str(), "01");
        assert_eq!(rows[6].source.as_deref(), Some("right"));

        // Individual tables are not re-indexed
        assert_eq!(merged.tables[1].rows()[0].daughter_branches, vec![1, 2]);
        assert_eq!(merged.tables[1].rows()[0].raabe.as_str(), "0");
    }

    #[test]
    fn test_merge_without_children() {
        let parent = NamedCenterline::new("trunk", y_bifurcation());
        let merged = merge_tables(&parent, &[], &RaabeParams::default()).unwrap();
        assert_eq!(merged.combined, merged.tables[0]);
        assert_eq!(merged.tables.len(), 1);
    }

    #[test]
    fn test_merge_far_child_attaches_without_threshold() {
        let parent = NamedCenterline::new("trunk", y_bifurcation());
        let child = NamedCenterline::new("stray", stub(Point3::new(100.0, -18.0, 0.0)));
        let merged = merge_tables(&parent, &[child], &RaabeParams::default()).unwrap();
        assert_eq!(merged.combined.rows()[3].raabe.as_str(), "01");
    }

    #[test]
    fn test_merge_threshold_rejects_far_child() {
        let parent = NamedCenterline::new("trunk", y_bifurcation());
        let child = NamedCenterline::new("stray", stub(Point3::new(100.0, -18.0, 0.0)));
        let params = RaabeParams::default().with_max_match_distance(5.0);

        let err = merge_tables(&parent, &[child], &params).unwrap_err();
        match err {
            RaabeError::NoMatchFound {
                child,
                distance,
                max,
            } => {
                assert_eq!(child, "stray");
                assert!((distance - 94.0).abs() < 1e-10);
                assert_eq!(max, 5.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_merge_propagates_child_errors() {
        let parent = NamedCenterline::new("trunk", y_bifurcation());
        let child = NamedCenterline::new("broken", Centerline::default());
        let err = merge_tables(&parent, &[child], &RaabeParams::default()).unwrap_err();
        assert!(matches!(err, RaabeError::InvalidArgument(_)));
    }
}
