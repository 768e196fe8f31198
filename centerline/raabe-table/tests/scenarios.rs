//! End-to-end labeling and merging scenarios on hand-built airway trees.

use approx::assert_relative_eq;
use centerline_types::{Centerline, NamedCenterline, Point3, PointAttributes, y_bifurcation};
use raabe_table::{RaabeError, RaabeParams, build_table, merge_tables};

/// Builder for small synthetic trees.
struct TreeBuilder {
    positions: Vec<Point3<f64>>,
    radii: Vec<f64>,
    segments: Vec<Vec<usize>>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            positions: Vec::new(),
            radii: Vec::new(),
            segments: Vec::new(),
        }
    }

    fn point(&mut self, x: f64, y: f64, z: f64, r: f64) -> usize {
        self.positions.push(Point3::new(x, y, z));
        self.radii.push(r);
        self.positions.len() - 1
    }

    fn segment(&mut self, points: &[usize]) -> usize {
        self.segments.push(points.to_vec());
        self.segments.len() - 1
    }

    fn build(self) -> Centerline {
        Centerline::new(
            PointAttributes::new(self.positions, self.radii).unwrap(),
            self.segments,
        )
    }
}

/// Trachea, two main bronchi, and a bifurcation on the smaller bronchus.
///
/// Connectivity lists the left (smaller) bronchus before the right one so
/// that numbering has to follow diameter rather than input order.
fn airway() -> Centerline {
    let mut t = TreeBuilder::new();
    let p0 = t.point(0.0, 0.0, 0.0, 8.0);
    let p1 = t.point(0.0, 0.0, -50.0, 8.0);
    let carina = t.point(0.0, 0.0, -100.0, 8.0);

    let l1 = t.point(-10.0, 0.0, -110.0, 5.0);
    let l2 = t.point(-20.0, 0.0, -120.0, 5.0);
    let l3 = t.point(-30.0, 0.0, -130.0, 5.0);

    let r1 = t.point(10.0, 0.0, -105.0, 6.0);
    let r2 = t.point(20.0, 0.0, -110.0, 6.0);
    let r3 = t.point(30.0, 0.0, -115.0, 6.0);

    let lu1 = t.point(-30.0, 0.0, -120.0, 3.0);
    let lu2 = t.point(-30.0, 0.0, -110.0, 3.0);
    let lu3 = t.point(-30.0, 0.0, -100.0, 3.0);

    let ll1 = t.point(-35.0, 0.0, -140.0, 4.0);
    let ll2 = t.point(-40.0, 0.0, -150.0, 4.0);
    let ll3 = t.point(-45.0, 0.0, -160.0, 4.0);

    t.segment(&[p0, p1, carina]); // 0 trachea
    t.segment(&[carina, l1, l2, l3]); // 1 left main
    t.segment(&[carina, r1, r2, r3]); // 2 right main
    t.segment(&[l3, lu1, lu2, lu3]); // 3 left upper
    t.segment(&[l3, ll1, ll2, ll3]); // 4 left lower
    t.build()
}

#[test]
fn airway_codes_follow_diameter_order() {
    let table = build_table(&airway(), &RaabeParams::with_gravity([0.0, 0.0, -1.0])).unwrap();
    let codes: Vec<&str> = table.iter().map(|r| r.raabe.as_str()).collect();

    // Right main (diameter 12) outranks left main (diameter 10)
    assert_eq!(codes, vec!["0", "01", "00", "011", "010"]);
    assert_eq!(table.rows()[0].daughter_branches, vec![2, 1]);
    assert_eq!(table.rows()[1].daughter_branches, vec![4, 3]);
    assert!(table.rows()[2].is_terminal());
}

#[test]
fn airway_gravity_angles() {
    let table = build_table(&airway(), &RaabeParams::with_gravity([0.0, 0.0, -1.0])).unwrap();

    // Trachea points straight down
    assert_relative_eq!(table.rows()[0].gravity_angle.unwrap(), 0.0, epsilon = 1e-10);
    // Left upper lobe bronchus points straight up
    assert_relative_eq!(table.rows()[3].gravity_angle.unwrap(), 180.0, epsilon = 1e-10);
    // Left main bronchus runs at 45 degrees
    assert_relative_eq!(table.rows()[1].gravity_angle.unwrap(), 45.0, epsilon = 1e-10);
    assert_relative_eq!(table.rows()[1].bifurcation_angle.unwrap(), 45.0, epsilon = 1e-10);
}

#[test]
fn airway_lengths_subtract_parent_bulge() {
    let table = build_table(&airway(), &RaabeParams::with_gravity([0.0, 0.0, -1.0])).unwrap();
    let arc = 3.0 * 200.0_f64.sqrt();
    // Radius at the carina is 8
    assert_relative_eq!(table.rows()[1].length.unwrap(), arc - 8.0, epsilon = 1e-10);
    // Root keeps its full length
    assert_relative_eq!(table.rows()[0].length.unwrap(), 100.0, epsilon = 1e-10);
}

#[test]
fn y_tree_labels_and_metrics() {
    let table = build_table(&y_bifurcation(), &RaabeParams::default()).unwrap();

    assert_eq!(table.rows()[0].raabe.as_str(), "0");
    assert_eq!(table.rows()[1].raabe.as_str(), "00");
    assert_eq!(table.rows()[2].raabe.as_str(), "01");
    assert_relative_eq!(table.rows()[1].diameter.unwrap(), 4.0);
    assert_relative_eq!(table.rows()[2].diameter.unwrap(), 2.0);
    assert!(table.rows()[0].bifurcation_angle.is_none());
    assert!(table.rows()[1].bifurcation_angle.is_some());
    assert!(table.rows()[2].bifurcation_angle.is_some());
    assert_eq!(table.rows()[0].daughter_branches, vec![1, 2]);
}

#[test]
fn merge_child_near_segment_two() {
    let parent = NamedCenterline::new("trunk", y_bifurcation());

    let mut t = TreeBuilder::new();
    let a = t.point(6.2, -18.1, 0.0, 1.0);
    let b = t.point(9.0, -22.0, 0.0, 1.0);
    t.segment(&[a, b]);
    let child = NamedCenterline::new("right_cut", t.build());

    let merged = merge_tables(&parent, &[child], &RaabeParams::default()).unwrap();
    let parent_rows = merged.tables[0].len();

    assert_eq!(merged.combined.len(), parent_rows + 1);
    let grafted = &merged.combined.rows()[parent_rows];
    let anchor = &merged.combined.rows()[2];
    assert!(anchor.raabe.is_ancestor_of(&grafted.raabe));
    assert_eq!(grafted.raabe.as_str(), "01");
    assert_eq!(grafted.source.as_deref(), Some("right_cut"));
}

#[test]
fn merge_with_extruded_children() {
    let parent = NamedCenterline::new("trunk", y_bifurcation());

    let mut t = TreeBuilder::new();
    let a = t.point(-6.0, -18.0, 0.0, 1.5);
    let b = t.point(-8.0, -22.0, 0.0, 1.5);
    let c = t.point(-10.0, -26.0, 0.0, 1.0);
    let d = t.point(-6.0, -26.0, 0.0, 0.5);
    let e = t.point(-12.0, -30.0, 0.0, 1.0);
    let f = t.point(-4.0, -30.0, 0.0, 0.5);
    t.segment(&[a, b]);
    t.segment(&[b, c, e]);
    t.segment(&[b, d, f]);
    let child = NamedCenterline::new("left_cut", t.build());

    let params = RaabeParams::default().with_extruded(true);
    let merged = merge_tables(&parent, &[child], &params).unwrap();
    let rows = merged.combined.rows();

    // Child root nulled as an extrusion but its branching angle survives and
    // moves onto the parent segment it continues
    assert!(rows[3].diameter.is_none());
    assert!(rows[3].branching_angle.is_some());
    assert_eq!(rows[1].branching_angle, rows[3].branching_angle);
    assert_eq!(rows[3].raabe.as_str(), "00");
    assert_eq!(rows[4].raabe.as_str(), "000");
    assert_eq!(rows[5].raabe.as_str(), "001");
    assert_eq!(rows[3].daughter_branches, vec![4, 5]);
}

#[test]
fn merge_rejects_distant_child_with_threshold() {
    let parent = NamedCenterline::new("trunk", y_bifurcation());
    let mut t = TreeBuilder::new();
    let a = t.point(50.0, 50.0, 50.0, 1.0);
    let b = t.point(51.0, 50.0, 50.0, 1.0);
    t.segment(&[a, b]);
    let child = NamedCenterline::new("elsewhere", t.build());

    let params = RaabeParams::default().with_max_match_distance(2.0);
    let err = merge_tables(&parent, &[child], &params).unwrap_err();
    assert!(matches!(err, RaabeError::NoMatchFound { .. }));
}
