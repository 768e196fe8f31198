//! Core centerline types for Raabe table generation.
//!
//! This crate provides the in-memory shape of a branch-split centerline:
//!
//! - [`PointAttributes`] - Per-point position, inscribed-sphere radius and pass-through scalars
//! - [`ScalarArray`] - A named auxiliary per-point array
//! - [`Centerline`] - Point attributes plus ordered segment connectivity
//! - [`NamedCenterline`] - A centerline tagged with the name of the file it came from
//!
//! # Connectivity Convention
//!
//! Each segment is an ordered list of point indices running from the
//! proximal bifurcation (or inlet) to the distal bifurcation (or outlet).
//! Segment 0 is the root. Segment `j` is a daughter of segment `i` exactly
//! when the first point index of `j` equals the last point index of `i`.
//!
//! # Units
//!
//! Unit-agnostic. Positions and radii share whatever unit the extraction
//! toolkit produced (millimeters for typical CT-derived meshes).
//!
//! # Example
//!
//! ```
//! use centerline_types::{Centerline, PointAttributes, Point3};
//!
//! let points = PointAttributes::new(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!         Point3::new(0.0, 2.0, 0.0),
//!     ],
//!     vec![1.0, 1.0, 1.0],
//! )
//! .unwrap();
//!
//! let centerline = Centerline::new(points, vec![vec![0, 1, 2]]);
//! assert_eq!(centerline.segment_count(), 1);
//! assert_eq!(centerline.endpoint(0), Some(2));
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod attributes;
mod centerline;
mod error;

pub use attributes::{PointAttributes, ScalarArray};
pub use centerline::{Centerline, NamedCenterline, y_bifurcation};
pub use error::{CenterlineError, CenterlineResult};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
