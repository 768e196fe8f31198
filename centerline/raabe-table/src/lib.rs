//! Raabe tables for branching tubular structures.
//!
//! This crate turns a branch-split centerline (see [`centerline_types`])
//! into a Raabe table: one row per segment with a hierarchical code,
//! diameter, length, approximate volume and angles.
//!
//! # Features
//!
//! - **Tree building**: Parent/daughter links inferred from shared endpoint indices
//! - **Raabe codes**: Breadth-first labeling, larger daughters numbered first
//! - **Metrics**: Median diameter, bulge-corrected length, cylinder volume
//! - **Angles**: Bifurcation angle to the parent, angle to gravity, branching
//!   angle between daughters
//! - **Merging**: Graft separately extracted sub-trees onto a parent tree
//!
//! # Layer 0 Crate
//!
//! Pure computation with no I/O. Reading centerlines and writing tables
//! lives in `centerline-io`.
//!
//! # Example
//!
//! ```
//! use centerline_types::y_bifurcation;
//! use raabe_table::{build_table, RaabeParams};
//!
//! let params = RaabeParams::with_gravity([0.0, -1.0, 0.0]);
//! let table = build_table(&y_bifurcation(), &params).unwrap();
//!
//! for row in &table {
//!     println!("{} d={:?} L={:?}", row.raabe, row.diameter, row.length);
//! }
//!
//! // The larger daughter gets the lower sibling number
//! assert_eq!(table.rows()[1].raabe.as_str(), "00");
//! assert_eq!(table.rows()[2].raabe.as_str(), "01");
//! ```
//!
//! # Numbering Convention
//!
//! The root is `"0"`. Daughters append their sibling number, counted from 0
//! in order of decreasing diameter (ties keep connectivity order).

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod builder;
mod code;
mod error;
mod geometry;
mod merge;
mod params;
mod table;

// Re-export main types and functions
pub use builder::build_table;
pub use code::RaabeCode;
pub use error::{RaabeError, RaabeResult};
pub use geometry::{angle_at, angle_between, arc_length, centroid, chord, median};
pub use merge::{Attachment, MergedTables, find_attachment, merge_tables};
pub use params::RaabeParams;
pub use table::{RaabeTable, SegmentMetrics, cylinder_volume};
