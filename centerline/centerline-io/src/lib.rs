//! Centerline I/O for Raabe tables.
//!
//! - **VTP** (VTK XML PolyData) centerline reader, ASCII encoding only
//! - **CSV** writer for [`RaabeTable`](raabe_table::RaabeTable)s
//! - **VMTK** driver that extracts branch-split centerlines from a surface
//!
//! # Example
//!
//! ```no_run
//! use centerline_io::{load_vtp, save_csv};
//! use raabe_table::{build_table, RaabeParams};
//!
//! let centerline = load_vtp("lung.vtp").unwrap();
//! let table = build_table(&centerline, &RaabeParams::default()).unwrap();
//! save_csv(&table, "lung_raabe.csv").unwrap();
//! ```
//!
//! # Input Detection
//!
//! [`InputKind::from_path`] decides from the extension whether a file is a
//! centerline that can be read directly or a surface that needs extraction
//! first.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod csv;
mod error;
mod vmtk;
mod vtp;

pub use csv::{CSV_COLUMNS, save_csv, write_csv};
pub use error::{IoError, IoResult};
pub use vmtk::VmtkPipeline;
pub use vtp::{RADIUS_ARRAY, load_vtp, parse_vtp};

use std::path::Path;

/// What kind of input a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// A branch-split centerline in VTK XML PolyData.
    Centerline,
    /// A lumen surface that centerlines still have to be extracted from.
    Surface,
}

impl InputKind {
    /// Detect the input kind from a file extension.
    ///
    /// Returns `None` if the extension is not recognized.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "vtp" => Some(Self::Centerline),
            "stl" | "ply" | "vtk" | "obj" => Some(Self::Surface),
            _ => None,
        }
    }

    /// Detect the input kind, failing on unknown extensions.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnknownFormat`] if the extension is missing or
    /// not recognized.
    pub fn detect<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        Self::from_path(path).ok_or_else(|| IoError::UnknownFormat {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_string(),
        })
    }
}

/// Name used for a file's tables and provenance: its file stem.
#[must_use]
pub fn source_name<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Load a centerline from any supported input.
///
/// `.vtp` files are read directly. Surfaces are first run through
/// `pipeline`, which writes its centerline to `extracted`.
///
/// # Errors
///
/// Returns an error if the format is unknown, extraction fails or the
/// centerline cannot be read.
pub fn load_centerline<P: AsRef<Path>>(
    path: P,
    pipeline: &VmtkPipeline,
    extracted: &Path,
) -> IoResult<centerline_types::Centerline> {
    let path = path.as_ref();
    match InputKind::detect(path)? {
        InputKind::Centerline => load_vtp(path),
        InputKind::Surface => {
            pipeline.run(path, extracted)?;
            load_vtp(extracted)
        }
    }
}
