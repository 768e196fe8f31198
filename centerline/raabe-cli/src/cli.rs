//! Command line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use raabe_table::RaabeParams;

/// Raabe table generation
///
/// Extracts centerlines from an airway surface (or reads an existing
/// centerline), labels every branch with its Raabe code and writes the
/// per-branch metrics as CSV.
#[derive(Debug, Parser)]
#[command(name = "raabe")]
#[command(about = "Label branching centerlines and write Raabe tables", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Surface (.stl, .ply, .vtk, .obj) or centerline (.vtp) to process
    #[arg(name = "INFILE")]
    pub infile: PathBuf,

    /// Directory for extracted centerlines and tables
    #[arg(name = "OUTDIR")]
    pub outdir: PathBuf,

    /// Direction of gravity in model coordinates
    #[arg(
        long,
        num_args = 3,
        value_names = ["X", "Y", "Z"],
        allow_negative_numbers = true,
        required = true
    )]
    pub gravity: Vec<f64>,

    /// Treat the first segment of every tree as an artificial inlet extrusion
    #[arg(long)]
    pub extruded: bool,

    /// Separately extracted pieces to graft onto INFILE
    #[arg(long, num_args = 1.., value_name = "CHILD")]
    pub merge: Vec<PathBuf>,

    /// Reject a piece whose start lies farther than this from every parent endpoint
    #[arg(long, value_name = "D")]
    pub max_match_distance: Option<f64>,

    /// VMTK launcher used for surface inputs
    #[arg(long, value_name = "PATH", default_value = "vmtk")]
    pub vmtk: PathBuf,

    /// Stop after writing extracted centerlines
    #[arg(long)]
    pub centerline_only: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Tree builder parameters selected on the command line.
    pub fn params(&self) -> RaabeParams {
        let params = RaabeParams::with_gravity(self.gravity.clone()).with_extruded(self.extruded);
        match self.max_match_distance {
            Some(distance) => params.with_max_match_distance(distance),
            None => params,
        }
    }

    /// Default log filter for the requested verbosity.
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
