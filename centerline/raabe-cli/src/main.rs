//! `raabe`: Raabe tables from airway surfaces or centerlines.
//!
//! ```text
//! raabe lung.stl out --gravity 0 0 -1
//! raabe trunk.vtp out --gravity 0 0 -1 --merge left.vtp right.vtp --extruded
//! ```
//!
//! Surface inputs are run through VMTK into `<OUTDIR>/<stem>.vtp` before
//! labeling. A single input produces `<stem>_raabe.csv`; merging produces
//! `<stem>_merged_raabe.csv` plus one `<source>_raabe.csv` per piece.
//!
//! Log verbosity follows `RUST_LOG` when set, otherwise `-v`/`-vv`.

mod cli;
mod run;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        input = %cli.infile.display(),
        outdir = %cli.outdir.display(),
        "raabe starting"
    );

    let written = run::run(&cli)?;
    for path in &written {
        println!("{}", path.display());
    }

    Ok(())
}
