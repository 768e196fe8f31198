//! Extraction, labeling and export for one invocation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use centerline_io::{InputKind, VmtkPipeline, load_centerline, save_csv, source_name};
use centerline_types::NamedCenterline;
use raabe_table::{RaabeParams, build_table, merge_tables};
use tracing::{info, warn};

use crate::cli::Cli;

/// Where the extracted centerline for `input` is written.
pub fn centerline_path(outdir: &Path, input: &Path) -> PathBuf {
    outdir.join(format!("{}.vtp", source_name(input)))
}

/// Where the table for a single source is written.
pub fn table_path(outdir: &Path, source: &str) -> PathBuf {
    outdir.join(format!("{source}_raabe.csv"))
}

/// Where the merged table is written.
pub fn merged_table_path(outdir: &Path, source: &str) -> PathBuf {
    outdir.join(format!("{source}_merged_raabe.csv"))
}

/// Run one invocation and return the files written.
pub fn run(cli: &Cli) -> Result<Vec<PathBuf>> {
    let inputs: Vec<&Path> = std::iter::once(cli.infile.as_path())
        .chain(cli.merge.iter().map(PathBuf::as_path))
        .collect();
    check_unique_sources(&inputs)?;

    fs::create_dir_all(&cli.outdir)
        .with_context(|| format!("failed to create {}", cli.outdir.display()))?;
    let pipeline = VmtkPipeline::new(&cli.vmtk);

    if cli.centerline_only {
        return inputs
            .into_iter()
            .filter_map(|input| extract(input, &cli.outdir, &pipeline).transpose())
            .collect();
    }

    let params = cli.params();
    params.gravity_vector().context("invalid --gravity")?;

    let parent = load(&cli.infile, &cli.outdir, &pipeline)?;
    if cli.merge.is_empty() {
        return label_single(&parent, &cli.outdir, &params).map(|path| vec![path]);
    }

    let children = cli
        .merge
        .iter()
        .map(|child| load(child, &cli.outdir, &pipeline))
        .collect::<Result<Vec<_>>>()?;
    label_merged(&parent, &children, &cli.outdir, &params)
}

/// Fail when two inputs share a file stem, since their outputs would collide.
fn check_unique_sources(inputs: &[&Path]) -> Result<()> {
    let mut named: Vec<(String, &Path)> = inputs
        .iter()
        .map(|&input| (source_name(input), input))
        .collect();
    named.sort_by(|a, b| a.0.cmp(&b.0));

    if let Some(pair) = named.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        bail!(
            "{} and {} share the source name '{}' and would overwrite each other's outputs",
            pair[0].1.display(),
            pair[1].1.display(),
            pair[0].0
        );
    }
    Ok(())
}

/// Extract a centerline from a surface input; `.vtp` inputs are skipped.
fn extract(input: &Path, outdir: &Path, pipeline: &VmtkPipeline) -> Result<Option<PathBuf>> {
    match InputKind::detect(input)? {
        InputKind::Centerline => {
            warn!(input = %input.display(), "Input is already a centerline; nothing to extract");
            Ok(None)
        }
        InputKind::Surface => {
            let output = centerline_path(outdir, input);
            pipeline
                .run(input, &output)
                .with_context(|| format!("centerline extraction failed for {}", input.display()))?;
            Ok(Some(output))
        }
    }
}

fn load(input: &Path, outdir: &Path, pipeline: &VmtkPipeline) -> Result<NamedCenterline> {
    let centerline = load_centerline(input, pipeline, &centerline_path(outdir, input))
        .with_context(|| format!("failed to load centerline from {}", input.display()))?;
    Ok(NamedCenterline::new(source_name(input), centerline))
}

fn label_single(tree: &NamedCenterline, outdir: &Path, params: &RaabeParams) -> Result<PathBuf> {
    let table = build_table(&tree.centerline, params)
        .with_context(|| format!("failed to label {}", tree.name))?;

    let path = table_path(outdir, &tree.name);
    save_csv(&table, &path).with_context(|| format!("failed to write {}", path.display()))?;
    info!(source = %tree.name, rows = table.len(), "Raabe table written");
    Ok(path)
}

fn label_merged(
    parent: &NamedCenterline,
    children: &[NamedCenterline],
    outdir: &Path,
    params: &RaabeParams,
) -> Result<Vec<PathBuf>> {
    let merged = merge_tables(parent, children, params)
        .with_context(|| format!("failed to merge pieces onto {}", parent.name))?;

    let mut written = Vec::with_capacity(merged.tables.len() + 1);
    let path = merged_table_path(outdir, &parent.name);
    save_csv(&merged.combined, &path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    written.push(path);

    let names = std::iter::once(parent).chain(children).map(|tree| &tree.name);
    for (name, table) in names.zip(&merged.tables) {
        let path = table_path(outdir, name);
        save_csv(table, &path).with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }

    info!(
        source = %parent.name,
        rows = merged.combined.len(),
        pieces = merged.tables.len(),
        "Merged Raabe table written"
    );
    Ok(written)
}
