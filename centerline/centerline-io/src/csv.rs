//! CSV export of Raabe tables.
//!
//! One header line followed by one line per row in table order. Absent
//! metrics are written as empty fields; the daughter list is written as a
//! bracketed, comma-separated list (quoted, since it contains commas).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use raabe_table::{RaabeTable, SegmentMetrics};
use tracing::info;

use crate::error::IoResult;

/// Column names in output order.
pub const CSV_COLUMNS: [&str; 11] = [
    "index",
    "raabe",
    "diameter",
    "length",
    "bifurcation_angle",
    "gravity_angle",
    "approx_volume",
    "branching_angle",
    "daughter_branches",
    "endpoint",
    "source",
];

/// Write a table as CSV to any writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv<W: Write>(table: &RaabeTable, writer: &mut W) -> IoResult<()> {
    writeln!(writer, "{}", CSV_COLUMNS.join(","))?;
    for (index, row) in table.iter().enumerate() {
        writeln!(writer, "{}", format_row(index, row))?;
    }
    Ok(())
}

/// Write a table as CSV to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_csv<P: AsRef<Path>>(table: &RaabeTable, path: P) -> IoResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_csv(table, &mut writer)?;
    writer.flush()?;

    info!(path = %path.display(), rows = table.len(), "Saved Raabe table");
    Ok(())
}

fn format_row(index: usize, row: &SegmentMetrics) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{},{},{}",
        index,
        escape_csv(row.raabe.as_str()),
        optional(row.diameter),
        optional(row.length),
        optional(row.bifurcation_angle),
        optional(row.gravity_angle),
        optional(row.approx_volume),
        optional(row.branching_angle),
        escape_csv(&daughter_list(&row.daughter_branches)),
        row.endpoint,
        escape_csv(row.source.as_deref().unwrap_or(""))
    )
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn daughter_list(daughters: &[usize]) -> String {
    let items: Vec<String> = daughters.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
