//! VTK XML PolyData (`.vtp`) centerline reader.
//!
//! Reads the ASCII flavour written by `vmtksurfacewriter -mode ascii`: a
//! single `<Piece>` with `<Points>`, `<Lines>` and a `<PointData>` block
//! carrying the inscribed-sphere radius. Binary and appended encodings are
//! rejected.

use std::path::Path;

use centerline_types::{Centerline, Point3, PointAttributes, ScalarArray};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, info};

use crate::error::{IoError, IoResult};

/// Point data array holding the maximum inscribed sphere radius.
pub const RADIUS_ARRAY: &str = "MaximumInscribedSphereRadius";

/// Which block of the `<Piece>` the reader is inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Points,
    PointData,
    Lines,
    Other,
}

/// A `<DataArray>` collected as raw text, parsed once its section is known.
#[derive(Debug)]
struct DataArray {
    name: String,
    components: usize,
    text: String,
}

impl DataArray {
    fn floats(&self) -> IoResult<Vec<f64>> {
        self.text
            .split_ascii_whitespace()
            .map(|t| t.parse::<f64>().map_err(IoError::from))
            .collect()
    }

    fn indices(&self) -> IoResult<Vec<usize>> {
        self.text
            .split_ascii_whitespace()
            .map(|t| t.parse::<usize>().map_err(IoError::from))
            .collect()
    }
}

/// Arrays gathered from one `<Piece>`.
#[derive(Debug, Default)]
struct PieceArrays {
    declared_points: Option<usize>,
    points: Option<DataArray>,
    point_data: Vec<DataArray>,
    connectivity: Option<DataArray>,
    offsets: Option<DataArray>,
}

/// Load a centerline from a `.vtp` file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file does not exist, or any
/// error from [`parse_vtp`].
pub fn load_vtp<P: AsRef<Path>>(path: P) -> IoResult<Centerline> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| IoError::open(path, e))?;
    let centerline = parse_vtp(&content)?;

    info!(
        path = %path.display(),
        points = centerline.points.len(),
        segments = centerline.segment_count(),
        "Loaded centerline"
    );

    Ok(centerline)
}

/// Parse a centerline from VTK XML PolyData text.
///
/// Each cell in `<Lines>` becomes one segment. The `MaximumInscribedSphereRadius`
/// point array supplies the radii; other single-component point arrays are
/// kept as named scalars.
///
/// # Errors
///
/// Returns an error if:
/// - The XML is malformed or is not `PolyData`
/// - A data array is not ASCII encoded
/// - The points, lines or radius arrays are missing or inconsistent
/// - A segment references a point that does not exist
pub fn parse_vtp(content: &str) -> IoResult<Centerline> {
    let arrays = read_piece(content)?;
    assemble(arrays)
}

fn read_piece(content: &str) -> IoResult<PieceArrays> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut arrays = PieceArrays::default();
    let mut section = Section::None;
    let mut current: Option<DataArray> = None;
    let mut saw_polydata = false;
    let mut pieces = 0_usize;
    // Elements open inside the current DataArray, e.g. VTK's <InformationKey>
    let mut nested = 0_usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) if current.is_some() => nested += 1,
            Ok(Event::End(_)) if nested > 0 => nested -= 1,
            Ok(Event::Empty(_)) if current.is_some() => {}
            Ok(Event::Text(_)) if nested > 0 => {}
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"VTKFile" => check_file_type(e)?,
                b"PolyData" => saw_polydata = true,
                b"Piece" => {
                    pieces += 1;
                    if pieces > 1 {
                        return Err(IoError::invalid_content(
                            "multiple <Piece> elements are not supported",
                        ));
                    }
                    arrays.declared_points = attribute(e, b"NumberOfPoints")?
                        .map(|v| v.trim().parse::<usize>())
                        .transpose()?;
                }
                b"Points" => section = Section::Points,
                b"PointData" => section = Section::PointData,
                b"Lines" => section = Section::Lines,
                b"CellData" | b"Verts" | b"Strips" | b"Polys" | b"FieldData" => {
                    section = Section::Other;
                }
                b"DataArray" => current = Some(start_array(e)?),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"VTKFile" => check_file_type(e)?,
                b"DataArray" => {
                    let array = start_array(e)?;
                    store(&mut arrays, section, array);
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if let Some(array) = current.as_mut() {
                    let text = e
                        .unescape()
                        .map_err(|err| IoError::invalid_content(err.to_string()))?;
                    if !array.text.is_empty() {
                        array.text.push(' ');
                    }
                    array.text.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"DataArray" => {
                    if let Some(array) = current.take() {
                        store(&mut arrays, section, array);
                    }
                }
                b"Points" | b"PointData" | b"Lines" | b"CellData" | b"Verts" | b"Strips"
                | b"Polys" | b"FieldData" => section = Section::None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(IoError::invalid_content(format!(
                    "XML error at position {}: {e}",
                    reader.error_position()
                )));
            }
        }
        buf.clear();
    }

    if !saw_polydata || pieces == 0 {
        return Err(IoError::invalid_content("no PolyData piece found"));
    }

    Ok(arrays)
}

fn check_file_type(e: &BytesStart<'_>) -> IoResult<()> {
    match attribute(e, b"type")? {
        Some(kind) if kind != "PolyData" => Err(IoError::invalid_content(format!(
            "expected a PolyData file, found {kind}"
        ))),
        _ => Ok(()),
    }
}

fn start_array(e: &BytesStart<'_>) -> IoResult<DataArray> {
    let name = attribute(e, b"Name")?.unwrap_or_default();

    let format = attribute(e, b"format")?.unwrap_or_else(|| "ascii".to_string());
    if format != "ascii" {
        return Err(IoError::invalid_content(format!(
            "data array '{name}' uses {format} encoding; only ascii is supported"
        )));
    }

    let components = attribute(e, b"NumberOfComponents")?
        .map(|v| v.trim().parse::<usize>())
        .transpose()?
        .unwrap_or(1);

    Ok(DataArray {
        name,
        components,
        text: String::new(),
    })
}

fn store(arrays: &mut PieceArrays, section: Section, array: DataArray) {
    match section {
        Section::Points => arrays.points = Some(array),
        Section::PointData => arrays.point_data.push(array),
        Section::Lines => match array.name.as_str() {
            "connectivity" => arrays.connectivity = Some(array),
            "offsets" => arrays.offsets = Some(array),
            _ => {}
        },
        Section::None | Section::Other => {}
    }
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> IoResult<Option<String>> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            let value = std::str::from_utf8(&attr.value)
                .map_err(|err| IoError::invalid_content(err.to_string()))?;
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}

fn assemble(arrays: PieceArrays) -> IoResult<Centerline> {
    let points = arrays.points.ok_or_else(|| IoError::MissingArray {
        name: "Points".to_string(),
    })?;
    if points.components != 3 {
        return Err(IoError::invalid_content(format!(
            "points must have 3 components, found {}",
            points.components
        )));
    }
    let coords = points.floats()?;
    if coords.len() % 3 != 0 {
        return Err(IoError::invalid_content(format!(
            "point coordinate count {} is not a multiple of 3",
            coords.len()
        )));
    }
    let positions: Vec<Point3<f64>> = coords
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect();

    if let Some(declared) = arrays.declared_points {
        if declared != positions.len() {
            return Err(IoError::invalid_content(format!(
                "piece declares {declared} points but {} were read",
                positions.len()
            )));
        }
    }

    let mut radii = None;
    let mut scalars = Vec::new();
    for array in arrays.point_data {
        if array.name == RADIUS_ARRAY {
            radii = Some(array.floats()?);
        } else if array.components == 1 {
            scalars.push(ScalarArray::new(array.name.clone(), array.floats()?));
        } else {
            debug!(
                name = %array.name,
                components = array.components,
                "Skipping multi-component point array"
            );
        }
    }
    let radii = radii.ok_or_else(|| IoError::MissingArray {
        name: RADIUS_ARRAY.to_string(),
    })?;

    let mut attributes = PointAttributes::new(positions, radii)?;
    for scalar in scalars {
        attributes = attributes.with_scalar(scalar)?;
    }

    let segments = split_lines(
        arrays.connectivity.as_ref(),
        arrays.offsets.as_ref(),
        attributes.len(),
    )?;

    Ok(Centerline::new(attributes, segments))
}

/// Split VTK line cells into per-segment point index lists.
///
/// `offsets[k]` is the end (exclusive) of cell `k` in `connectivity`.
fn split_lines(
    connectivity: Option<&DataArray>,
    offsets: Option<&DataArray>,
    point_count: usize,
) -> IoResult<Vec<Vec<usize>>> {
    let (Some(connectivity), Some(offsets)) = (connectivity, offsets) else {
        return Err(IoError::MissingArray {
            name: "Lines".to_string(),
        });
    };
    let connectivity = connectivity.indices()?;
    let offsets = offsets.indices()?;

    let mut segments = Vec::with_capacity(offsets.len());
    let mut begin = 0;
    for (cell, &end) in offsets.iter().enumerate() {
        if end < begin || end > connectivity.len() {
            return Err(IoError::invalid_content(format!(
                "line {cell} has offset {end} outside connectivity of length {}",
                connectivity.len()
            )));
        }
        let segment = connectivity[begin..end].to_vec();
        if let Some(&bad) = segment.iter().find(|&&p| p >= point_count) {
            return Err(IoError::invalid_content(format!(
                "line {cell} references point {bad} but only {point_count} points exist"
            )));
        }
        segments.push(segment);
        begin = end;
    }

    if begin != connectivity.len() {
        return Err(IoError::invalid_content(format!(
            "{} connectivity entries are not covered by any line",
            connectivity.len() - begin
        )));
    }

    Ok(segments)
}
