//! Legacy VTK (`.vtk`) polydata support.
//!
//! Cortical surfaces and their per-vertex measurements are commonly stored
//! as legacy ASCII VTK polydata: a `POINTS` block, a `POLYGONS` block, and
//! one or more `SCALARS` arrays under `POINT_DATA`.
//!
//! # Supported Blocks
//!
//! - `DATASET POLYDATA` with `POINTS`, `POLYGONS` and `TRIANGLE_STRIPS`
//! - `VERTICES` and `LINES` (skipped)
//! - `POINT_DATA` arrays: `SCALARS` (first component kept) and single
//!   component `FIELD` arrays become [`ScalarField`]s
//! - `CELL_DATA` arrays and other attribute kinds (skipped)
//!
//! Binary legacy files are rejected.
//!
//! # Example
//!
//! ```no_run
//! use mesh_io::load_vtk;
//!
//! let folds = load_vtk("folds.vtk").unwrap();
//! println!("{} vertices, {} arrays", folds.mesh.vertex_count(), folds.scalars.len());
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use mesh_types::{IndexedMesh, ScalarField, Vertex};
use tracing::debug;

use crate::ScalarMesh;
use crate::error::{IoError, IoResult};

/// Which dataset element attribute arrays currently describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attributes {
    None,
    Point(usize),
    Cell(usize),
}

impl Attributes {
    fn len(self, section: &str) -> IoResult<usize> {
        match self {
            Self::Point(n) | Self::Cell(n) => Ok(n),
            Self::None => Err(IoError::invalid_content(format!(
                "{section} outside POINT_DATA or CELL_DATA"
            ))),
        }
    }
}

/// Whitespace-separated token stream over the body of a legacy file.
struct Tokens<'a> {
    items: Vec<&'a str>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new<I: Iterator<Item = &'a str>>(lines: I) -> Self {
        Self {
            items: lines.flat_map(str::split_whitespace).collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.items.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<&'a str> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn next(&mut self, section: &str) -> IoResult<&'a str> {
        self.advance().ok_or_else(|| IoError::eof(section))
    }

    fn count(&mut self, section: &str) -> IoResult<usize> {
        Ok(self.next(section)?.parse()?)
    }

    fn float(&mut self, section: &str) -> IoResult<f64> {
        Ok(self.next(section)?.parse()?)
    }

    fn index(&mut self, section: &str) -> IoResult<u32> {
        Ok(self.next(section)?.parse()?)
    }

    fn skip(&mut self, n: usize, section: &str) -> IoResult<()> {
        if self.pos + n > self.items.len() {
            return Err(IoError::eof(section));
        }
        self.pos += n;
        Ok(())
    }
}

/// Load a mesh and its point scalar arrays from a legacy ASCII VTK file.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The header is missing or the file is binary
/// - The dataset is not `POLYDATA`
/// - A block is truncated or holds unparseable numbers
pub fn load_vtk<P: AsRef<Path>>(path: P) -> IoResult<ScalarMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::from_open(path, e))?;
    let mut text = String::new();
    BufReader::new(file).read_to_string(&mut text)?;

    let scalar_mesh = parse_vtk(&text)?;
    debug!(
        path = %path.display(),
        vertices = scalar_mesh.mesh.vertex_count(),
        faces = scalar_mesh.mesh.face_count(),
        scalars = scalar_mesh.scalars.len(),
        "loaded VTK"
    );
    Ok(scalar_mesh)
}

/// Parse legacy ASCII VTK polydata from a string.
pub(crate) fn parse_vtk(text: &str) -> IoResult<ScalarMesh> {
    let mut lines = text.lines();

    let version = lines.next().ok_or_else(|| IoError::eof("header"))?;
    if !version.trim_start().starts_with("# vtk DataFile") {
        return Err(IoError::invalid_content(
            "missing '# vtk DataFile' version line",
        ));
    }
    lines.next().ok_or_else(|| IoError::eof("title"))?;
    let encoding = lines.next().ok_or_else(|| IoError::eof("encoding"))?.trim();
    if !encoding.eq_ignore_ascii_case("ASCII") {
        return Err(IoError::invalid_content(format!(
            "unsupported VTK encoding: {encoding}"
        )));
    }

    let mut tokens = Tokens::new(lines);
    let mut mesh = IndexedMesh::new();
    let mut scalars = Vec::new();
    let mut attributes = Attributes::None;

    while let Some(keyword) = tokens.advance() {
        match keyword.to_ascii_uppercase().as_str() {
            "DATASET" => {
                let kind = tokens.next("DATASET")?;
                if !kind.eq_ignore_ascii_case("POLYDATA") {
                    return Err(IoError::invalid_content(format!(
                        "unsupported VTK dataset: {kind}"
                    )));
                }
            }
            "POINTS" => {
                let n = tokens.count("POINTS")?;
                tokens.next("POINTS")?;
                mesh.vertices.reserve(n);
                for _ in 0..n {
                    let x = tokens.float("POINTS")?;
                    let y = tokens.float("POINTS")?;
                    let z = tokens.float("POINTS")?;
                    mesh.vertices.push(Vertex::from_coords(x, y, z));
                }
            }
            "POLYGONS" => read_cells(&mut tokens, &mut mesh.faces, "POLYGONS", false)?,
            "TRIANGLE_STRIPS" => {
                read_cells(&mut tokens, &mut mesh.faces, "TRIANGLE_STRIPS", true)?;
            }
            "VERTICES" | "LINES" => {
                tokens.count(keyword)?;
                let size = tokens.count(keyword)?;
                tokens.skip(size, keyword)?;
            }
            "POINT_DATA" => {
                let n = tokens.count("POINT_DATA")?;
                if n != mesh.vertex_count() {
                    return Err(IoError::invalid_content(format!(
                        "POINT_DATA declares {n} values for {} points",
                        mesh.vertex_count()
                    )));
                }
                attributes = Attributes::Point(n);
            }
            "CELL_DATA" => attributes = Attributes::Cell(tokens.count("CELL_DATA")?),
            "SCALARS" => {
                let n = attributes.len("SCALARS")?;
                let name = tokens.next("SCALARS")?;
                tokens.next("SCALARS")?;
                let components = match tokens.peek().map(str::parse::<usize>) {
                    Some(Ok(c)) => {
                        tokens.advance();
                        c.max(1)
                    }
                    _ => 1,
                };
                if tokens
                    .peek()
                    .is_some_and(|t| t.eq_ignore_ascii_case("LOOKUP_TABLE"))
                {
                    tokens.skip(2, "LOOKUP_TABLE")?;
                }
                let mut values = Vec::with_capacity(n);
                for _ in 0..n {
                    values.push(tokens.float("SCALARS")?);
                    tokens.skip(components - 1, "SCALARS")?;
                }
                if matches!(attributes, Attributes::Point(_)) {
                    scalars.push(ScalarField::new(name, values));
                }
            }
            "LOOKUP_TABLE" => {
                tokens.next("LOOKUP_TABLE")?;
                let size = tokens.count("LOOKUP_TABLE")?;
                tokens.skip(4 * size, "LOOKUP_TABLE")?;
            }
            "NORMALS" | "VECTORS" | "TENSORS" => {
                let n = attributes.len(keyword)?;
                tokens.skip(2, keyword)?;
                let width = if keyword.eq_ignore_ascii_case("TENSORS") { 9 } else { 3 };
                tokens.skip(width * n, keyword)?;
            }
            "COLOR_SCALARS" | "TEXTURE_COORDINATES" => {
                let n = attributes.len(keyword)?;
                tokens.next(keyword)?;
                let width = tokens.count(keyword)?;
                if keyword.eq_ignore_ascii_case("TEXTURE_COORDINATES") {
                    tokens.next(keyword)?;
                }
                tokens.skip(width * n, keyword)?;
            }
            "FIELD" => {
                tokens.next("FIELD")?;
                let arrays = tokens.count("FIELD")?;
                for _ in 0..arrays {
                    let name = tokens.next("FIELD")?;
                    let components = tokens.count("FIELD")?;
                    let tuples = tokens.count("FIELD")?;
                    tokens.next("FIELD")?;
                    let point_scalar = components == 1
                        && matches!(attributes, Attributes::Point(n) if n == tuples);
                    if point_scalar {
                        let values = (0..tuples)
                            .map(|_| tokens.float("FIELD"))
                            .collect::<IoResult<Vec<_>>>()?;
                        scalars.push(ScalarField::new(name, values));
                    } else {
                        tokens.skip(components * tuples, "FIELD")?;
                    }
                }
            }
            other => {
                return Err(IoError::invalid_content(format!(
                    "unexpected VTK keyword: {other}"
                )));
            }
        }
    }

    Ok(ScalarMesh { mesh, scalars })
}

/// Read a polygon or triangle strip block into triangles.
fn read_cells(
    tokens: &mut Tokens<'_>,
    faces: &mut Vec<[u32; 3]>,
    section: &str,
    strips: bool,
) -> IoResult<()> {
    let cells = tokens.count(section)?;
    tokens.count(section)?;
    faces.reserve(cells);

    let mut corners = Vec::new();
    for _ in 0..cells {
        let k = tokens.count(section)?;
        corners.clear();
        for _ in 0..k {
            corners.push(tokens.index(section)?);
        }
        if corners.len() < 3 {
            continue;
        }
        if strips {
            for i in 0..corners.len() - 2 {
                if i % 2 == 0 {
                    faces.push([corners[i], corners[i + 1], corners[i + 2]]);
                } else {
                    faces.push([corners[i + 1], corners[i], corners[i + 2]]);
                }
            }
        } else {
            for i in 1..corners.len() - 1 {
                faces.push([corners[0], corners[i], corners[i + 1]]);
            }
        }
    }
    Ok(())
}

fn write_geometry<W: Write>(writer: &mut W, title: &str, mesh: &IndexedMesh) -> IoResult<()> {
    writeln!(writer, "# vtk DataFile Version 2.0")?;
    writeln!(writer, "{title}")?;
    writeln!(writer, "ASCII")?;
    writeln!(writer, "DATASET POLYDATA")?;
    writeln!(writer, "POINTS {} float", mesh.vertex_count())?;
    for v in &mesh.vertices {
        writeln!(writer, "{} {} {}", v.position.x, v.position.y, v.position.z)?;
    }
    writeln!(
        writer,
        "POLYGONS {} {}",
        mesh.face_count(),
        4 * mesh.face_count()
    )?;
    for &[a, b, c] in &mesh.faces {
        writeln!(writer, "3 {a} {b} {c}")?;
    }
    writeln!(writer, "POINT_DATA {}", mesh.vertex_count())?;
    Ok(())
}

/// Save a mesh with per-vertex scalar arrays as legacy ASCII VTK.
///
/// # Errors
///
/// Returns an error if a scalar array has the wrong length or the file
/// cannot be written.
pub fn save_vtk<P: AsRef<Path>>(
    mesh: &IndexedMesh,
    scalars: &[ScalarField],
    path: P,
) -> IoResult<()> {
    for field in scalars {
        if field.len() != mesh.vertex_count() {
            return Err(IoError::LengthMismatch {
                expected: mesh.vertex_count(),
                got: field.len(),
            });
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    write_geometry(&mut writer, "Generated by mesh-io", mesh)?;
    for field in scalars {
        writeln!(writer, "SCALARS {} double 1", field.name)?;
        writeln!(writer, "LOOKUP_TABLE default")?;
        for value in &field.values {
            writeln!(writer, "{value}")?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Save a mesh with one integer label array as legacy ASCII VTK.
///
/// The background value is recorded in the title line.
///
/// # Errors
///
/// Returns an error if `labels` has the wrong length or the file cannot be
/// written.
pub fn save_vtk_labels<P: AsRef<Path>>(
    mesh: &IndexedMesh,
    labels: &[i32],
    label_name: &str,
    background: i32,
    path: P,
) -> IoResult<()> {
    if labels.len() != mesh.vertex_count() {
        return Err(IoError::LengthMismatch {
            expected: mesh.vertex_count(),
            got: labels.len(),
        });
    }

    let mut writer = BufWriter::new(File::create(path)?);
    let title = format!("Generated by mesh-io (background {background})");
    write_geometry(&mut writer, &title, mesh)?;
    writeln!(writer, "SCALARS {label_name} int 1")?;
    writeln!(writer, "LOOKUP_TABLE default")?;
    for label in labels {
        writeln!(writer, "{label}")?;
    }
    writer.flush()?;
    Ok(())
}
