//! PLY (Polygon File Format) support.
//!
//! Besides positions and faces, every extra scalar property on the `vertex`
//! element is read as a per-vertex [`ScalarField`], in header order.
//!
//! # Supported Properties
//!
//! - Vertex positions (x, y, z) - required
//! - Any other scalar vertex property - read as a named scalar array
//! - Face vertex indices (`vertex_indices` or `vertex_index`)
//!
//! # Example
//!
//! ```no_run
//! use mesh_io::{load_ply, save_ply};
//!
//! let scalar_mesh = load_ply("folds.ply").unwrap();
//! save_ply(&scalar_mesh.mesh, &scalar_mesh.scalars, "copy.ply", true).unwrap();
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use mesh_types::{IndexedMesh, ScalarField, Vertex};
use ply_rs::parser::Parser;
use ply_rs::ply::{
    Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
    ScalarType,
};
use ply_rs::writer::Writer;
use tracing::debug;

use crate::ScalarMesh;
use crate::error::{IoError, IoResult};

const POSITION_KEYS: [&str; 3] = ["x", "y", "z"];

/// Load a mesh and its per-vertex scalar properties from a PLY file.
///
/// Supports ASCII, binary little-endian, and binary big-endian formats.
/// Polygons with more than three corners are fan-triangulated.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The file is not valid PLY format
pub fn load_ply<P: AsRef<Path>>(path: P) -> IoResult<ScalarMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::from_open(path, e))?;
    let mut reader = BufReader::new(file);

    let parser = Parser::<DefaultElement>::new();

    let header = parser
        .read_header(&mut reader)
        .map_err(|e| IoError::invalid_content(format!("failed to parse PLY header: {e}")))?;

    let payload = parser
        .read_payload(&mut reader, &header)
        .map_err(|e| IoError::invalid_content(format!("failed to read PLY payload: {e}")))?;

    // Scalar property names in header order, positions excluded
    let scalar_names: Vec<String> = header
        .elements
        .get("vertex")
        .map(|def| {
            def.properties
                .iter()
                .filter(|(name, prop)| {
                    matches!(prop.data_type, PropertyType::Scalar(_))
                        && !POSITION_KEYS.contains(&name.as_str())
                })
                .map(|(name, _)| name.clone())
                .collect()
        })
        .unwrap_or_default();

    let mut mesh = IndexedMesh::new();
    let mut scalars: Vec<ScalarField> = scalar_names
        .iter()
        .map(|name| ScalarField::new(name.clone(), Vec::new()))
        .collect();

    if let Some(vertex_elements) = payload.get("vertex") {
        mesh.vertices.reserve(vertex_elements.len());
        for element in vertex_elements {
            let x = scalar_property(element, "x").unwrap_or(0.0);
            let y = scalar_property(element, "y").unwrap_or(0.0);
            let z = scalar_property(element, "z").unwrap_or(0.0);
            mesh.vertices.push(Vertex::from_coords(x, y, z));

            for field in &mut scalars {
                field
                    .values
                    .push(scalar_property(element, &field.name).unwrap_or(f64::NAN));
            }
        }
    }

    if let Some(face_elements) = payload.get("face") {
        mesh.faces.reserve(face_elements.len());
        for element in face_elements {
            let indices = get_index_list(element);
            if indices.len() >= 3 {
                // Fan triangulation for convex polygons
                for i in 1..indices.len() - 1 {
                    mesh.faces.push([indices[0], indices[i], indices[i + 1]]);
                }
            }
        }
    }

    debug!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        scalars = scalars.len(),
        "loaded PLY"
    );

    Ok(ScalarMesh { mesh, scalars })
}

/// Read any numeric scalar property as `f64`.
fn scalar_property(element: &DefaultElement, key: &str) -> Option<f64> {
    Some(match element.get(key)? {
        Property::Char(v) => f64::from(*v),
        Property::UChar(v) => f64::from(*v),
        Property::Short(v) => f64::from(*v),
        Property::UShort(v) => f64::from(*v),
        Property::Int(v) => f64::from(*v),
        Property::UInt(v) => f64::from(*v),
        Property::Float(v) => f64::from(*v),
        Property::Double(v) => *v,
        _ => return None,
    })
}

/// Extract vertex index list from a face element.
#[allow(clippy::cast_sign_loss)]
fn get_index_list(element: &DefaultElement) -> Vec<u32> {
    for key in &["vertex_indices", "vertex_index"] {
        if let Some(prop) = element.get(*key) {
            return match prop {
                Property::ListInt(v) => v.iter().map(|&i| i as u32).collect(),
                Property::ListUInt(v) => v.clone(),
                Property::ListUChar(v) => v.iter().map(|&i| u32::from(i)).collect(),
                Property::ListChar(v) => v.iter().map(|&i| i as u32).collect(),
                Property::ListShort(v) => v.iter().map(|&i| i as u32).collect(),
                Property::ListUShort(v) => v.iter().map(|&i| u32::from(i)).collect(),
                _ => continue,
            };
        }
    }
    Vec::new()
}

/// Save a mesh with per-vertex scalar arrays to a PLY file.
///
/// Each scalar array becomes a `double` vertex property named after the
/// array.
///
/// # Arguments
///
/// * `mesh` - The mesh to save
/// * `scalars` - Per-vertex arrays, each of length `mesh.vertex_count()`
/// * `path` - Output file path
/// * `binary` - If true, save as binary little-endian; if false, save as ASCII
///
/// # Errors
///
/// Returns an error if a scalar array has the wrong length or the file
/// cannot be written.
pub fn save_ply<P: AsRef<Path>>(
    mesh: &IndexedMesh,
    scalars: &[ScalarField],
    path: P,
    binary: bool,
) -> IoResult<()> {
    for field in scalars {
        if field.len() != mesh.vertex_count() {
            return Err(IoError::LengthMismatch {
                expected: mesh.vertex_count(),
                got: field.len(),
            });
        }
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    if binary {
        save_ply_binary(mesh, scalars, &mut writer)?;
    } else {
        save_ply_ascii(mesh, scalars, &mut writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Save a mesh with one integer label array to a PLY file.
///
/// Labels are written as an `int` vertex property, binary little-endian.
/// The background value is recorded as a header comment.
///
/// # Errors
///
/// Returns an error if `labels` has the wrong length or the file cannot be
/// written.
pub fn save_ply_labels<P: AsRef<Path>>(
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

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "ply")?;
    writeln!(writer, "format binary_little_endian 1.0")?;
    writeln!(writer, "comment Generated by mesh-io")?;
    writeln!(writer, "comment background {background}")?;
    write_vertex_header(&mut writer, mesh.vertex_count())?;
    writeln!(writer, "property int {label_name}")?;
    write_face_header(&mut writer, mesh.face_count())?;

    for (v, &label) in mesh.vertices.iter().zip(labels) {
        write_position_le(&mut writer, v)?;
        writer.write_all(&label.to_le_bytes())?;
    }
    write_faces_le(&mut writer, mesh)?;

    writer.flush()?;
    Ok(())
}

fn write_vertex_header<W: Write>(writer: &mut W, count: usize) -> IoResult<()> {
    writeln!(writer, "element vertex {count}")?;
    for key in POSITION_KEYS {
        writeln!(writer, "property float {key}")?;
    }
    Ok(())
}

fn write_face_header<W: Write>(writer: &mut W, count: usize) -> IoResult<()> {
    writeln!(writer, "element face {count}")?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn write_position_le<W: Write>(writer: &mut W, v: &Vertex) -> IoResult<()> {
    writer.write_all(&(v.position.x as f32).to_le_bytes())?;
    writer.write_all(&(v.position.y as f32).to_le_bytes())?;
    writer.write_all(&(v.position.z as f32).to_le_bytes())?;
    Ok(())
}

#[allow(clippy::cast_possible_wrap)]
fn write_faces_le<W: Write>(writer: &mut W, mesh: &IndexedMesh) -> IoResult<()> {
    for &[i0, i1, i2] in &mesh.faces {
        writer.write_all(&[3u8])?;
        writer.write_all(&(i0 as i32).to_le_bytes())?;
        writer.write_all(&(i1 as i32).to_le_bytes())?;
        writer.write_all(&(i2 as i32).to_le_bytes())?;
    }
    Ok(())
}

/// Save mesh as binary PLY (little-endian).
///
/// Written by hand because ply-rs uses the element count instead of the
/// list length when writing binary list properties.
fn save_ply_binary<W: Write>(
    mesh: &IndexedMesh,
    scalars: &[ScalarField],
    writer: &mut W,
) -> IoResult<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format binary_little_endian 1.0")?;
    writeln!(writer, "comment Generated by mesh-io")?;
    write_vertex_header(writer, mesh.vertex_count())?;
    for field in scalars {
        writeln!(writer, "property double {}", field.name)?;
    }
    write_face_header(writer, mesh.face_count())?;

    for (i, v) in mesh.vertices.iter().enumerate() {
        write_position_le(writer, v)?;
        for field in scalars {
            writer.write_all(&field.values[i].to_le_bytes())?;
        }
    }
    write_faces_le(writer, mesh)
}

/// Save mesh as ASCII PLY using ply-rs.
fn save_ply_ascii<W: Write>(
    mesh: &IndexedMesh,
    scalars: &[ScalarField],
    writer: &mut W,
) -> IoResult<()> {
    let mut ply = Ply::<DefaultElement>::new();
    ply.header.encoding = Encoding::Ascii;
    ply.header.comments.push("Generated by mesh-io".to_string());

    let mut vertex_def = ElementDef::new("vertex".to_string());
    for key in POSITION_KEYS {
        vertex_def.properties.add(PropertyDef::new(
            key.to_string(),
            PropertyType::Scalar(ScalarType::Float),
        ));
    }
    for field in scalars {
        vertex_def.properties.add(PropertyDef::new(
            field.name.clone(),
            PropertyType::Scalar(ScalarType::Double),
        ));
    }
    vertex_def.count = mesh.vertex_count();
    ply.header.elements.add(vertex_def);

    let mut face_def = ElementDef::new("face".to_string());
    face_def.properties.add(PropertyDef::new(
        "vertex_indices".to_string(),
        PropertyType::List(ScalarType::UChar, ScalarType::Int),
    ));
    face_def.count = mesh.face_count();
    ply.header.elements.add(face_def);

    let mut vertex_elements = Vec::with_capacity(mesh.vertex_count());
    for (i, v) in mesh.vertices.iter().enumerate() {
        let mut element = DefaultElement::new();
        #[allow(clippy::cast_possible_truncation)]
        {
            element.insert("x".to_string(), Property::Float(v.position.x as f32));
            element.insert("y".to_string(), Property::Float(v.position.y as f32));
            element.insert("z".to_string(), Property::Float(v.position.z as f32));
        }
        for field in scalars {
            element.insert(field.name.clone(), Property::Double(field.values[i]));
        }
        vertex_elements.push(element);
    }
    ply.payload.insert("vertex".to_string(), vertex_elements);

    let mut face_elements = Vec::with_capacity(mesh.face_count());
    for &[i0, i1, i2] in &mesh.faces {
        let mut element = DefaultElement::new();
        #[allow(clippy::cast_possible_wrap)]
        let indices = vec![i0 as i32, i1 as i32, i2 as i32];
        element.insert("vertex_indices".to_string(), Property::ListInt(indices));
        face_elements.push(element);
    }
    ply.payload.insert("face".to_string(), face_elements);

    Writer::new()
        .write_ply(writer, &mut ply)
        .map_err(|e| IoError::invalid_content(format!("failed to write PLY: {e}")))?;

    Ok(())
}
