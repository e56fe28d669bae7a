//! Indexed triangle mesh.

use crate::Vertex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// Stores vertices and faces separately, with faces referencing vertices by
/// index. Fundus extraction treats the mesh as immutable: labels and
/// measurements live in per-vertex arrays of length [`vertex_count`].
///
/// [`vertex_count`]: IndexedMesh::vertex_count
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Create a mesh from flat coordinate and index arrays.
    ///
    /// Trailing values that do not form a whole point or face are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::IndexedMesh;
    ///
    /// let mesh = IndexedMesh::from_raw(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2]);
    /// assert_eq!(mesh.face_count(), 1);
    /// ```
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        let vertices = positions
            .chunks_exact(3)
            .map(|p| Vertex::from_coords(p[0], p[1], p[2]))
            .collect();
        let faces = indices
            .chunks_exact(3)
            .map(|f| [f[0], f[1], f[2]])
            .collect();
        Self { vertices, faces }
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh has no vertices or no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Vertex coordinates as plain arrays.
    #[must_use]
    pub fn points(&self) -> Vec<[f64; 3]> {
        self.vertices.iter().map(Vertex::coords).collect()
    }

    /// Find the first face corner that references a missing vertex.
    ///
    /// Returns `(face_index, vertex_index)`.
    #[must_use]
    pub fn first_invalid_face(&self) -> Option<(usize, u32)> {
        let n = self.vertices.len();
        self.faces.iter().enumerate().find_map(|(face_idx, face)| {
            face.iter()
                .find(|&&v| v as usize >= n)
                .map(|&v| (face_idx, v))
        })
    }
}

/// Build a triangulated height field on a unit-spaced grid.
///
/// Vertex `(row, col)` has index `row * cols + col` and position
/// `(col, row, height(row, col))`. Each cell is split along its
/// `(row, col)`–`(row + 1, col + 1)` diagonal, so interior vertices have six
/// neighbors.
///
/// # Example
///
/// ```
/// use mesh_types::grid;
///
/// let mesh = grid(3, 4, |_, _| 0.0);
/// assert_eq!(mesh.vertex_count(), 12);
/// assert_eq!(mesh.face_count(), 2 * 2 * 3);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn grid(rows: usize, cols: usize, height: impl Fn(usize, usize) -> f64) -> IndexedMesh {
    let cell_count = rows.saturating_sub(1) * cols.saturating_sub(1);
    let mut mesh = IndexedMesh::with_capacity(rows * cols, 2 * cell_count);

    for row in 0..rows {
        for col in 0..cols {
            mesh.vertices
                .push(Vertex::from_coords(col as f64, row as f64, height(row, col)));
        }
    }

    for row in 0..rows.saturating_sub(1) {
        for col in 0..cols.saturating_sub(1) {
            let a = (row * cols + col) as u32;
            let b = a + 1;
            let d = a + cols as u32;
            let e = d + 1;
            mesh.faces.push([a, b, e]);
            mesh.faces.push([a, e, d]);
        }
    }

    mesh
}
