//! Error types for graph construction.

use thiserror::Error;

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur while building or querying a neighbor graph.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {vertex} (mesh has {vertex_count} vertices)")]
    FaceOutOfBounds {
        /// Index of the offending face.
        face: usize,
        /// The missing vertex index.
        vertex: usize,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A per-vertex mask does not cover every vertex.
    #[error("mask has {got} entries but the graph has {expected} vertices")]
    MaskLength {
        /// Number of vertices in the graph.
        expected: usize,
        /// Number of mask entries supplied.
        got: usize,
    },
}

impl GraphError {
    /// Create a `MaskLength` error.
    #[must_use]
    pub const fn mask_length(expected: usize, got: usize) -> Self {
        Self::MaskLength { expected, got }
    }
}
