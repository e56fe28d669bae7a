//! Error types for fundus extraction.

use std::path::PathBuf;

use mesh_graph::GraphError;
use mesh_io::IoError;
use thiserror::Error;

/// Result type alias for fundus operations.
pub type FundiResult<T> = Result<T, FundiError>;

/// Errors that can occur during fundus extraction and segmentation.
#[derive(Debug, Error)]
pub enum FundiError {
    /// A required input file does not exist.
    #[error("input file not found: {}", path.display())]
    InputMissing {
        /// The missing path.
        path: PathBuf,
    },

    /// A write finished without producing the expected file.
    #[error("output file was not created: {}", path.display())]
    OutputMissing {
        /// The expected output path.
        path: PathBuf,
    },

    /// A per-vertex array has the wrong length.
    #[error("{what} has {got} entries, expected {expected}")]
    LengthMismatch {
        /// Which array was wrong.
        what: &'static str,
        /// Required length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// The robust threshold needs at least one strictly positive value.
    #[error("no positive values to compute a threshold from")]
    NoPositiveValues,

    /// Invalid parameters.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

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

    /// A vertex index is past the end of a label array.
    #[error("vertex index {vertex} out of bounds (labels cover {vertex_count} vertices)")]
    VertexOutOfBounds {
        /// The invalid vertex index.
        vertex: usize,
        /// Length of the label array.
        vertex_count: usize,
    },

    /// A source file carries no per-vertex scalar array.
    #[error("no scalar array found in {}", path.display())]
    MissingScalars {
        /// The file that was read.
        path: PathBuf,
    },

    /// Reading or writing a mesh file failed.
    #[error(transparent)]
    Io(#[from] IoError),
}

impl FundiError {
    /// Create an invalid params error.
    #[must_use]
    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::InvalidParams(details.into())
    }

    /// Create a length mismatch error.
    #[must_use]
    pub const fn length_mismatch(what: &'static str, expected: usize, got: usize) -> Self {
        Self::LengthMismatch {
            what,
            expected,
            got,
        }
    }
}

impl From<GraphError> for FundiError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::FaceOutOfBounds {
                face,
                vertex,
                vertex_count,
            } => Self::FaceOutOfBounds {
                face,
                vertex,
                vertex_count,
            },
            GraphError::MaskLength { expected, got } => {
                Self::length_mismatch("vertex mask", expected, got)
            }
        }
    }
}
