//! Removal of skeleton vertices that fill whole faces.

use mesh_graph::complete_face_vertices;

/// Picks skeleton vertices to drop so the skeleton stays curve-like.
pub trait FaceCompletionFilter: Send + Sync {
    /// Return the vertices of `skeleton` to remove, ascending.
    fn vertices_to_remove(&self, skeleton: &[usize], faces: &[[u32; 3]]) -> Vec<usize>;
}

/// Removes every vertex of every face the skeleton fully covers.
///
/// # Example
///
/// ```
/// use mesh_fundi::{CompleteFaceFilter, FaceCompletionFilter};
///
/// let faces = [[0, 1, 2], [1, 3, 2]];
/// assert_eq!(CompleteFaceFilter.vertices_to_remove(&[0, 1, 2, 4], &faces), vec![0, 1, 2]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CompleteFaceFilter;

impl FaceCompletionFilter for CompleteFaceFilter {
    fn vertices_to_remove(&self, skeleton: &[usize], faces: &[[u32; 3]]) -> Vec<usize> {
        complete_face_vertices(faces, skeleton)
    }
}
