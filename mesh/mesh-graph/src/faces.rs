//! Face completion queries.

use hashbrown::HashSet;

/// Vertices of every face whose three corners all lie in `vertices`.
///
/// Returns indices sorted ascending without duplicates. Fewer than three
/// vertices can never complete a face.
///
/// # Example
///
/// ```
/// use mesh_graph::complete_face_vertices;
///
/// let faces = [[0, 1, 2], [1, 3, 2]];
/// assert_eq!(complete_face_vertices(&faces, &[0, 1, 2, 3]), vec![0, 1, 2, 3]);
/// assert_eq!(complete_face_vertices(&faces, &[0, 1, 3]), Vec::<usize>::new());
/// ```
#[must_use]
pub fn complete_face_vertices(faces: &[[u32; 3]], vertices: &[usize]) -> Vec<usize> {
    if vertices.len() < 3 {
        return Vec::new();
    }
    let members: HashSet<usize> = vertices.iter().copied().collect();

    let mut out: Vec<usize> = faces
        .iter()
        .filter(|face| face.iter().all(|&v| members.contains(&(v as usize))))
        .flat_map(|face| face.iter().map(|&v| v as usize))
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}
