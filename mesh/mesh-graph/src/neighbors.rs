//! Vertex neighbor lists.
//!
//! Provides neighbor lookup and breadth-first queries over mesh vertices.

use std::collections::VecDeque;

use hashbrown::HashSet;
use mesh_types::IndexedMesh;

use crate::error::{GraphError, GraphResult};

/// Neighbor lists for mesh vertices.
///
/// For each vertex, the sorted, de-duplicated indices of the vertices it
/// shares a face edge with. Queries with out-of-range vertex indices see an
/// empty neighbor list.
///
/// # Example
///
/// ```
/// use mesh_graph::NeighborLists;
///
/// // Two triangles sharing the edge 1-2
/// let graph = NeighborLists::from_faces(&[[0, 1, 2], [1, 3, 2]], 4).unwrap();
/// assert_eq!(graph.neighbors(1), &[0, 2, 3]);
/// assert_eq!(graph.edge_count(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborLists {
    neighbors: Vec<Vec<usize>>,
}

impl NeighborLists {
    /// Build neighbor lists from triangle faces.
    ///
    /// Each face contributes its three undirected edges. Degenerate edges
    /// (a vertex repeated within a face) are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::FaceOutOfBounds`] if a face references a vertex
    /// index `>= vertex_count`.
    pub fn from_faces(faces: &[[u32; 3]], vertex_count: usize) -> GraphResult<Self> {
        let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];

        for (face_idx, face) in faces.iter().enumerate() {
            if let Some(&bad) = face.iter().find(|&&v| v as usize >= vertex_count) {
                return Err(GraphError::FaceOutOfBounds {
                    face: face_idx,
                    vertex: bad as usize,
                    vertex_count,
                });
            }

            let [a, b, c] = face.map(|v| v as usize);
            for (u, w) in [(a, b), (b, c), (c, a)] {
                if u != w {
                    neighbors[u].push(w);
                    neighbors[w].push(u);
                }
            }
        }

        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }

        Ok(Self { neighbors })
    }

    /// Build neighbor lists from a mesh.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::FaceOutOfBounds`] if a face references a
    /// missing vertex.
    pub fn from_mesh(mesh: &IndexedMesh) -> GraphResult<Self> {
        Self::from_faces(&mesh.faces, mesh.vertex_count())
    }

    /// Get the number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Check if the graph has no vertices.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Get the neighbors of a vertex, sorted ascending.
    #[inline]
    #[must_use]
    pub fn neighbors(&self, vertex: usize) -> &[usize] {
        self.neighbors.get(vertex).map_or(&[], Vec::as_slice)
    }

    /// Get the total number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        // Each edge is stored twice (once for each direction)
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Membership mask of `vertices`, one entry per graph vertex.
    ///
    /// Out-of-range indices are ignored. The mask always has
    /// [`vertex_count`](Self::vertex_count) entries, so it is a valid
    /// `allowed` argument for [`hop_distances`](Self::hop_distances).
    #[must_use]
    pub fn region_mask(&self, vertices: &[usize]) -> Vec<bool> {
        let mut mask = vec![false; self.vertex_count()];
        for &v in vertices {
            if let Some(slot) = mask.get_mut(v) {
                *slot = true;
            }
        }
        mask
    }

    /// Vertices within `hops` edges of any seed, excluding the seeds.
    ///
    /// Returns indices sorted ascending.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_graph::NeighborLists;
    ///
    /// // A strip of triangles: 0-1-2-3 along the bottom, 4-5-6-7 along the top
    /// let faces = [[0, 1, 5], [0, 5, 4], [1, 2, 6], [1, 6, 5], [2, 3, 7], [2, 7, 6]];
    /// let graph = NeighborLists::from_faces(&faces, 8).unwrap();
    ///
    /// assert_eq!(graph.neighborhood(&[0], 1), vec![1, 4, 5]);
    /// assert_eq!(graph.neighborhood(&[0], 0), Vec::<usize>::new());
    /// ```
    #[must_use]
    pub fn neighborhood(&self, seeds: &[usize], hops: usize) -> Vec<usize> {
        let n = self.vertex_count();
        let mut depth: Vec<Option<usize>> = vec![None; n];
        let mut queue = VecDeque::new();
        for &s in seeds {
            if s < n && depth[s].is_none() {
                depth[s] = Some(0);
                queue.push_back(s);
            }
        }

        let mut found = Vec::new();
        while let Some(v) = queue.pop_front() {
            let d = depth[v].unwrap_or(0);
            if d >= hops {
                continue;
            }
            for &w in &self.neighbors[v] {
                if depth[w].is_none() {
                    depth[w] = Some(d + 1);
                    found.push(w);
                    queue.push_back(w);
                }
            }
        }

        found.sort_unstable();
        found
    }

    /// Breadth-first hop distances from `sources`, moving only through
    /// vertices where `allowed` is true.
    ///
    /// Sources have distance 0 whether or not they are allowed. Vertices
    /// further than `max_hops` or unreachable get `None`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MaskLength`] if `allowed` does not have one
    /// entry per vertex.
    pub fn hop_distances(
        &self,
        sources: &[usize],
        allowed: &[bool],
        max_hops: usize,
    ) -> GraphResult<Vec<Option<usize>>> {
        let n = self.vertex_count();
        if allowed.len() != n {
            return Err(GraphError::mask_length(n, allowed.len()));
        }

        let mut dist: Vec<Option<usize>> = vec![None; n];
        let mut queue = VecDeque::new();
        for &s in sources {
            if s < n && dist[s].is_none() {
                dist[s] = Some(0);
                queue.push_back(s);
            }
        }

        while let Some(v) = queue.pop_front() {
            let d = dist[v].unwrap_or(0);
            if d >= max_hops {
                continue;
            }
            for &w in &self.neighbors[v] {
                if allowed[w] && dist[w].is_none() {
                    dist[w] = Some(d + 1);
                    queue.push_back(w);
                }
            }
        }

        Ok(dist)
    }

    /// Connected components of the subgraph induced by `vertices`.
    ///
    /// Each component is sorted ascending and components are ordered by
    /// their smallest member. Out-of-range indices are ignored.
    #[must_use]
    pub fn connected_components(&self, vertices: &[usize]) -> Vec<Vec<usize>> {
        let n = self.vertex_count();
        let members: HashSet<usize> = vertices.iter().copied().filter(|&v| v < n).collect();
        let mut order: Vec<usize> = members.iter().copied().collect();
        order.sort_unstable();

        let mut visited: HashSet<usize> = HashSet::with_capacity(members.len());
        let mut components = Vec::new();

        for start in order {
            if visited.contains(&start) {
                continue;
            }

            let mut component = Vec::new();
            let mut stack = vec![start];
            visited.insert(start);

            while let Some(v) = stack.pop() {
                component.push(v);
                for &w in &self.neighbors[v] {
                    if members.contains(&w) && visited.insert(w) {
                        stack.push(w);
                    }
                }
            }

            component.sort_unstable();
            components.push(component);
        }

        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::grid;

    /// Bottom row 0-1-2-3, top row 4-5-6-7.
    fn strip() -> NeighborLists {
        let faces = [
            [0, 1, 5],
            [0, 5, 4],
            [1, 2, 6],
            [1, 6, 5],
            [2, 3, 7],
            [2, 7, 6],
        ];
        let graph = NeighborLists::from_faces(&faces, 8);
        assert!(graph.is_ok());
        graph.unwrap_or_default()
    }

    #[test]
    fn neighbors_from_triangle() {
        let graph = NeighborLists::from_faces(&[[0, 1, 2]], 3).unwrap_or_default();
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.neighbors(0), &[1, 2]);
        assert_eq!(graph.neighbors(2), &[0, 1]);
    }

    #[test]
    fn shared_edges_deduplicated() {
        let graph = strip();
        assert_eq!(graph.neighbors(5), &[0, 1, 4, 6]);
        assert_eq!(graph.edge_count(), 13);
    }

    #[test]
    fn out_of_bounds_face() {
        let result = NeighborLists::from_faces(&[[0, 1, 2], [1, 2, 7]], 3);
        assert_eq!(
            result,
            Err(GraphError::FaceOutOfBounds {
                face: 1,
                vertex: 7,
                vertex_count: 3
            })
        );
    }

    #[test]
    fn degenerate_face_edges_skipped() {
        let graph = NeighborLists::from_faces(&[[0, 0, 1]], 2).unwrap_or_default();
        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn empty_graph() {
        let graph = NeighborLists::from_mesh(&mesh_types::IndexedMesh::new()).unwrap_or_default();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.neighbors(4).is_empty());
        assert!(graph.connected_components(&[0, 1]).is_empty());
    }

    #[test]
    fn neighborhood_two_hops() {
        let graph = strip();
        assert_eq!(graph.neighborhood(&[0], 2), vec![1, 2, 4, 5, 6]);
        assert_eq!(graph.neighborhood(&[0, 3], 1), vec![1, 2, 4, 5, 7]);
    }

    #[test]
    fn region_mask_covers_every_vertex() {
        let graph = strip();
        let mask = graph.region_mask(&[1, 6, 42]);
        assert_eq!(mask.len(), graph.vertex_count());
        assert_eq!(mask.iter().filter(|&&m| m).count(), 2);
        assert!(mask[1] && mask[6]);
        assert!(graph.hop_distances(&[1], &mask, 3).is_ok());
    }

    #[test]
    fn hop_distances_respect_mask() {
        let graph = strip();
        // Only the bottom row may be traversed
        let allowed = [true, true, true, true, false, false, false, false];
        let dist = graph.hop_distances(&[0], &allowed, usize::MAX);
        assert!(dist.is_ok());
        let dist = dist.unwrap_or_default();
        assert_eq!(dist[3], Some(3));
        assert_eq!(dist[5], None);

        let capped = graph.hop_distances(&[0], &allowed, 1).unwrap_or_default();
        assert_eq!(capped[1], Some(1));
        assert_eq!(capped[2], None);
    }

    #[test]
    fn hop_distances_mask_length() {
        let graph = strip();
        assert_eq!(
            graph.hop_distances(&[0], &[true; 3], 4),
            Err(GraphError::MaskLength {
                expected: 8,
                got: 3
            })
        );
    }

    #[test]
    fn components_ordered_by_smallest_member() {
        let graph = strip();
        let components = graph.connected_components(&[7, 3, 0, 4, 99]);
        assert_eq!(components, vec![vec![0, 4], vec![3, 7]]);
    }

    #[test]
    fn grid_interior_degree() {
        let mesh = grid(4, 4, |_, _| 0.0);
        let graph = NeighborLists::from_mesh(&mesh).unwrap_or_default();
        // Vertex (1, 1) = 5
        assert_eq!(graph.neighbors(5), &[0, 1, 4, 6, 9, 10]);
    }
}
