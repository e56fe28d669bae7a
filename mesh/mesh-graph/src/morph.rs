//! Morphology on vertex regions.
//!
//! A region is a set of vertex indices. Growing and shrinking work in
//! graph hops over a [`NeighborLists`].

use std::ops::RangeInclusive;

use hashbrown::HashSet;

use crate::error::{GraphError, GraphResult};
use crate::neighbors::NeighborLists;

/// Sorted, de-duplicated, in-range copy of a region.
fn normalize(graph: &NeighborLists, indices: &[usize]) -> Vec<usize> {
    let n = graph.vertex_count();
    let mut out: Vec<usize> = indices.iter().copied().filter(|&v| v < n).collect();
    out.sort_unstable();
    out.dedup();
    out
}

/// Grow a region by `hops` rings of neighbors.
///
/// # Example
///
/// ```
/// use mesh_graph::{NeighborLists, dilate};
///
/// let graph = NeighborLists::from_faces(&[[0, 1, 2], [1, 3, 2]], 4).unwrap();
/// assert_eq!(dilate(&graph, &[0], 1), vec![0, 1, 2]);
/// ```
#[must_use]
pub fn dilate(graph: &NeighborLists, indices: &[usize], hops: usize) -> Vec<usize> {
    let mut out = normalize(graph, indices);
    out.extend(graph.neighborhood(&out, hops));
    out.sort_unstable();
    out
}

/// Shrink a region by removing everything within `hops` of its outer ring.
///
/// The outer ring is the set of non-members adjacent to the region. With
/// `hops = 1` this strips the region's border.
#[must_use]
pub fn erode(graph: &NeighborLists, indices: &[usize], hops: usize) -> Vec<usize> {
    let region = normalize(graph, indices);
    let ring = graph.neighborhood(&region, 1);
    let reached: HashSet<usize> = graph.neighborhood(&ring, hops).into_iter().collect();
    region.into_iter().filter(|v| !reached.contains(v)).collect()
}

/// Region vertices adjacent to the region's outer ring.
///
/// Computed morphologically; agrees with [`region_border`].
#[must_use]
pub fn extract_edge(graph: &NeighborLists, indices: &[usize]) -> Vec<usize> {
    let region = normalize(graph, indices);
    let ring = graph.neighborhood(&region, 1);
    let reached: HashSet<usize> = graph.neighborhood(&ring, 1).into_iter().collect();
    region.into_iter().filter(|v| reached.contains(v)).collect()
}

/// Region vertices with at least one neighbor outside the region.
#[must_use]
pub fn region_border(graph: &NeighborLists, indices: &[usize]) -> Vec<usize> {
    let region = normalize(graph, indices);
    let members: HashSet<usize> = region.iter().copied().collect();
    region
        .into_iter()
        .filter(|&v| graph.neighbors(v).iter().any(|w| !members.contains(w)))
        .collect()
}

/// Outcome of a simple-point test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimplePoint {
    /// Whether flipping the vertex preserves the region's topology.
    pub simple: bool,
    /// Number of the vertex's neighbors inside the region.
    pub n_inside: usize,
}

/// Test whether removing `index` from a region preserves its topology.
///
/// `inside` marks region membership per vertex; indices past its end
/// count as outside. The vertex is:
///
/// - not simple when all or none of its neighbors are inside;
/// - simple when exactly one neighbor is inside, or exactly one outside;
/// - otherwise simple iff its inside neighbors form one group, where two
///   inside neighbors are grouped when they are adjacent or share another
///   inside neighbor (the tested vertex excluded).
#[must_use]
pub fn is_simple_point(graph: &NeighborLists, index: usize, inside: &[bool]) -> SimplePoint {
    let is_in = |v: usize| inside.get(v).copied().unwrap_or(false);

    let around = graph.neighbors(index);
    let inner: Vec<usize> = around.iter().copied().filter(|&v| is_in(v)).collect();
    let n_inside = inner.len();
    let n_outside = around.len() - n_inside;

    if n_inside == 0 || n_outside == 0 {
        return SimplePoint {
            simple: false,
            n_inside,
        };
    }
    if n_inside == 1 || n_outside == 1 {
        return SimplePoint {
            simple: true,
            n_inside,
        };
    }

    // Each inside neighbor plus its own inside neighbors
    let reach: Vec<HashSet<usize>> = inner
        .iter()
        .map(|&v| {
            let mut set: HashSet<usize> = graph
                .neighbors(v)
                .iter()
                .copied()
                .filter(|&w| w != index && is_in(w))
                .collect();
            set.insert(v);
            set
        })
        .collect();

    // Flood the overlap relation from the first inside neighbor
    let mut grouped = vec![false; n_inside];
    grouped[0] = true;
    let mut stack = vec![0];
    while let Some(i) = stack.pop() {
        for j in 0..n_inside {
            if !grouped[j] && !reach[i].is_disjoint(&reach[j]) {
                grouped[j] = true;
                stack.push(j);
            }
        }
    }

    SimplePoint {
        simple: grouped.iter().all(|&g| g),
        n_inside,
    }
}

/// Fill background holes enclosed by a single region.
///
/// A hole is a connected component of `background` vertices that borders
/// exactly one region and is not the largest background component. Holes
/// take the enclosing region's label. With `exclude = Some((values, range))`,
/// holes holding any vertex whose value lies in `range` are left alone.
///
/// # Errors
///
/// Returns [`GraphError::MaskLength`] if `regions` or the exclusion values do
/// not have one entry per vertex.
pub fn fill_holes(
    graph: &NeighborLists,
    regions: &[i32],
    exclude: Option<(&[f64], RangeInclusive<f64>)>,
    background: i32,
) -> GraphResult<Vec<i32>> {
    let n = graph.vertex_count();
    if regions.len() != n {
        return Err(GraphError::mask_length(n, regions.len()));
    }
    if let Some((values, _)) = &exclude
        && values.len() != n
    {
        return Err(GraphError::mask_length(n, values.len()));
    }

    let empty: Vec<usize> = (0..n).filter(|&v| regions[v] == background).collect();
    let components = graph.connected_components(&empty);

    // First component of maximal size is the surrounding background
    let outside = components
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, usize)>, (i, c)| match best {
            Some((_, len)) if len >= c.len() => best,
            _ => Some((i, c.len())),
        })
        .map(|(i, _)| i);

    let mut filled = regions.to_vec();
    for (i, component) in components.iter().enumerate() {
        if Some(i) == outside {
            continue;
        }

        let bordering: HashSet<i32> = component
            .iter()
            .flat_map(|&v| graph.neighbors(v))
            .map(|&w| regions[w])
            .filter(|&label| label != background)
            .collect();
        if bordering.len() != 1 {
            continue;
        }

        if let Some((values, range)) = &exclude
            && component.iter().any(|&v| range.contains(&values[v]))
        {
            continue;
        }

        if let Some(&label) = bordering.iter().next() {
            for &v in component {
                filled[v] = label;
            }
        }
    }

    Ok(filled)
}
