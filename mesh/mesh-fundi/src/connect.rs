//! Skeleton connection by topology-preserving erosion.

use hashbrown::HashSet;
use mesh_graph::{NeighborLists, is_simple_point};
use tracing::trace;

use crate::anchors::sample;
use crate::params::ErosionParams;

/// Thins a fold down to a skeleton that links its anchors.
pub trait SkeletonConnector: Send + Sync {
    /// Return the skeleton vertices of the region marked in `mask`,
    /// ascending.
    ///
    /// A vertex is in the region when its mask entry differs from
    /// `background`. `outer` and `inner` anchors inside the region are never
    /// eroded. Border vertices are tested in order of increasing `values`,
    /// at least `erode_min_size` and at least `erode_ratio` of the current
    /// border per round.
    #[allow(clippy::too_many_arguments)]
    fn connect(
        &self,
        mask: &[i32],
        neighbors: &NeighborLists,
        outer: &[usize],
        inner: &[usize],
        values: &[f64],
        erode_ratio: f64,
        erode_min_size: usize,
        background: i32,
    ) -> Vec<usize>;
}

/// Erodes low-value border vertices while they are simple points.
///
/// Each round takes the current border (region vertices with a neighbor
/// outside), drops anchors and vertices already found non-simple, sorts the
/// rest by value and tests a batch. Simple vertices leave the region at
/// once; the others are set aside until some removal changes their
/// surroundings. Erosion ends when no testable border vertex is left.
///
/// With [`ErosionParams::prune_endpoint_anchors`], inner anchors that end
/// up with at most one region neighbor are released and erosion resumes,
/// so spurs leading only to an inner anchor shrink away. Outer anchors are
/// never released.
#[derive(Debug, Clone, Default)]
pub struct ErosionConnector {
    params: ErosionParams,
}

impl ErosionConnector {
    /// Create a connector with custom parameters.
    #[must_use]
    pub const fn new(params: ErosionParams) -> Self {
        Self { params }
    }

    /// The connector's parameters.
    #[must_use]
    pub const fn params(&self) -> &ErosionParams {
        &self.params
    }
}

/// Vertices tested per erosion round.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn batch_size(candidates: usize, ratio: f64, min_size: usize) -> usize {
    // Truncation: ratio * candidates is at most candidates for valid ratios
    let by_ratio = (ratio * candidates as f64).ceil().max(0.0) as usize;
    by_ratio.max(min_size).max(1).min(candidates)
}

/// Erode `region` in place, returning the number of removed vertices.
fn erode_region(
    region: &mut Vec<usize>,
    inside: &mut [bool],
    keep: &HashSet<usize>,
    neighbors: &NeighborLists,
    values: &[f64],
    erode_ratio: f64,
    erode_min_size: usize,
) -> usize {
    let mut stuck: HashSet<usize> = HashSet::new();
    let mut removed = 0;

    loop {
        let mut candidates: Vec<usize> = region
            .iter()
            .copied()
            .filter(|v| !keep.contains(v) && !stuck.contains(v))
            .filter(|&v| neighbors.neighbors(v).iter().any(|&w| !inside[w]))
            .collect();
        if candidates.is_empty() {
            break;
        }

        candidates.sort_by(|&a, &b| {
            sample(values, a)
                .total_cmp(&sample(values, b))
                .then(a.cmp(&b))
        });
        let batch = batch_size(candidates.len(), erode_ratio, erode_min_size);

        let mut changed = false;
        for &v in &candidates[..batch] {
            if is_simple_point(neighbors, v, inside).simple {
                inside[v] = false;
                removed += 1;
                changed = true;
            } else {
                stuck.insert(v);
            }
        }

        if changed {
            stuck.clear();
            region.retain(|&v| inside[v]);
        }
    }

    removed
}

impl SkeletonConnector for ErosionConnector {
    fn connect(
        &self,
        mask: &[i32],
        neighbors: &NeighborLists,
        outer: &[usize],
        inner: &[usize],
        values: &[f64],
        erode_ratio: f64,
        erode_min_size: usize,
        background: i32,
    ) -> Vec<usize> {
        let mut inside: Vec<bool> = (0..neighbors.vertex_count())
            .map(|v| mask.get(v).is_some_and(|&m| m != background))
            .collect();
        let mut region: Vec<usize> = (0..inside.len()).filter(|&v| inside[v]).collect();

        let mut keep: HashSet<usize> = outer
            .iter()
            .chain(inner)
            .copied()
            .filter(|&v| inside.get(v).copied().unwrap_or(false))
            .collect();
        let fixed: HashSet<usize> = outer.iter().copied().collect();

        loop {
            let removed = erode_region(
                &mut region,
                &mut inside,
                &keep,
                neighbors,
                values,
                erode_ratio,
                erode_min_size,
            );
            trace!(removed, remaining = region.len(), "erosion pass");

            if !self.params.prune_endpoint_anchors {
                break;
            }

            let released: Vec<usize> = keep
                .iter()
                .copied()
                .filter(|v| !fixed.contains(v))
                .filter(|&v| {
                    neighbors
                        .neighbors(v)
                        .iter()
                        .filter(|&&w| inside[w])
                        .count()
                        <= 1
                })
                .collect();
            if released.is_empty() {
                break;
            }
            for v in &released {
                keep.remove(v);
            }
        }

        region.sort_unstable();
        region
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::grid;

    fn graph(rows: usize, cols: usize) -> NeighborLists {
        NeighborLists::from_mesh(&grid(rows, cols, |_, _| 0.0)).unwrap_or_default()
    }

    #[test]
    fn test_batch_size() {
        assert_eq!(batch_size(100, 0.1, 1), 10);
        assert_eq!(batch_size(100, 0.1, 25), 25);
        assert_eq!(batch_size(5, 0.1, 1), 1);
        assert_eq!(batch_size(5, 0.1, 50), 5);
        assert_eq!(batch_size(3, 0.0, 0), 1);
    }

    #[test]
    fn line_between_anchors_survives() {
        // Row 1 of a 3 x 10 grid, anchored at both ends
        let graph = graph(3, 10);
        let mut mask = vec![-1; 30];
        mask[11..=18].fill(1);
        let values: Vec<f64> = (0..30).map(f64::from).collect();

        let skeleton = ErosionConnector::default()
            .connect(&mask, &graph, &[11, 18], &[], &values, 0.1, 1, -1);
        assert_eq!(skeleton, (11..=18).collect::<Vec<_>>());
    }

    #[test]
    fn unanchored_line_shrinks_to_one_vertex() {
        let graph = graph(3, 10);
        let mut mask = vec![-1; 30];
        mask[11..=18].fill(4);
        let values = vec![1.0; 30];

        let skeleton = ErosionConnector::default()
            .connect(&mask, &graph, &[], &[], &values, 0.5, 1, -1);
        assert_eq!(skeleton.len(), 1);
    }

    #[test]
    fn block_thins_to_anchor_path() {
        // 3 x 5 block in the middle of a 5 x 7 grid
        let graph = graph(5, 7);
        let mut mask = vec![0; 35];
        for row in 1..=3 {
            for col in 1..=5 {
                mask[row * 7 + col] = 2;
            }
        }
        let values = vec![0.0; 35];

        let skeleton = ErosionConnector::default()
            .connect(&mask, &graph, &[15, 19], &[], &values, 0.1, 1, 0);
        assert!(skeleton.contains(&15));
        assert!(skeleton.contains(&19));
        assert!(skeleton.len() < 15);
        assert!(skeleton.iter().all(|&v| mask[v] == 2));
        assert_eq!(graph.connected_components(&skeleton).len(), 1);
    }

    #[test]
    fn endpoint_inner_anchor_is_pruned() {
        let graph = graph(3, 10);
        let mut mask = vec![-1; 30];
        mask[11..=18].fill(1);
        let values = vec![0.0; 30];

        // Inner anchor at 18 dangles past outer anchor 15
        let pruned = ErosionConnector::default()
            .connect(&mask, &graph, &[11, 15], &[18], &values, 0.1, 1, -1);
        assert_eq!(pruned, (11..=15).collect::<Vec<_>>());

        let kept = ErosionConnector::new(ErosionParams::default().prune_endpoint_anchors(false))
            .connect(&mask, &graph, &[11, 15], &[18], &values, 0.1, 1, -1);
        assert_eq!(kept, (11..=18).collect::<Vec<_>>());
    }

    #[test]
    fn anchors_outside_region_ignored() {
        let graph = graph(3, 4);
        let mask = vec![-1; 12];
        let skeleton = ErosionConnector::default()
            .connect(&mask, &graph, &[1], &[2], &[0.0; 12], 0.1, 1, -1);
        assert!(skeleton.is_empty());
    }
}
