//! Outer anchors: where a fundus leaves its fold.

// Hop counts and separations are small; casts are safe.
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use std::cmp::Ordering;

use mesh_graph::{NeighborLists, region_border};
use tracing::warn;

use crate::error::FundiResult;
use crate::params::OuterAnchorParams;
use crate::threshold::quantile;

use super::sample;

/// Finds the boundary endpoints of a fold's fundus.
pub trait OuterAnchorFinder: Send + Sync {
    /// Return outer anchor vertices of one fold.
    ///
    /// `values` and `depth` are mesh-wide per-vertex arrays; only
    /// `fold_vertices` are considered. Accepted anchors lie at least
    /// `min_separation` apart.
    fn find_outer_anchors(
        &self,
        fold_vertices: &[usize],
        neighbors: &NeighborLists,
        values: &[f64],
        depth: &[f64],
        min_separation: f64,
    ) -> Vec<usize>;
}

/// Outer anchors from steepest-ascent tracks started on the deep part of
/// the fold border.
///
/// 1. The border is every fold vertex with a neighbor outside the fold.
/// 2. Border vertices at or above the configured depth quantile are seeds.
/// 3. Each seed climbs the value field inside the fold, one hop at a time
///    to its highest strictly-greater neighbor, until no neighbor improves.
///    The number of hops scores the seed.
/// 4. Seeds are grouped into connected border segments, and each segment
///    offers its best seed (longest track, then highest value, then lowest
///    index).
/// 5. Offers are accepted best-first when their hop distance inside the
///    fold to every accepted anchor is at least `min_separation`.
///
/// Anchors are returned ascending.
#[derive(Debug, Clone, Default)]
pub struct BoundaryTrackEndpoints {
    params: OuterAnchorParams,
}

#[derive(Debug, Clone, Copy)]
struct Offer {
    vertex: usize,
    hops: usize,
    value: f64,
}

impl Offer {
    /// Greater is better.
    fn rank(&self, other: &Self) -> Ordering {
        self.hops
            .cmp(&other.hops)
            .then(self.value.total_cmp(&other.value))
            .then(other.vertex.cmp(&self.vertex))
    }
}

impl BoundaryTrackEndpoints {
    /// Create a finder with custom parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters fail validation.
    pub fn new(params: OuterAnchorParams) -> FundiResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// The finder's parameters.
    #[must_use]
    pub const fn params(&self) -> &OuterAnchorParams {
        &self.params
    }

    /// Steepest-ascent track from `seed` through vertices marked `in_fold`.
    ///
    /// The returned path starts at `seed`; its length minus one is the
    /// track's hop count.
    #[must_use]
    pub fn track(
        &self,
        seed: usize,
        in_fold: &[bool],
        neighbors: &NeighborLists,
        values: &[f64],
    ) -> Vec<usize> {
        let mut path = vec![seed];
        let mut current = seed;

        while path.len() <= self.params.max_track_hops {
            let mut best: Option<(usize, f64)> = None;
            for &w in neighbors.neighbors(current) {
                if !in_fold.get(w).copied().unwrap_or(false) {
                    continue;
                }
                let value = sample(values, w);
                if value > sample(values, current)
                    && best.is_none_or(|(_, best_value)| value > best_value)
                {
                    best = Some((w, value));
                }
            }
            let Some((next, _)) = best else {
                break;
            };
            path.push(next);
            current = next;
        }

        path
    }
}

impl OuterAnchorFinder for BoundaryTrackEndpoints {
    fn find_outer_anchors(
        &self,
        fold_vertices: &[usize],
        neighbors: &NeighborLists,
        values: &[f64],
        depth: &[f64],
        min_separation: f64,
    ) -> Vec<usize> {
        let n = neighbors.vertex_count();
        let in_fold = neighbors.region_mask(fold_vertices);

        let border = region_border(neighbors, fold_vertices);
        let border_depth: Vec<f64> = border.iter().map(|&v| sample(depth, v)).collect();
        let Some(cutoff) = quantile(&border_depth, self.params.seed_depth_quantile) else {
            return Vec::new();
        };
        let seeds: Vec<usize> = border
            .into_iter()
            .filter(|&v| sample(depth, v) >= cutoff)
            .collect();

        let mut offers: Vec<Offer> = neighbors
            .connected_components(&seeds)
            .iter()
            .filter_map(|segment| {
                segment
                    .iter()
                    .map(|&seed| Offer {
                        vertex: seed,
                        hops: self.track(seed, &in_fold, neighbors, values).len() - 1,
                        value: sample(values, seed),
                    })
                    .max_by(Offer::rank)
            })
            .collect();
        offers.sort_by(|a, b| b.rank(a));

        let reach = min_separation.ceil() as usize;
        let mut nearest: Vec<Option<usize>> = vec![None; n];
        let mut accepted = Vec::new();

        for offer in offers {
            if let Some(d) = nearest[offer.vertex]
                && (d as f64) < min_separation
            {
                continue;
            }
            accepted.push(offer.vertex);

            // `region_mask` has one entry per vertex, so this cannot fail
            // today. If it ever does, stop accepting rather than skip the
            // separation check.
            let dist = match neighbors.hop_distances(&[offer.vertex], &in_fold, reach) {
                Ok(dist) => dist,
                Err(e) => {
                    warn!(error = %e, "Hop distances failed, keeping accepted outer anchors");
                    break;
                }
            };
            for (slot, d) in nearest.iter_mut().zip(dist) {
                if let Some(d) = d {
                    *slot = Some(slot.map_or(d, |s| s.min(d)));
                }
            }
        }

        accepted.sort_unstable();
        accepted
    }
}
