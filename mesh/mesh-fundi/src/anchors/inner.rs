//! Inner anchors: separated high points of the value field.

use hashbrown::HashMap;

use super::sample;

/// Finds interior vertices a fundus should pass through.
pub trait InnerAnchorFinder: Send + Sync {
    /// Return inner anchor vertices, ascending.
    ///
    /// Only vertices whose value exceeds `threshold` qualify, and accepted
    /// anchors lie at least `min_separation` apart.
    fn find_inner_anchors(
        &self,
        points: &[[f64; 3]],
        values: &[f64],
        min_separation: f64,
        threshold: f64,
    ) -> Vec<usize>;
}

/// Greedy maxima above a threshold, separated in Euclidean space.
///
/// Candidates are visited from the highest value down (ties by index) and
/// accepted unless an accepted anchor lies closer than `min_separation`.
/// Accepted anchors are bucketed in a spatial hash with cells of side
/// `min_separation`, so a candidate only checks the 3x3x3 cells around it.
///
/// # Example
///
/// ```
/// use mesh_fundi::{InnerAnchorFinder, ThresholdedMaxima};
///
/// let points: Vec<[f64; 3]> = (0..6).map(|i| [f64::from(i), 0.0, 0.0]).collect();
/// let values = [5.0, 4.0, 1.0, 1.0, 4.0, 6.0];
///
/// let anchors = ThresholdedMaxima.find_inner_anchors(&points, &values, 2.5, 2.0);
/// assert_eq!(anchors, vec![0, 5]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdedMaxima;

impl InnerAnchorFinder for ThresholdedMaxima {
    fn find_inner_anchors(
        &self,
        points: &[[f64; 3]],
        values: &[f64],
        min_separation: f64,
        threshold: f64,
    ) -> Vec<usize> {
        let mut candidates: Vec<usize> = (0..points.len())
            .filter(|&v| sample(values, v) > threshold)
            .filter(|&v| points[v].iter().all(|c| c.is_finite()))
            .collect();

        if min_separation <= 0.0 {
            return candidates;
        }

        candidates.sort_by(|&a, &b| {
            sample(values, b)
                .total_cmp(&sample(values, a))
                .then(a.cmp(&b))
        });

        let min_sq = min_separation * min_separation;
        let mut spatial_hash: HashMap<(i64, i64, i64), Vec<usize>> = HashMap::new();
        let mut accepted: Vec<usize> = Vec::new();

        for v in candidates {
            let p = &points[v];
            let cell = pos_to_cell(p, min_separation);
            if too_close(&spatial_hash, points, cell, p, min_sq) {
                continue;
            }
            spatial_hash.entry(cell).or_default().push(v);
            accepted.push(v);
        }

        accepted.sort_unstable();
        accepted
    }
}

/// Convert a position to its spatial hash cell.
#[allow(clippy::cast_possible_truncation)]
fn pos_to_cell(p: &[f64; 3], cell_size: f64) -> (i64, i64, i64) {
    // Float-to-int casts saturate, so far-out points share edge cells
    (
        (p[0] / cell_size).floor() as i64,
        (p[1] / cell_size).floor() as i64,
        (p[2] / cell_size).floor() as i64,
    )
}

/// Whether an accepted anchor lies strictly closer than the separation.
fn too_close(
    spatial_hash: &HashMap<(i64, i64, i64), Vec<usize>>,
    points: &[[f64; 3]],
    cell: (i64, i64, i64),
    p: &[f64; 3],
    min_sq: f64,
) -> bool {
    for dx in -1..=1_i64 {
        for dy in -1..=1_i64 {
            for dz in -1..=1_i64 {
                let neighbor_cell = (
                    cell.0.saturating_add(dx),
                    cell.1.saturating_add(dy),
                    cell.2.saturating_add(dz),
                );
                let Some(anchors) = spatial_hash.get(&neighbor_cell) else {
                    continue;
                };
                for &a in anchors {
                    let q = &points[a];
                    let dist_sq =
                        (p[0] - q[0]).powi(2) + (p[1] - q[1]).powi(2) + (p[2] - q[2]).powi(2);
                    if dist_sq < min_sq {
                        return true;
                    }
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_points(n: usize) -> Vec<[f64; 3]> {
        (0..n).map(|i| [i as f64, 0.0, 0.0]).collect()
    }

    #[test]
    fn separated_maxima() {
        let points = line_points(6);
        let values = [5.0, 4.0, 1.0, 1.0, 4.0, 6.0];

        let anchors = ThresholdedMaxima.find_inner_anchors(&points, &values, 2.5, 2.0);
        assert_eq!(anchors, vec![0, 5]);
    }

    #[test]
    fn zero_separation_keeps_all_candidates() {
        let points = line_points(6);
        let values = [5.0, 4.0, 1.0, 1.0, 4.0, 6.0];

        let anchors = ThresholdedMaxima.find_inner_anchors(&points, &values, 0.0, 2.0);
        assert_eq!(anchors, vec![0, 1, 4, 5]);
    }

    #[test]
    fn threshold_is_strict() {
        let points = line_points(3);
        let values = [2.0, 3.0, 2.0];

        assert_eq!(
            ThresholdedMaxima.find_inner_anchors(&points, &values, 1.0, 2.0),
            vec![1]
        );
        assert!(
            ThresholdedMaxima
                .find_inner_anchors(&points, &values, 1.0, 10.0)
                .is_empty()
        );
        assert!(
            ThresholdedMaxima
                .find_inner_anchors(&points, &values, 1.0, f64::NAN)
                .is_empty()
        );
    }

    #[test]
    fn duplicate_points_collapse() {
        let points = vec![[1.0, 1.0, 1.0]; 50];
        let values = vec![3.0; 50];

        let anchors = ThresholdedMaxima.find_inner_anchors(&points, &values, 0.5, 1.0);
        assert_eq!(anchors, vec![0]);
    }

    #[test]
    fn flat_surface_with_many_candidates() {
        // 60 x 60 unit grid in the z = 0 plane, every vertex a candidate
        let points: Vec<[f64; 3]> = (0..3600)
            .map(|v| [(v % 60) as f64, (v / 60) as f64, 0.0])
            .collect();
        let values = vec![5.0; 3600];

        let anchors = ThresholdedMaxima.find_inner_anchors(&points, &values, 1.5, 1.0);

        // Equal values are visited by index: even columns of even rows win
        assert_eq!(anchors.len(), 900);
        assert!(anchors.iter().all(|&v| (v % 60) % 2 == 0 && (v / 60) % 2 == 0));
        for (i, &a) in anchors.iter().enumerate() {
            for &b in &anchors[i + 1..] {
                let (p, q) = (points[a], points[b]);
                let dist_sq = (p[0] - q[0]).powi(2) + (p[1] - q[1]).powi(2);
                assert!(dist_sq >= 1.5 * 1.5);
            }
        }
    }

    #[test]
    fn separation_boundary_is_inclusive() {
        let points = line_points(4);
        let values = [4.0, 4.0, 4.0, 4.0];

        // Distance exactly equal to the separation is accepted
        let anchors = ThresholdedMaxima.find_inner_anchors(&points, &values, 1.0, 1.0);
        assert_eq!(anchors, vec![0, 1, 2, 3]);
    }

    #[test]
    fn skips_missing_values_and_bad_points() {
        let points = vec![[0.0, 0.0, 0.0], [f64::NAN, 0.0, 0.0], [9.0, 0.0, 0.0]];
        let values = [4.0, 8.0];

        let anchors = ThresholdedMaxima.find_inner_anchors(&points, &values, 1.0, 1.0);
        assert_eq!(anchors, vec![0]);
    }
}
