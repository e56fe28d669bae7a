//! Property-based tests for fundus extraction and segmentation.
//!
//! Run with: cargo test -p mesh-fundi -- proptest

use mesh_fundi::{
    BACKGROUND, FaceFilterSchedule, FundusParams, extract_fundi, robust_threshold, segment_fundi,
};
use mesh_types::{IndexedMesh, grid};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// A small grid with random fold labels and strictly positive fields.
fn arb_surface() -> impl Strategy<Value = (IndexedMesh, Vec<i32>, Vec<f64>, Vec<f64>)> {
    (3usize..=6, 3usize..=10).prop_flat_map(|(rows, cols)| {
        let n = rows * cols;
        (
            Just(grid(rows, cols, |_, _| 0.0)),
            prop::collection::vec(-1i32..3, n),
            prop::collection::vec(0.1..2.0f64, n),
            prop::collection::vec(0.1..5.0f64, n),
        )
    })
}

/// Column bands separated by background columns, so no face touches two
/// folds.
fn arb_banded_surface() -> impl Strategy<Value = (IndexedMesh, Vec<i32>, Vec<f64>, Vec<f64>)> {
    (3usize..=6, 5usize..=12).prop_flat_map(|(rows, cols)| {
        let n = rows * cols;
        let folds: Vec<i32> = (0..n)
            .map(|v| {
                let col = v % cols;
                if col % 3 == 2 {
                    BACKGROUND
                } else {
                    i32::try_from(col / 3).unwrap_or(0)
                }
            })
            .collect();
        (
            Just(grid(rows, cols, |_, _| 0.0)),
            Just(folds),
            prop::collection::vec(0.1..2.0f64, n),
            prop::collection::vec(0.1..5.0f64, n),
        )
    })
}

fn params() -> FundusParams {
    FundusParams::default()
        .min_separation(2.0)
        .erode_ratio(0.3)
        .parallel(false)
}

// =============================================================================
// Property Tests: Extraction
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Per-fold member sets partition the labeled vertices.
    #[test]
    fn folds_partition_labeled_vertices((mesh, folds, curvature, depth) in arb_surface()) {
        let result = extract_fundi(&mesh, &folds, &curvature, &depth, &params());
        prop_assert!(result.is_ok());
        let Ok(result) = result else { return Ok(()); };

        let labeled = folds.iter().filter(|&&l| l != BACKGROUND).count();
        let members: usize = result.folds.iter().map(|f| f.vertex_count).sum();
        prop_assert_eq!(members, labeled);
        prop_assert!(result.folds.windows(2).all(|w| w[0].fold_id < w[1].fold_id));

        for fold in &result.folds {
            for &v in &fold.skeleton {
                prop_assert_eq!(folds[v], fold.fold_id);
            }
        }
    }

    /// Fundus vertices carry their own fold's id.
    #[test]
    fn fundus_labels_match_folds((mesh, folds, curvature, depth) in arb_surface()) {
        let Ok(result) = extract_fundi(&mesh, &folds, &curvature, &depth, &params()) else {
            return Err(TestCaseError::fail("extraction failed"));
        };

        prop_assert_eq!(result.fundus_per_fold.len(), mesh.vertex_count());
        for v in result.fundus_per_fold.assigned_vertices() {
            prop_assert_eq!(result.fundus_per_fold.get(v), Some(folds[v]));
        }
    }

    /// The count equals the distinct labels and never exceeds the folds
    /// with a non-empty skeleton.
    #[test]
    fn fundus_count_consistent((mesh, folds, curvature, depth) in arb_surface()) {
        let Ok(result) = extract_fundi(&mesh, &folds, &curvature, &depth, &params()) else {
            return Err(TestCaseError::fail("extraction failed"));
        };

        let non_empty = result.folds.iter().filter(|f| !f.skeleton.is_empty()).count();
        prop_assert_eq!(result.fundus_count, result.fundus_per_fold.label_count());
        prop_assert!(result.fundus_count <= non_empty);
    }

    /// Filtering once or after every fold gives the same labels when folds
    /// share no face.
    #[test]
    fn filter_schedules_agree((mesh, folds, curvature, depth) in arb_banded_surface()) {
        let after_all = extract_fundi(&mesh, &folds, &curvature, &depth, &params());
        let per_fold = extract_fundi(
            &mesh,
            &folds,
            &curvature,
            &depth,
            &params().face_filter(FaceFilterSchedule::PerFold),
        );
        prop_assert!(after_all.is_ok() && per_fold.is_ok());
        let (Ok(after_all), Ok(per_fold)) = (after_all, per_fold) else { return Ok(()); };

        prop_assert_eq!(after_all.fundus_per_fold, per_fold.fundus_per_fold);
    }

    /// Serial and parallel runs agree.
    #[test]
    fn parallel_matches_serial((mesh, folds, curvature, depth) in arb_surface()) {
        let serial = extract_fundi(&mesh, &folds, &curvature, &depth, &params()).ok();
        let parallel =
            extract_fundi(&mesh, &folds, &curvature, &depth, &params().parallel(true)).ok();
        prop_assert_eq!(serial, parallel);
    }
}

// =============================================================================
// Property Tests: Threshold
// =============================================================================

proptest! {
    /// The threshold depends only on the multiset of positive values.
    #[test]
    fn threshold_deterministic(
        values in prop::collection::vec(-10.0..10.0f64, 1..60)
            .prop_filter("needs a positive value", |v| v.iter().any(|&x| x > 0.0))
    ) {
        let a = robust_threshold(&values);
        let b = robust_threshold(&values);
        prop_assert!(a.is_ok());

        let mut reversed = values.clone();
        reversed.reverse();
        let c = robust_threshold(&reversed);

        let bits = |r: &mesh_fundi::FundiResult<f64>| r.as_ref().map(|t| t.to_bits()).ok();
        prop_assert_eq!(bits(&a), bits(&b));
        prop_assert_eq!(bits(&a), bits(&c));
    }

    /// The threshold is never below the median of the positive values.
    #[test]
    fn threshold_at_least_median(values in prop::collection::vec(0.001..100.0f64, 1..60)) {
        let threshold = robust_threshold(&values).unwrap_or(f64::NAN);
        let median = mesh_fundi::median(&values).unwrap_or(f64::NAN);
        prop_assert!(threshold >= median);
    }
}

// =============================================================================
// Property Tests: Segmentation
// =============================================================================

proptest! {
    /// Segmented vertices are a subset of the fundus vertices, and repeated
    /// calls agree.
    #[test]
    fn segmentation_subset_and_idempotent(
        (fundi, sulci) in (1usize..80).prop_flat_map(|n| (
            prop::collection::vec(-1i32..4, n),
            prop::collection::vec(-1i32..6, n),
        ))
    ) {
        let first = segment_fundi(&fundi, Some(sulci.as_slice()), BACKGROUND);
        let second = segment_fundi(&fundi, Some(sulci.as_slice()), BACKGROUND);
        prop_assert!(first.is_ok());
        let (Ok(first), Ok(second)) = (first, second) else { return Ok(()); };

        for v in first.fundus_per_sulcus.assigned_vertices() {
            prop_assert!(fundi[v] != BACKGROUND);
            prop_assert_eq!(first.fundus_per_sulcus.get(v), Some(sulci[v]));
        }
        prop_assert_eq!(first.fundus_count, first.fundus_per_sulcus.label_count());
        prop_assert_eq!(first, second);
    }
}
