//! End-to-end extraction and segmentation tests.
//!
//! Covers the in-memory pipeline on synthetic troughs, the file wrappers
//! over VTK and PLY surfaces, and the relabeling laws of segmentation.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::cast_precision_loss)]

use mesh_fundi::{
    BACKGROUND, FaceFilterSchedule, FundiError, FundusParams, extract_fundi,
    extract_fundi_from_files, read_vertex_labels, segment_fundi, segment_fundi_to_file,
};
use mesh_io::{save_ply, save_vtk};
use mesh_types::{IndexedMesh, ScalarField, grid};

// =============================================================================
// Fixtures
// =============================================================================

const COLS: usize = 42;
const FOLD: i32 = 7;

/// A 40-vertex trough along the middle row of a 3 x 42 grid.
///
/// Position `i` sits at column `i + 1`. The value field peaks at `i = 2`
/// and again at `i = 20`, depth is smallest at `i = 20`.
fn trough() -> (IndexedMesh, Vec<i32>, Vec<f64>, Vec<f64>) {
    let mesh = grid(3, COLS, |_, _| 0.0);
    let n = mesh.vertex_count();
    let mut folds = vec![BACKGROUND; n];
    let mut curvature = vec![0.0; n];
    let mut depth = vec![0.0; n];

    for i in 0..40 {
        let v = COLS + 1 + i;
        let value = match i {
            0..=2 => 30.0 + i as f64,
            3..=20 => i as f64 - 2.0,
            _ => 18.0 - (i as f64 - 20.0) * 0.5,
        };
        folds[v] = FOLD;
        depth[v] = (i as f64 - 20.0).abs() + 1.0;
        curvature[v] = value / depth[v];
    }

    (mesh, folds, curvature, depth)
}

fn golden_params() -> FundusParams {
    FundusParams::default()
        .min_separation(10.0)
        .erode_ratio(0.1)
        .erode_min_size(10)
}

fn write_field(mesh: &IndexedMesh, name: &str, values: &[f64], path: &std::path::Path) {
    let field = ScalarField::new(name, values.to_vec());
    match path.extension().and_then(|e| e.to_str()) {
        Some("ply") => save_ply(mesh, &[field], path, true).unwrap(),
        _ => save_vtk(mesh, &[field], path).unwrap(),
    }
}

fn labels_as_field(labels: &[i32]) -> Vec<f64> {
    labels.iter().map(|&l| f64::from(l)).collect()
}

// =============================================================================
// In-memory extraction
// =============================================================================

#[test]
fn trough_skeleton_matches_reference() {
    let (mesh, folds, curvature, depth) = trough();

    let result = extract_fundi(&mesh, &folds, &curvature, &depth, &golden_params()).unwrap();

    assert_eq!(result.fundus_count, 1);
    assert_eq!(result.fundus_vertex_count(), 36);
    assert_eq!(result.fundus_of(FOLD), (47..=82).collect::<Vec<_>>());

    let fold = &result.folds[0];
    assert_eq!(fold.fold_id, FOLD);
    assert_eq!(fold.vertex_count, 40);
    assert_eq!(fold.outer_anchors, vec![47, 82]);
    // The peak at i = 2 is an inner anchor that ends up dangling
    assert_eq!(fold.inner_anchors, vec![45]);
    assert!(!result.fundus_per_fold.is_assigned(45));
}

#[test]
fn serial_and_parallel_agree() {
    let (mesh, folds, curvature, depth) = trough();

    let serial = extract_fundi(
        &mesh,
        &folds,
        &curvature,
        &depth,
        &golden_params().parallel(false),
    )
    .unwrap();
    let parallel = extract_fundi(&mesh, &folds, &curvature, &depth, &golden_params()).unwrap();

    assert_eq!(serial, parallel);
}

#[test]
fn filter_schedules_agree_on_trough() {
    let (mesh, folds, curvature, depth) = trough();

    let after_all = extract_fundi(&mesh, &folds, &curvature, &depth, &golden_params()).unwrap();
    let per_fold = extract_fundi(
        &mesh,
        &folds,
        &curvature,
        &depth,
        &golden_params().face_filter(FaceFilterSchedule::PerFold),
    )
    .unwrap();

    assert_eq!(after_all.fundus_per_fold, per_fold.fundus_per_fold);
}

#[test]
fn all_background_yields_nothing() {
    let (mesh, _, curvature, depth) = trough();
    let folds = vec![BACKGROUND; mesh.vertex_count()];

    let result = extract_fundi(&mesh, &folds, &curvature, &depth, &golden_params()).unwrap();

    assert_eq!(result.fundus_count, 0);
    assert!(result.folds.is_empty());
    assert!(result.fundus_per_fold.assigned_vertices().is_empty());
}

#[test]
fn two_folds_keep_their_ids() {
    let (mesh, mut folds, curvature, depth) = trough();
    // Split the trough into two folds at i = 25
    for i in 25..40 {
        folds[COLS + 1 + i] = 12;
    }

    let result = extract_fundi(
        &mesh,
        &folds,
        &curvature,
        &depth,
        &golden_params().min_separation(3.0),
    )
    .unwrap();

    assert_eq!(result.folds.len(), 2);
    assert_eq!(result.folds[0].fold_id, FOLD);
    assert_eq!(result.folds[1].fold_id, 12);
    for v in result.fundus_per_fold.assigned_vertices() {
        assert_eq!(result.fundus_per_fold.get(v), Some(folds[v]));
    }
    assert_eq!(result.fundus_count, result.fundus_per_fold.label_count());
}

#[test]
fn flat_fold_with_dense_inner_anchors() {
    // Flat 40 x 40 grid: every above-threshold vertex lies in z = 0
    let mesh = grid(40, 40, |_, _| 0.0);
    let n = mesh.vertex_count();
    let folds: Vec<i32> = (0..n)
        .map(|v| if v % 40 == 0 { BACKGROUND } else { 1 })
        .collect();
    let curvature: Vec<f64> = (0..n).map(|v| if v % 10 < 3 { 3.0 } else { 2.0 }).collect();
    let depth = vec![1.0; n];

    let params = FundusParams::default().min_separation(1.5);
    let result = extract_fundi(&mesh, &folds, &curvature, &depth, &params).unwrap();

    assert_eq!(result.threshold, Some(2.0));
    assert_eq!(result.folds.len(), 1);
    // Columns 2, 10, 12, 20, 22, 30, 32 of every even row
    assert_eq!(result.folds[0].inner_anchors.len(), 140);
    assert!(result.fundus_count <= 1);
    for v in result.fundus_per_fold.assigned_vertices() {
        assert_eq!(folds[v], 1);
    }
}

// =============================================================================
// File wrappers
// =============================================================================

#[test]
fn files_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let (mesh, folds, curvature, depth) = trough();
    let curvature_path = dir.path().join("curvature.vtk");
    let depth_path = dir.path().join("depth.vtk");
    let folds_path = dir.path().join("folds.vtk");
    write_field(&mesh, "curvature", &curvature, &curvature_path);
    write_field(&mesh, "depth", &depth, &depth_path);
    write_field(&mesh, "folds", &labels_as_field(&folds), &folds_path);

    let fold_labels = read_vertex_labels(&folds_path, BACKGROUND).unwrap();
    assert_eq!(fold_labels.as_slice(), folds.as_slice());

    let out = dir.path().join("out");
    let files = extract_fundi_from_files(
        fold_labels.as_slice(),
        &curvature_path,
        &depth_path,
        &golden_params(),
        Some(out.as_path()),
    )
    .unwrap();

    let output_path = files.output_path.unwrap();
    assert!(output_path.is_file());
    assert_eq!(output_path, out.join("fundus_per_fold.vtk"));

    let written = read_vertex_labels(&output_path, BACKGROUND).unwrap();
    assert_eq!(written, files.extraction.fundus_per_fold);
}

#[test]
fn no_output_without_fundi() {
    let dir = tempfile::tempdir().unwrap();
    let (mesh, _, curvature, depth) = trough();
    let curvature_path = dir.path().join("curvature.ply");
    let depth_path = dir.path().join("depth.ply");
    write_field(&mesh, "curvature", &curvature, &curvature_path);
    write_field(&mesh, "depth", &depth, &depth_path);

    let folds = vec![BACKGROUND; mesh.vertex_count()];
    let out = dir.path().join("out");
    let files = extract_fundi_from_files(
        &folds,
        &curvature_path,
        &depth_path,
        &golden_params(),
        Some(out.as_path()),
    )
    .unwrap();

    assert_eq!(files.extraction.fundus_count, 0);
    assert!(files.output_path.is_none());
    assert!(!out.join("fundus_per_fold.ply").exists());
}

#[test]
fn missing_depth_file() {
    let dir = tempfile::tempdir().unwrap();
    let (mesh, folds, curvature, _) = trough();
    let curvature_path = dir.path().join("curvature.vtk");
    write_field(&mesh, "curvature", &curvature, &curvature_path);

    let result = extract_fundi_from_files(
        &folds,
        &curvature_path,
        dir.path().join("depth.vtk"),
        &golden_params(),
        None,
    );
    assert!(matches!(result, Err(FundiError::InputMissing { .. })));
}

#[test]
fn segmentation_file_uses_sulcus_geometry() {
    let dir = tempfile::tempdir().unwrap();
    let (mesh, folds, curvature, depth) = trough();
    let fundi = extract_fundi(&mesh, &folds, &curvature, &depth, &golden_params()).unwrap();

    // Two sulci split the trough at column 21
    let sulci: Vec<i32> = (0..mesh.vertex_count())
        .map(|v| if v % COLS < 21 { 100 } else { 200 })
        .collect();
    let sulcus_path = dir.path().join("sulci.ply");
    write_field(&mesh, "sulci", &labels_as_field(&sulci), &sulcus_path);

    let out = dir.path().join("out");
    let files = segment_fundi_to_file(&fundi.fundus_per_fold, &sulcus_path, Some(out.as_path())).unwrap();

    assert_eq!(files.segmentation.fundus_count, 2);
    let output_path = files.output_path.unwrap();
    assert_eq!(output_path, out.join("fundus_per_sulcus.ply"));

    let written = read_vertex_labels(&output_path, BACKGROUND).unwrap();
    assert_eq!(written, files.segmentation.fundus_per_sulcus);
}

// =============================================================================
// Segmentation laws
// =============================================================================

#[test]
fn segmentation_is_subset_and_idempotent() {
    let (mesh, folds, curvature, depth) = trough();
    let fundi = extract_fundi(&mesh, &folds, &curvature, &depth, &golden_params()).unwrap();
    let sulci: Vec<i32> = (0..mesh.vertex_count())
        .map(|v| if v % 5 == 0 { BACKGROUND } else { 3 })
        .collect();

    let first = segment_fundi(fundi.fundus_per_fold.as_slice(), Some(sulci.as_slice()), BACKGROUND).unwrap();
    let second = segment_fundi(fundi.fundus_per_fold.as_slice(), Some(sulci.as_slice()), BACKGROUND).unwrap();
    assert_eq!(first, second);

    for v in first.fundus_per_sulcus.assigned_vertices() {
        assert!(fundi.fundus_per_fold.is_assigned(v));
        assert_eq!(first.fundus_per_sulcus.get(v), Some(3));
    }
    assert_eq!(first.fundus_count, 1);
}
