//! End-to-end tests for the `fundi` binary.

#![allow(clippy::unwrap_used)]
#![allow(clippy::cast_precision_loss)]

use std::path::Path;
use std::process::Command;

use mesh_io::save_vtk;
use mesh_types::{IndexedMesh, ScalarField, grid};

const COLS: usize = 12;

/// One fold along the middle row of a 3 x 12 grid, written as three VTK
/// files.
fn write_surface(dir: &Path) -> IndexedMesh {
    let mesh = grid(3, COLS, |_, _| 0.0);
    let n = mesh.vertex_count();
    let mut folds = vec![-1.0; n];
    let mut curvature = vec![0.0; n];
    let mut depth = vec![0.0; n];
    for col in 1..COLS - 1 {
        let v = COLS + col;
        let from_center = (col as f64 - 5.5).abs();
        folds[v] = 0.0;
        depth[v] = from_center + 1.0;
        curvature[v] = (10.0 - from_center) / depth[v];
    }

    save_vtk(&mesh, &[ScalarField::new("folds", folds)], dir.join("folds.vtk")).unwrap();
    save_vtk(
        &mesh,
        &[ScalarField::new("curvature", curvature)],
        dir.join("curvature.vtk"),
    )
    .unwrap();
    save_vtk(&mesh, &[ScalarField::new("depth", depth)], dir.join("depth.vtk")).unwrap();
    mesh
}

fn fundi() -> Command {
    Command::new(env!("CARGO_BIN_EXE_fundi"))
}

#[test]
fn extract_then_segment() {
    let dir = tempfile::tempdir().unwrap();
    let mesh = write_surface(dir.path());
    let out = dir.path().join("out");

    let status = fundi()
        .arg("extract")
        .arg("--folds")
        .arg(dir.path().join("folds.vtk"))
        .arg("--curvature")
        .arg(dir.path().join("curvature.vtk"))
        .arg("--depth")
        .arg(dir.path().join("depth.vtk"))
        .arg("--min-separation")
        .arg("5")
        .arg("--out-dir")
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());
    let fundus_path = out.join("fundus_per_fold.vtk");
    assert!(fundus_path.is_file());

    let sulci = vec![8.0; mesh.vertex_count()];
    let sulcus_path = dir.path().join("sulci.vtk");
    save_vtk(&mesh, &[ScalarField::new("sulci", sulci)], &sulcus_path).unwrap();

    let output = fundi()
        .arg("segment")
        .arg("--fundi")
        .arg(&fundus_path)
        .arg("--sulci")
        .arg(&sulcus_path)
        .arg("--out-dir")
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(out.join("fundus_per_sulcus.vtk").is_file());
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();

    let output = fundi()
        .arg("extract")
        .arg("--folds")
        .arg(dir.path().join("folds.vtk"))
        .arg("--curvature")
        .arg(dir.path().join("curvature.vtk"))
        .arg("--depth")
        .arg(dir.path().join("depth.vtk"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("fold labels"));
}
