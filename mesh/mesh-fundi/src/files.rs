//! File-level extraction and segmentation.
//!
//! These wrappers read surfaces and per-vertex arrays with [`mesh_io`], run
//! the in-memory operations and optionally write the resulting labels onto
//! the source geometry.

use std::path::{Path, PathBuf};

use mesh_io::{IoError, MeshFormat, ScalarMesh, read_scalar_mesh, rewrite_scalars};
use tracing::info;

use crate::error::{FundiError, FundiResult};
use crate::extract::extract_fundi;
use crate::labels::VertexLabels;
use crate::params::FundusParams;
use crate::result::{FundusExtraction, FundusSegmentation};
use crate::segment::segment_fundi;

/// File name stem of the fundus-per-fold output.
pub const FUNDUS_PER_FOLD_STEM: &str = "fundus_per_fold";
/// File name stem of the fundus-per-sulcus output.
pub const FUNDUS_PER_SULCUS_STEM: &str = "fundus_per_sulcus";

/// Result of [`extract_fundi_from_files`].
#[derive(Debug, Clone)]
pub struct FundusFiles {
    /// The in-memory extraction.
    pub extraction: FundusExtraction,
    /// Written file, present only when fundi were found and output was
    /// requested.
    pub output_path: Option<PathBuf>,
}

/// Result of [`segment_fundi_to_file`].
#[derive(Debug, Clone)]
pub struct SegmentationFiles {
    /// The in-memory segmentation.
    pub segmentation: FundusSegmentation,
    /// Written file, present only when fundi were found and output was
    /// requested.
    pub output_path: Option<PathBuf>,
}

fn require_input(path: &Path) -> FundiResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(FundiError::InputMissing {
            path: path.to_path_buf(),
        })
    }
}

fn read_with_scalars(path: &Path) -> FundiResult<(ScalarMesh, Vec<f64>)> {
    let mut surface = read_scalar_mesh(path)?;
    if surface.scalars.is_empty() {
        return Err(FundiError::MissingScalars {
            path: path.to_path_buf(),
        });
    }
    let values = surface.scalars.remove(0).values;
    Ok((surface, values))
}

/// Read the first scalar array of a surface file as vertex labels.
///
/// Values are rounded; non-finite values become `background`.
///
/// # Errors
///
/// Returns [`FundiError::InputMissing`] if the file does not exist,
/// [`FundiError::MissingScalars`] if it has no scalar array, or an I/O error
/// if it cannot be parsed.
pub fn read_vertex_labels<P: AsRef<Path>>(path: P, background: i32) -> FundiResult<VertexLabels> {
    let path = path.as_ref();
    require_input(path)?;
    let surface = read_scalar_mesh(path)?;
    let field = surface
        .first_scalars()
        .ok_or_else(|| FundiError::MissingScalars {
            path: path.to_path_buf(),
        })?;
    Ok(VertexLabels::from_vec(field.to_labels(background), background))
}

/// Write labels onto the geometry of `reference` as `<stem>.<ext>` in
/// `output_dir`, where the extension follows the reference format.
fn write_labels(
    reference: &Path,
    output_dir: &Path,
    stem: &str,
    labels: &VertexLabels,
    label_name: &str,
) -> FundiResult<PathBuf> {
    let format = MeshFormat::from_path(reference).unwrap_or(MeshFormat::Vtk);
    let path = output_dir.join(format!("{stem}.{}", format.extension()));

    std::fs::create_dir_all(output_dir).map_err(IoError::from)?;
    rewrite_scalars(
        reference,
        &path,
        labels.as_slice(),
        label_name,
        labels.background(),
    )?;

    let path = verify_output(path)?;
    info!(path = %path.display(), label = label_name, "Wrote labels");
    Ok(path)
}

/// Confirm a written artifact exists as a regular file.
fn verify_output(path: PathBuf) -> FundiResult<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(FundiError::OutputMissing { path })
    }
}

/// Extract fundi from curvature and depth files.
///
/// The curvature file supplies the geometry; each file's first scalar array
/// supplies the field. When `output_dir` is given and at least one fundus is
/// found, the labels are written as `fundus_per_fold.<ext>` with scalar name
/// `fundi` on the curvature geometry.
///
/// # Errors
///
/// Returns an error if:
/// - A source file is missing ([`FundiError::InputMissing`])
/// - A source file has no scalar array or cannot be parsed
/// - Extraction fails (see [`extract_fundi`])
/// - The output file cannot be written or is missing afterwards
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use mesh_fundi::{FundusParams, extract_fundi_from_files, read_vertex_labels};
///
/// let folds = read_vertex_labels("folds.vtk", -1).unwrap();
/// let files = extract_fundi_from_files(
///     folds.as_slice(),
///     "mean_curvature.vtk",
///     "travel_depth.vtk",
///     &FundusParams::default(),
///     Some(Path::new("out")),
/// )
/// .unwrap();
/// println!("{}", files.extraction);
/// ```
pub fn extract_fundi_from_files<P: AsRef<Path>, Q: AsRef<Path>>(
    fold_labels: &[i32],
    curvature_path: P,
    depth_path: Q,
    params: &FundusParams,
    output_dir: Option<&Path>,
) -> FundiResult<FundusFiles> {
    let curvature_path = curvature_path.as_ref();
    let depth_path = depth_path.as_ref();
    require_input(curvature_path)?;
    require_input(depth_path)?;

    let (surface, curvature) = read_with_scalars(curvature_path)?;
    let (_, depth) = read_with_scalars(depth_path)?;

    let extraction = extract_fundi(&surface.mesh, fold_labels, &curvature, &depth, params)?;

    let output_path = match output_dir {
        Some(dir) if extraction.fundus_count > 0 => Some(write_labels(
            curvature_path,
            dir,
            FUNDUS_PER_FOLD_STEM,
            &extraction.fundus_per_fold,
            "fundi",
        )?),
        _ => None,
    };

    Ok(FundusFiles {
        extraction,
        output_path,
    })
}

/// Segment fundi by the sulcus labels stored in a surface file.
///
/// The sulcus labels are the first scalar array of `sulcus_path`, read with
/// the fundus labels' background. When `output_dir` is given and at least
/// one fundus remains, the result is written as `fundus_per_sulcus.<ext>`
/// with scalar name `fundus_per_sulcus` on the sulcus geometry.
///
/// # Errors
///
/// Returns an error if the sulcus file is missing, has no scalar array or
/// cannot be parsed, if segmentation fails, or if the output cannot be
/// written or is missing afterwards.
pub fn segment_fundi_to_file<P: AsRef<Path>>(
    fundus_per_fold: &VertexLabels,
    sulcus_path: P,
    output_dir: Option<&Path>,
) -> FundiResult<SegmentationFiles> {
    let sulcus_path = sulcus_path.as_ref();
    let background = fundus_per_fold.background();
    let sulci = read_vertex_labels(sulcus_path, background)?;

    let segmentation = segment_fundi(
        fundus_per_fold.as_slice(),
        Some(sulci.as_slice()),
        background,
    )?;

    let output_path = match output_dir {
        Some(dir) if segmentation.fundus_count > 0 => Some(write_labels(
            sulcus_path,
            dir,
            FUNDUS_PER_SULCUS_STEM,
            &segmentation.fundus_per_sulcus,
            "fundus_per_sulcus",
        )?),
        _ => None,
    };

    Ok(SegmentationFiles {
        segmentation,
        output_path,
    })
}
