//! `fundi extract`

use anyhow::{Context, Result};
use mesh_fundi::{FaceFilterSchedule, FundusParams, extract_fundi_from_files, read_vertex_labels};
use tracing::{info, warn};

use crate::ExtractArgs;

fn params(args: &ExtractArgs) -> FundusParams {
    let schedule = if args.per_fold_filter {
        FaceFilterSchedule::PerFold
    } else {
        FaceFilterSchedule::AfterAllFolds
    };
    FundusParams::default()
        .min_separation(args.min_separation)
        .erode_ratio(args.erode_ratio)
        .erode_min_size(args.erode_min_size)
        .background(args.background)
        .face_filter(schedule)
        .parallel(!args.serial)
}

/// Run the extraction and report what was found.
pub fn run(args: &ExtractArgs) -> Result<()> {
    let params = params(args);
    params.validate().context("Invalid extraction parameters")?;

    let folds = read_vertex_labels(&args.folds, args.background)
        .with_context(|| format!("Failed to read fold labels from {}", args.folds.display()))?;
    info!(
        path = %args.folds.display(),
        folds = folds.label_count(),
        "Read fold labels"
    );

    let files = extract_fundi_from_files(
        folds.as_slice(),
        &args.curvature,
        &args.depth,
        &params,
        args.out_dir.as_deref(),
    )
    .context("Fundus extraction failed")?;

    println!("{}", files.extraction);
    match (&files.output_path, &args.out_dir) {
        (Some(path), _) => println!("Wrote {}", path.display()),
        (None, Some(_)) => warn!("No fundi found, nothing written"),
        (None, None) => {}
    }
    Ok(())
}
