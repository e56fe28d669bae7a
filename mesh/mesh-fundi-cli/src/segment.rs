//! `fundi segment`

use anyhow::{Context, Result};
use mesh_fundi::{read_vertex_labels, segment_fundi_to_file};
use tracing::{info, warn};

use crate::SegmentArgs;

/// Relabel fundi by sulcus and report the result.
pub fn run(args: &SegmentArgs) -> Result<()> {
    let fundi = read_vertex_labels(&args.fundi, args.background)
        .with_context(|| format!("Failed to read fundus labels from {}", args.fundi.display()))?;
    info!(
        path = %args.fundi.display(),
        fundi = fundi.label_count(),
        "Read fundus labels"
    );

    let files = segment_fundi_to_file(&fundi, &args.sulci, args.out_dir.as_deref())
        .with_context(|| format!("Failed to segment by {}", args.sulci.display()))?;

    println!("{}", files.segmentation);
    match (&files.output_path, &args.out_dir) {
        (Some(path), _) => println!("Wrote {}", path.display()),
        (None, Some(_)) => warn!("No fundi in any sulcus, nothing written"),
        (None, None) => {}
    }
    Ok(())
}
