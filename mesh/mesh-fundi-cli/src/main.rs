//! Fundus extraction from the command line.
//!
//! # Commands
//!
//! - `fundi extract` - Extract fundi from fold, curvature and depth files
//! - `fundi segment` - Relabel extracted fundi by sulcus
//!
//! Logging goes to stderr through `tracing`. `RUST_LOG` takes precedence
//! over `-v`.

mod extract;
mod segment;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Fundus curve extraction on folded surfaces
#[derive(Parser)]
#[command(name = "fundi")]
#[command(about = "Extract and segment fundus curves on surface meshes", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one fundus per fold
    Extract(ExtractArgs),

    /// Relabel fundus vertices by sulcus
    Segment(SegmentArgs),
}

/// Arguments for `fundi extract`.
#[derive(Args)]
pub struct ExtractArgs {
    /// Surface file whose first scalar array holds fold labels
    #[arg(long)]
    pub folds: PathBuf,

    /// Surface file whose first scalar array holds curvature
    #[arg(long)]
    pub curvature: PathBuf,

    /// Surface file whose first scalar array holds depth
    #[arg(long)]
    pub depth: PathBuf,

    /// Directory for `fundus_per_fold.<ext>`; nothing is written without it
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Minimum distance between anchors
    #[arg(long, default_value_t = 10.0)]
    pub min_separation: f64,

    /// Fraction of border vertices tested per erosion round
    #[arg(long, default_value_t = 0.1)]
    pub erode_ratio: f64,

    /// Minimum number of border vertices tested per erosion round
    #[arg(long, default_value_t = 1)]
    pub erode_min_size: usize,

    /// Label of vertices outside any fold
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub background: i32,

    /// Re-run the face filter after every fold instead of once
    #[arg(long)]
    pub per_fold_filter: bool,

    /// Process folds on one thread
    #[arg(long)]
    pub serial: bool,
}

/// Arguments for `fundi segment`.
#[derive(Args)]
pub struct SegmentArgs {
    /// Surface file whose first scalar array holds fundus-per-fold labels
    #[arg(long)]
    pub fundi: PathBuf,

    /// Surface file whose first scalar array holds sulcus labels
    #[arg(long)]
    pub sulci: PathBuf,

    /// Directory for `fundus_per_sulcus.<ext>`; nothing is written without it
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Label of vertices outside any fundus or sulcus
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub background: i32,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Extract(args) => extract::run(&args),
        Commands::Segment(args) => segment::run(&args),
    }
}
