//! Anchor vertices that a fundus skeleton must pass through.
//!
//! Outer anchors mark where a fundus meets the fold boundary; inner anchors
//! are well-separated high points of the value field.

mod inner;
mod outer;

pub use inner::{InnerAnchorFinder, ThresholdedMaxima};
pub use outer::{BoundaryTrackEndpoints, OuterAnchorFinder};

/// Value at `vertex`, NaN past the end of the array.
#[inline]
pub(crate) fn sample(values: &[f64], vertex: usize) -> f64 {
    values.get(vertex).copied().unwrap_or(f64::NAN)
}
