//! Robust statistics for the anchor threshold.
//!
//! The threshold separating inner-anchor candidates from the rest of the
//! surface is `median + 2 * MAD` over the strictly positive values of the
//! curvature-times-depth field.

use crate::error::{FundiError, FundiResult};

/// Non-NaN values sorted ascending.
fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    out.sort_by(f64::total_cmp);
    out
}

/// Linear-interpolated quantile of pre-sorted values.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    // Truncation: pos is within [0, len - 1]
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

/// Quantile with linear interpolation between order statistics.
///
/// `q` is clamped to `[0, 1]`. NaNs are ignored. Returns `None` when no
/// values remain.
///
/// # Example
///
/// ```
/// use mesh_fundi::quantile;
///
/// assert_eq!(quantile(&[4.0, 1.0, 3.0, 2.0], 0.5), Some(2.5));
/// assert_eq!(quantile(&[4.0, 1.0, 3.0, 2.0], 1.0), Some(4.0));
/// ```
#[must_use]
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    quantile_sorted(&sorted(values), q)
}

/// Median, averaging the two middle values for even counts.
///
/// NaNs are ignored. Returns `None` when no values remain.
///
/// # Example
///
/// ```
/// use mesh_fundi::median;
///
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&[1.0, 2.0, 3.0, 10.0]), Some(2.5));
/// assert_eq!(median(&[]), None);
/// ```
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Median absolute deviation from the median, unscaled.
///
/// # Example
///
/// ```
/// use mesh_fundi::median_abs_dev;
///
/// // Median 2, deviations [1, 1, 0, 0, 7] -> median 1
/// assert_eq!(median_abs_dev(&[1.0, 1.0, 2.0, 2.0, 9.0]), Some(1.0));
/// ```
#[must_use]
pub fn median_abs_dev(values: &[f64]) -> Option<f64> {
    let center = median(values)?;
    let deviations: Vec<f64> = values
        .iter()
        .filter(|v| !v.is_nan())
        .map(|v| (v - center).abs())
        .collect();
    median(&deviations)
}

/// Threshold for inner anchors: `median + 2 * MAD` of the strictly positive
/// values.
///
/// # Errors
///
/// Returns [`FundiError::NoPositiveValues`] if no value is greater than zero.
///
/// # Example
///
/// ```
/// use mesh_fundi::robust_threshold;
///
/// // Positive subset [1, 2, 3, 4, 100]: median 3, MAD 1
/// let t = robust_threshold(&[-5.0, 0.0, 1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
/// assert!((t - 5.0).abs() < 1e-12);
/// ```
pub fn robust_threshold(values: &[f64]) -> FundiResult<f64> {
    let positive: Vec<f64> = values.iter().copied().filter(|&v| v > 0.0).collect();
    let center = median(&positive).ok_or(FundiError::NoPositiveValues)?;
    let spread = median_abs_dev(&positive).ok_or(FundiError::NoPositiveValues)?;
    Ok(center + 2.0 * spread)
}
