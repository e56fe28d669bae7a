//! Parameters for fundus extraction.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{FundiError, FundiResult};
use crate::labels::BACKGROUND;

/// When the face-completion filter runs over the merged skeleton.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FaceFilterSchedule {
    /// Filter the concatenated skeleton of all folds once.
    #[default]
    AfterAllFolds,
    /// Filter the growing skeleton after each fold is appended, in
    /// ascending fold order.
    PerFold,
}

/// Parameters for fundus extraction.
///
/// # Example
///
/// ```
/// use mesh_fundi::{FaceFilterSchedule, FundusParams};
///
/// let params = FundusParams::default();
/// assert!((params.min_separation - 10.0).abs() < 1e-10);
/// assert_eq!(params.erode_min_size, 1);
/// assert_eq!(params.background, -1);
///
/// let serial = FundusParams::default()
///     .erode_min_size(10)
///     .face_filter(FaceFilterSchedule::PerFold)
///     .parallel(false);
/// assert!(serial.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FundusParams {
    /// Minimum distance between anchors of the same kind.
    ///
    /// Outer anchors are compared by hops inside the fold, inner anchors by
    /// Euclidean distance in mesh units.
    pub min_separation: f64,

    /// Fraction of border candidates tested per erosion round, in `(0, 1]`.
    pub erode_ratio: f64,

    /// Minimum number of border candidates tested per erosion round.
    pub erode_min_size: usize,

    /// Label for vertices outside any fold or fundus.
    pub background: i32,

    /// When to run the face-completion filter.
    pub face_filter: FaceFilterSchedule,

    /// Process folds on the rayon thread pool.
    pub parallel: bool,
}

impl Default for FundusParams {
    fn default() -> Self {
        Self {
            min_separation: 10.0,
            erode_ratio: 0.1,
            erode_min_size: 1,
            background: BACKGROUND,
            face_filter: FaceFilterSchedule::AfterAllFolds,
            parallel: true,
        }
    }
}

impl FundusParams {
    /// Set the minimum anchor separation.
    #[must_use]
    pub const fn min_separation(mut self, distance: f64) -> Self {
        self.min_separation = distance;
        self
    }

    /// Set the erosion ratio.
    #[must_use]
    pub const fn erode_ratio(mut self, ratio: f64) -> Self {
        self.erode_ratio = ratio;
        self
    }

    /// Set the minimum erosion batch size.
    #[must_use]
    pub const fn erode_min_size(mut self, size: usize) -> Self {
        self.erode_min_size = size;
        self
    }

    /// Set the background label.
    #[must_use]
    pub const fn background(mut self, label: i32) -> Self {
        self.background = label;
        self
    }

    /// Set the face-filter schedule.
    #[must_use]
    pub const fn face_filter(mut self, schedule: FaceFilterSchedule) -> Self {
        self.face_filter = schedule;
        self
    }

    /// Enable or disable per-fold parallelism.
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check that the parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns [`FundiError::InvalidParams`] if `min_separation` is negative
    /// or not finite, or `erode_ratio` is outside `(0, 1]`.
    pub fn validate(&self) -> FundiResult<()> {
        if !self.min_separation.is_finite() || self.min_separation < 0.0 {
            return Err(FundiError::invalid_params(format!(
                "min_separation must be finite and non-negative, got {}",
                self.min_separation
            )));
        }
        if !(self.erode_ratio > 0.0 && self.erode_ratio <= 1.0) {
            return Err(FundiError::invalid_params(format!(
                "erode_ratio must be in (0, 1], got {}",
                self.erode_ratio
            )));
        }
        Ok(())
    }
}

/// Parameters for [`BoundaryTrackEndpoints`](crate::BoundaryTrackEndpoints).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OuterAnchorParams {
    /// Border vertices at or above this quantile of border depth seed tracks.
    pub seed_depth_quantile: f64,

    /// Upper bound on the length of a steepest-ascent track.
    pub max_track_hops: usize,
}

impl Default for OuterAnchorParams {
    fn default() -> Self {
        Self {
            seed_depth_quantile: 0.5,
            max_track_hops: 10_000,
        }
    }
}

impl OuterAnchorParams {
    /// Set the seed depth quantile.
    #[must_use]
    pub const fn seed_depth_quantile(mut self, quantile: f64) -> Self {
        self.seed_depth_quantile = quantile;
        self
    }

    /// Set the maximum track length.
    #[must_use]
    pub const fn max_track_hops(mut self, hops: usize) -> Self {
        self.max_track_hops = hops;
        self
    }

    /// Check that the parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns [`FundiError::InvalidParams`] if the quantile is outside
    /// `[0, 1]`.
    pub fn validate(&self) -> FundiResult<()> {
        if !(0.0..=1.0).contains(&self.seed_depth_quantile) {
            return Err(FundiError::invalid_params(format!(
                "seed_depth_quantile must be in [0, 1], got {}",
                self.seed_depth_quantile
            )));
        }
        Ok(())
    }
}

/// Parameters for [`ErosionConnector`](crate::ErosionConnector).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ErosionParams {
    /// Release inner anchors left as skeleton endpoints and erode again.
    pub prune_endpoint_anchors: bool,
}

impl Default for ErosionParams {
    fn default() -> Self {
        Self {
            prune_endpoint_anchors: true,
        }
    }
}

impl ErosionParams {
    /// Enable or disable endpoint pruning.
    #[must_use]
    pub const fn prune_endpoint_anchors(mut self, prune: bool) -> Self {
        self.prune_endpoint_anchors = prune;
        self
    }
}
