//! Result types for fundus extraction and segmentation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::labels::VertexLabels;

/// Per-fold record of an extraction run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FoldFundus {
    /// Fold label.
    pub fold_id: i32,
    /// Number of vertices in the fold.
    pub vertex_count: usize,
    /// Outer anchors found in the fold.
    pub outer_anchors: Vec<usize>,
    /// Inner anchors that fell inside the fold.
    pub inner_anchors: Vec<usize>,
    /// Connected skeleton before face filtering.
    pub skeleton: Vec<usize>,
}

/// Result of fundus extraction.
///
/// # Example
///
/// ```
/// use mesh_fundi::FundusExtraction;
///
/// let result = FundusExtraction::empty(4, -1);
/// assert!(!result.has_fundi());
/// assert_eq!(result.fundus_per_fold.as_slice(), &[-1, -1, -1, -1]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FundusExtraction {
    /// Fold id on fundus vertices, background elsewhere.
    pub fundus_per_fold: VertexLabels,
    /// Number of folds that kept at least one fundus vertex.
    pub fundus_count: usize,
    /// Inner-anchor threshold, `None` when there were no folds.
    pub threshold: Option<f64>,
    /// Per-fold records in ascending fold order.
    pub folds: Vec<FoldFundus>,
}

impl FundusExtraction {
    /// A result with no fundi.
    #[must_use]
    pub fn empty(vertex_count: usize, background: i32) -> Self {
        Self {
            fundus_per_fold: VertexLabels::new(vertex_count, background),
            fundus_count: 0,
            threshold: None,
            folds: Vec::new(),
        }
    }

    /// Check if any fundus was found.
    #[must_use]
    pub const fn has_fundi(&self) -> bool {
        self.fundus_count > 0
    }

    /// Total number of fundus vertices.
    #[must_use]
    pub fn fundus_vertex_count(&self) -> usize {
        self.fundus_per_fold.assigned_vertices().len()
    }

    /// Fundus vertices of one fold, ascending.
    #[must_use]
    pub fn fundus_of(&self, fold_id: i32) -> Vec<usize> {
        if fold_id == self.fundus_per_fold.background() {
            return Vec::new();
        }
        self.fundus_per_fold.vertices_with_label(fold_id)
    }
}

impl std::fmt::Display for FundusExtraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Fundus Extraction:")?;
        writeln!(f, "  Vertices: {}", self.fundus_per_fold.len())?;
        writeln!(f, "  Folds: {}", self.folds.len())?;
        match self.threshold {
            Some(t) => writeln!(f, "  Threshold: {t:.4}")?,
            None => writeln!(f, "  Threshold: n/a")?,
        }
        writeln!(f, "  Fundi: {}", self.fundus_count)?;
        writeln!(f, "  Fundus vertices: {}", self.fundus_vertex_count())?;
        Ok(())
    }
}

/// Result of fundus segmentation by sulcus.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FundusSegmentation {
    /// Sulcus id on fundus vertices inside a sulcus, background elsewhere.
    pub fundus_per_sulcus: VertexLabels,
    /// Number of distinct sulcus ids carried by fundus vertices.
    pub fundus_count: usize,
}

impl std::fmt::Display for FundusSegmentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Fundus Segmentation:")?;
        writeln!(f, "  Vertices: {}", self.fundus_per_sulcus.len())?;
        writeln!(f, "  Fundi: {}", self.fundus_count)?;
        writeln!(
            f,
            "  Fundus vertices: {}",
            self.fundus_per_sulcus.assigned_vertices().len()
        )?;
        Ok(())
    }
}
