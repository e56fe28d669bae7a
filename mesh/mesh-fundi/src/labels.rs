//! Per-vertex label arrays.
//!
//! A label array assigns each mesh vertex an integer id, with one reserved
//! background value for unlabeled vertices.

use hashbrown::{HashMap, HashSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{FundiError, FundiResult};

/// Default background label for vertices outside any fold, fundus or sulcus.
pub const BACKGROUND: i32 = -1;

/// A fixed-length array of vertex labels with its background value.
///
/// # Example
///
/// ```
/// use mesh_fundi::{BACKGROUND, VertexLabels};
///
/// let mut labels = VertexLabels::new(6, BACKGROUND);
/// labels.assign_many(&[1, 2], 4).unwrap();
/// labels.set(5, 7).unwrap();
///
/// assert_eq!(labels.label_ids(), vec![4, 7]);
/// assert_eq!(labels.assigned_vertices(), vec![1, 2, 5]);
/// assert_eq!(labels.as_slice(), &[-1, 4, 4, -1, -1, 7]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexLabels {
    labels: Vec<i32>,
    background: i32,
}

impl VertexLabels {
    /// Create a label array with every vertex set to `background`.
    #[must_use]
    pub fn new(vertex_count: usize, background: i32) -> Self {
        Self {
            labels: vec![background; vertex_count],
            background,
        }
    }

    /// Wrap an existing label vector.
    #[must_use]
    pub const fn from_vec(labels: Vec<i32>, background: i32) -> Self {
        Self { labels, background }
    }

    /// The background label.
    #[inline]
    #[must_use]
    pub const fn background(&self) -> i32 {
        self.background
    }

    /// Number of vertices covered.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if the array covers no vertices.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Get the label of a vertex.
    ///
    /// Returns `None` if the index is out of bounds.
    #[must_use]
    pub fn get(&self, vertex: usize) -> Option<i32> {
        self.labels.get(vertex).copied()
    }

    /// Set the label of a vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex index is out of bounds.
    pub fn set(&mut self, vertex: usize, label: i32) -> FundiResult<()> {
        let vertex_count = self.labels.len();
        let slot = self
            .labels
            .get_mut(vertex)
            .ok_or(FundiError::VertexOutOfBounds {
                vertex,
                vertex_count,
            })?;
        *slot = label;
        Ok(())
    }

    /// Assign one label to many vertices.
    ///
    /// # Errors
    ///
    /// Returns an error if any vertex index is out of bounds. Vertices
    /// before the offending one keep their new label.
    pub fn assign_many(&mut self, vertices: &[usize], label: i32) -> FundiResult<()> {
        for &v in vertices {
            self.set(v, label)?;
        }
        Ok(())
    }

    /// Check if a vertex carries a non-background label.
    #[must_use]
    pub fn is_assigned(&self, vertex: usize) -> bool {
        self.labels.get(vertex).is_some_and(|&l| l != self.background)
    }

    /// Distinct non-background labels, ascending.
    #[must_use]
    pub fn label_ids(&self) -> Vec<i32> {
        let unique: HashSet<i32> = self
            .labels
            .iter()
            .filter(|&&l| l != self.background)
            .copied()
            .collect();
        let mut ids: Vec<i32> = unique.into_iter().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of distinct non-background labels.
    #[must_use]
    pub fn label_count(&self) -> usize {
        self.labels
            .iter()
            .filter(|&&l| l != self.background)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Vertices with a non-background label, ascending.
    #[must_use]
    pub fn assigned_vertices(&self) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l != self.background)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Vertices carrying a specific label, ascending.
    #[must_use]
    pub fn vertices_with_label(&self, label: i32) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l == label)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Number of vertices per non-background label.
    #[must_use]
    pub fn label_sizes(&self) -> HashMap<i32, usize> {
        let mut sizes = HashMap::new();
        for &label in &self.labels {
            if label != self.background {
                *sizes.entry(label).or_insert(0) += 1;
            }
        }
        sizes
    }

    /// Labels as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[i32] {
        &self.labels
    }

    /// Consume the array, returning the raw labels.
    #[must_use]
    pub fn into_vec(self) -> Vec<i32> {
        self.labels
    }
}
