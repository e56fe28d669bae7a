//! Named per-vertex scalar arrays.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named scalar value per mesh vertex.
///
/// Curvature, depth, fold numbers and sulcus numbers all arrive as scalar
/// arrays attached to a mesh file. Values are stored as `f64`; integer
/// label arrays convert through [`ScalarField::to_labels`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScalarField {
    /// Array name as stored in the source file.
    pub name: String,
    /// One value per vertex.
    pub values: Vec<f64>,
}

impl ScalarField {
    /// Create a named scalar array.
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Build a scalar array from integer labels.
    #[must_use]
    pub fn from_labels(name: impl Into<String>, labels: &[i32]) -> Self {
        Self::new(name, labels.iter().map(|&l| f64::from(l)).collect())
    }

    /// Number of values.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the array holds no values.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Round every value to the nearest integer label.
    ///
    /// Non-finite values map to `background`.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::ScalarField;
    ///
    /// let folds = ScalarField::new("folds", vec![-1.0, 2.0, 2.9999, f64::NAN]);
    /// assert_eq!(folds.to_labels(-1), vec![-1, 2, 3, -1]);
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_labels(&self, background: i32) -> Vec<i32> {
        self.values
            .iter()
            .map(|&v| if v.is_finite() { v.round() as i32 } else { background })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        let field = ScalarField::from_labels("fundi", &[-1, 0, 7]);
        assert_eq!(field.len(), 3);
        assert_eq!(field.to_labels(-1), vec![-1, 0, 7]);
    }

    #[test]
    fn empty_field() {
        let field = ScalarField::new("depth", Vec::new());
        assert!(field.is_empty());
        assert!(field.to_labels(-1).is_empty());
    }
}
