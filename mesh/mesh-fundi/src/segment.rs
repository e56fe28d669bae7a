//! Relabeling fundi by sulcus.

use tracing::debug;

use crate::error::{FundiError, FundiResult};
use crate::labels::VertexLabels;
use crate::result::FundusSegmentation;

/// Relabel fundus vertices with the sulcus they lie in.
///
/// Every vertex of `fundus_per_fold` that is not `background` takes its
/// label from `sulci`; all other vertices are background. The fundus vertex
/// set is unchanged, only its labels are swapped. Without a sulcus labeling,
/// or without any fundus vertex, the output is empty and the count is zero.
///
/// # Errors
///
/// Returns [`FundiError::LengthMismatch`] if a fundus vertex lies past the
/// end of `sulci`.
///
/// # Example
///
/// ```
/// use mesh_fundi::segment_fundi;
///
/// let fundi = [-1, 4, 4, -1, 9];
/// let sulci = [1, 2, 3, 3, -1];
///
/// let result = segment_fundi(&fundi, Some(&sulci[..]), -1).unwrap();
/// assert_eq!(result.fundus_per_sulcus.as_slice(), &[-1, 2, 3, -1, -1]);
/// assert_eq!(result.fundus_count, 2);
/// ```
pub fn segment_fundi(
    fundus_per_fold: &[i32],
    sulci: Option<&[i32]>,
    background: i32,
) -> FundiResult<FundusSegmentation> {
    let fundus: Vec<usize> = fundus_per_fold
        .iter()
        .enumerate()
        .filter(|&(_, &l)| l != background)
        .map(|(v, _)| v)
        .collect();

    let sulci = match sulci {
        Some(sulci) if !sulci.is_empty() && !fundus.is_empty() => sulci,
        _ => {
            debug!(fundus_vertices = fundus.len(), "Nothing to segment");
            return Ok(FundusSegmentation {
                fundus_per_sulcus: VertexLabels::new(0, background),
                fundus_count: 0,
            });
        }
    };

    let mut fundus_per_sulcus = VertexLabels::new(sulci.len(), background);
    for v in fundus {
        let label = *sulci.get(v).ok_or(FundiError::length_mismatch(
            "sulcus labels",
            fundus_per_fold.len(),
            sulci.len(),
        ))?;
        fundus_per_sulcus.set(v, label)?;
    }
    let fundus_count = fundus_per_sulcus.label_count();

    debug!(fundi = fundus_count, "Segmented fundi by sulcus");

    Ok(FundusSegmentation {
        fundus_per_sulcus,
        fundus_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_sulci_gives_empty() {
        let result = segment_fundi(&[1, 1, -1], None, -1);
        assert!(result.is_ok());
        if let Ok(result) = result {
            assert!(result.fundus_per_sulcus.is_empty());
            assert_eq!(result.fundus_count, 0);
        }
    }

    #[test]
    fn no_fundi_gives_empty() {
        let result = segment_fundi(&[-1, -1], Some(&[3, 3][..]), -1);
        assert!(result.is_ok());
        if let Ok(result) = result {
            assert!(result.fundus_per_sulcus.is_empty());
            assert_eq!(result.fundus_count, 0);
        }
    }

    #[test]
    fn short_sulci_rejected() {
        let result = segment_fundi(&[-1, -1, 2], Some(&[1, 1][..]), -1);
        assert!(matches!(
            result,
            Err(FundiError::LengthMismatch {
                what: "sulcus labels",
                ..
            })
        ));
    }

    #[test]
    fn custom_background() {
        let result = segment_fundi(&[0, 5, 5], Some(&[7, 8, 0][..]), 0);
        assert!(result.is_ok());
        if let Ok(result) = result {
            assert_eq!(result.fundus_per_sulcus.as_slice(), &[0, 8, 0]);
            assert_eq!(result.fundus_count, 1);
        }
    }

    #[test]
    fn idempotent() {
        let fundi = [2, -1, 2, 3];
        let sulci = [5, 5, 6, 6];
        let a = segment_fundi(&fundi, Some(&sulci[..]), -1).ok();
        let b = segment_fundi(&fundi, Some(&sulci[..]), -1).ok();
        assert!(a.is_some());
        assert_eq!(a, b);
    }
}
