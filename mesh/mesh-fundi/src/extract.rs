//! Per-fold fundus extraction.

use hashbrown::{HashMap, HashSet};
use mesh_graph::NeighborLists;
use mesh_types::IndexedMesh;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::anchors::{
    BoundaryTrackEndpoints, InnerAnchorFinder, OuterAnchorFinder, ThresholdedMaxima,
};
use crate::connect::{ErosionConnector, SkeletonConnector};
use crate::error::{FundiError, FundiResult};
use crate::filter::{CompleteFaceFilter, FaceCompletionFilter};
use crate::labels::VertexLabels;
use crate::params::{FaceFilterSchedule, FundusParams};
use crate::result::{FoldFundus, FundusExtraction};
use crate::threshold::robust_threshold;

/// Fold orchestrator, generic over its anchor finders, skeleton connector
/// and face filter.
///
/// # Example
///
/// ```
/// use mesh_fundi::{ErosionConnector, ErosionParams, FundusExtractor};
///
/// let extractor = <FundusExtractor>::default()
///     .with_connector(ErosionConnector::new(
///         ErosionParams::default().prune_endpoint_anchors(false),
///     ));
/// assert!(!extractor.connector().params().prune_endpoint_anchors);
/// ```
#[derive(Debug, Clone)]
pub struct FundusExtractor<
    O = BoundaryTrackEndpoints,
    I = ThresholdedMaxima,
    S = ErosionConnector,
    F = CompleteFaceFilter,
> {
    outer: O,
    inner: I,
    connector: S,
    filter: F,
}

impl Default for FundusExtractor {
    fn default() -> Self {
        Self::new(
            BoundaryTrackEndpoints::default(),
            ThresholdedMaxima,
            ErosionConnector::default(),
            CompleteFaceFilter,
        )
    }
}

impl<O, I, S, F> FundusExtractor<O, I, S, F> {
    /// Assemble an extractor from its collaborators.
    #[must_use]
    pub const fn new(outer: O, inner: I, connector: S, filter: F) -> Self {
        Self {
            outer,
            inner,
            connector,
            filter,
        }
    }

    /// Replace the outer anchor finder.
    #[must_use]
    pub fn with_outer<O2>(self, outer: O2) -> FundusExtractor<O2, I, S, F> {
        FundusExtractor {
            outer,
            inner: self.inner,
            connector: self.connector,
            filter: self.filter,
        }
    }

    /// Replace the inner anchor finder.
    #[must_use]
    pub fn with_inner<I2>(self, inner: I2) -> FundusExtractor<O, I2, S, F> {
        FundusExtractor {
            outer: self.outer,
            inner,
            connector: self.connector,
            filter: self.filter,
        }
    }

    /// Replace the skeleton connector.
    #[must_use]
    pub fn with_connector<S2>(self, connector: S2) -> FundusExtractor<O, I, S2, F> {
        FundusExtractor {
            outer: self.outer,
            inner: self.inner,
            connector,
            filter: self.filter,
        }
    }

    /// Replace the face-completion filter.
    #[must_use]
    pub fn with_filter<F2>(self, filter: F2) -> FundusExtractor<O, I, S, F2> {
        FundusExtractor {
            outer: self.outer,
            inner: self.inner,
            connector: self.connector,
            filter,
        }
    }

    /// The outer anchor finder.
    #[must_use]
    pub const fn outer(&self) -> &O {
        &self.outer
    }

    /// The inner anchor finder.
    #[must_use]
    pub const fn inner(&self) -> &I {
        &self.inner
    }

    /// The skeleton connector.
    #[must_use]
    pub const fn connector(&self) -> &S {
        &self.connector
    }

    /// The face-completion filter.
    #[must_use]
    pub const fn filter(&self) -> &F {
        &self.filter
    }
}

/// Shared read-only state of one extraction run.
struct FoldContext<'a> {
    neighbors: &'a NeighborLists,
    fold_labels: &'a [i32],
    values: &'a [f64],
    depth: &'a [f64],
    inner_anchors: &'a [usize],
    params: &'a FundusParams,
}

impl<O, I, S, F> FundusExtractor<O, I, S, F>
where
    O: OuterAnchorFinder,
    I: InnerAnchorFinder,
    S: SkeletonConnector,
    F: FaceCompletionFilter,
{
    /// Extract fundi from every fold of a mesh.
    ///
    /// `fold_labels`, `curvature` and `depth` hold one entry per mesh vertex.
    /// Vertices labeled `params.background` belong to no fold. The value
    /// field is `curvature * depth`; its robust threshold gates inner
    /// anchors. Inner anchors are searched once over the whole mesh and each
    /// fold keeps only the ones among its members.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The parameters fail validation
    /// - An input array does not match the vertex count
    /// - A face references a missing vertex
    /// - Folds exist but no value is positive
    pub fn extract(
        &self,
        mesh: &IndexedMesh,
        fold_labels: &[i32],
        curvature: &[f64],
        depth: &[f64],
        params: &FundusParams,
    ) -> FundiResult<FundusExtraction> {
        params.validate()?;

        let n = mesh.vertex_count();
        for (what, len) in [
            ("fold labels", fold_labels.len()),
            ("curvature", curvature.len()),
            ("depth", depth.len()),
        ] {
            if len != n {
                return Err(FundiError::length_mismatch(what, n, len));
            }
        }

        let neighbors = NeighborLists::from_mesh(mesh)?;

        let mut members: HashMap<i32, Vec<usize>> = HashMap::new();
        for (v, &label) in fold_labels.iter().enumerate() {
            if label != params.background {
                members.entry(label).or_default().push(v);
            }
        }
        let mut fold_ids: Vec<i32> = members.keys().copied().collect();
        fold_ids.sort_unstable();

        if fold_ids.is_empty() {
            info!(vertices = n, "No folds to extract fundi from");
            return Ok(FundusExtraction::empty(n, params.background));
        }

        let values: Vec<f64> = curvature.iter().zip(depth).map(|(c, d)| c * d).collect();
        let threshold = robust_threshold(&values)?;

        let inner_anchors = self.inner.find_inner_anchors(
            &mesh.points(),
            &values,
            params.min_separation,
            threshold,
        );
        let outside = inner_anchors
            .iter()
            .filter(|&&v| fold_labels.get(v).is_none_or(|&l| l == params.background))
            .count();
        debug!(
            found = inner_anchors.len(),
            outside, "Inner anchors outside folds dropped"
        );

        info!(
            vertices = n,
            folds = fold_ids.len(),
            threshold,
            parallel = params.parallel,
            "Extracting fundi"
        );

        let ctx = FoldContext {
            neighbors: &neighbors,
            fold_labels,
            values: &values,
            depth,
            inner_anchors: &inner_anchors,
            params,
        };
        let run = |id: &i32| {
            let vertices = members.get(id).map_or(&[][..], Vec::as_slice);
            self.extract_fold(*id, vertices, &ctx)
        };
        let folds: Vec<FoldFundus> = if params.parallel {
            fold_ids.par_iter().map(run).collect()
        } else {
            fold_ids.iter().map(run).collect()
        };

        let skeleton = self.merge(&folds, &mesh.faces, params.face_filter);

        let mut fundus_per_fold = VertexLabels::new(n, params.background);
        for v in skeleton {
            let label = fold_labels[v];
            if label != params.background {
                fundus_per_fold.set(v, label)?;
            }
        }
        let fundus_count = fundus_per_fold.label_count();

        info!(
            fundi = fundus_count,
            fundus_vertices = fundus_per_fold.assigned_vertices().len(),
            "Fundus extraction complete"
        );

        Ok(FundusExtraction {
            fundus_per_fold,
            fundus_count,
            threshold: Some(threshold),
            folds,
        })
    }

    fn extract_fold(&self, fold_id: i32, vertices: &[usize], ctx: &FoldContext<'_>) -> FoldFundus {
        let params = ctx.params;

        let outer_anchors = self.outer.find_outer_anchors(
            vertices,
            ctx.neighbors,
            ctx.values,
            ctx.depth,
            params.min_separation,
        );
        let inner_anchors: Vec<usize> = ctx
            .inner_anchors
            .iter()
            .copied()
            .filter(|&v| ctx.fold_labels.get(v) == Some(&fold_id))
            .collect();

        let mut mask = vec![params.background; ctx.fold_labels.len()];
        for &v in vertices {
            mask[v] = fold_id;
        }

        let mut skeleton = self.connector.connect(
            &mask,
            ctx.neighbors,
            &outer_anchors,
            &inner_anchors,
            ctx.values,
            params.erode_ratio,
            params.erode_min_size,
            params.background,
        );
        skeleton.retain(|&v| mask.get(v) == Some(&fold_id));

        debug!(
            fold = fold_id,
            vertices = vertices.len(),
            outer = outer_anchors.len(),
            inner = inner_anchors.len(),
            skeleton = skeleton.len(),
            "Connected fold"
        );

        FoldFundus {
            fold_id,
            vertex_count: vertices.len(),
            outer_anchors,
            inner_anchors,
            skeleton,
        }
    }

    /// Concatenate per-fold skeletons and apply the face filter.
    fn merge(
        &self,
        folds: &[FoldFundus],
        faces: &[[u32; 3]],
        schedule: FaceFilterSchedule,
    ) -> Vec<usize> {
        let mut merged: Vec<usize> = Vec::new();
        match schedule {
            FaceFilterSchedule::AfterAllFolds => {
                for fold in folds {
                    merged.extend_from_slice(&fold.skeleton);
                }
                self.drop_complete_faces(&mut merged, faces);
            }
            FaceFilterSchedule::PerFold => {
                for fold in folds {
                    merged.extend_from_slice(&fold.skeleton);
                    self.drop_complete_faces(&mut merged, faces);
                }
            }
        }
        merged
    }

    fn drop_complete_faces(&self, skeleton: &mut Vec<usize>, faces: &[[u32; 3]]) {
        let removed: HashSet<usize> = self
            .filter
            .vertices_to_remove(skeleton, faces)
            .into_iter()
            .collect();
        if !removed.is_empty() {
            debug!(removed = removed.len(), "Face filter removed vertices");
            skeleton.retain(|v| !removed.contains(v));
        }
    }
}

/// Extract fundi with the default collaborators.
///
/// See [`FundusExtractor::extract`].
///
/// # Errors
///
/// Returns an error if the parameters are invalid, an input array does not
/// match the vertex count, a face references a missing vertex, or folds exist
/// but no value is positive.
///
/// # Example
///
/// ```
/// use mesh_fundi::{FundusParams, extract_fundi};
/// use mesh_types::grid;
///
/// let mesh = grid(4, 4, |_, _| 0.0);
/// let folds = vec![-1; 16];
/// let zeros = vec![0.0; 16];
///
/// let result = extract_fundi(&mesh, &folds, &zeros, &zeros, &FundusParams::default()).unwrap();
/// assert_eq!(result.fundus_count, 0);
/// assert!(result.threshold.is_none());
/// ```
pub fn extract_fundi(
    mesh: &IndexedMesh,
    fold_labels: &[i32],
    curvature: &[f64],
    depth: &[f64],
    params: &FundusParams,
) -> FundiResult<FundusExtraction> {
    let extractor: FundusExtractor = FundusExtractor::default();
    extractor.extract(mesh, fold_labels, curvature, depth, params)
}
