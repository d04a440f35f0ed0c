//! Voronoi maps and feature transforms.
//!
//! The lower-envelope passes can carry an arbitrary payload alongside
//! each parabola. Seeding the payload with the voxel's own label yields
//! a Voronoi map: every voxel ends up with the label of a nearest
//! foreground voxel. Seeding it with the voxel's flat index instead
//! yields a feature transform, from which per-voxel offset vectors to
//! the nearest foreground voxel can be decoded.
//!
//! Ties between equidistant foreground voxels resolve to whichever
//! parabola survives the envelope; any true nearest voxel is a valid
//! winner.

use std::time::Instant;

use tracing::info;

use edt_grid::progress::ProgressCallback;
use edt_grid::{CostGrid, DistanceGrid, Grid, LabelGrid};

use crate::error::TransformResult;
use crate::transform::{TransformParams, indicator_cost, separable_passes};

/// Per-voxel flat indices of the nearest foreground voxel.
pub type FeatureGrid = Grid<u64>;

/// Compute the Euclidean distance transform together with the Voronoi
/// map: for every voxel, the label of the nearest foreground voxel.
///
/// Background voxels of an all-background grid keep their own label 0,
/// mirroring the distance output's sentinel signal.
pub fn voronoi_transform(
    labels: &LabelGrid,
    params: &TransformParams,
) -> TransformResult<(DistanceGrid, LabelGrid)> {
    voronoi_transform_with_progress(labels, params, None)
}

/// [`voronoi_transform`] with cancellation between axis passes.
pub fn voronoi_transform_with_progress(
    labels: &LabelGrid,
    params: &TransformParams,
    progress: Option<&ProgressCallback>,
) -> TransformResult<(DistanceGrid, LabelGrid)> {
    let (squared, voronoi) = voronoi_transform_squared_with_progress(labels, params, progress)?;
    Ok((squared.sqrt(), voronoi))
}

/// Voronoi passes yielding the squared field before any square root,
/// for callers that want the exact squared transform.
pub(crate) fn voronoi_transform_squared_with_progress(
    labels: &LabelGrid,
    params: &TransformParams,
    progress: Option<&ProgressCallback>,
) -> TransformResult<(CostGrid, LabelGrid)> {
    let start = Instant::now();
    info!(shape = ?labels.shape(), voxels = labels.len(), "Computing Voronoi transform");

    let cost = indicator_cost(labels, params)?;
    let mut values = cost.data().to_vec();
    let mut winners = labels.data().to_vec();
    separable_passes(
        &mut values,
        &mut winners,
        cost.shape(),
        cost.spacing(),
        progress,
        start,
    )?;

    let squared =
        Grid::from_data_with_spacing(cost.shape().to_vec(), cost.spacing().to_vec(), values)?;
    let voronoi =
        Grid::from_data_with_spacing(cost.shape().to_vec(), cost.spacing().to_vec(), winners)?;
    Ok((squared, voronoi))
}

/// Compute the Euclidean distance transform together with the feature
/// transform: for every voxel, the flat index of the nearest foreground
/// voxel. Decode offsets with [`offset_to_feature`].
pub fn feature_transform(
    labels: &LabelGrid,
    params: &TransformParams,
) -> TransformResult<(DistanceGrid, FeatureGrid)> {
    let start = Instant::now();
    info!(shape = ?labels.shape(), voxels = labels.len(), "Computing feature transform");

    let cost = indicator_cost(labels, params)?;
    let mut values = cost.data().to_vec();
    let mut features: Vec<u64> = (0..cost.len() as u64).collect();
    separable_passes(
        &mut values,
        &mut features,
        cost.shape(),
        cost.spacing(),
        None,
        start,
    )?;

    let distance = Grid::from_data_with_spacing(
        cost.shape().to_vec(),
        cost.spacing().to_vec(),
        values,
    )?
    .sqrt();
    let feature_grid =
        Grid::from_data_with_spacing(cost.shape().to_vec(), cost.spacing().to_vec(), features)?;
    Ok((distance, feature_grid))
}

/// Physical offset from the voxel at `index` to its nearest foreground
/// voxel, one component per axis: `(feature[k] - index[k]) * spacing[k]`.
pub fn offset_to_feature(features: &FeatureGrid, index: &[usize]) -> Vec<f64> {
    let nearest = features.delinearize(*features.at(index) as usize);
    index
        .iter()
        .zip(&nearest)
        .zip(features.spacing())
        .map(|((&from, &to), &s)| (to as f64 - from as f64) * s)
        .collect()
}
