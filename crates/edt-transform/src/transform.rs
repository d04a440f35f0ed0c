//! Separable N-dimensional distance transform passes.
//!
//! The N-D squared distance decomposes additively across axes, so the
//! exact transform is a sequence of independent 1-D lower-envelope
//! transforms: axis 0 over every line of the cost grid, then axis 1
//! over the updated grid, and so on. After all passes every voxel holds
//! the true squared Euclidean distance to the nearest zero-cost voxel.
//!
//! Lines within one pass touch disjoint data and run in parallel;
//! passes across axes are strictly sequential because pass `k + 1`
//! reads the completed output of pass `k`.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use edt_grid::progress::{Progress, ProgressCallback};
use edt_grid::{CostGrid, DistanceGrid, Grid, IndicatorParams, LabelGrid, build_indicator};

use crate::envelope::LowerEnvelope;
use crate::error::{TransformError, TransformResult};

/// Parameters for distance-transform runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformParams {
    /// Override the label grid's per-axis physical spacing.
    ///
    /// Must have exactly one entry per axis. When `None`, the grid's
    /// own spacing is used.
    pub spacing: Option<Vec<f64>>,

    /// Explicit background sentinel; see [`IndicatorParams`].
    pub sentinel: Option<f64>,
}

impl TransformParams {
    /// Params with a spacing override.
    pub fn with_spacing(spacing: Vec<f64>) -> Self {
        Self {
            spacing: Some(spacing),
            ..Self::default()
        }
    }
}

/// Compute the generalized distance transform of an arbitrary cost grid:
/// `dt_f(x) = min_p ( f(p) + ||x - p||^2 )` in physical units.
///
/// With an indicator cost grid (0 at foreground, sentinel at
/// background) this is the squared Euclidean distance transform. Other
/// costs are useful too: `f(p) = -r(p)^2` makes the `<= 0` level set of
/// the output the union of spheres with per-voxel radius `r`.
///
/// The output is the squared field; no square root is applied.
pub fn generalized_distance_transform(cost: &CostGrid) -> TransformResult<CostGrid> {
    generalized_distance_transform_with_progress(cost, None)
}

/// [`generalized_distance_transform`] with a cooperative cancellation
/// check between axis passes.
pub fn generalized_distance_transform_with_progress(
    cost: &CostGrid,
    progress: Option<&ProgressCallback>,
) -> TransformResult<CostGrid> {
    let start = Instant::now();
    info!(
        shape = ?cost.shape(),
        voxels = cost.len(),
        "Computing generalized distance transform"
    );

    let mut values = cost.data().to_vec();
    let mut labels = vec![(); values.len()];
    separable_passes(
        &mut values,
        &mut labels,
        cost.shape(),
        cost.spacing(),
        progress,
        start,
    )?;

    debug!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Generalized distance transform complete"
    );

    Ok(Grid::from_data_with_spacing(
        cost.shape().to_vec(),
        cost.spacing().to_vec(),
        values,
    )?)
}

/// Compute the exact squared Euclidean distance transform of a label
/// grid: every voxel gets the squared physical distance to the nearest
/// foreground (non-zero) voxel.
///
/// An all-background input yields the sentinel at every voxel; resolve
/// the sentinel via [`IndicatorParams`] to detect that case.
pub fn squared_euclidean_distance_transform(
    labels: &LabelGrid,
    params: &TransformParams,
) -> TransformResult<CostGrid> {
    let cost = indicator_cost(labels, params)?;
    generalized_distance_transform(&cost)
}

/// Compute the exact Euclidean distance transform of a label grid with
/// default parameters.
///
/// This is the invocation boundary for the common case: label grid in,
/// distance grid out, spacing taken from the input grid.
pub fn euclidean_distance_transform(labels: &LabelGrid) -> TransformResult<DistanceGrid> {
    euclidean_distance_transform_with(labels, &TransformParams::default())
}

/// [`euclidean_distance_transform`] with explicit parameters.
pub fn euclidean_distance_transform_with(
    labels: &LabelGrid,
    params: &TransformParams,
) -> TransformResult<DistanceGrid> {
    Ok(squared_euclidean_distance_transform(labels, params)?.sqrt())
}

/// [`euclidean_distance_transform_with`] plus cancellation between
/// axis passes.
pub fn euclidean_distance_transform_with_progress(
    labels: &LabelGrid,
    params: &TransformParams,
    progress: Option<&ProgressCallback>,
) -> TransformResult<DistanceGrid> {
    let cost = indicator_cost(labels, params)?;
    Ok(generalized_distance_transform_with_progress(&cost, progress)?.sqrt())
}

/// Build the indicator cost grid for a run, applying any spacing
/// override before sentinel validation so the sentinel bound sees the
/// physical extents the transform will actually use.
pub(crate) fn indicator_cost(
    labels: &LabelGrid,
    params: &TransformParams,
) -> TransformResult<CostGrid> {
    let indicator = IndicatorParams {
        sentinel: params.sentinel,
    };
    let cost = match &params.spacing {
        Some(spacing) => {
            let labels = labels.clone().with_spacing(spacing.clone())?;
            build_indicator(&labels, &indicator)?
        }
        None => build_indicator(labels, &indicator)?,
    };
    Ok(cost)
}

/// Run all axis passes over a value buffer and a parallel label buffer.
///
/// `L = ()` instantiates the label-free case; the label writes compile
/// away. Used with real labels by the Voronoi and feature transforms.
pub(crate) fn separable_passes<L: Copy + Send + Sync>(
    values: &mut [f64],
    labels: &mut [L],
    shape: &[usize],
    spacing: &[f64],
    progress: Option<&ProgressCallback>,
    start: Instant,
) -> TransformResult<()> {
    let ndim = shape.len();
    for axis in 0..ndim {
        if axis > 0 {
            if let Some(callback) = progress {
                let mut report = Progress::new(
                    axis as u64,
                    ndim as u64,
                    format!("axis pass {} of {}", axis + 1, ndim),
                );
                report.elapsed = start.elapsed();
                if !callback(&report) {
                    return Err(TransformError::cancelled(axis, ndim));
                }
            }
        }

        let pass_start = Instant::now();
        axis_pass(values, labels, shape, axis, spacing[axis]);
        debug!(
            axis,
            samples = shape[axis],
            elapsed_ms = pass_start.elapsed().as_secs_f64() * 1000.0,
            "Axis pass complete"
        );
    }
    Ok(())
}

/// Apply the 1-D lower-envelope transform to every line along `axis`.
///
/// Lines along the last axis are contiguous and transformed in place
/// via parallel chunks. Lines along other axes are strided: each is
/// gathered, transformed, and the results scattered back. Either way a
/// line is read and written by exactly one task.
fn axis_pass<L: Copy + Send + Sync>(
    values: &mut [f64],
    labels: &mut [L],
    shape: &[usize],
    axis: usize,
    spacing: f64,
) {
    let n = shape[axis];
    if n == 1 {
        // A 1-sample axis is the identity transform.
        return;
    }

    let stride: usize = shape[axis + 1..].iter().product();

    if stride == 1 {
        values
            .par_chunks_mut(n)
            .zip(labels.par_chunks_mut(n))
            .for_each(|(value_line, label_line)| {
                let mut envelope: LowerEnvelope<L> = LowerEnvelope::new(n, spacing);
                for i in 0..n {
                    envelope.push(i, value_line[i], label_line[i]);
                }
                envelope.sample_with_labels_into(value_line, label_line);
            });
        return;
    }

    let line_count = values.len() / n;
    let values_in: &[f64] = values;
    let labels_in: &[L] = labels;

    let transformed: Vec<(usize, Vec<f64>, Vec<L>)> = (0..line_count)
        .into_par_iter()
        .map(|line| {
            let outer = line / stride;
            let inner = line % stride;
            let first = outer * n * stride + inner;

            let mut envelope: LowerEnvelope<L> = LowerEnvelope::new(n, spacing);
            for i in 0..n {
                let offset = first + i * stride;
                envelope.push(i, values_in[offset], labels_in[offset]);
            }

            let mut value_line = vec![0.0; n];
            let mut label_line = vec![labels_in[first]; n];
            envelope.sample_with_labels_into(&mut value_line, &mut label_line);
            (first, value_line, label_line)
        })
        .collect();

    for (first, value_line, label_line) in transformed {
        for i in 0..n {
            let offset = first + i * stride;
            values[offset] = value_line[i];
            labels[offset] = label_line[i];
        }
    }
}
