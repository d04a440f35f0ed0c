//! Fluent builder API for distance transforms.
//!
//! The builder chains configuration before executing the transform and
//! is the recommended surface when more than the plain distance field
//! is needed (Voronoi output, signed distances, custom sentinels,
//! progress callbacks).
//!
//! # Example
//!
//! ```
//! use edt_grid::Grid;
//! use edt_transform::DistanceTransformBuilder;
//!
//! let labels = Grid::from_data(vec![3, 3], vec![0, 0, 0, 0, 1, 0, 0, 0, 0]).unwrap();
//!
//! let result = DistanceTransformBuilder::new(&labels)
//!     .voronoi(true)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(result.distance.data()[4], 0.0);
//! assert!(result.voronoi.is_some());
//! ```

use std::time::Instant;

use serde::{Deserialize, Serialize};

use edt_grid::progress::ProgressCallback;
use edt_grid::{DistanceGrid, IndicatorParams, LabelGrid};

use crate::error::{TransformError, TransformResult};
use crate::signed::signed_euclidean_distance_transform_with;
use crate::transform::{
    TransformParams, euclidean_distance_transform_with_progress,
    generalized_distance_transform_with_progress, indicator_cost,
};
use crate::voronoi::voronoi_transform_squared_with_progress;

/// Statistics from a distance-transform run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformStats {
    /// Total voxels processed.
    pub voxels: usize,
    /// Number of axis passes.
    pub axes: usize,
    /// Sentinel value used for background voxels. An all-background
    /// input produces `sqrt(sentinel)` (or `sentinel` for squared
    /// output) at every voxel.
    pub sentinel: f64,
    /// Wall-clock time for the whole run in milliseconds.
    pub elapsed_ms: f64,
}

/// Result from [`DistanceTransformBuilder`].
#[derive(Debug)]
pub struct DistanceTransformResult {
    /// The distance grid (squared if `.squared(true)`, signed if
    /// `.signed(true)`).
    pub distance: DistanceGrid,
    /// Voronoi map of nearest-foreground labels, when requested.
    pub voronoi: Option<LabelGrid>,
    /// Run statistics.
    pub stats: TransformStats,
}

/// Fluent builder for distance-transform runs.
///
/// # Example
///
/// ```
/// use edt_grid::Grid;
/// use edt_transform::DistanceTransformBuilder;
///
/// let labels = Grid::from_data(vec![5], vec![1, 0, 0, 0, 1]).unwrap();
///
/// let result = DistanceTransformBuilder::new(&labels)
///     .spacing(vec![0.5])
///     .build()
///     .unwrap();
///
/// assert_eq!(result.distance.data()[2], 1.0);
/// ```
pub struct DistanceTransformBuilder<'a> {
    labels: &'a LabelGrid,
    spacing: Option<Vec<f64>>,
    sentinel: Option<f64>,
    squared: bool,
    voronoi: bool,
    signed: bool,
    progress_callback: Option<ProgressCallback>,
}

impl<'a> DistanceTransformBuilder<'a> {
    /// Create a builder for the given label grid.
    pub fn new(labels: &'a LabelGrid) -> Self {
        Self {
            labels,
            spacing: None,
            sentinel: None,
            squared: false,
            voronoi: false,
            signed: false,
            progress_callback: None,
        }
    }

    /// Override the per-axis physical spacing (one entry per axis).
    pub fn spacing(mut self, spacing: Vec<f64>) -> Self {
        self.spacing = Some(spacing);
        self
    }

    /// Use an explicit background sentinel instead of the derived one.
    ///
    /// The sentinel must exceed the grid's maximum in-bounds squared
    /// distance and is validated before the run starts.
    pub fn sentinel(mut self, sentinel: f64) -> Self {
        self.sentinel = Some(sentinel);
        self
    }

    /// Return squared distances, skipping the square-root pass.
    pub fn squared(mut self, enable: bool) -> Self {
        self.squared = enable;
        self
    }

    /// Also compute the Voronoi map of nearest-foreground labels.
    pub fn voronoi(mut self, enable: bool) -> Self {
        self.voronoi = enable;
        self
    }

    /// Compute the signed transform: distance to the foreground
    /// boundary, negative inside the foreground.
    pub fn signed(mut self, enable: bool) -> Self {
        self.signed = enable;
        self
    }

    /// Set a progress callback, invoked between axis passes. Return
    /// `false` from the callback to cancel the run.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Execute the configured transform.
    ///
    /// # Errors
    ///
    /// Returns an error if the spacing override or sentinel fails
    /// validation, if conflicting outputs are requested (`signed`
    /// cannot combine with `squared` or `voronoi`), or if the progress
    /// callback cancels the run.
    pub fn build(self) -> TransformResult<DistanceTransformResult> {
        if self.signed && self.squared {
            return Err(TransformError::invalid_params(
                "signed output is a true distance; it cannot be combined with squared",
            ));
        }
        if self.signed && self.voronoi {
            return Err(TransformError::invalid_params(
                "signed output measures the boundary set; request voronoi separately",
            ));
        }

        let start = Instant::now();
        let params = TransformParams {
            spacing: self.spacing,
            sentinel: self.sentinel,
        };

        // Resolve against the spacing the run will actually use, so
        // stats carry the sentinel even when the run derives it.
        let max_squared_extent = match &params.spacing {
            Some(spacing) => self
                .labels
                .shape()
                .iter()
                .zip(spacing)
                .map(|(&n, &s)| {
                    let span = n as f64 * s;
                    span * span
                })
                .sum(),
            None => self.labels.max_squared_extent(),
        };
        let sentinel = IndicatorParams {
            sentinel: params.sentinel,
        }
        .resolve_sentinel_for_extent(max_squared_extent)?;

        let (distance, voronoi) = if self.signed {
            let distance = signed_euclidean_distance_transform_with(self.labels, &params)?;
            (distance, None)
        } else if self.voronoi {
            let (squared, voronoi) = voronoi_transform_squared_with_progress(
                self.labels,
                &params,
                self.progress_callback.as_ref(),
            )?;
            let distance = if self.squared {
                squared
            } else {
                squared.sqrt()
            };
            (distance, Some(voronoi))
        } else if self.squared {
            let cost = indicator_cost(self.labels, &params)?;
            let distance = generalized_distance_transform_with_progress(
                &cost,
                self.progress_callback.as_ref(),
            )?;
            (distance, None)
        } else {
            let distance = euclidean_distance_transform_with_progress(
                self.labels,
                &params,
                self.progress_callback.as_ref(),
            )?;
            (distance, None)
        };

        let stats = TransformStats {
            voxels: self.labels.len(),
            axes: self.labels.ndim(),
            sentinel,
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        };

        Ok(DistanceTransformResult {
            distance,
            voronoi,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edt_grid::Grid;

    fn center_seed() -> LabelGrid {
        Grid::from_data(vec![3, 3], vec![0, 0, 0, 0, 1, 0, 0, 0, 0]).unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let labels = center_seed();
        let builder = DistanceTransformBuilder::new(&labels);
        assert!(!builder.squared);
        assert!(!builder.voronoi);
        assert!(!builder.signed);
        assert!(builder.spacing.is_none());
    }

    #[test]
    fn test_builder_chaining() {
        let labels = center_seed();
        let builder = DistanceTransformBuilder::new(&labels)
            .spacing(vec![2.0, 2.0])
            .sentinel(1.0e9)
            .squared(true)
            .voronoi(true);
        assert_eq!(builder.spacing.as_deref(), Some(&[2.0, 2.0][..]));
        assert_eq!(builder.sentinel, Some(1.0e9));
        assert!(builder.squared);
        assert!(builder.voronoi);
    }

    #[test]
    fn test_build_plain_distance() {
        let labels = center_seed();
        let result = DistanceTransformBuilder::new(&labels).build().unwrap();
        assert_eq!(result.distance.data()[4], 0.0);
        assert!((result.distance.data()[0] - 2.0_f64.sqrt()).abs() < 1e-12);
        assert!(result.voronoi.is_none());
        assert_eq!(result.stats.axes, 2);
        assert_eq!(result.stats.voxels, 9);
    }

    #[test]
    fn test_build_squared() {
        let labels = center_seed();
        let result = DistanceTransformBuilder::new(&labels)
            .squared(true)
            .build()
            .unwrap();
        assert_eq!(result.distance.data()[0], 2.0);
    }

    #[test]
    fn test_build_voronoi() {
        let labels = Grid::from_data(vec![5], vec![4, 0, 0, 0, 6]).unwrap();
        let result = DistanceTransformBuilder::new(&labels)
            .voronoi(true)
            .build()
            .unwrap();
        let voronoi = result.voronoi.unwrap();
        assert_eq!(voronoi.data()[1], 4);
        assert_eq!(voronoi.data()[3], 6);
    }

    #[test]
    fn test_build_signed() {
        let labels = Grid::from_data(vec![7], vec![0, 0, 1, 1, 1, 0, 0]).unwrap();
        let result = DistanceTransformBuilder::new(&labels)
            .signed(true)
            .build()
            .unwrap();
        assert_eq!(result.distance.data()[3], -1.0);
        assert_eq!(result.distance.data()[0], 2.0);
    }

    #[test]
    fn test_signed_squared_conflict() {
        let labels = center_seed();
        let err = DistanceTransformBuilder::new(&labels)
            .signed(true)
            .squared(true)
            .build()
            .unwrap_err();
        assert!(matches!(err, TransformError::InvalidParams { .. }));
    }

    #[test]
    fn test_signed_voronoi_conflict() {
        let labels = center_seed();
        let err = DistanceTransformBuilder::new(&labels)
            .signed(true)
            .voronoi(true)
            .build()
            .unwrap_err();
        assert!(matches!(err, TransformError::InvalidParams { .. }));
    }

    #[test]
    fn test_squared_voronoi_matches_exact_squared_transform() {
        // Squaring rounded distances would give 2.0000000000000004 at
        // the corners of a center seed; the squared buffer must come
        // straight from the envelope passes.
        let labels = center_seed();
        let exact =
            crate::transform::squared_euclidean_distance_transform(
                &labels,
                &TransformParams::default(),
            )
            .unwrap();
        let result = DistanceTransformBuilder::new(&labels)
            .squared(true)
            .voronoi(true)
            .build()
            .unwrap();
        assert_eq!(result.distance.data(), exact.data());
        assert!(result.voronoi.is_some());
    }

    #[test]
    fn test_stats_sentinel_uses_spacing_override() {
        let labels = center_seed();
        let result = DistanceTransformBuilder::new(&labels)
            .spacing(vec![2.0, 2.0])
            .build()
            .unwrap();
        // max extent = (3*2)^2 + (3*2)^2 = 72, default sentinel 4x that.
        assert_eq!(result.stats.sentinel, 288.0);
    }

    #[test]
    fn test_stats_carry_derived_sentinel() {
        let labels = center_seed();
        let result = DistanceTransformBuilder::new(&labels).build().unwrap();
        assert!(result.stats.sentinel > labels.max_squared_extent());
    }

    #[test]
    fn test_sentinel_validated_up_front() {
        let labels = center_seed();
        let err = DistanceTransformBuilder::new(&labels)
            .sentinel(1.0)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            TransformError::Grid(edt_grid::GridError::SentinelTooSmall { .. })
        ));
    }
}
