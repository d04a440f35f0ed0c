//! Indicator (cost) grid construction.
//!
//! The distance transform operates on a cost grid where foreground
//! voxels hold 0 and background voxels hold a sentinel that stands in
//! for +infinity. The sentinel is a finite value: it must beat every
//! genuine in-bounds squared distance, and every intermediate sum the
//! transform forms on top of it must stay finite.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GridError, GridResult};
use crate::types::{CostGrid, LabelGrid};

/// Default sentinel headroom over the maximum in-bounds squared distance.
const DEFAULT_SENTINEL_FACTOR: f64 = 4.0;

/// Configuration for indicator construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorParams {
    /// Explicit sentinel value for background voxels.
    ///
    /// When `None`, the sentinel is derived from the grid:
    /// `4 * sum((shape[k] * spacing[k])^2)`. Explicit values are
    /// validated against the same bound.
    pub sentinel: Option<f64>,
}

impl IndicatorParams {
    /// Params with an explicit sentinel value.
    pub fn with_sentinel(sentinel: f64) -> Self {
        Self {
            sentinel: Some(sentinel),
        }
    }

    /// Resolve and validate the sentinel for a given label grid.
    ///
    /// The sentinel must be strictly larger than the grid's maximum
    /// in-bounds squared distance, and `sentinel + max_squared_extent`
    /// must stay finite so that all-sentinel lines cannot overflow.
    pub fn resolve_sentinel(&self, labels: &LabelGrid) -> GridResult<f64> {
        self.resolve_sentinel_for_extent(labels.max_squared_extent())
    }

    /// Resolve and validate the sentinel against a precomputed maximum
    /// in-bounds squared distance, for callers that already know the
    /// effective shape and spacing.
    pub fn resolve_sentinel_for_extent(&self, max_squared_extent: f64) -> GridResult<f64> {
        let max_sq = max_squared_extent;
        let sentinel = match self.sentinel {
            Some(s) => {
                if !s.is_finite() || s <= max_sq {
                    return Err(GridError::sentinel_too_small(s, max_sq));
                }
                s
            }
            None => max_sq * DEFAULT_SENTINEL_FACTOR,
        };
        if !(sentinel + max_sq).is_finite() {
            return Err(GridError::sentinel_overflow_risk(sentinel, max_sq));
        }
        Ok(sentinel)
    }
}

/// Build the indicator cost grid for a label grid.
///
/// `cost[p] = 0.0` where `label[p] != 0`, else the sentinel. The output
/// has the same shape and spacing as the input. All-background and
/// all-foreground inputs are valid: the former yields an all-sentinel
/// cost grid, and the distance transform of that reproduces the
/// sentinel at every voxel, which callers can detect via the resolved
/// sentinel value.
pub fn build_indicator(labels: &LabelGrid, params: &IndicatorParams) -> GridResult<CostGrid> {
    let sentinel = params.resolve_sentinel(labels)?;

    let mut foreground = 0usize;
    let data: Vec<f64> = labels
        .data()
        .iter()
        .map(|&l| {
            if l != 0 {
                foreground += 1;
                0.0
            } else {
                sentinel
            }
        })
        .collect();

    debug!(
        shape = ?labels.shape(),
        foreground,
        background = labels.len() - foreground,
        sentinel,
        "Indicator grid built"
    );

    Ok(labels.with_data(data))
}
