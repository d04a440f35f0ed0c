//! Core grid data types.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};

/// A dense N-dimensional array of samples over a regular grid.
///
/// Samples are stored in row-major order: the last axis varies fastest,
/// and `stride[k] = shape[k+1] * shape[k+2] * ... * shape[N-1]`. Every
/// index tuple maps to exactly one flat offset and back.
///
/// `spacing[k]` is the physical step size along axis `k` (default 1.0),
/// so distances computed on the grid come out in physical units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    shape: Vec<usize>,
    spacing: Vec<f64>,
    data: Vec<T>,
}

/// A grid of integer labels where 0 marks background voxels.
pub type LabelGrid = Grid<u32>;

/// A grid of per-voxel costs: 0 at foreground, a large sentinel at background.
pub type CostGrid = Grid<f64>;

/// A grid of non-negative Euclidean distances.
pub type DistanceGrid = Grid<f64>;

impl<T: Clone> Grid<T> {
    /// Create a grid filled with a single value, with unit spacing.
    pub fn filled(shape: Vec<usize>, value: T) -> GridResult<Self> {
        let spacing = vec![1.0; shape.len()];
        Self::filled_with_spacing(shape, spacing, value)
    }

    /// Create a grid filled with a single value and explicit spacing.
    pub fn filled_with_spacing(
        shape: Vec<usize>,
        spacing: Vec<f64>,
        value: T,
    ) -> GridResult<Self> {
        validate_shape(&shape)?;
        validate_spacing(&shape, &spacing)?;
        let total = shape.iter().product();
        Ok(Self {
            shape,
            spacing,
            data: vec![value; total],
        })
    }
}

impl<T> Grid<T> {
    /// Create a grid from existing sample data, with unit spacing.
    pub fn from_data(shape: Vec<usize>, data: Vec<T>) -> GridResult<Self> {
        let spacing = vec![1.0; shape.len()];
        Self::from_data_with_spacing(shape, spacing, data)
    }

    /// Create a grid from existing sample data and explicit spacing.
    pub fn from_data_with_spacing(
        shape: Vec<usize>,
        spacing: Vec<f64>,
        data: Vec<T>,
    ) -> GridResult<Self> {
        validate_shape(&shape)?;
        validate_spacing(&shape, &spacing)?;
        let total: usize = shape.iter().product();
        if data.len() != total {
            return Err(GridError::data_length_mismatch(total, data.len()));
        }
        Ok(Self {
            shape,
            spacing,
            data,
        })
    }

    /// Number of axes.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Samples per axis.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Physical step size per axis.
    #[inline]
    pub fn spacing(&self) -> &[f64] {
        &self.spacing
    }

    /// Total number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the grid holds no samples. The constructors reject
    /// zero-length axes, so a grid obtained from this crate is never
    /// empty; this exists to satisfy the `len` convention.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat sample storage, row-major.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable flat sample storage.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the grid, returning its flat sample storage.
    #[inline]
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Row-major strides: `stride[k] = product(shape[k+1..])`.
    pub fn strides(&self) -> Vec<usize> {
        let mut strides = vec![1usize; self.shape.len()];
        for k in (0..self.shape.len().saturating_sub(1)).rev() {
            strides[k] = strides[k + 1] * self.shape[k + 1];
        }
        strides
    }

    /// Convert an index tuple to a flat offset.
    pub fn linearize(&self, index: &[usize]) -> usize {
        debug_assert_eq!(index.len(), self.shape.len());
        let mut flat = 0;
        for (k, &i) in index.iter().enumerate() {
            debug_assert!(i < self.shape[k]);
            flat = flat * self.shape[k] + i;
        }
        flat
    }

    /// Convert a flat offset to an index tuple.
    pub fn delinearize(&self, mut flat: usize) -> Vec<usize> {
        let mut index = vec![0usize; self.shape.len()];
        for k in (0..self.shape.len()).rev() {
            index[k] = flat % self.shape[k];
            flat /= self.shape[k];
        }
        index
    }

    /// Sample at an index tuple.
    #[inline]
    pub fn at(&self, index: &[usize]) -> &T {
        &self.data[self.linearize(index)]
    }

    /// Mutable sample at an index tuple.
    #[inline]
    pub fn at_mut(&mut self, index: &[usize]) -> &mut T {
        let flat = self.linearize(index);
        &mut self.data[flat]
    }

    /// The largest squared physical distance between any two in-bounds
    /// positions: `sum((shape[k] * spacing[k])^2)`. Any true squared
    /// distance within the grid is strictly smaller.
    pub fn max_squared_extent(&self) -> f64 {
        self.shape
            .iter()
            .zip(&self.spacing)
            .map(|(&n, &s)| {
                let span = n as f64 * s;
                span * span
            })
            .sum()
    }

    /// Build a same-shape grid by mapping every sample.
    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> Grid<U> {
        Grid {
            shape: self.shape.clone(),
            spacing: self.spacing.clone(),
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Same-shape grid from freshly computed data. The caller guarantees
    /// `data.len() == self.len()`.
    pub(crate) fn with_data<U>(&self, data: Vec<U>) -> Grid<U> {
        debug_assert_eq!(data.len(), self.data.len());
        Grid {
            shape: self.shape.clone(),
            spacing: self.spacing.clone(),
            data,
        }
    }

    /// Replace the spacing, validating it against the shape.
    pub fn with_spacing(mut self, spacing: Vec<f64>) -> GridResult<Self> {
        validate_spacing(&self.shape, &spacing)?;
        self.spacing = spacing;
        Ok(self)
    }
}

impl Grid<f64> {
    /// Elementwise square root, consuming the squared-distance grid.
    pub fn sqrt(mut self) -> Self {
        for v in &mut self.data {
            *v = v.sqrt();
        }
        self
    }
}

fn validate_shape(shape: &[usize]) -> GridResult<()> {
    if shape.is_empty() {
        return Err(GridError::empty_grid(None));
    }
    for (axis, &n) in shape.iter().enumerate() {
        if n == 0 {
            return Err(GridError::empty_grid(Some(axis)));
        }
    }
    Ok(())
}

fn validate_spacing(shape: &[usize], spacing: &[f64]) -> GridResult<()> {
    if spacing.len() != shape.len() {
        return Err(GridError::shape_mismatch(shape.len(), spacing.len()));
    }
    for (axis, &s) in spacing.iter().enumerate() {
        if !s.is_finite() || s <= 0.0 {
            return Err(GridError::invalid_spacing(axis, s));
        }
    }
    Ok(())
}
