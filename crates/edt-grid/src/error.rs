//! Error types for grid construction and validation.
//!
//! Every error carries a machine-readable code in the format `GRID-XXXX`:
//! - `GRID-1xxx`: input validation (shape, spacing, data length)
//! - `GRID-2xxx`: sentinel configuration

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Machine-readable error codes for grid operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridErrorCode {
    /// GRID-1001: A grid axis has zero length, or the grid has no axes
    EmptyGrid = 1001,
    /// GRID-1002: Spacing sequence length does not match dimensionality
    ShapeMismatch = 1002,
    /// GRID-1003: Spacing value is non-positive or non-finite
    InvalidSpacing = 1003,
    /// GRID-1004: Flat data length does not match the shape product
    DataLengthMismatch = 1004,

    /// GRID-2001: Sentinel does not exceed the maximum in-bounds squared distance
    SentinelTooSmall = 2001,
    /// GRID-2002: Sentinel arithmetic could leave the finite range
    SentinelOverflowRisk = 2002,
}

impl GridErrorCode {
    /// Returns the error code as a string in the format `GRID-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            GridErrorCode::EmptyGrid => "GRID-1001",
            GridErrorCode::ShapeMismatch => "GRID-1002",
            GridErrorCode::InvalidSpacing => "GRID-1003",
            GridErrorCode::DataLengthMismatch => "GRID-1004",
            GridErrorCode::SentinelTooSmall => "GRID-2001",
            GridErrorCode::SentinelOverflowRisk => "GRID-2002",
        }
    }
}

impl std::fmt::Display for GridErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur while constructing or validating grids.
#[derive(Debug, Error, Diagnostic)]
pub enum GridError {
    /// A grid axis has zero length, or the grid has no axes at all.
    #[error("grid is empty: {}", match axis { Some(a) => format!("axis {a} has zero length"), None => "zero dimensions".to_string() })]
    #[diagnostic(
        code(grid::shape::empty),
        help("Every axis must have at least one sample. Degenerate 1-sample axes are fine.")
    )]
    EmptyGrid { axis: Option<usize> },

    /// Spacing sequence length does not match the grid's dimensionality.
    #[error("spacing has {actual} entries but the grid has {expected} axes")]
    #[diagnostic(
        code(grid::spacing::length),
        help("Provide exactly one spacing value per axis.")
    )]
    ShapeMismatch { expected: usize, actual: usize },

    /// A spacing value is non-positive or non-finite.
    #[error("spacing for axis {axis} is {value}, expected a positive finite value")]
    #[diagnostic(
        code(grid::spacing::invalid),
        help("Spacing is the physical step size per axis and must be > 0.")
    )]
    InvalidSpacing { axis: usize, value: f64 },

    /// The flat data length does not match the product of the shape.
    #[error("data has {actual} samples but the shape requires {expected}")]
    #[diagnostic(
        code(grid::data::length),
        help("len(data) must equal the product of all shape entries.")
    )]
    DataLengthMismatch { expected: usize, actual: usize },

    /// The sentinel is not larger than every attainable squared distance.
    #[error(
        "sentinel {sentinel} does not exceed the maximum in-bounds squared distance {max_squared_extent}"
    )]
    #[diagnostic(
        code(grid::sentinel::too_small),
        help(
            "The sentinel must be strictly larger than sum((shape[k]*spacing[k])^2), otherwise background voxels could beat genuine foreground parabolas."
        )
    )]
    SentinelTooSmall {
        sentinel: f64,
        max_squared_extent: f64,
    },

    /// Sentinel arithmetic could overflow the working numeric type.
    #[error("sentinel {sentinel} plus the grid extent {max_squared_extent} leaves the finite f64 range")]
    #[diagnostic(
        code(grid::sentinel::overflow),
        help(
            "Pick a smaller sentinel: the transform adds up to the maximum squared extent on top of it, and every intermediate value must stay finite."
        )
    )]
    SentinelOverflowRisk {
        sentinel: f64,
        max_squared_extent: f64,
    },
}

impl GridError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> GridErrorCode {
        match self {
            GridError::EmptyGrid { .. } => GridErrorCode::EmptyGrid,
            GridError::ShapeMismatch { .. } => GridErrorCode::ShapeMismatch,
            GridError::InvalidSpacing { .. } => GridErrorCode::InvalidSpacing,
            GridError::DataLengthMismatch { .. } => GridErrorCode::DataLengthMismatch,
            GridError::SentinelTooSmall { .. } => GridErrorCode::SentinelTooSmall,
            GridError::SentinelOverflowRisk { .. } => GridErrorCode::SentinelOverflowRisk,
        }
    }

    // Constructor helpers

    /// Create an empty grid error, optionally naming the offending axis.
    pub fn empty_grid(axis: Option<usize>) -> Self {
        GridError::EmptyGrid { axis }
    }

    /// Create a spacing-length mismatch error.
    pub fn shape_mismatch(expected: usize, actual: usize) -> Self {
        GridError::ShapeMismatch { expected, actual }
    }

    /// Create an invalid spacing error.
    pub fn invalid_spacing(axis: usize, value: f64) -> Self {
        GridError::InvalidSpacing { axis, value }
    }

    /// Create a data length mismatch error.
    pub fn data_length_mismatch(expected: usize, actual: usize) -> Self {
        GridError::DataLengthMismatch { expected, actual }
    }

    /// Create a sentinel-too-small error.
    pub fn sentinel_too_small(sentinel: f64, max_squared_extent: f64) -> Self {
        GridError::SentinelTooSmall {
            sentinel,
            max_squared_extent,
        }
    }

    /// Create a sentinel overflow risk error.
    pub fn sentinel_overflow_risk(sentinel: f64, max_squared_extent: f64) -> Self {
        GridError::SentinelOverflowRisk {
            sentinel,
            max_squared_extent,
        }
    }
}
