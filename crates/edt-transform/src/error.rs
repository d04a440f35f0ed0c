//! Error types for distance-transform operations.
//!
//! Every error carries a machine-readable code in the format `EDT-XXXX`:
//! - `EDT-1xxx`: input and parameter validation
//! - `EDT-2xxx`: run control

use miette::Diagnostic;
use thiserror::Error;

use edt_grid::GridError;

/// Result type alias for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Machine-readable error codes for transform operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformErrorCode {
    /// EDT-1001: Grid validation failed
    Grid = 1001,
    /// EDT-1002: Conflicting or invalid parameters
    InvalidParams = 1002,

    /// EDT-2001: Cancelled by progress callback
    Cancelled = 2001,
}

impl TransformErrorCode {
    /// Returns the error code as a string in the format `EDT-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformErrorCode::Grid => "EDT-1001",
            TransformErrorCode::InvalidParams => "EDT-1002",
            TransformErrorCode::Cancelled => "EDT-2001",
        }
    }
}

impl std::fmt::Display for TransformErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur during distance-transform runs.
#[derive(Debug, Error, Diagnostic)]
pub enum TransformError {
    /// Underlying grid error (shape, spacing, data length, sentinel).
    #[error("grid validation failed: {0}")]
    #[diagnostic(code(edt::grid::error))]
    Grid(#[from] GridError),

    /// Conflicting or invalid parameters.
    #[error("invalid transform parameters: {details}")]
    #[diagnostic(
        code(edt::params::invalid),
        help("Check the builder configuration; some outputs cannot be combined.")
    )]
    InvalidParams { details: String },

    /// The progress callback requested cancellation between axis passes.
    #[error("transform cancelled after {completed_axes} of {total_axes} axis passes")]
    #[diagnostic(
        code(edt::run::cancelled),
        help(
            "The progress callback returned false. Partial results are discarded; rerun without cancelling to get the full transform."
        )
    )]
    Cancelled {
        completed_axes: usize,
        total_axes: usize,
    },
}

impl TransformError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> TransformErrorCode {
        match self {
            TransformError::Grid(_) => TransformErrorCode::Grid,
            TransformError::InvalidParams { .. } => TransformErrorCode::InvalidParams,
            TransformError::Cancelled { .. } => TransformErrorCode::Cancelled,
        }
    }

    /// Create an invalid params error.
    pub fn invalid_params(details: impl Into<String>) -> Self {
        TransformError::InvalidParams {
            details: details.into(),
        }
    }

    /// Create a cancellation error.
    pub fn cancelled(completed_axes: usize, total_axes: usize) -> Self {
        TransformError::Cancelled {
            completed_axes,
            total_axes,
        }
    }
}
