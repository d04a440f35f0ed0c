//! Progress reporting and cooperative cancellation.
//!
//! The distance transform is CPU-bound and never blocks, but whole-grid
//! invocations on very large volumes can take a while. Callers may pass
//! a [`ProgressCallback`] that is invoked between axis passes; returning
//! `false` cancels the remainder of the run.
//!
//! # Example
//!
//! ```ignore
//! use edt_grid::progress::{Progress, ProgressCallback};
//!
//! let callback: ProgressCallback = Box::new(|progress| {
//!     println!("{}%: {}", progress.percent(), progress.message);
//!     true // continue (return false to cancel)
//! });
//! ```

use std::time::Duration;

/// Progress information passed to callbacks.
#[derive(Debug, Clone)]
pub struct Progress {
    /// Completed axis passes (0-based at the time of the call).
    pub current: u64,

    /// Total number of axis passes.
    pub total: u64,

    /// Human-readable message describing the current stage.
    pub message: String,

    /// Elapsed time since the transform started.
    pub elapsed: Duration,
}

impl Progress {
    /// Create a new progress report.
    pub fn new(current: u64, total: u64, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            message: message.into(),
            elapsed: Duration::ZERO,
        }
    }

    /// Progress as a fraction (0.0 to 1.0).
    #[inline]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64) / (self.total as f64)
        }
    }

    /// Progress as a percentage (0 to 100).
    #[inline]
    pub fn percent(&self) -> u32 {
        (self.fraction() * 100.0).round() as u32
    }

    /// Check whether every pass has completed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.current >= self.total
    }
}

/// Callback function for progress reporting.
///
/// Returns `true` to continue, `false` to request cancellation.
pub type ProgressCallback = Box<dyn Fn(&Progress) -> bool + Send + Sync>;
