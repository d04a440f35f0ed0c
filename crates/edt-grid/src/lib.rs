//! Dense N-dimensional grids and indicator construction for distance
//! transforms.
//!
//! This crate provides the data model shared by the transform crates:
//!
//! - [`Grid`]: a dense, row-major N-dimensional array with per-axis
//!   physical spacing
//! - [`LabelGrid`], [`CostGrid`], [`DistanceGrid`]: the three grid roles
//!   in the distance-transform pipeline
//! - [`build_indicator`]: label grid → cost grid (0 at foreground, a
//!   validated finite sentinel at background)
//! - [`progress`]: cooperative cancellation callbacks
//!
//! # Quick Start
//!
//! ```
//! use edt_grid::{Grid, IndicatorParams, build_indicator};
//!
//! // A 2-D label grid with one foreground voxel.
//! let labels = Grid::from_data(vec![3, 3], vec![0, 0, 0, 0, 7, 0, 0, 0, 0]).unwrap();
//!
//! let cost = build_indicator(&labels, &IndicatorParams::default()).unwrap();
//! assert_eq!(cost.data()[4], 0.0);
//! assert!(cost.data()[0] > labels.max_squared_extent());
//! ```
//!
//! # Ownership
//!
//! Every stage owns its output grid outright and never mutates its
//! input. Grids are plain data: create, hand to the next stage, drop.
//! Nothing in this crate holds state across calls.

mod error;
mod indicator;
mod types;

pub mod progress;

pub use error::{GridError, GridErrorCode, GridResult};
pub use indicator::{IndicatorParams, build_indicator};
pub use types::{CostGrid, DistanceGrid, Grid, LabelGrid};
