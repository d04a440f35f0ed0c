//! Exact N-dimensional Euclidean distance transforms.
//!
//! The transform is dimension-separable: a linear-time lower envelope
//! of parabolas sweeps each grid axis in turn, with lines processed in
//! parallel within each pass. Distances are exact for arbitrary
//! anisotropic spacing, and the same passes can carry labels to
//! produce Voronoi maps and feature transforms.
//!
//! # Quick start
//!
//! ```
//! use edt_grid::Grid;
//! use edt_transform::euclidean_distance_transform;
//!
//! // A single foreground voxel at one end of a line.
//! let labels = Grid::from_data(vec![4], vec![1, 0, 0, 0]).unwrap();
//! let distance = euclidean_distance_transform(&labels).unwrap();
//!
//! assert_eq!(distance.data(), &[0.0, 1.0, 2.0, 3.0]);
//! ```
//!
//! For Voronoi maps, signed distances, squared output, or progress
//! reporting, use [`DistanceTransformBuilder`].

mod builder;
mod envelope;
mod error;
mod signed;
mod transform;
mod voronoi;

pub use builder::{DistanceTransformBuilder, DistanceTransformResult, TransformStats};
pub use envelope::LowerEnvelope;
pub use error::{TransformError, TransformErrorCode, TransformResult};
pub use signed::{signed_euclidean_distance_transform, signed_euclidean_distance_transform_with};
pub use transform::{
    TransformParams, euclidean_distance_transform, euclidean_distance_transform_with,
    euclidean_distance_transform_with_progress, generalized_distance_transform,
    generalized_distance_transform_with_progress, squared_euclidean_distance_transform,
};
pub use voronoi::{
    FeatureGrid, feature_transform, offset_to_feature, voronoi_transform,
    voronoi_transform_with_progress,
};
