//! End-to-end tests for the distance transform pipeline.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use edt_grid::{Grid, IndicatorParams, LabelGrid};
use edt_transform::{
    euclidean_distance_transform, euclidean_distance_transform_with, feature_transform,
    offset_to_feature, signed_euclidean_distance_transform, squared_euclidean_distance_transform,
    voronoi_transform, DistanceTransformBuilder, TransformError, TransformParams,
};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_line_with_two_seeds() {
    let labels = Grid::from_data(vec![5], vec![1, 0, 0, 0, 1]).unwrap();
    let squared =
        squared_euclidean_distance_transform(&labels, &TransformParams::default()).unwrap();
    assert_eq!(squared.data(), &[0.0, 1.0, 4.0, 1.0, 0.0]);
}

#[test]
fn test_single_center_seed_2d() {
    let labels = Grid::from_data(vec![3, 3], vec![0, 0, 0, 0, 1, 0, 0, 0, 0]).unwrap();
    let squared =
        squared_euclidean_distance_transform(&labels, &TransformParams::default()).unwrap();
    // Corners are one diagonal step away, edges one axial step.
    assert_eq!(
        squared.data(),
        &[2.0, 1.0, 2.0, 1.0, 0.0, 1.0, 2.0, 1.0, 2.0]
    );
}

#[test]
fn test_3d_single_seed() {
    let mut data = vec![0u32; 27];
    data[13] = 1; // center of a 3x3x3 grid
    let labels = Grid::from_data(vec![3, 3, 3], data).unwrap();
    let squared =
        squared_euclidean_distance_transform(&labels, &TransformParams::default()).unwrap();
    // Corner voxels differ by one step on every axis.
    assert_eq!(squared.data()[0], 3.0);
    assert_eq!(squared.data()[26], 3.0);
    assert_eq!(squared.data()[13], 0.0);
    // Face centers differ by a single step.
    assert_eq!(squared.data()[4], 1.0);
}

#[test]
fn test_anisotropic_spacing() {
    let labels = Grid::from_data_with_spacing(
        vec![3, 3],
        vec![2.0, 0.5],
        vec![0, 0, 0, 0, 1, 0, 0, 0, 0],
    )
    .unwrap();
    let squared =
        squared_euclidean_distance_transform(&labels, &TransformParams::default()).unwrap();
    // One row step costs 2.0, one column step 0.5.
    assert_close(squared.data()[1], 4.0);
    assert_close(squared.data()[3], 0.25);
    assert_close(squared.data()[0], 4.25);
}

#[test]
fn test_spacing_override_scales_distances() {
    let labels = Grid::from_data(vec![5], vec![1, 0, 0, 0, 0]).unwrap();
    let unit = euclidean_distance_transform(&labels).unwrap();
    let scaled = euclidean_distance_transform_with(
        &labels,
        &TransformParams::with_spacing(vec![3.0]),
    )
    .unwrap();
    for (u, s) in unit.data().iter().zip(scaled.data()) {
        assert_close(*s, u * 3.0);
    }
}

#[test]
fn test_all_background_yields_sentinel_everywhere() {
    let labels = Grid::from_data(vec![4, 4], vec![0; 16]).unwrap();
    let sentinel = IndicatorParams::default().resolve_sentinel(&labels).unwrap();
    let distance = euclidean_distance_transform(&labels).unwrap();
    for &d in distance.data() {
        assert_eq!(d, sentinel.sqrt());
    }
}

#[test]
fn test_voronoi_two_labels() {
    let mut data = vec![0u32; 25];
    data[0] = 7; // top-left corner
    data[24] = 9; // bottom-right corner
    let labels = Grid::from_data(vec![5, 5], data).unwrap();
    let (distance, voronoi) = voronoi_transform(&labels, &TransformParams::default()).unwrap();

    for (i, &winner) in voronoi.data().iter().enumerate() {
        let coords = voronoi.delinearize(i);
        let d7 = ((coords[0] * coords[0] + coords[1] * coords[1]) as f64).sqrt();
        let d9 = (((4 - coords[0]).pow(2) + (4 - coords[1]).pow(2)) as f64).sqrt();
        let expected = if d7 < d9 {
            7
        } else if d9 < d7 {
            9
        } else {
            winner // either corner is a valid nearest voxel on ties
        };
        assert_eq!(winner, expected, "voxel {coords:?}");
        assert_close(distance.data()[i], d7.min(d9));
    }
}

#[test]
fn test_feature_transform_offsets() {
    let labels =
        Grid::from_data_with_spacing(vec![4], vec![0.5], vec![0, 0, 1, 0]).unwrap();
    let (_, features) = feature_transform(&labels, &TransformParams::default()).unwrap();
    assert_eq!(offset_to_feature(&features, &[0]), vec![1.0]);
    assert_eq!(offset_to_feature(&features, &[2]), vec![0.0]);
    assert_eq!(offset_to_feature(&features, &[3]), vec![-0.5]);
}

#[test]
fn test_signed_block() {
    let mut data = vec![0u32; 49];
    for row in 2..5 {
        for col in 2..5 {
            data[row * 7 + col] = 1;
        }
    }
    let labels = Grid::from_data(vec![7, 7], data).unwrap();
    let signed = signed_euclidean_distance_transform(&labels).unwrap();

    // Center of the block sits one step inside the boundary ring.
    assert_close(*signed.at(&[3, 3]), -1.0);
    // Boundary voxels are at distance zero.
    assert_close(*signed.at(&[2, 2]), 0.0);
    // Background voxel adjacent to the block face.
    assert_close(*signed.at(&[1, 3]), 1.0);
    // Background corner is a diagonal step from the block corner.
    assert_close(*signed.at(&[1, 1]), 2.0_f64.sqrt());
}

#[test]
fn test_builder_full_pipeline() {
    let mut data = vec![0u32; 64];
    data[0] = 3;
    let labels = Grid::from_data(vec![8, 8], data).unwrap();

    let result = DistanceTransformBuilder::new(&labels)
        .spacing(vec![1.0, 2.0])
        .voronoi(true)
        .build()
        .unwrap();

    let voronoi = result.voronoi.expect("voronoi was requested");
    assert!(voronoi.data().iter().all(|&l| l == 3));
    assert_close(*result.distance.at(&[0, 0]), 0.0);
    assert_close(*result.distance.at(&[1, 1]), (1.0f64 + 4.0).sqrt());
    assert_eq!(result.stats.voxels, 64);
    assert_eq!(result.stats.axes, 2);
}

#[test]
fn test_builder_progress_reports_and_cancels() {
    let mut data = vec![0u32; 100];
    data[0] = 1;
    let labels = Grid::from_data(vec![10, 10], data).unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let result = DistanceTransformBuilder::new(&labels)
        .with_progress(Box::new(move |p| {
            seen.fetch_add(1, Ordering::SeqCst);
            assert!(p.fraction() <= 1.0);
            true
        }))
        .build()
        .unwrap();
    assert!(calls.load(Ordering::SeqCst) > 0);
    assert_close(*result.distance.at(&[0, 0]), 0.0);

    let err = DistanceTransformBuilder::new(&labels)
        .with_progress(Box::new(|_| false))
        .build()
        .unwrap_err();
    assert!(matches!(err, TransformError::Cancelled { .. }));
}

#[test]
fn test_error_codes_are_stable() {
    let labels: LabelGrid = Grid::from_data(vec![3], vec![1, 0, 0]).unwrap();
    let err = DistanceTransformBuilder::new(&labels)
        .sentinel(f64::NAN)
        .build()
        .unwrap_err();
    assert_eq!(err.code().as_str(), "EDT-1001");

    let err = DistanceTransformBuilder::new(&labels)
        .signed(true)
        .squared(true)
        .build()
        .unwrap_err();
    assert_eq!(err.code().as_str(), "EDT-1002");
}

#[test]
fn test_grid_serde_round_trip() {
    let labels = Grid::from_data_with_spacing(vec![2, 3], vec![1.0, 0.5], vec![1, 0, 0, 0, 0, 2])
        .unwrap();
    let distance = euclidean_distance_transform(&labels).unwrap();
    let json = serde_json::to_string(&distance).unwrap();
    let restored: Grid<f64> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, distance);
}
