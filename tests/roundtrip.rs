mod common;

use common::{box_polygons, scratch_path};
use nalgebra::Point3;
use std::fs;
use voxcell::io::obj::read_obj_polygons;
use voxcell::voxel::vote_file_path;
use voxcell::{EstimatorOptions, Tolerances, VolumeEstimator};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Checks that every vertex of every polygon sits on the voxel lattice.
fn assert_on_lattice(polygons: &[voxcell::Polygon], origin: Point3<f64>, voxel_size: f64) {
    for poly in polygons {
        for p in poly.exterior().points() {
            for i in 0..3 {
                let steps = (p[i] - origin[i]) / voxel_size;
                assert!(
                    (steps - steps.round()).abs() < 1e-9,
                    "vertex {p:?} off the lattice"
                );
            }
        }
    }
}

#[test]
fn full_export_roundtrips_through_the_reader() {
    init_logging();
    let polys = box_polygons(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 2.0, 2.0));
    let estimator = VolumeEstimator::new(EstimatorOptions::default()).unwrap();
    let estimate = estimator.compute(&polys).unwrap();

    let inner = scratch_path("full-inner.obj");
    let outer = scratch_path("full-outer.obj");
    estimate
        .grid
        .write_objs(Some(outer.as_path()), Some(inner.as_path()))
        .unwrap();

    let inside = read_obj_polygons(&inner, &Tolerances::default()).unwrap();
    // 8 inside voxels, 6 quad faces each.
    assert_eq!(inside.len(), 48);
    for poly in &inside {
        assert_eq!(poly.exterior().points().len(), 4);
    }
    assert_on_lattice(&inside, estimate.grid.origin(), estimate.grid.voxel_size());

    let outside = read_obj_polygons(&outer, &Tolerances::default()).unwrap();
    let expected_outside = (estimate.grid.len() - 8) * 6;
    assert_eq!(outside.len(), expected_outside);

    fs::remove_file(&inner).ok();
    fs::remove_file(&outer).ok();
}

#[test]
fn shell_export_drops_interior_faces() {
    init_logging();
    let polys = box_polygons(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 2.0, 2.0));
    let estimator = VolumeEstimator::new(EstimatorOptions::default()).unwrap();
    let estimate = estimator.compute(&polys).unwrap();

    let inner = scratch_path("shell-inner.obj");
    estimate
        .grid
        .write_shell_objs(None, Some(inner.as_path()))
        .unwrap();

    let shell = read_obj_polygons(&inner, &Tolerances::default()).unwrap();
    // The 2x2x2 inside block exposes 3 faces per corner voxel.
    assert_eq!(shell.len(), 24);
    assert_on_lattice(&shell, estimate.grid.origin(), estimate.grid.voxel_size());

    fs::remove_file(&inner).ok();
}

#[test]
fn vote_export_buckets_by_value() {
    init_logging();
    let polys = box_polygons(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 2.0, 2.0));
    let estimator = VolumeEstimator::new(EstimatorOptions::default()).unwrap();
    let estimate = estimator.compute_expectation(&polys).unwrap();

    let base = scratch_path("votes");
    estimate.grid.write_vote_objs(&base, 6).unwrap();

    let tol = Tolerances::default();
    let full_vote = read_obj_polygons(&vote_file_path(&base, 6), &tol).unwrap();
    assert_eq!(full_vote.len(), 48);
    let no_vote = read_obj_polygons(&vote_file_path(&base, 0), &tol).unwrap();
    assert_eq!(no_vote.len(), (estimate.grid.len() - 8) * 6);
    // The clean box casts no partial votes; the middle buckets stay empty.
    for v in 1..=5 {
        let bucket = read_obj_polygons(&vote_file_path(&base, v), &tol).unwrap();
        assert!(bucket.is_empty(), "unexpected voxels with vote {v}");
    }

    for v in 0..=6 {
        fs::remove_file(vote_file_path(&base, v)).ok();
    }
}
