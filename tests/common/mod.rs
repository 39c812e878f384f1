// Not every integration test uses every helper.
#![allow(dead_code)]

use nalgebra::Point3;
use voxcell::{Polygon, Ring, Tolerances};

/// Six axis-aligned quads bounding the box `[min, max]`.
pub fn box_polygons(min: Point3<f64>, max: Point3<f64>) -> Vec<Polygon> {
    let (x0, y0, z0) = (min.x, min.y, min.z);
    let (x1, y1, z1) = (max.x, max.y, max.z);
    let quads = vec![
        // z = z0 and z = z1
        vec![
            Point3::new(x0, y0, z0),
            Point3::new(x1, y0, z0),
            Point3::new(x1, y1, z0),
            Point3::new(x0, y1, z0),
        ],
        vec![
            Point3::new(x0, y0, z1),
            Point3::new(x1, y0, z1),
            Point3::new(x1, y1, z1),
            Point3::new(x0, y1, z1),
        ],
        // y = y0 and y = y1
        vec![
            Point3::new(x0, y0, z0),
            Point3::new(x1, y0, z0),
            Point3::new(x1, y0, z1),
            Point3::new(x0, y0, z1),
        ],
        vec![
            Point3::new(x0, y1, z0),
            Point3::new(x1, y1, z0),
            Point3::new(x1, y1, z1),
            Point3::new(x0, y1, z1),
        ],
        // x = x0 and x = x1
        vec![
            Point3::new(x0, y0, z0),
            Point3::new(x0, y1, z0),
            Point3::new(x0, y1, z1),
            Point3::new(x0, y0, z1),
        ],
        vec![
            Point3::new(x1, y0, z0),
            Point3::new(x1, y1, z0),
            Point3::new(x1, y1, z1),
            Point3::new(x1, y0, z1),
        ],
    ];
    quads_to_polygons(quads)
}

/// Same box with the `z = max.z` face removed: a "leaky" solid the
/// multi-directional vote is designed to survive.
pub fn open_box_polygons(min: Point3<f64>, max: Point3<f64>) -> Vec<Polygon> {
    let mut polys = box_polygons(min, max);
    polys.remove(1);
    polys
}

fn quads_to_polygons(quads: Vec<Vec<Point3<f64>>>) -> Vec<Polygon> {
    let tol = Tolerances::default();
    quads
        .into_iter()
        .map(|q| Polygon::from_exterior(Ring::new(q).unwrap(), tol).unwrap())
        .collect()
}

/// Unique scratch path under the system temp directory.
pub fn scratch_path(name: &str) -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("voxcell-test-{}-{name}", std::process::id()));
    dir
}
