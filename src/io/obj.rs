//! OBJ face-list input and output.
//!
//! The reader understands the subset of Wavefront OBJ the voxel pipeline
//! produces and consumes: `v x y z` vertex lines and `f i j k…` face lines
//! with 1-based indices (attribute suffixes like `5/1/3` are tolerated and
//! stripped). Everything else is ignored. Each face becomes one hole-free
//! boundary polygon.

use crate::geometry::{Polygon, Ring, Tolerances};
use log::warn;
use nalgebra::Point3;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Reads an OBJ file into boundary polygons.
///
/// Faces that cannot form a usable polygon (out-of-range indices, fewer
/// than 3 vertices, collinear leading vertices) are skipped with a warning
/// so that one bad face does not sink the whole object.
pub fn read_obj_polygons(path: &Path, tol: &Tolerances) -> Result<Vec<Polygon>, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read OBJ {}: {e}", path.display()))?;

    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut polygons = Vec::new();

    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("v ") {
            let v = parse_vertex(rest)
                .ok_or_else(|| format!("{}:{}: malformed vertex", path.display(), lineno + 1))?;
            vertices.push(v);
        } else if let Some(rest) = line.strip_prefix("f ") {
            match parse_face(rest, &vertices) {
                Ok(points) => match build_polygon(points, tol) {
                    Ok(poly) => polygons.push(poly),
                    Err(e) => warn!("{}:{}: skipping face: {e}", path.display(), lineno + 1),
                },
                Err(e) => warn!("{}:{}: skipping face: {e}", path.display(), lineno + 1),
            }
        }
    }
    Ok(polygons)
}

/// Writes a polygon soup as a single OBJ: the exterior ring of each polygon
/// becomes one face. A debugging aid; holes are not written.
pub fn write_polygon_obj(path: &Path, polygons: &[Polygon]) -> Result<(), String> {
    let file = fs::File::create(path)
        .map_err(|e| format!("Failed to create OBJ {}: {e}", path.display()))?;
    let mut w = std::io::BufWriter::new(file);
    let io_err = |e: std::io::Error| format!("Failed to write OBJ {}: {e}", path.display());

    writeln!(w, "# polygon soup export").map_err(io_err)?;
    let mut count = 1usize;
    for poly in polygons {
        let points = poly.exterior().points();
        let mut face = String::from("f");
        for p in points {
            writeln!(w, "v {} {} {}", p.x, p.y, p.z).map_err(io_err)?;
            face.push_str(&format!(" {count}"));
            count += 1;
        }
        writeln!(w, "{face}").map_err(io_err)?;
    }
    w.flush().map_err(io_err)
}

fn parse_vertex(rest: &str) -> Option<Point3<f64>> {
    let mut it = rest.split_whitespace();
    let x = it.next()?.parse().ok()?;
    let y = it.next()?.parse().ok()?;
    let z = it.next()?.parse().ok()?;
    Some(Point3::new(x, y, z))
}

fn parse_face(rest: &str, vertices: &[Point3<f64>]) -> Result<Vec<Point3<f64>>, String> {
    let mut points = Vec::new();
    for token in rest.split_whitespace() {
        // `f 5/1/3` style tokens: only the vertex index matters here.
        let index_part = token.split('/').next().unwrap_or(token);
        let index: usize = index_part
            .parse()
            .map_err(|_| format!("bad face index {index_part:?}"))?;
        let point = vertices
            .get(index.checked_sub(1).ok_or_else(|| "face index 0".to_string())?)
            .ok_or_else(|| format!("face index {index} out of range"))?;
        points.push(*point);
    }
    Ok(points)
}

fn build_polygon(points: Vec<Point3<f64>>, tol: &Tolerances) -> Result<Polygon, String> {
    let ring = Ring::new(points).map_err(|e| e.to_string())?;
    Polygon::from_exterior(ring, *tol).map_err(|e| e.to_string())
}
