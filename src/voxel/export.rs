//! OBJ export of voxel grids.
//!
//! The format is the simple face-list dialect the rest of the pipeline
//! reads back: one `v x y z` line per vertex and one `f i j k l` line per
//! quadrilateral face with 1-based vertex indices. Every voxel contributes
//! its 8 corner vertices; which of its 6 faces are written depends on the
//! export variant.

use super::VoxelGrid;
use nalgebra::Point3;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Face index offsets (0-based, relative to the voxel's first vertex) for
/// the inner/outer exports. Order: front (y-), bottom (z-), right (x+),
/// top (z+), left (x-), back (y+).
const FACES: [[usize; 4]; 6] = [
    [0, 3, 2, 1],
    [0, 1, 5, 4],
    [1, 2, 6, 5],
    [2, 3, 7, 6],
    [3, 0, 4, 7],
    [4, 5, 6, 7],
];

/// Face offsets for the per-vote export, wound the opposite way.
const VOTE_FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [0, 4, 5, 1],
    [1, 5, 6, 2],
    [2, 6, 7, 3],
    [3, 7, 4, 0],
    [4, 7, 6, 5],
];

impl VoxelGrid {
    /// Corner vertices of the cell at `(x, y, z)`.
    fn cell_corners(&self, x: usize, y: usize, z: usize) -> [Point3<f64>; 8] {
        [
            self.point_at(x, y, z),
            self.point_at(x + 1, y, z),
            self.point_at(x + 1, y, z + 1),
            self.point_at(x, y, z + 1),
            self.point_at(x, y + 1, z),
            self.point_at(x + 1, y + 1, z),
            self.point_at(x + 1, y + 1, z + 1),
            self.point_at(x, y + 1, z + 1),
        ]
    }

    /// Writes the full voxel model: every face of every voxel, split into
    /// an outer file (cells with value 0) and an inner file (value 1).
    ///
    /// Both files receive the vertices of every voxel so that face indices
    /// stay aligned; only the face lines differ. Either target may be
    /// omitted.
    pub fn write_objs(&self, outer: Option<&Path>, inner: Option<&Path>) -> io::Result<()> {
        let mut out_ext = open_target(outer)?;
        let mut out_int = open_target(inner)?;
        let (nx, ny, nz) = self.dims();

        let mut count = 1usize; // OBJ indices are 1-based
        for x in 0..nx {
            for y in 0..ny {
                for z in 0..nz {
                    let corners = self.cell_corners(x, y, z);
                    write_vertices(&mut out_ext, &corners)?;
                    write_vertices(&mut out_int, &corners)?;

                    let writer = match self.get(x, y, z) {
                        0 => out_ext.as_mut(),
                        1 => out_int.as_mut(),
                        _ => None,
                    };
                    if let Some(w) = writer {
                        for face in &FACES {
                            write_face(w, count, face)?;
                        }
                    }
                    count += 8;
                }
            }
        }
        flush_target(out_ext)?;
        flush_target(out_int)
    }

    /// Writes only the classification shell: a face is emitted when the
    /// neighboring cell across it has a different value, or lies outside
    /// the grid. Interior faces are dropped, which shrinks the output
    /// considerably on compact solids.
    pub fn write_shell_objs(&self, outer: Option<&Path>, inner: Option<&Path>) -> io::Result<()> {
        let mut out_ext = open_target(outer)?;
        let mut out_int = open_target(inner)?;
        let (nx, ny, nz) = self.dims();

        let mut count = 1usize;
        for x in 0..nx {
            for y in 0..ny {
                for z in 0..nz {
                    let corners = self.cell_corners(x, y, z);
                    write_vertices(&mut out_ext, &corners)?;
                    write_vertices(&mut out_int, &corners)?;

                    let value = self.get(x, y, z);
                    let writer = match value {
                        0 => out_ext.as_mut(),
                        1 => out_int.as_mut(),
                        _ => None,
                    };
                    if let Some(w) = writer {
                        // Neighbor lookups per face, in FACES order:
                        // front y-, bottom z-, right x+, top z+, left x-,
                        // back y+.
                        let exposed = [
                            y == 0 || self.get(x, y - 1, z) != value,
                            z == 0 || self.get(x, y, z - 1) != value,
                            x + 1 >= nx || self.get(x + 1, y, z) != value,
                            z + 1 >= nz || self.get(x, y, z + 1) != value,
                            x == 0 || self.get(x - 1, y, z) != value,
                            y + 1 >= ny || self.get(x, y + 1, z) != value,
                        ];
                        for (face, write_it) in FACES.iter().zip(exposed) {
                            if write_it {
                                write_face(w, count, face)?;
                            }
                        }
                    }
                    count += 8;
                }
            }
        }
        flush_target(out_ext)?;
        flush_target(out_int)
    }

    /// Writes one OBJ per vote value 0..=`max_vote`, named
    /// `{basename}_vote_{v}.obj`. Each voxel lands, with all faces, in the
    /// file matching its value; every file keeps its own vertex counter.
    pub fn write_vote_objs(&self, basename: &Path, max_vote: u8) -> io::Result<()> {
        let buckets = usize::from(max_vote) + 1;
        let mut writers = Vec::with_capacity(buckets);
        let mut counts = vec![1usize; buckets];
        for v in 0..buckets {
            let path = vote_file_path(basename, v);
            writers.push(new_writer(&path)?);
        }

        let (nx, ny, nz) = self.dims();
        for x in 0..nx {
            for y in 0..ny {
                for z in 0..nz {
                    let bucket = usize::from(self.get(x, y, z)).min(buckets - 1);
                    let w = &mut writers[bucket];
                    let corners = self.cell_corners(x, y, z);
                    for p in &corners {
                        writeln!(w, "v {} {} {}", p.x, p.y, p.z)?;
                    }
                    for face in &VOTE_FACES {
                        write_face(w, counts[bucket], face)?;
                    }
                    counts[bucket] += 8;
                }
            }
        }
        for mut w in writers {
            w.flush()?;
        }
        Ok(())
    }
}

/// Target path for one vote bucket.
pub fn vote_file_path(basename: &Path, vote: usize) -> PathBuf {
    let mut name = basename.as_os_str().to_os_string();
    name.push(format!("_vote_{vote}.obj"));
    PathBuf::from(name)
}

fn new_writer(path: &Path) -> io::Result<BufWriter<File>> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "# voxel grid export")?;
    Ok(w)
}

fn open_target(path: Option<&Path>) -> io::Result<Option<BufWriter<File>>> {
    path.map(new_writer).transpose()
}

fn write_vertices(w: &mut Option<BufWriter<File>>, corners: &[Point3<f64>; 8]) -> io::Result<()> {
    if let Some(w) = w {
        for p in corners {
            writeln!(w, "v {} {} {}", p.x, p.y, p.z)?;
        }
    }
    Ok(())
}

fn write_face(w: &mut BufWriter<File>, base: usize, offsets: &[usize; 4]) -> io::Result<()> {
    writeln!(
        w,
        "f {} {} {} {}",
        base + offsets[0],
        base + offsets[1],
        base + offsets[2],
        base + offsets[3]
    )
}

fn flush_target(w: Option<BufWriter<File>>) -> io::Result<()> {
    if let Some(mut w) = w {
        w.flush()?;
    }
    Ok(())
}
