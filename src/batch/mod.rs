//! Parallel batch driver: one estimator run per object on a bounded pool.
//!
//! Every task owns an immutable snapshot of the options (with per-object
//! export paths derived up front) and its own voxel grid; nothing mutable is
//! shared across tasks. A failing object produces an explicit error outcome
//! instead of disappearing, and its siblings keep running. Results are
//! collected positionally, so the output order matches the input order even
//! though completion order is unspecified.

use crate::estimator::{EstimatorError, EstimatorOptions, VolumeEstimator};
use crate::io::obj::read_obj_polygons;
use crate::types::{ObjectInput, ObjectOutcome, ObjectReport};
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Batch-level configuration wrapping the per-object estimator options.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    pub estimator: EstimatorOptions,
    /// Worker threads processing objects concurrently.
    pub workers: usize,
    /// Compute expectation-value volumes (raw votes + histogram) instead
    /// of binary-threshold volumes.
    pub probability: bool,
    /// When set, result records append to `{log_basename}{voxel_size}.log`.
    pub log_basename: Option<PathBuf>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            estimator: EstimatorOptions::default(),
            workers: 1,
            probability: false,
            log_basename: None,
        }
    }
}

impl BatchOptions {
    pub fn validate(&self) -> Result<(), EstimatorError> {
        self.estimator.validate()?;
        if self.workers == 0 {
            return Err(EstimatorError::Options(
                crate::estimator::OptionsError::Workers,
            ));
        }
        Ok(())
    }

    /// Path of the result log for the configured voxel size.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_basename.as_ref().map(|base| {
            let mut name = base.as_os_str().to_os_string();
            name.push(format!("{}.log", self.estimator.voxel_size));
            PathBuf::from(name)
        })
    }
}

/// Runs one estimator per object on a pool of `workers` threads.
pub fn run_batch(
    objects: Vec<ObjectInput>,
    options: &BatchOptions,
) -> Result<Vec<ObjectOutcome>, EstimatorError> {
    options.validate()?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers)
        .build()
        .map_err(|e| EstimatorError::WorkerPool(e.to_string()))?;

    let outcomes = pool.install(|| {
        objects
            .into_par_iter()
            .map(|object| process_object(object, options))
            .collect()
    });
    Ok(outcomes)
}

/// Runs the batch over every `.obj` file in a directory (object id = file
/// stem) and appends result records to the configured log.
pub fn run_directory(dir: &Path, options: &BatchOptions) -> Result<Vec<ObjectOutcome>, String> {
    options.validate().map_err(|e| e.to_string())?;
    let mut objects = Vec::new();
    let entries =
        fs::read_dir(dir).map_err(|e| format!("Failed to read {}: {e}", dir.display()))?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "obj"))
        .collect();
    paths.sort();

    for path in paths {
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match read_obj_polygons(&path, &options.estimator.tolerances) {
            Ok(polygons) => objects.push(ObjectInput { id, polygons }),
            Err(e) => warn!("skipping {id}: {e}"),
        }
    }
    info!("batch of {} objects from {}", objects.len(), dir.display());

    let outcomes = run_batch(objects, options).map_err(|e| e.to_string())?;
    if let Some(log_path) = options.log_path() {
        // A broken result log costs the records, not the batch.
        if let Err(e) = append_result_log(&log_path, &outcomes) {
            warn!("{e}");
        }
    }
    Ok(outcomes)
}

/// One object, start to finish: snapshot options, derive export targets,
/// time the computation, collect the report.
fn process_object(object: ObjectInput, options: &BatchOptions) -> ObjectOutcome {
    let ObjectInput { id, polygons } = object;
    let mut estimator_options = options.estimator.clone();
    if estimator_options.export.full || estimator_options.export.shell {
        let prefix = format!("{}_{}", id, estimator_options.voxel_size);
        estimator_options.export.inner_path = Some(PathBuf::from(format!("{prefix}inner.obj")));
        estimator_options.export.outer_path = Some(PathBuf::from(format!("{prefix}outer.obj")));
    }

    let started = Instant::now();
    let result = VolumeEstimator::new(estimator_options).and_then(|estimator| {
        if options.probability {
            let estimate = estimator.compute_expectation(&polygons)?;
            Ok(ObjectReport {
                id: id.clone(),
                volume: estimate.volume,
                elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
                vote_counts: Some(estimate.grid.vote_histogram()),
            })
        } else {
            let estimate = estimator.compute(&polygons)?;
            Ok(ObjectReport {
                id: id.clone(),
                volume: estimate.volume,
                elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
                vote_counts: None,
            })
        }
    });

    if let Err(e) = &result {
        warn!("object {id} failed: {e}");
    }
    ObjectOutcome { id, result }
}

/// Appends one line per successful object to the result log:
/// `id, volume, elapsed_ms` plus the seven vote counts in probability mode.
/// Failed objects are skipped (their error is already logged).
pub fn append_result_log(path: &Path, outcomes: &[ObjectOutcome]) -> Result<(), String> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("Failed to open result log {}: {e}", path.display()))?;
    for outcome in outcomes {
        let Some(report) = outcome.report() else {
            continue;
        };
        let mut line = format!(
            "{}, {}, {:.3}",
            report.id, report.volume, report.elapsed_ms
        );
        if let Some(counts) = &report.vote_counts {
            for c in counts {
                line.push_str(&format!(", {c}"));
            }
        }
        writeln!(file, "{line}")
            .map_err(|e| format!("Failed to write result log {}: {e}", path.display()))?;
    }
    Ok(())
}
