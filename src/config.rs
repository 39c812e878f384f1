//! Runtime configuration for the batch binary.

use crate::batch::BatchOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level JSON config: where the OBJ files live plus the batch options.
#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    /// Directory containing one `.obj` file per object.
    pub input_dir: PathBuf,
    /// Optional JSON report target (full per-object records).
    #[serde(default)]
    pub json_out: Option<PathBuf>,
    #[serde(default)]
    pub batch: BatchOptions,
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}
