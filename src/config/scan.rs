//! JSON runtime configuration for the demo tool.

use crate::scanner::ScanParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Where to write the JSON scan report, if anywhere.
    pub json_out: Option<PathBuf>,
    /// Where to save the rectified grid PNG.
    pub rectified_image: Option<PathBuf>,
    /// Where to save the blob-rect overlay PNG.
    pub blob_overlay: Option<PathBuf>,
}

#[derive(Clone, Deserialize)]
pub struct RuntimeConfig {
    pub input_path: PathBuf,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub scan: ScanParams,
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}
