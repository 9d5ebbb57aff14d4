use crate::core::ReferenceResolution;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::parallel::ParallelConfig;

/// Root of `.gesturemap.toml`. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GesturemapConfig {
    pub resolution: ResolutionConfig,
    pub dataset: DatasetConfig,
    pub output: OutputConfig,
    pub parallel: ParallelConfig,
}

/// Screen size gesture coordinates are scaled against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolutionConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        let reference = ReferenceResolution::default();
        Self {
            width: reference.width,
            height: reference.height,
        }
    }
}

impl From<ResolutionConfig> for ReferenceResolution {
    fn from(config: ResolutionConfig) -> Self {
        ReferenceResolution::new(config.width, config.height)
    }
}

/// Directory and file names inside the dataset root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DatasetConfig {
    /// Holds one directory per app
    pub traces_dir: String,
    pub gestures_file: String,
    pub hierarchies_dir: String,
    /// Only the first N traces (sorted by name) of each app
    pub max_traces: Option<usize>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            traces_dir: "filtered_traces".into(),
            gestures_file: "gestures.json".into(),
            hierarchies_dir: "view_hierarchies".into(),
            max_traces: None,
        }
    }
}

/// Output destinations. Matches go to stdout when unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    pub matches_path: Option<PathBuf>,
    pub diagnostics_path: PathBuf,
    pub summary_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            matches_path: None,
            diagnostics_path: PathBuf::from("skipped_log.csv"),
            summary_path: None,
        }
    }
}
