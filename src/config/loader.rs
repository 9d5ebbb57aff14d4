use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::{GesturemapConfig, ResolutionConfig};
use crate::core::{Error, ReferenceResolution, Result};

pub const CONFIG_FILE_NAME: &str = ".gesturemap.toml";
const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parses a config document and repairs invalid values.
pub fn parse_and_validate_config(contents: &str) -> std::result::Result<GesturemapConfig, String> {
    let mut config = toml::from_str::<GesturemapConfig>(contents)
        .map_err(|e| format!("Failed to parse {CONFIG_FILE_NAME}: {e}"))?;

    if !ReferenceResolution::from(config.resolution).is_valid() {
        log::warn!(
            "Invalid resolution {}x{}. Using defaults.",
            config.resolution.width,
            config.resolution.height
        );
        config.resolution = ResolutionConfig::default();
    }

    Ok(config)
}

/// Loads an explicitly requested config file. Unlike discovery, a missing
/// or malformed file is an error.
pub fn load_config_from_path(path: &Path) -> Result<GesturemapConfig> {
    let contents = read_config_file(path).map_err(|e| Error::io_at(path, e))?;
    let config = parse_and_validate_config(&contents).map_err(Error::Configuration)?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<GesturemapConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{e}. Using defaults.");
            None
        }
    }
}

/// Only real failures are logged; a missing file is the normal case.
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// `start` and up to `max_depth - 1` of its ancestors.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Finds the nearest `.gesturemap.toml` at or above `start`.
pub fn discover_config(start: PathBuf) -> GesturemapConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            GesturemapConfig::default()
        })
}

/// Discovers the config starting from the working directory.
pub fn load_config() -> GesturemapConfig {
    match std::env::current_dir() {
        Ok(dir) => discover_config(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            GesturemapConfig::default()
        }
    }
}
