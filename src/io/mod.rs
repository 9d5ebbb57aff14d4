pub mod loader;
pub mod output;
pub mod walker;

pub use loader::{load_gestures, load_hierarchies, HierarchyMiss, HierarchyStore, TraceInput};
pub use output::{write_json, write_matches, write_summary};
pub use walker::{list_json_files, list_subdirs};

use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

pub fn dir_exists(path: &Path) -> bool {
    path.exists() && path.is_dir()
}
