use crate::core::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Immediate subdirectories of `root`, sorted by name.
pub fn list_subdirs(root: &Path) -> Result<Vec<PathBuf>> {
    list_children(root, |path| path.is_dir())
}

/// `*.json` files directly inside `dir`, sorted by name.
pub fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    list_children(dir, |path| {
        path.is_file() && path.extension().is_some_and(|ext| ext == "json")
    })
}

fn list_children(root: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| Error::file_system(e.to_string(), root))?;
        let path = entry.path();
        if keep(path) {
            paths.push(path.to_path_buf());
        }
    }

    Ok(paths)
}

/// Final path component as an owned string.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
