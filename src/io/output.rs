use crate::pipeline::{AppResult, RunSummary};
use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Pretty-prints `value` to `path`, or to stdout when no path is given.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    if let Some(path) = path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            super::ensure_dir(parent)?;
        }
        let mut file = fs::File::create(path)?;
        file.write_all(json.as_bytes())?;
    } else {
        println!("{json}");
    }
    Ok(())
}

pub fn write_matches(apps: &[AppResult], path: Option<&Path>) -> Result<()> {
    log::info!("Saving {} app entries", apps.len());
    write_json(apps, path)
}

pub fn write_summary(summary: &RunSummary, path: Option<&Path>) -> Result<()> {
    write_json(summary, path)
}
