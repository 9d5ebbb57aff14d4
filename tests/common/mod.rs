#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Root `[0,0,1440,2560]` with a single `Button` leaf at `[100,100,500,300]`.
pub const BUTTON_SCREEN: &str = r#"{"activity": {"root": {
    "class": "Root",
    "bounds": [0, 0, 1440, 2560],
    "children": [
        {"class": "Button", "bounds": [100, 100, 500, 300], "clickable": true}
    ]
}}}"#;

/// Builds a dataset tree laid out as
/// `<root>/filtered_traces/<app>/<trace>/{gestures.json, view_hierarchies/}`.
pub struct DatasetBuilder {
    dir: TempDir,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir_all(dir.path().join("filtered_traces"))
            .expect("Failed to create traces directory");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn trace_dir(&self, app: &str, trace: &str) -> PathBuf {
        self.dir.path().join("filtered_traces").join(app).join(trace)
    }

    pub fn gestures(self, app: &str, trace: &str, json: &str) -> Self {
        let dir = self.trace_dir(app, trace);
        fs::create_dir_all(&dir).expect("Failed to create trace directory");
        fs::write(dir.join("gestures.json"), json).expect("Failed to write gestures");
        self
    }

    pub fn hierarchy(self, app: &str, trace: &str, id: &str, json: &str) -> Self {
        let dir = self.trace_dir(app, trace).join("view_hierarchies");
        fs::create_dir_all(&dir).expect("Failed to create hierarchy directory");
        fs::write(dir.join(format!("{id}.json")), json).expect("Failed to write hierarchy");
        self
    }

    /// Creates an app directory with a trace that has no files at all.
    pub fn empty_trace(self, app: &str, trace: &str) -> Self {
        fs::create_dir_all(self.trace_dir(app, trace)).expect("Failed to create trace directory");
        self
    }
}
