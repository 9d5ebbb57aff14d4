//! Materializes one trace directory: its gestures and hierarchy files.
//!
//! Loading never fails a trace outright. An unreadable gesture file leaves
//! the trace without gestures; an unreadable hierarchy file is remembered so
//! gestures that depend on it can be reported.

use super::walker::{file_name, list_json_files};
use crate::config::DatasetConfig;
use crate::core::{
    Error, GestureSet, HierarchyDocument, Result, ResultExt, SkipReason, UiNode,
};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Why a gesture's hierarchy could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyMiss {
    pub reason: SkipReason,
    pub detail: String,
}

#[derive(Debug, Clone)]
enum HierarchyEntry {
    /// Parsed; `None` when the document had no usable root
    Parsed(Option<UiNode>),
    Unreadable(String),
}

/// Hierarchy files of one trace, keyed by file stem (the gesture id).
#[derive(Debug, Clone, Default)]
pub struct HierarchyStore {
    entries: HashMap<String, HierarchyEntry>,
}

impl HierarchyStore {
    /// Number of hierarchy files seen, readable or not.
    pub fn ui_files(&self) -> usize {
        self.entries.len()
    }

    pub fn insert_root(&mut self, id: impl Into<String>, root: Option<UiNode>) {
        self.entries.insert(id.into(), HierarchyEntry::Parsed(root));
    }

    pub fn insert_unreadable(&mut self, id: impl Into<String>, error: impl Into<String>) {
        self.entries
            .insert(id.into(), HierarchyEntry::Unreadable(error.into()));
    }

    /// Root node of the hierarchy captured with gesture `id`.
    pub fn root_for(&self, id: &str) -> std::result::Result<&UiNode, HierarchyMiss> {
        match self.entries.get(id) {
            Some(HierarchyEntry::Parsed(Some(root))) => Ok(root),
            Some(HierarchyEntry::Parsed(None)) => Err(HierarchyMiss {
                reason: SkipReason::EmptyHierarchy,
                detail: format!("Empty or invalid view hierarchy for {id}.json"),
            }),
            Some(HierarchyEntry::Unreadable(error)) => Err(HierarchyMiss {
                reason: SkipReason::MissingHierarchy,
                detail: format!("Unreadable view hierarchy {id}.json: {error}"),
            }),
            None => Err(HierarchyMiss {
                reason: SkipReason::MissingHierarchy,
                detail: format!("No view hierarchy found for {id}.json"),
            }),
        }
    }
}

/// Everything the trace processor needs from one trace directory.
#[derive(Debug, Clone, Default)]
pub struct TraceInput {
    pub name: String,
    pub gestures: GestureSet,
    pub hierarchies: HierarchyStore,
    pub has_hierarchy_dir: bool,
}

impl TraceInput {
    pub fn load(trace_dir: &Path, dataset: &DatasetConfig) -> Self {
        let name = file_name(trace_dir);
        let gestures = match load_gestures(&trace_dir.join(&dataset.gestures_file)) {
            Ok(gestures) => gestures,
            Err(e) => {
                tracing::warn!(trace = %name, "Skipping gestures: {e}");
                GestureSet::default()
            }
        };

        let hierarchy_dir = trace_dir.join(&dataset.hierarchies_dir);
        let has_hierarchy_dir = super::dir_exists(&hierarchy_dir);
        let hierarchies = if has_hierarchy_dir {
            load_hierarchies(&hierarchy_dir).unwrap_or_else(|e| {
                tracing::warn!(trace = %name, "Cannot list hierarchies: {e}");
                HierarchyStore::default()
            })
        } else {
            HierarchyStore::default()
        };

        Self {
            name,
            gestures,
            hierarchies,
            has_hierarchy_dir,
        }
    }
}

pub fn load_gestures(path: &Path) -> Result<GestureSet> {
    let content = fs::read_to_string(path).map_err(|e| Error::io_at(path, e))?;
    serde_json::from_str(&content)
        .map_err(Error::from)
        .context(format!("Invalid gestures file {}", path.display()))
}

/// Loads every `*.json` file in `dir`. Files that cannot be read or parsed
/// are kept as unreadable entries.
pub fn load_hierarchies(dir: &Path) -> Result<HierarchyStore> {
    let mut store = HierarchyStore::default();
    for path in list_json_files(dir)? {
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        match load_hierarchy(&path) {
            Ok(root) => store.insert_root(id, root),
            Err(e) => {
                tracing::debug!(file = %path.display(), "Unreadable hierarchy: {e}");
                store.insert_unreadable(id, e.to_string());
            }
        }
    }
    Ok(store)
}

fn load_hierarchy(path: &Path) -> Result<Option<UiNode>> {
    let content = fs::read_to_string(path).map_err(|e| Error::io_at(path, e))?;
    let document: HierarchyDocument = serde_json::from_str(&content)?;
    Ok(document.into_root())
}
