use crate::core::MatchRecord;
use parking_lot::Mutex;
use std::collections::HashSet;

/// Identity of a match for deduplication: structurally identical taps on
/// the same UI of the same app collapse into one observation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub app: String,
    pub ui: String,
    pub class: String,
    pub ancestors: Vec<String>,
    pub siblings: Vec<String>,
    pub clickable: bool,
}

impl DedupKey {
    pub fn new(app: &str, record: &MatchRecord) -> Self {
        let component = &record.component;
        Self {
            app: app.to_string(),
            ui: record.ui.clone(),
            class: component.class.clone(),
            ancestors: component.ancestors.clone(),
            siblings: component.siblings.clone(),
            clickable: component.clickable,
        }
    }
}

/// Run-wide set of keys already emitted. Check-and-insert is a single
/// critical section.
#[derive(Debug, Default)]
pub struct DedupIndex {
    seen: Mutex<HashSet<DedupKey>>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key`; returns false when it was already present.
    pub fn insert(&self, key: DedupKey) -> bool {
        self.seen.lock().insert(key)
    }

    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.lock().is_empty()
    }
}
