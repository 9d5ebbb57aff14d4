//! Run-level orchestration: discovers apps, spreads them over rayon's
//! thread pool, and folds the per-app counters into a [`RunSummary`].
//!
//! Apps share nothing but the dedup index and the diagnostics sink. An app
//! that cannot be listed is logged and left out; a cancelled run simply
//! omits the apps that had not started.

use super::app::{AppProcessor, AppResult};
use super::dedup::DedupIndex;
use super::trace::TraceStats;
use crate::config::GesturemapConfig;
use crate::core::{ReferenceResolution, Result};
use crate::diagnostics::DiagnosticsSink;
use crate::io::list_subdirs;
use crate::io::walker::file_name;
use crate::observability::{
    increment_processed, set_current_app, set_phase_persistent, set_progress, MatchPhase,
};
use chrono::{DateTime, Utc};
use comfy_table::{presets::UTF8_FULL, Table};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const PROGRESS_TEMPLATE: &str = "{spinner} Matching apps [{bar:40}] {pos}/{len} ({eta})";

/// Totals of one run, written next to the matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub total_apps: usize,
    /// Apps with at least one match
    pub matching_apps: usize,
    pub total_traces: usize,
    pub total_hierarchy_dirs: usize,
    pub total_ui_files: usize,
    pub total_matched: usize,
    pub total_duplicates: usize,
    pub total_skipped_gestures: usize,
    pub total_skipped_hierarchies: usize,
    pub total_diagnostics: usize,
    pub cancelled: bool,
}

impl RunSummary {
    pub fn from_results(total_apps: usize, apps: &[AppResult], cancelled: bool) -> Self {
        let mut totals = TraceStats::default();
        for app in apps {
            totals += app.stats;
        }

        Self {
            generated_at: Utc::now(),
            total_apps,
            matching_apps: apps.iter().filter(|app| app.has_matches()).count(),
            total_traces: totals.traces,
            total_hierarchy_dirs: totals.hierarchy_dirs,
            total_ui_files: totals.ui_files,
            total_matched: totals.matched,
            total_duplicates: totals.duplicates,
            total_skipped_gestures: totals.skipped_gestures,
            total_skipped_hierarchies: totals.skipped_hierarchies,
            total_diagnostics: totals.diagnostics(),
            cancelled,
        }
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);

        let rows = [
            ("Apps", self.total_apps),
            ("Apps with matches", self.matching_apps),
            ("Traces", self.total_traces),
            ("Hierarchy directories", self.total_hierarchy_dirs),
            ("UI files", self.total_ui_files),
            ("Matched gestures", self.total_matched),
            ("Duplicate matches", self.total_duplicates),
            ("Skipped gestures", self.total_skipped_gestures),
            ("Skipped hierarchies", self.total_skipped_hierarchies),
            ("Diagnostics entries", self.total_diagnostics),
        ];
        for (label, value) in rows {
            table.add_row(vec![label.to_string(), value.to_string()]);
        }
        table
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_table())
    }
}

#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub apps: Vec<AppResult>,
    pub summary: RunSummary,
}

pub struct BatchOrchestrator {
    config: GesturemapConfig,
    show_progress: bool,
    cancel: Arc<AtomicBool>,
}

impl BatchOrchestrator {
    pub fn new(config: GesturemapConfig) -> Self {
        Self {
            config,
            show_progress: false,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Draws a progress bar on stderr. It stays hidden when stderr is not
    /// a terminal.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn config(&self) -> &GesturemapConfig {
        &self.config
    }

    /// Shared flag; setting it stops the run before the next app starts.
    pub fn cancellation_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// App directories under `<root>/<traces_dir>`, sorted by name.
    pub fn discover_apps(&self, root: &Path) -> Result<Vec<PathBuf>> {
        list_subdirs(&root.join(&self.config.dataset.traces_dir))
    }

    pub fn run(&self, root: &Path, diagnostics: &dyn DiagnosticsSink) -> Result<BatchOutput> {
        set_phase_persistent(MatchPhase::Discovery);
        let apps = self.discover_apps(root)?;
        log::info!("Found {} apps under {}", apps.len(), root.display());
        set_progress(0, apps.len());

        let dedup = DedupIndex::new();
        let resolution = ReferenceResolution::from(self.config.resolution);
        let processor = AppProcessor::new(&self.config.dataset, resolution, &dedup, diagnostics);

        let process_one = |app_dir: &PathBuf| -> Option<AppResult> {
            if self.is_cancelled() {
                return None;
            }
            let _app = set_current_app(file_name(app_dir));
            let result = processor.process(app_dir);
            increment_processed();
            match result {
                Ok(app) => Some(app),
                Err(e) => {
                    tracing::warn!(app = %app_dir.display(), "Skipping app: {e}");
                    None
                }
            }
        };

        let progress = self.progress_bar(apps.len());
        let results: Vec<AppResult> = if self.config.parallel.enabled {
            apps.par_iter()
                .progress_with(progress.clone())
                .filter_map(process_one)
                .collect()
        } else {
            apps.iter()
                .filter_map(|app_dir| {
                    let result = process_one(app_dir);
                    progress.inc(1);
                    result
                })
                .collect()
        };
        progress.finish_and_clear();

        let cancelled = self.is_cancelled();
        if cancelled {
            tracing::warn!(
                completed = results.len(),
                total = apps.len(),
                "Run cancelled, unfinished apps omitted"
            );
        }

        let summary = RunSummary::from_results(apps.len(), &results, cancelled);
        Ok(BatchOutput {
            apps: results,
            summary,
        })
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::with_template(PROGRESS_TEMPLATE) {
            bar.set_style(style.progress_chars("█▓▒░  "));
        }
        bar
    }
}
