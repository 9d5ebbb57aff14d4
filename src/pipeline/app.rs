use super::dedup::DedupIndex;
use super::trace::{TraceProcessor, TraceStats};
use crate::config::DatasetConfig;
use crate::core::{MatchRecord, ReferenceResolution, Result};
use crate::diagnostics::DiagnosticsSink;
use crate::io::{list_subdirs, TraceInput};
use crate::observability::{set_current_trace, set_phase, MatchPhase};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::Path;

const NO_DATA: &str = "no data";

/// Records of one trace. A trace that produced nothing is kept as an
/// explicit marker so the attempt stays visible in the output.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceData {
    Records(Vec<MatchRecord>),
    NoData,
}

impl TraceData {
    pub fn from_records(records: Vec<MatchRecord>) -> Self {
        if records.is_empty() {
            Self::NoData
        } else {
            Self::Records(records)
        }
    }

    pub fn records(&self) -> &[MatchRecord] {
        match self {
            Self::Records(records) => records,
            Self::NoData => &[],
        }
    }
}

impl Serialize for TraceData {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Records(records) => records.serialize(serializer),
            Self::NoData => serializer.serialize_str(NO_DATA),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppResult {
    pub app_name: String,
    pub traces: BTreeMap<String, TraceData>,
    #[serde(skip)]
    pub stats: TraceStats,
}

impl AppResult {
    pub fn has_matches(&self) -> bool {
        self.stats.matched > 0
    }
}

/// Runs every trace of one app through a [`TraceProcessor`].
pub struct AppProcessor<'a> {
    dataset: &'a DatasetConfig,
    resolution: ReferenceResolution,
    dedup: &'a DedupIndex,
    diagnostics: &'a dyn DiagnosticsSink,
}

impl<'a> AppProcessor<'a> {
    pub fn new(
        dataset: &'a DatasetConfig,
        resolution: ReferenceResolution,
        dedup: &'a DedupIndex,
        diagnostics: &'a dyn DiagnosticsSink,
    ) -> Self {
        Self {
            dataset,
            resolution,
            dedup,
            diagnostics,
        }
    }

    pub fn process(&self, app_dir: &Path) -> Result<AppResult> {
        let app_name = crate::io::walker::file_name(app_dir);
        let span = tracing::info_span!("app", app = %app_name);
        let _guard = span.enter();

        let mut trace_dirs = list_subdirs(app_dir)?;
        if let Some(max) = self.dataset.max_traces {
            trace_dirs.truncate(max);
        }

        let processor =
            TraceProcessor::new(&app_name, self.resolution, self.dedup, self.diagnostics);
        let mut traces = BTreeMap::new();
        let mut stats = TraceStats::default();

        for trace_dir in &trace_dirs {
            let _trace_guard = set_current_trace(crate::io::walker::file_name(trace_dir));
            let input = {
                let _phase = set_phase(MatchPhase::Loading);
                TraceInput::load(trace_dir, self.dataset)
            };

            let trace_span = tracing::debug_span!("trace", trace = %input.name);
            let outcome = trace_span.in_scope(|| {
                let _phase = set_phase(MatchPhase::Matching);
                processor.process(&input)
            });

            tracing::debug!(
                trace = %input.name,
                matched = outcome.stats.matched,
                skipped = outcome.stats.diagnostics(),
                "Trace processed"
            );
            stats += outcome.stats;
            traces.insert(input.name, TraceData::from_records(outcome.records));
        }

        tracing::info!(
            traces = stats.traces,
            matched = stats.matched,
            "{app_name}: {} matched, {} gestures skipped, {} hierarchies skipped",
            stats.matched,
            stats.skipped_gestures,
            stats.skipped_hierarchies
        );

        Ok(AppResult {
            app_name,
            traces,
            stats,
        })
    }
}
