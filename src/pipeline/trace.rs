//! Per-trace processing: every gesture of a trace is validated, resolved
//! against its hierarchy, enriched with tree metrics and spacing, and
//! deduplicated. Gestures are handled strictly in id order.

use super::dedup::{DedupIndex, DedupKey};
use crate::core::{
    ComponentInfo, DiagnosticEntry, Gesture, MatchRecord, ReferenceResolution, Result, SkipReason,
    Spacing, UiNode,
};
use crate::diagnostics::DiagnosticsSink;
use crate::io::TraceInput;
use crate::metrics::{count_components, descendants_of, hierarchy_depth};
use crate::resolver::resolve;
use crate::spacing::calculate_spacing;
use serde::Serialize;
use std::ops::AddAssign;

/// Counters accumulated per trace and summed upward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TraceStats {
    pub traces: usize,
    pub hierarchy_dirs: usize,
    pub ui_files: usize,
    pub matched: usize,
    pub duplicates: usize,
    pub skipped_gestures: usize,
    pub skipped_hierarchies: usize,
    pub no_match: usize,
    pub traversal_errors: usize,
}

impl TraceStats {
    /// Number of diagnostics entries these counters correspond to.
    pub fn diagnostics(&self) -> usize {
        self.skipped_gestures + self.skipped_hierarchies + self.no_match + self.traversal_errors
    }

    fn count_skip(&mut self, reason: SkipReason) {
        match reason {
            r if r.is_gesture_skip() => self.skipped_gestures += 1,
            r if r.is_hierarchy_skip() => self.skipped_hierarchies += 1,
            SkipReason::TraversalError => self.traversal_errors += 1,
            _ => self.no_match += 1,
        }
    }
}

impl AddAssign for TraceStats {
    fn add_assign(&mut self, rhs: Self) {
        self.traces += rhs.traces;
        self.hierarchy_dirs += rhs.hierarchy_dirs;
        self.ui_files += rhs.ui_files;
        self.matched += rhs.matched;
        self.duplicates += rhs.duplicates;
        self.skipped_gestures += rhs.skipped_gestures;
        self.skipped_hierarchies += rhs.skipped_hierarchies;
        self.no_match += rhs.no_match;
        self.traversal_errors += rhs.traversal_errors;
    }
}

#[derive(Debug, Clone, Default)]
pub struct TraceOutcome {
    pub records: Vec<MatchRecord>,
    pub stats: TraceStats,
}

/// Processes the traces of one app.
pub struct TraceProcessor<'a> {
    app: &'a str,
    resolution: ReferenceResolution,
    dedup: &'a DedupIndex,
    diagnostics: &'a dyn DiagnosticsSink,
}

impl<'a> TraceProcessor<'a> {
    pub fn new(
        app: &'a str,
        resolution: ReferenceResolution,
        dedup: &'a DedupIndex,
        diagnostics: &'a dyn DiagnosticsSink,
    ) -> Self {
        Self {
            app,
            resolution,
            dedup,
            diagnostics,
        }
    }

    pub fn process(&self, trace: &TraceInput) -> TraceOutcome {
        let mut stats = TraceStats {
            traces: 1,
            hierarchy_dirs: usize::from(trace.has_hierarchy_dir),
            ui_files: trace.hierarchies.ui_files(),
            ..TraceStats::default()
        };

        let records = trace
            .gestures
            .iter()
            .filter_map(|gesture| self.process_gesture(trace, &gesture, &mut stats))
            .collect();

        TraceOutcome { records, stats }
    }

    fn process_gesture(
        &self,
        trace: &TraceInput,
        gesture: &Gesture,
        stats: &mut TraceStats,
    ) -> Option<MatchRecord> {
        let skip = |stats: &mut TraceStats, reason: SkipReason, detail: String| {
            stats.count_skip(reason);
            self.diagnostics.record(DiagnosticEntry::new(
                self.app,
                &trace.name,
                &gesture.id,
                reason,
                detail,
            ));
            None
        };

        let point = match gesture.single_point() {
            Ok(point) => point,
            Err(reason) => {
                let detail = match reason {
                    SkipReason::NoCoordinates => "No coordinates recorded".to_string(),
                    _ => format!(
                        "{} coordinates recorded, possibly a scroll",
                        gesture.coordinates.len()
                    ),
                };
                return skip(stats, reason, detail);
            }
        };

        let root = match trace.hierarchies.root_for(&gesture.id) {
            Ok(root) => root,
            Err(miss) => return skip(stats, miss.reason, miss.detail),
        };

        let [x, y] = self.resolution.to_absolute(point);
        let record = match match_gesture(root, &gesture.id, x, y) {
            Ok(Some(record)) => record,
            Ok(None) => {
                let detail = format!("Did not match any component in {}.json", gesture.id);
                return skip(stats, SkipReason::NoMatch, detail);
            }
            Err(e) => {
                if !e.is_structural() {
                    tracing::warn!(gesture = %gesture.id, "Unexpected error while matching: {e}");
                }
                let detail = format!("{e} in {}.json", gesture.id);
                return skip(stats, SkipReason::TraversalError, detail);
            }
        };

        if !self.dedup.insert(DedupKey::new(self.app, &record)) {
            tracing::trace!(gesture = %gesture.id, "Duplicate match discarded");
            stats.duplicates += 1;
            return None;
        }

        stats.matched += 1;
        Some(record)
    }
}

/// Resolves one absolute point against `root` and assembles the record.
pub fn match_gesture(root: &UiNode, ui: &str, x: f64, y: f64) -> Result<Option<MatchRecord>> {
    let Some(hit) = resolve(root, x, y)? else {
        return Ok(None);
    };

    let (descendant_count, descendant_classes) = hit
        .parent
        .map(descendants_of)
        .unwrap_or_default();

    let spacing = match hit.effective_bounds()? {
        Some(bounds) => {
            let siblings = hit.siblings();
            calculate_spacing(&bounds, hit.parent_bounds().as_ref(), &siblings)
        }
        None => Spacing::UNBOUNDED,
    };

    let component = ComponentInfo {
        bounds: hit.node.bounds()?,
        class: hit.node.class_name().to_string(),
        clickable: hit.node.clickable,
        ancestors_count: hit.ancestors.len(),
        siblings_count: hit.sibling_count(),
        hierarchy_depth: hierarchy_depth(Some(root)),
        nesting_level: hit.nesting_level,
        spacing,
        total_components_in_ui: count_components(root),
        descendant_count,
        descendant_classes,
        parent_children_count: hit.parent_children_count,
        parent_children_classes: hit.parent_children_classes,
        siblings: hit.sibling_classes,
        ancestors: hit.ancestors,
    };

    Ok(Some(MatchRecord {
        ui: ui.to_string(),
        gesture: [x, y],
        component,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Bounds;
    use crate::diagnostics::MemorySink;
    use crate::io::HierarchyStore;
    use pretty_assertions::assert_eq;

    fn example_root() -> UiNode {
        UiNode::new("Root")
            .with_bounds([0.0, 0.0, 1440.0, 2560.0])
            .with_child(
                UiNode::new("Button")
                    .with_bounds([100.0, 100.0, 500.0, 300.0])
                    .with_clickable(true),
            )
    }

    fn trace_with(gestures: &[(&str, Vec<[f64; 2]>)], roots: Vec<(&str, Option<UiNode>)>) -> TraceInput {
        let mut hierarchies = HierarchyStore::default();
        for (id, root) in roots {
            hierarchies.insert_root(id, root);
        }
        TraceInput {
            name: "trace_0".into(),
            gestures: gestures
                .iter()
                .map(|(id, coords)| Gesture::new(*id, coords.clone()))
                .collect(),
            hierarchies,
            has_hierarchy_dir: true,
        }
    }

    #[test]
    fn test_match_gesture_example_record() {
        let root = example_root();
        let record = match_gesture(&root, "7", 288.0, 204.8).unwrap().unwrap();
        let c = &record.component;

        assert_eq!(c.class, "Button");
        assert_eq!(c.bounds, Some(Bounds::new(100.0, 100.0, 500.0, 300.0)));
        assert!(c.clickable);
        assert_eq!(c.nesting_level, 1);
        assert_eq!(c.hierarchy_depth, 2);
        assert_eq!(c.siblings_count, 0);
        assert_eq!(c.ancestors, vec!["Root", "Button"]);
        assert_eq!(c.ancestors_count, 2);
        assert_eq!(c.total_components_in_ui, 2);
        assert_eq!(c.descendant_count, 1);
        assert_eq!(c.descendant_classes, vec!["Button"]);
        assert!((c.spacing.top - 100.0 / 2560.0).abs() < 1e-12);
        assert!((c.spacing.bottom - 2260.0 / 2560.0).abs() < 1e-12);
        assert!((c.spacing.left - 100.0 / 1440.0).abs() < 1e-12);
        assert!((c.spacing.right - 940.0 / 1440.0).abs() < 1e-12);
    }

    #[test]
    fn test_root_match_has_unbounded_spacing() {
        let root = UiNode::new("Solo").with_bounds([0.0, 0.0, 100.0, 100.0]);
        let record = match_gesture(&root, "1", 50.0, 50.0).unwrap().unwrap();
        assert!(record.component.spacing.is_unbounded());
        assert_eq!(record.component.descendant_count, 0);
        assert_eq!(record.component.parent_children_count, 0);
    }

    #[test]
    fn test_rel_bounds_match_uses_effective_bounds_for_spacing() {
        let root = UiNode::new("Root")
            .with_bounds([0.0, 0.0, 1000.0, 1000.0])
            .with_child(UiNode::new("Overlay").with_rel_bounds([0.25, 0.5, 0.75, 1.0]));
        let record = match_gesture(&root, "1", 500.0, 800.0).unwrap().unwrap();
        let c = &record.component;
        assert_eq!(c.bounds, None);
        assert!((c.spacing.top - 0.5).abs() < 1e-12);
        assert!((c.spacing.left - 0.25).abs() < 1e-12);
        assert!(c.spacing.bottom.abs() < 1e-12);
    }

    #[test]
    fn test_process_emits_record_and_diagnostics() {
        let trace = trace_with(
            &[
                ("1", vec![[0.2, 0.08]]),
                ("2", vec![[0.1, 0.1], [0.2, 0.2]]),
                ("3", vec![]),
                ("4", vec![[0.9, 0.9]]),
                ("5", vec![[0.2, 0.08]]),
                ("6", vec![[0.2, 0.08]]),
            ],
            vec![
                ("1", Some(example_root())),
                ("2", Some(example_root())),
                ("4", Some(example_root())),
                ("6", None),
            ],
        );
        let dedup = DedupIndex::new();
        let sink = MemorySink::new();
        let outcome = TraceProcessor::new("app", ReferenceResolution::default(), &dedup, &sink)
            .process(&trace);

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].ui, "1");
        assert_eq!(
            outcome.stats,
            TraceStats {
                traces: 1,
                hierarchy_dirs: 1,
                ui_files: 4,
                matched: 1,
                duplicates: 0,
                skipped_gestures: 2,
                skipped_hierarchies: 2,
                no_match: 1,
                traversal_errors: 0,
            }
        );

        let reasons: Vec<(String, SkipReason)> = sink
            .entries()
            .into_iter()
            .map(|e| (e.gesture_id, e.reason))
            .collect();
        assert_eq!(
            reasons,
            vec![
                ("2".to_string(), SkipReason::MultipleCoordinates),
                ("3".to_string(), SkipReason::NoCoordinates),
                ("4".to_string(), SkipReason::NoMatch),
                ("5".to_string(), SkipReason::MissingHierarchy),
                ("6".to_string(), SkipReason::EmptyHierarchy),
            ]
        );
        assert_eq!(outcome.stats.diagnostics(), sink.len());
    }

    #[test]
    fn test_traversal_error_is_contained() {
        let broken = UiNode::new("Root")
            .with_bounds([0.0, 0.0, 1440.0, 2560.0])
            .with_child(UiNode {
                class: Some("Bad".into()),
                bounds: Some(vec![0.0, 0.0, 1.0]),
                ..UiNode::default()
            });
        let trace = trace_with(
            &[("1", vec![[0.5, 0.5]]), ("2", vec![[0.2, 0.08]])],
            vec![("1", Some(broken)), ("2", Some(example_root()))],
        );
        let dedup = DedupIndex::new();
        let sink = MemorySink::new();
        let outcome = TraceProcessor::new("app", ReferenceResolution::default(), &dedup, &sink)
            .process(&trace);

        assert_eq!(outcome.stats.traversal_errors, 1);
        assert_eq!(outcome.stats.matched, 1);
        let entry = &sink.entries()[0];
        assert_eq!(entry.reason, SkipReason::TraversalError);
        assert!(entry.detail.contains("Malformed bounds on Bad"));
    }

    #[test]
    fn test_identical_taps_deduplicated_across_traces() {
        let dedup = DedupIndex::new();
        let sink = MemorySink::new();
        let processor = TraceProcessor::new("app", ReferenceResolution::default(), &dedup, &sink);

        let first = trace_with(&[("1", vec![[0.2, 0.08]])], vec![("1", Some(example_root()))]);
        let second = trace_with(&[("1", vec![[0.3, 0.1]])], vec![("1", Some(example_root()))]);

        assert_eq!(processor.process(&first).records.len(), 1);
        let outcome = processor.process(&second);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.stats.duplicates, 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_stats_add_assign() {
        let mut total = TraceStats::default();
        total += TraceStats {
            matched: 2,
            no_match: 1,
            ..TraceStats::default()
        };
        total += TraceStats {
            matched: 1,
            skipped_gestures: 3,
            ..TraceStats::default()
        };
        assert_eq!(total.matched, 3);
        assert_eq!(total.diagnostics(), 4);
    }
}
