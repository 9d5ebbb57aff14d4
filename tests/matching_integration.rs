//! End-to-end tests of dataset matching: loading, resolution, dedup,
//! diagnostics and output shape.

mod common;

use common::{DatasetBuilder, BUTTON_SCREEN};
use gesturemap::config::{GesturemapConfig, ParallelConfig};
use gesturemap::diagnostics::{DiagnosticsLog, MemorySink};
use gesturemap::pipeline::{BatchOrchestrator, BatchOutput, TraceData};
use gesturemap::SkipReason;
use indoc::indoc;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;

fn run(root: &Path, sink: &MemorySink) -> BatchOutput {
    BatchOrchestrator::new(GesturemapConfig::default())
        .run(root, sink)
        .expect("Run should succeed")
}

#[test]
fn test_single_tap_produces_full_record() {
    let dataset = DatasetBuilder::new()
        .gestures("com.example.app", "trace_0", r#"{"7": [[0.2, 0.08]]}"#)
        .hierarchy("com.example.app", "trace_0", "7", BUTTON_SCREEN);

    let sink = MemorySink::new();
    let output = run(dataset.root(), &sink);

    let json = serde_json::to_value(&output.apps).unwrap();
    assert_eq!(
        json,
        json!([{
            "app_name": "com.example.app",
            "traces": {
                "trace_0": [{
                    "ui": "7",
                    "gesture": [0.2 * 1440.0, 0.08 * 2560.0],
                    "component": {
                        "bounds": [100.0, 100.0, 500.0, 300.0],
                        "class": "Button",
                        "clickable": true,
                        "ancestors": ["Root", "Button"],
                        "ancestors_count": 2,
                        "siblings": [],
                        "siblings_count": 0,
                        "parent_children_count": 1,
                        "parent_children_classes": ["Button"],
                        "hierarchy_depth": 2,
                        "nesting_level": 1,
                        "spacing": {
                            "top": 100.0 / 2560.0,
                            "bottom": 2260.0 / 2560.0,
                            "left": 100.0 / 1440.0,
                            "right": 940.0 / 1440.0
                        },
                        "total_components_in_ui": 2,
                        "descendant_count": 1,
                        "descendant_classes": ["Button"]
                    }
                }]
            }
        }])
    );
    assert!(sink.is_empty());
    assert_eq!(output.summary.total_matched, 1);
}

#[test]
fn test_multiple_coordinates_are_diagnosed() {
    let dataset = DatasetBuilder::new()
        .gestures(
            "app",
            "trace_0",
            r#"{"3": [[0.1, 0.1], [0.2, 0.2]]}"#,
        )
        .hierarchy("app", "trace_0", "3", BUTTON_SCREEN);

    let sink = MemorySink::new();
    let output = run(dataset.root(), &sink);

    assert_eq!(output.apps[0].traces["trace_0"], TraceData::NoData);
    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].gesture_id, "3");
    assert_eq!(entries[0].reason, SkipReason::MultipleCoordinates);
    assert_eq!(entries[0].app, "app");
    assert_eq!(entries[0].trace, "trace_0");
    assert_eq!(output.summary.total_skipped_gestures, 1);
}

#[test]
fn test_null_gesture_entry_skips_only_that_gesture() {
    let dataset = DatasetBuilder::new()
        .gestures("app", "trace_0", r#"{"1": [[0.2, 0.08]], "2": null}"#)
        .hierarchy("app", "trace_0", "1", BUTTON_SCREEN);

    let sink = MemorySink::new();
    let output = run(dataset.root(), &sink);

    let records = output.apps[0].traces["trace_0"].records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].ui, "1");
    assert_eq!(records[0].component.class, "Button");

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].gesture_id, "2");
    assert_eq!(entries[0].reason, SkipReason::NoCoordinates);
    assert_eq!(output.summary.total_matched, 1);
    assert_eq!(output.summary.total_skipped_gestures, 1);
}

#[test]
fn test_trace_without_matches_is_marked_no_data() {
    let dataset = DatasetBuilder::new()
        .gestures("app", "trace_0", r#"{"1": [[0.2, 0.08]]}"#)
        .hierarchy("app", "trace_0", "1", BUTTON_SCREEN)
        .empty_trace("app", "trace_1");

    let output = run(dataset.root(), &MemorySink::new());
    let json = serde_json::to_value(&output.apps[0].traces).unwrap();
    assert_eq!(json["trace_1"], json!("no data"));
    assert!(json["trace_0"].is_array());
    assert_eq!(output.summary.total_traces, 2);
    assert_eq!(output.summary.total_hierarchy_dirs, 1);
}

#[test]
fn test_repeated_taps_deduplicated_across_traces_not_apps() {
    let mut dataset = DatasetBuilder::new();
    for app in ["app_a", "app_b"] {
        for trace in ["trace_0", "trace_1", "trace_2"] {
            dataset = dataset
                .gestures(app, trace, r#"{"1": [[0.2, 0.08]]}"#)
                .hierarchy(app, trace, "1", BUTTON_SCREEN);
        }
    }

    let output = run(dataset.root(), &MemorySink::new());
    assert_eq!(output.summary.total_matched, 2);
    assert_eq!(output.summary.total_duplicates, 4);
    assert_eq!(output.summary.matching_apps, 2);
    for app in &output.apps {
        assert_eq!(app.traces["trace_0"].records().len(), 1);
        assert_eq!(app.traces["trace_1"], TraceData::NoData);
        assert_eq!(app.traces["trace_2"], TraceData::NoData);
    }
}

#[test]
fn test_hierarchy_problems_are_diagnosed() {
    let dataset = DatasetBuilder::new()
        .gestures(
            "app",
            "trace_0",
            r#"{"1": [[0.5, 0.5]], "2": [[0.5, 0.5]], "3": [[0.5, 0.5]], "4": [[0.5, 0.5]], "5": []}"#,
        )
        .hierarchy("app", "trace_0", "1", r#"{"activity": {"root": null}}"#)
        .hierarchy("app", "trace_0", "2", "not json at all")
        .hierarchy(
            "app",
            "trace_0",
            "4",
            r#"{"activity": {"root": {"class": "Root", "bounds": [0, 0, 1440]}}}"#,
        );

    let sink = MemorySink::new();
    let output = run(dataset.root(), &sink);

    let reasons: Vec<(String, SkipReason)> = sink
        .entries()
        .into_iter()
        .map(|e| (e.gesture_id, e.reason))
        .collect();
    assert_eq!(
        reasons,
        vec![
            ("1".to_string(), SkipReason::EmptyHierarchy),
            ("2".to_string(), SkipReason::MissingHierarchy),
            ("3".to_string(), SkipReason::MissingHierarchy),
            ("4".to_string(), SkipReason::TraversalError),
            ("5".to_string(), SkipReason::NoCoordinates),
        ]
    );
    assert_eq!(output.summary.total_ui_files, 3);
    assert_eq!(output.summary.total_skipped_hierarchies, 3);
    assert_eq!(output.summary.total_diagnostics, 5);
}

#[test]
fn test_nested_leaf_context_is_recorded() {
    let screen = indoc! {r#"
        {"activity": {"root": {
            "class": "Root",
            "bounds": [0, 0, 1440, 2560],
            "children": [
                {"class": "Row", "bounds": [0, 0, 1440, 400], "children": [
                    {"class": "Label", "bounds": [0, 0, 1000, 400]},
                    {"class": "Icon", "bounds": [1000, 0, 1440, 400], "clickable": true}
                ]},
                {"class": "Footer", "bounds": [0, 2400, 1440, 2560]}
            ]
        }}}
    "#};
    let dataset = DatasetBuilder::new()
        .gestures("app", "trace_0", r#"{"1": [[0.9, 0.1]]}"#)
        .hierarchy("app", "trace_0", "1", screen);

    let output = run(dataset.root(), &MemorySink::new());
    let record = &output.apps[0].traces["trace_0"].records()[0];
    let component = &record.component;

    assert_eq!(component.class, "Icon");
    assert_eq!(component.ancestors, vec!["Root", "Row", "Icon"]);
    assert_eq!(component.siblings, vec!["Label"]);
    assert_eq!(component.nesting_level, 2);
    assert_eq!(component.hierarchy_depth, 3);
    assert_eq!(component.total_components_in_ui, 5);
    assert_eq!(component.descendant_classes, vec!["Label", "Icon"]);
    // Label touches the icon's left edge without lying strictly beside it
    assert_eq!(component.spacing.left, 1000.0 / 1440.0);
    assert_eq!(component.spacing.right, 0.0);
    assert_eq!(component.spacing.top, 0.0);
}

#[test]
fn test_root_leaf_spacing_written_as_infinity() {
    let dataset = DatasetBuilder::new()
        .gestures("app", "trace_0", r#"{"1": [[0.5, 0.5]]}"#)
        .hierarchy(
            "app",
            "trace_0",
            "1",
            r#"{"activity": {"root": {"class": "Solo", "bounds": [0, 0, 1440, 2560]}}}"#,
        );

    let output = run(dataset.root(), &MemorySink::new());
    let json = serde_json::to_value(&output.apps).unwrap();
    let spacing = &json[0]["traces"]["trace_0"][0]["component"]["spacing"];
    assert_eq!(
        spacing,
        &json!({"top": "Infinity", "bottom": "Infinity", "left": "Infinity", "right": "Infinity"})
    );
}

#[test]
fn test_diagnostics_log_file_from_parallel_run() {
    let mut dataset = DatasetBuilder::new();
    for app in ["a", "b", "c", "d"] {
        dataset = dataset
            .gestures(app, "trace_0", r#"{"1": [[0.9, 0.9]], "2": []}"#)
            .hierarchy(app, "trace_0", "1", BUTTON_SCREEN);
    }
    let log_path = dataset.root().join("logs").join("skipped_log.csv");

    let log = DiagnosticsLog::create(&log_path).unwrap();
    let sink = log.sink();
    let output = BatchOrchestrator::new(GesturemapConfig {
        parallel: ParallelConfig {
            enabled: true,
            max_concurrency: Some(4),
        },
        ..GesturemapConfig::default()
    })
    .run(dataset.root(), &sink)
    .unwrap();
    drop(sink);

    assert_eq!(log.finish().unwrap(), 8);
    assert_eq!(output.summary.total_diagnostics, 8);

    let content = fs::read_to_string(&log_path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("gesture_id,reason,detail,app,trace"));
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 8);
    assert_eq!(rows.iter().filter(|r| r.contains(",no-match,")).count(), 4);
    assert_eq!(rows.iter().filter(|r| r.contains(",no-coordinates,")).count(), 4);
}

#[test]
fn test_max_traces_and_resolution_from_config() {
    let dataset = DatasetBuilder::new()
        .gestures("app", "trace_0", r#"{"1": [[0.5, 0.5]]}"#)
        .hierarchy("app", "trace_0", "1", BUTTON_SCREEN)
        .gestures("app", "trace_1", r#"{"1": [[0.5, 0.5]]}"#)
        .hierarchy("app", "trace_1", "1", BUTTON_SCREEN);

    let mut config = GesturemapConfig::default();
    config.dataset.max_traces = Some(1);
    // (0.5, 0.5) on a 600x400 screen lands inside the button
    config.resolution.width = 600;
    config.resolution.height = 400;

    let output = BatchOrchestrator::new(config)
        .run(dataset.root(), &MemorySink::new())
        .unwrap();

    assert_eq!(output.apps[0].traces.len(), 1);
    let record = &output.apps[0].traces["trace_0"].records()[0];
    assert_eq!(record.gesture, [300.0, 200.0]);
    assert_eq!(record.component.class, "Button");
}
