// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod diagnostics;
pub mod geometry;
pub mod io;
pub mod metrics;
pub mod observability;
pub mod pipeline;
pub mod resolver;
pub mod spacing;

// Re-export commonly used types
pub use crate::core::{
    Bounds, ComponentInfo, DiagnosticEntry, Error, Gesture, GestureSet, MatchRecord,
    ReferenceResolution, Result, SkipReason, Spacing, UiNode,
};

pub use crate::config::GesturemapConfig;

pub use crate::diagnostics::{DiagnosticsLog, DiagnosticsSink, MemorySink};

pub use crate::geometry::{absolute_from_relative, point_in_bounds, point_in_relative_bounds};

pub use crate::metrics::{count_components, descendants_of, direct_children, hierarchy_depth};

pub use crate::spacing::calculate_spacing;

pub use crate::resolver::{find_candidates, resolve, select_best, MatchCandidate};

pub use crate::pipeline::{
    match_gesture, AppProcessor, AppResult, BatchOrchestrator, BatchOutput, DedupIndex,
    RunSummary, TraceData, TraceProcessor,
};
