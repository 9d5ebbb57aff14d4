//! Aggregation layers above the resolver: trace, app, and batch.
//!
//! Shared collaborators (the dedup index and the diagnostics sink) are
//! passed in explicitly so each worker's dependencies are visible in its
//! signature.

pub mod app;
pub mod batch;
pub mod dedup;
pub mod trace;

pub use app::{AppProcessor, AppResult, TraceData};
pub use batch::{BatchOrchestrator, BatchOutput, RunSummary};
pub use dedup::{DedupIndex, DedupKey};
pub use trace::{match_gesture, TraceOutcome, TraceProcessor, TraceStats};
