//! Thread-local context tracking for crash reports.
//!
//! Each rayon worker keeps its own context (phase, app, trace). Overall
//! progress is shared through atomic counters. Guards restore the previous
//! context on drop, so contexts nest.

use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};

static APPS_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static APPS_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<MatchContext> = const { RefCell::new(MatchContext::new()) };
}

/// What this thread was doing when the snapshot was taken.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchContext {
    pub phase: Option<MatchPhase>,
    pub current_app: Option<String>,
    pub current_trace: Option<String>,
}

impl MatchContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_app: None,
            current_trace: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Listing apps under the traces directory
    Discovery,
    /// Reading gestures and hierarchy files of a trace
    Loading,
    /// Resolving gestures against hierarchies
    Matching,
    /// Writing matches and the summary
    OutputGeneration,
}

impl std::fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discovery => write!(f, "discovery"),
            Self::Loading => write!(f, "loading"),
            Self::Matching => write!(f, "matching"),
            Self::OutputGeneration => write!(f, "output_generation"),
        }
    }
}

/// Restores the previous context when dropped.
pub struct ContextGuard {
    previous: MatchContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = std::mem::take(&mut self.previous);
        });
    }
}

fn update(apply: impl FnOnce(&mut MatchContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        apply(&mut ctx.borrow_mut());
        ContextGuard { previous }
    })
}

#[must_use]
pub fn set_phase(phase: MatchPhase) -> ContextGuard {
    update(|ctx| ctx.phase = Some(phase))
}

/// Sets the phase without a guard, for top-level transitions.
pub fn set_phase_persistent(phase: MatchPhase) {
    CURRENT_CONTEXT.with(|ctx| {
        ctx.borrow_mut().phase = Some(phase);
    });
}

#[must_use]
pub fn set_current_app(name: impl Into<String>) -> ContextGuard {
    let name = name.into();
    update(|ctx| {
        ctx.current_app = Some(name);
        ctx.current_trace = None;
    })
}

#[must_use]
pub fn set_current_trace(name: impl Into<String>) -> ContextGuard {
    let name = name.into();
    update(|ctx| ctx.current_trace = Some(name))
}

pub fn set_progress(processed: usize, total: usize) {
    APPS_PROCESSED.store(processed, Ordering::Relaxed);
    APPS_TOTAL.store(total, Ordering::Relaxed);
}

pub fn increment_processed() {
    APPS_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> MatchContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// `(processed, total)` apps.
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        APPS_PROCESSED.load(Ordering::Relaxed),
        APPS_TOTAL.load(Ordering::Relaxed),
    )
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = MatchContext::new();
    });
}
