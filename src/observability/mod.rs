//! Logging setup and crash reporting.
//!
//! - **Logging**: `tracing` events and `log` records, both rendered by a
//!   `tracing-subscriber` formatter filtered by verbosity or `RUST_LOG`.
//! - **Context tracking**: thread-local phase, app and trace.
//! - **Panic hook**: structured crash report built from that context.

pub mod context;
pub mod panic_hook;

pub use context::{
    get_current_context, get_progress, increment_processed, set_current_app, set_current_trace,
    set_phase, set_phase_persistent, set_progress, ContextGuard, MatchContext, MatchPhase,
};
pub use panic_hook::install_panic_hook;

use tracing_subscriber::EnvFilter;

/// Default filter directive for a `-v` count.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber on stderr. `RUST_LOG` takes precedence
/// over `verbosity`. Calling it twice is harmless.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
