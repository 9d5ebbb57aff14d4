//! Custom panic hook for structured crash reports.
//!
//! A crash report names the phase, app and trace the panicking thread was
//! working on, how many apps had finished, and where the panic happened.

use super::context::{get_current_context, get_progress, MatchContext};
use std::panic::PanicHookInfo;
use tracing::Span;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const RULE: &str =
    "════════════════════════════════════════════════════════════════════════════════";

/// Installs the hook. Call early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        print_crash_report(info);
    }));
}

fn print_crash_report(info: &PanicHookInfo<'_>) {
    let context = get_current_context();
    let (processed, total) = get_progress();

    eprintln!();
    eprintln!("{RULE}");
    eprintln!("GESTUREMAP CRASH REPORT");
    eprintln!("{RULE}");
    for line in report_lines(&context, processed, total, &extract_panic_message(info)) {
        eprintln!("  {line}");
    }
    if let Some(location) = info.location() {
        eprintln!(
            "  Location: {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        );
    }
    if let Some(metadata) = Span::current().metadata() {
        eprintln!("  Span: {}", metadata.name());
    }
    eprintln!("{RULE}");

    if std::env::var("RUST_BACKTRACE").is_ok() {
        eprintln!("{}", std::backtrace::Backtrace::capture());
    } else {
        eprintln!("Run with RUST_BACKTRACE=1 for a stack trace");
    }
}

fn report_lines(
    context: &MatchContext,
    processed: usize,
    total: usize,
    message: &str,
) -> Vec<String> {
    let mut lines = vec![
        format!("Version: {VERSION}"),
        format!("Platform: {}", std::env::consts::OS),
        format!("Time: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")),
        format!("PANIC: {}", truncate(message, 200)),
    ];

    match context.phase {
        Some(phase) => lines.push(format!("Phase: {phase}")),
        None => lines.push("Phase: (not set, crash occurred before matching started)".into()),
    }
    if let Some(app) = &context.current_app {
        lines.push(format!("App: {app}"));
    }
    if let Some(trace) = &context.current_trace {
        lines.push(format!("Trace: {trace}"));
    }
    if total > 0 {
        let pct = (processed as f64 / total as f64 * 100.0) as usize;
        lines.push(format!("Progress: {processed} / {total} apps ({pct}%)"));
    }
    lines
}

fn extract_panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
