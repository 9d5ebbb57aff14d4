use crate::cli::{configure_thread_pool, get_worker_count};
use crate::config::{load_config, load_config_from_path, GesturemapConfig};
use crate::diagnostics::DiagnosticsLog;
use crate::io::{write_matches, write_summary};
use crate::observability::{set_phase_persistent, MatchPhase};
use crate::pipeline::{BatchOrchestrator, BatchOutput, RunSummary};
use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};

/// Arguments of `gesturemap match`.
#[derive(Debug, Clone, Default)]
pub struct MatchConfig {
    pub path: PathBuf,
    pub output: Option<PathBuf>,
    pub diagnostics: Option<PathBuf>,
    pub summary: Option<PathBuf>,
    pub max_traces: Option<usize>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub jobs: Option<usize>,
    pub no_parallel: bool,
    pub config: Option<PathBuf>,
}

/// Layers command-line flags over the file configuration.
pub fn apply_overrides(mut settings: GesturemapConfig, args: &MatchConfig) -> GesturemapConfig {
    if let Some(width) = args.width {
        settings.resolution.width = width;
    }
    if let Some(height) = args.height {
        settings.resolution.height = height;
    }
    if args.max_traces.is_some() {
        settings.dataset.max_traces = args.max_traces;
    }
    if args.output.is_some() {
        settings.output.matches_path = args.output.clone();
    }
    if let Some(diagnostics) = &args.diagnostics {
        settings.output.diagnostics_path = diagnostics.clone();
    }
    if args.summary.is_some() {
        settings.output.summary_path = args.summary.clone();
    }
    if args.jobs.is_some() {
        settings.parallel.max_concurrency = args.jobs;
    }
    if args.no_parallel {
        settings.parallel.enabled = false;
    }
    settings
}

fn load_settings(args: &MatchConfig) -> Result<GesturemapConfig> {
    let file_config = match &args.config {
        Some(path) => load_config_from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => load_config(),
    };
    let settings = apply_overrides(file_config, args);

    if settings.resolution.width == 0 || settings.resolution.height == 0 {
        anyhow::bail!(
            "Resolution must be positive, got {}x{}",
            settings.resolution.width,
            settings.resolution.height
        );
    }
    Ok(settings)
}

pub fn handle_match(args: MatchConfig) -> Result<()> {
    if !args.path.is_dir() {
        anyhow::bail!("Dataset root {} is not a directory", args.path.display());
    }
    let settings = load_settings(&args)?;

    let jobs = settings.parallel.max_concurrency.unwrap_or(0);
    configure_thread_pool(jobs);
    log::info!(
        "Matching gestures under {} with {} worker(s)",
        args.path.display(),
        if settings.parallel.enabled {
            get_worker_count(jobs)
        } else {
            1
        }
    );

    let diagnostics_path = settings.output.diagnostics_path.clone();
    let log = DiagnosticsLog::create(&diagnostics_path).with_context(|| {
        format!(
            "Failed to create diagnostics log {}",
            diagnostics_path.display()
        )
    })?;

    let orchestrator = BatchOrchestrator::new(settings.clone()).with_progress(true);
    let sink = log.sink();
    let result = orchestrator.run(&args.path, &sink);
    drop(sink);
    let finished = log.finish();
    let output = result.context("Failed to match dataset")?;

    let rows = write_outputs(&output, finished, &settings)?;
    print_summary(&output.summary, rows, &diagnostics_path);
    Ok(())
}

/// Writes matches and the summary, then reports the diagnostics log
/// outcome. A failed log never discards finished matches.
fn write_outputs(
    output: &BatchOutput,
    diagnostics: crate::core::Result<usize>,
    settings: &GesturemapConfig,
) -> Result<usize> {
    set_phase_persistent(MatchPhase::OutputGeneration);
    write_matches(&output.apps, settings.output.matches_path.as_deref())?;
    if let Some(summary_path) = &settings.output.summary_path {
        write_summary(&output.summary, Some(summary_path))?;
    }
    diagnostics.context("Failed to finish diagnostics log")
}

/// Matches may go to stdout, so the report goes to stderr.
fn print_summary(summary: &RunSummary, diagnostics_rows: usize, diagnostics_path: &Path) {
    let title = if summary.cancelled {
        "Gesture matching cancelled".yellow().bold()
    } else {
        "Gesture matching complete".green().bold()
    };
    eprintln!("{title}");
    eprintln!("{summary}");
    eprintln!(
        "{} {} entries written to {}",
        "Diagnostics:".bold(),
        diagnostics_rows,
        diagnostics_path.display()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_overrides_replace_file_values() {
        let args = MatchConfig {
            path: PathBuf::from("data"),
            width: Some(1080),
            max_traces: Some(4),
            output: Some(PathBuf::from("out.json")),
            jobs: Some(3),
            no_parallel: true,
            ..MatchConfig::default()
        };
        let settings = apply_overrides(GesturemapConfig::default(), &args);

        assert_eq!(settings.resolution.width, 1080);
        assert_eq!(settings.resolution.height, 2560);
        assert_eq!(settings.dataset.max_traces, Some(4));
        assert_eq!(settings.output.matches_path, Some(PathBuf::from("out.json")));
        assert_eq!(
            settings.output.diagnostics_path,
            PathBuf::from("skipped_log.csv")
        );
        assert_eq!(settings.parallel.max_concurrency, Some(3));
        assert!(!settings.parallel.enabled);
    }

    #[test]
    fn test_no_overrides_keep_file_values() {
        let mut file = GesturemapConfig::default();
        file.dataset.max_traces = Some(7);
        let settings = apply_overrides(file.clone(), &MatchConfig::default());
        assert_eq!(settings, file);
    }

    #[test]
    fn test_matches_written_when_diagnostics_log_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut settings = GesturemapConfig::default();
        settings.output.matches_path = Some(dir.path().join("matches.json"));
        settings.output.summary_path = Some(dir.path().join("summary.json"));
        let output = BatchOutput {
            apps: Vec::new(),
            summary: RunSummary::from_results(0, &[], false),
        };
        let failed = Err(crate::core::Error::Io(std::io::Error::other("disk full")));

        let err = write_outputs(&output, failed, &settings).unwrap_err();

        assert!(err.to_string().contains("diagnostics log"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("matches.json"))
                .unwrap()
                .trim(),
            "[]"
        );
        assert!(dir.path().join("summary.json").exists());
    }

    #[test]
    fn test_diagnostics_rows_returned_after_outputs() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut settings = GesturemapConfig::default();
        settings.output.matches_path = Some(dir.path().join("matches.json"));
        let output = BatchOutput {
            apps: Vec::new(),
            summary: RunSummary::from_results(0, &[], false),
        };

        assert_eq!(write_outputs(&output, Ok(3), &settings).unwrap(), 3);
        assert!(dir.path().join("matches.json").exists());
    }

    #[test]
    fn test_zero_resolution_flag_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("empty.toml");
        std::fs::write(&config_path, "").unwrap();
        let args = MatchConfig {
            height: Some(0),
            config: Some(config_path),
            ..MatchConfig::default()
        };
        assert!(load_settings(&args).is_err());
    }
}
