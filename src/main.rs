use anyhow::Result;
use clap::Parser;
use gesturemap::cli::{Cli, Commands};
use gesturemap::commands::MatchConfig;

fn main() -> Result<()> {
    gesturemap::observability::install_panic_hook();
    let cli = Cli::parse();

    match cli.command {
        Commands::Match {
            path,
            output,
            diagnostics,
            summary,
            max_traces,
            width,
            height,
            jobs,
            no_parallel,
            config,
            verbosity,
        } => {
            gesturemap::observability::init_tracing(verbosity);
            gesturemap::commands::handle_match(MatchConfig {
                path,
                output,
                diagnostics,
                summary,
                max_traces,
                width,
                height,
                jobs,
                no_parallel,
                config,
            })
        }
        Commands::Init { force } => {
            gesturemap::observability::init_tracing(0);
            gesturemap::commands::init_config(force)
        }
    }
}
