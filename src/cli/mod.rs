//! Command-line interface for gesturemap.

pub mod setup;

pub use setup::{configure_thread_pool, get_worker_count};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gesturemap")]
#[command(about = "Match recorded gestures to the UI components they struck", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve every gesture of a dataset and write the matched components
    Match {
        /// Dataset root containing the traces directory
        path: PathBuf,

        /// Matches output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Diagnostics CSV for skipped gestures
        #[arg(long = "diagnostics")]
        diagnostics: Option<PathBuf>,

        /// Write the run summary as JSON to this file
        #[arg(long = "summary")]
        summary: Option<PathBuf>,

        /// Only process the first N traces of each app
        #[arg(long = "max-traces")]
        max_traces: Option<usize>,

        /// Reference screen width in pixels
        #[arg(long = "width", env = "GESTUREMAP_WIDTH")]
        width: Option<u32>,

        /// Reference screen height in pixels
        #[arg(long = "height", env = "GESTUREMAP_HEIGHT")]
        height: Option<u32>,

        /// Number of worker threads (0 = all cores)
        #[arg(short = 'j', long = "jobs")]
        jobs: Option<usize>,

        /// Process apps sequentially
        #[arg(long = "no-parallel")]
        no_parallel: bool,

        /// Configuration file (defaults to the nearest .gesturemap.toml)
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Write a default .gesturemap.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
