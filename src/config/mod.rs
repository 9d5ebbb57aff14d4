//! `.gesturemap.toml` configuration.
//!
//! The file is looked up in the working directory and its ancestors, or
//! passed explicitly with `--config`. Command-line flags override it.

mod core;
mod loader;
mod parallel;

pub use self::core::{DatasetConfig, GesturemapConfig, OutputConfig, ResolutionConfig};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from_path,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use parallel::ParallelConfig;
