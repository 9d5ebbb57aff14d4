use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# Gesturemap Configuration

[resolution]
# Screen size normalized gesture coordinates are scaled to
width = 1440
height = 2560

[dataset]
traces_dir = "filtered_traces"
gestures_file = "gestures.json"
hierarchies_dir = "view_hierarchies"
# max_traces = 10

[output]
# matches_path = "matches.json"
diagnostics_path = "skipped_log.csv"
# summary_path = "summary.json"

[parallel]
enabled = true
# max_concurrency = 4
"#;

pub fn init_config(force: bool) -> Result<()> {
    init_config_in(Path::new("."), force)
}

pub fn init_config_in(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    println!("Created {CONFIG_FILE_NAME} configuration file");

    Ok(())
}
