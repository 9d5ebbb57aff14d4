//! CLI command implementations.
//!
//! - **match**: resolve every gesture of a dataset and write the matches
//! - **init**: write a default `.gesturemap.toml`

pub mod init;
pub mod matching;

pub use init::init_config;
pub use matching::{handle_match, MatchConfig};
