//! Parallelism configuration for batch runs.

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

/// Controls how apps are spread over rayon's thread pool.
///
/// ```rust
/// use gesturemap::config::ParallelConfig;
///
/// let config = ParallelConfig {
///     enabled: true,
///     max_concurrency: Some(4),
/// };
/// assert_eq!(config.effective_concurrency(), 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Process apps concurrently (default: true)
    ///
    /// When disabled, apps are processed one after another on the calling
    /// thread. Useful for debugging.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Worker threads; all available cores when unset
    #[serde(default)]
    pub max_concurrency: Option<usize>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_concurrency: None,
        }
    }
}

impl ParallelConfig {
    pub fn sequential() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    pub fn effective_concurrency(&self) -> usize {
        match self.max_concurrency {
            Some(n) if n > 0 => n,
            _ => num_cpus(),
        }
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1)
}
