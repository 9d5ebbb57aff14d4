//! Runtime setup for the CLI.

/// Rayon worker stack size; hierarchy searches recurse once per tree level.
const RAYON_STACK_SIZE: usize = 8 * 1024 * 1024;

/// Configures rayon's global pool once at startup. `jobs == 0` uses every
/// core.
pub fn configure_thread_pool(jobs: usize) {
    let mut builder = rayon::ThreadPoolBuilder::new()
        .stack_size(RAYON_STACK_SIZE)
        .thread_name(|i| format!("gesturemap-worker-{i}"));

    if jobs > 0 {
        builder = builder.num_threads(jobs);
    }

    if let Err(e) = builder.build_global() {
        log::debug!("Thread pool already configured: {}", e);
    }
}

pub fn get_worker_count(jobs: usize) -> usize {
    if jobs == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    } else {
        jobs
    }
}
