//! Worker Pool Sizing
//!
//! Image recompression is CPU bound and each file is independent, so the
//! pool gets one worker per available hardware thread.

use std::sync::OnceLock;

static WORKER_COUNT: OnceLock<usize> = OnceLock::new();

/// Number of parallel workers for a batch run (cached, at least 1).
pub fn image_worker_count() -> usize {
    *WORKER_COUNT.get_or_init(|| num_cpus::get().max(1))
}

/// Build the dedicated batch pool. Failure here is fatal for the run.
pub fn build_worker_pool(workers: usize) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|i| format!("img-webp-worker-{}", i))
        .build()
}
