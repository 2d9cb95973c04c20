//! Batch Driver
//!
//! Enumerates every candidate file under the root up front, fans the list
//! out over a dedicated rayon pool and folds the per-file outcomes into a
//! [`BatchTally`] on the calling thread. Workers only send
//! `(path, outcome)` messages; nothing else touches the tally.

use crate::codec::ImageCodec;
use crate::conversion_api::decide;
use crossbeam_channel::unbounded;
use rayon::prelude::*;
use shared_utils::common_utils::display_name;
use shared_utils::thread_manager::{build_worker_pool, image_worker_count};
use shared_utils::{
    check_dangerous_directory, collect_files, create_progress_bar, BatchTally, ConversionOutcome,
    Result, SUPPORTED_IMAGE_EXTENSIONS,
};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Hide the progress bar.
    pub quiet: bool,
    /// Worker threads; defaults to one per CPU.
    pub workers: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            quiet: false,
            workers: image_worker_count(),
        }
    }
}

/// Process every JPEG/PNG under `root` (recursively) and return the tally.
///
/// Only pre-flight problems (unsafe or unreadable root, pool creation) are
/// returned as errors. Per-file problems end up in the tally.
pub fn run(root: &Path, options: &RunOptions, codec: &dyn ImageCodec) -> Result<BatchTally> {
    check_dangerous_directory(root)?;

    let files = collect_files(root, SUPPORTED_IMAGE_EXTENSIONS)?;
    let total = files.len();
    info!("Found {} images to process", total);

    let mut tally = BatchTally::new(total);
    if total == 0 {
        return Ok(tally);
    }

    let pool = build_worker_pool(options.workers)?;
    info!(workers = pool.current_num_threads(), "Worker pool ready");

    let pb = create_progress_bar(total as u64, "Converting", options.quiet);
    let (tx, rx) = unbounded::<(PathBuf, ConversionOutcome)>();

    thread::scope(|s| {
        let files = &files;
        s.spawn(move || {
            pool.install(|| {
                files.par_iter().for_each_with(tx, |tx, path| {
                    let outcome = decide_isolated(path, codec);
                    // The receiver lives until every sender is gone.
                    let _ = tx.send((path.clone(), outcome));
                });
            });
        });

        for (index, (path, outcome)) in rx.iter().enumerate() {
            tally.record(&path, &outcome);
            let line = format!("[{}/{}] {}", index + 1, total, outcome.message(&path));
            pb.suspend(|| match outcome {
                ConversionOutcome::Failed { .. } => error!("{}", line),
                _ => info!("{}", line),
            });
            pb.set_message(display_name(&path));
            pb.inc(1);
        }
    });

    pb.finish_and_clear();
    info!(
        converted = tally.converted,
        skipped = tally.skipped,
        failed = tally.failed,
        saved = %tally.bytes_saved(),
        "Processing complete!"
    );
    Ok(tally)
}

/// [`decide`] with panics turned into a `Failed` outcome.
fn decide_isolated(path: &Path, codec: &dyn ImageCodec) -> ConversionOutcome {
    panic::catch_unwind(AssertUnwindSafe(|| decide(path, codec))).unwrap_or_else(|payload| {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        error!(path = %path.display(), "Worker panicked: {}", detail);
        ConversionOutcome::failed(format!("internal error: {}", detail))
    })
}
