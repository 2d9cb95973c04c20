//! Progress Bar & Human Formatting
//!
//! Batch progress bar on stderr plus the byte/duration formatters used by
//! the summary report.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

pub mod templates {
    pub const BATCH: &str = "{spinner:.green} {prefix:.cyan.bold} ▕{bar:35.green/black}▏ {percent:>3}% • {pos}/{len} • ⏱️ {elapsed_precise} • {msg}";
    pub const PROGRESS_CHARS: &str = "█▓░";
    pub const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";
}

/// Batch progress bar; `quiet` hides it entirely (tests, `--quiet`, pipes).
pub fn create_progress_bar(total: u64, prefix: &str, quiet: bool) -> ProgressBar {
    let pb = ProgressBar::new(total);

    if quiet {
        pb.set_draw_target(ProgressDrawTarget::hidden());
        return pb;
    }

    // A bad template only costs the styling, not the run.
    if let Ok(style) = ProgressStyle::default_bar().template(templates::BATCH) {
        pb.set_style(
            style
                .progress_chars(templates::PROGRESS_CHARS)
                .tick_chars(templates::SPINNER_CHARS),
        );
    }
    pb.set_prefix(prefix.to_string());
    pb.set_draw_target(ProgressDrawTarget::stderr_with_hz(20));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn format_bytes(bytes: u64) -> String {
    crate::types::FileSize::new(bytes).display()
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}
