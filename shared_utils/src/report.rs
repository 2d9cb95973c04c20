//! Report Module
//!
//! End-of-run summary: a boxed human report or a JSON document.

use serde_json::json;
use std::time::Duration;

use crate::batch::BatchTally;
use crate::progress::{format_bytes, format_duration};

pub fn print_summary_report(tally: &BatchTally, duration: Duration) {
    let reduction = tally
        .output_bytes
        .percent_saved(tally.input_bytes)
        .unwrap_or(0.0);

    println!();
    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║              📊 WebP Optimization Complete               ║");
    println!("╠══════════════════════════════════════════════════════════╣");
    println!("║  📁 Files Found:            {:>10}                   ║", tally.total);
    println!("║  ✅ Successfully converted: {:>10}                   ║", tally.converted);
    println!("║  ⏭️  Skipped:                {:>10}                   ║", tally.skipped);
    println!("║  ❌ Errors:                 {:>10}                   ║", tally.failed);
    println!(
        "║  📈 Conversion Rate:        {:>9.1}%                   ║",
        tally.conversion_rate()
    );
    println!("╠══════════════════════════════════════════════════════════╣");
    println!(
        "║  💾 Converted Input:        {:>10}                   ║",
        format_bytes(tally.input_bytes.bytes())
    );
    println!(
        "║  💾 Converted Output:       {:>10}                   ║",
        format_bytes(tally.output_bytes.bytes())
    );
    println!(
        "║  📉 Saved:                  {:>10} ({:>5.1}%)          ║",
        format_bytes(tally.bytes_saved().bytes()),
        reduction
    );
    println!(
        "║  ⏱️  Total Time:             {:>10}                   ║",
        format_duration(duration)
    );
    println!("╚══════════════════════════════════════════════════════════╝");

    if !tally.errors.is_empty() {
        println!();
        println!("❌ Errors encountered:");
        for (path, error) in &tally.errors {
            println!("   {} → {}", path.display(), error);
        }
    }
}

pub fn summary_json(tally: &BatchTally, duration: Duration) -> serde_json::Value {
    json!({
        "total": tally.total,
        "converted": tally.converted,
        "skipped": tally.skipped,
        "failed": tally.failed,
        "input_bytes": tally.input_bytes.bytes(),
        "output_bytes": tally.output_bytes.bytes(),
        "bytes_saved": tally.bytes_saved().bytes(),
        "duration_secs": duration.as_secs_f64(),
        "errors": tally
            .errors
            .iter()
            .map(|(p, e)| json!({ "path": p.display().to_string(), "error": e }))
            .collect::<Vec<_>>(),
    })
}
