use anyhow::Context;
use clap::{Parser, Subcommand};
use img_webp::{passes_similarity_gate, run, ImageCodec, RunOptions, WebpCodec};
use shared_utils::logging::{init_logging, LogConfig};
use shared_utils::{
    calculate_similarity, format_bytes, print_summary_report, similarity_description,
    summary_json, FileSize,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::error;

#[derive(Parser)]
#[command(name = "img-webp")]
#[command(version, about = "Recompress JPEG/PNG images to WebP in place when it saves space", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every JPEG/PNG under DIR (recursively), deleting replaced originals
    Run {
        /// Root directory (default: current directory)
        #[arg(value_name = "DIR")]
        input: Option<PathBuf>,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,

        /// Print the final summary as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Directory for the rolling log file (default: system temp dir)
        #[arg(long, value_name = "PATH")]
        log_dir: Option<PathBuf>,
    },

    /// Compare an original with a converted file (size and similarity)
    Verify {
        #[arg(value_name = "ORIGINAL")]
        original: PathBuf,

        #[arg(value_name = "CONVERTED")]
        converted: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            quiet,
            json,
            log_dir,
        } => {
            let mut log_config = LogConfig::default();
            if let Some(dir) = log_dir {
                log_config = log_config.with_log_dir(dir);
            }
            start_logging(log_config);

            let root = match input {
                Some(dir) => dir,
                None => std::env::current_dir().context("Cannot determine current directory")?,
            };

            let start = Instant::now();
            let options = RunOptions {
                quiet,
                ..RunOptions::default()
            };
            let tally = match run(&root, &options, &WebpCodec) {
                Ok(tally) => tally,
                Err(e) => {
                    error!(root = %root.display(), "Batch aborted: {}", e);
                    eprintln!("❌ Error: {}", e);
                    std::process::exit(1);
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&summary_json(&tally, start.elapsed()))?);
            } else {
                print_summary_report(&tally, start.elapsed());
            }
        }

        Commands::Verify {
            original,
            converted,
        } => {
            start_logging(LogConfig::default());
            verify_conversion(&original, &converted)?;
        }
    }

    Ok(())
}

/// Logging is optional: a failure is reported on stderr and the run goes on.
fn start_logging(config: LogConfig) -> bool {
    match init_logging("img_webp", config) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("⚠️  Logging unavailable: {:#}", e);
            false
        }
    }
}

fn verify_conversion(original: &Path, converted: &Path) -> anyhow::Result<()> {
    println!("🔍 Verifying conversion quality...");
    println!("   Original:  {}", original.display());
    println!("   Converted: {}", converted.display());

    let codec = WebpCodec;
    let original_bytes = std::fs::read(original)
        .with_context(|| format!("Failed to read {}", original.display()))?;
    let converted_bytes = std::fs::read(converted)
        .with_context(|| format!("Failed to read {}", converted.display()))?;

    let original_size = FileSize::of(&original_bytes);
    let converted_size = FileSize::of(&converted_bytes);
    println!("\n📊 Size Comparison:");
    println!("   Original size:  {}", format_bytes(original_size.bytes()));
    println!("   Converted size: {}", format_bytes(converted_size.bytes()));
    if let Some(percent) = converted_size.percent_saved(original_size) {
        println!("   Size reduction: {:.2}%", percent);
    }

    let original_img = codec.decode(&original_bytes)?;
    let converted_img = codec.decode(&converted_bytes)?;
    let score = calculate_similarity(&original_img, &converted_img);

    println!("\n📏 Quality Metrics:");
    println!(
        "   Similarity: {} ({}, {})",
        score.display(),
        score.as_percent(),
        similarity_description(score)
    );
    if passes_similarity_gate(score) {
        println!("   ✅ Within the acceptance threshold");
    } else {
        println!("   ⚠️  Below the acceptance threshold");
    }

    Ok(())
}
