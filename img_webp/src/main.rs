//! Command line front end for the batch WebP converter.
//!
//! This binary is a thin adapter: it translates flags into
//! `ConversionOptions`, renders progress events as an indicatif bar, and
//! wires Ctrl-C to the cancellation token. All discovery, mapping and
//! overwrite logic lives in the `webp_batch` crate.

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process;
use tracing::Level;
use webp_batch::logging::{init_logging, LogConfig};
use webp_batch::{
    run_with, BatchResult, CancelToken, ConversionOptions, NullSink, ProgressEvent, ProgressSink,
    WebpCodec,
};

#[derive(Parser)]
#[command(name = "img-webp")]
#[command(version, about = "Convert images to WebP format", long_about = None)]
struct Cli {
    /// Input file or directory
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory (default: write beside each source file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// WebP quality, 0-100
    #[arg(short, long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(0..=100))]
    quality: u8,

    /// Use lossless compression (quality is ignored)
    #[arg(short, long)]
    lossless: bool,

    /// Process subfolders recursively
    #[arg(short, long)]
    recursive: bool,

    /// Keep existing .webp files instead of overwriting them
    #[arg(short = 'n', long)]
    no_overwrite: bool,

    /// Worker threads (0 = one per CPU core)
    #[arg(short, long, default_value_t = 1)]
    jobs: usize,

    /// Print the summary as JSON instead of a progress bar
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Renders progress events as a terminal bar. The bar is created lazily on
/// the first event because the task total is only known once discovery ran.
#[derive(Default)]
struct BarSink {
    bar: Option<ProgressBar>,
}

impl BarSink {
    fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl ProgressSink for BarSink {
    fn notify(&mut self, event: &ProgressEvent) {
        if event.total == 0 {
            eprintln!("{} {}", style("!").yellow().bold(), event.message);
            return;
        }

        let bar = self.bar.get_or_insert_with(|| {
            let bar = ProgressBar::new(event.total as u64);
            bar.set_style(
                ProgressStyle::with_template(
                    "{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
            );
            bar.set_prefix("Converting");
            bar
        });

        bar.set_position(event.current as u64);
        bar.set_message(event.message.clone());
    }
}

fn print_summary(result: &BatchResult) {
    println!(
        "{} {} converted, {} skipped, {} failed ({} total)",
        style("Done:").green().bold(),
        result.converted,
        result.skipped,
        result.failed,
        result.total
    );
    if result.cancelled {
        println!("{}", style("Run was cancelled before completion").yellow());
    }
    for (path, reason) in &result.errors {
        eprintln!("  {} {}: {}", style("✗").red(), path.display(), reason);
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let _guard = init_logging("img_webp", LogConfig::default().with_level(level)).ok();

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        let _ = ctrlc::set_handler(move || cancel.cancel());
    }

    let options = ConversionOptions {
        quality: cli.quality,
        lossless: cli.lossless,
        recursive: cli.recursive,
        // This flag keeps the original tool's polarity; the core only
        // speaks overwrite_existing, so the inversion stops here.
        overwrite_existing: !cli.no_overwrite,
        output_root: cli.output.clone(),
        jobs: cli.jobs,
    };

    let outcome = if cli.json {
        run_with(&WebpCodec, &cli.input, &options, &mut NullSink, &cancel)
    } else {
        let mut sink = BarSink::default();
        let result = run_with(&WebpCodec, &cli.input, &options, &mut sink, &cancel);
        sink.finish();
        result
    };

    match outcome {
        Ok(result) => {
            if cli.json {
                match serde_json::to_string_pretty(&result) {
                    Ok(json) => println!("{json}"),
                    Err(e) => eprintln!("Failed to serialize summary: {e}"),
                }
            } else {
                print_summary(&result);
            }
            if result.total == 0 || result.failed > 0 {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{} {e}", style("Error:").red().bold());
            process::exit(2);
        }
    }
}
