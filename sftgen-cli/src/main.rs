//! `sftgen`: turn evaluation results plus a memory bank into SFT JSONL.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use sftgen_core::io::write_jsonl;
use sftgen_core::pipeline::generate_from_dir;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    init_tracing(&config.general.log_level, cli.json_logs);

    let dir = cli.directory();
    let (sources, run) = generate_from_dir(dir, &config)
        .with_context(|| format!("failed to generate samples from {}", dir.display()))?;

    println!(
        "Found {} memory file(s) and {} results file(s)",
        sources.memory.len(),
        sources.results.len()
    );
    for summary in &run.sources {
        println!(
            "{}: {} instances ({} success, {} failed), {} samples",
            summary.path.display(),
            summary.episodes,
            summary.successful_episodes,
            summary.failed_episodes,
            summary.samples
        );
    }

    let output = cli.output_path(&config);
    let written = write_jsonl(&output, &run.samples)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(path = %output.display(), samples = written, "Output written");

    println!("\nSaved {written} samples to: {}\n", output.display());
    println!("{}", run.stats);
    Ok(())
}

/// `RUST_LOG` wins; otherwise the level from flags/config applies.
/// Logs go to stderr so stdout carries only the report.
fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}
