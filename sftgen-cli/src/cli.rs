//! Command-line arguments and how they layer over the config file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use sftgen_core::SftConfig;
use sftgen_core::pipeline::default_output_path;

/// Generate SFT training data from agent evaluation results.
#[derive(Debug, Parser)]
#[command(name = "sftgen")]
#[command(about = "Generate SFT training data from evaluation results and a memory bank")]
#[command(version)]
pub struct Cli {
    /// Directory containing memory (.jsonl) and results (.json) files
    pub directory: PathBuf,

    /// Output file path (default: <directory>/sft_data.jsonl)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Disable few-shot examples in the system prompt
    #[arg(long)]
    pub no_few_shot: bool,

    /// Number of recent history entries to include
    #[arg(long, value_name = "N")]
    pub history_length: Option<usize>,

    /// Only generate samples from successful episodes
    #[arg(long)]
    pub only_success: bool,

    /// Disable memory retrieval (memory files are not read)
    #[arg(long)]
    pub no_memory: bool,

    /// Abort on episodes whose arrays are misaligned
    #[arg(long)]
    pub strict_alignment: bool,

    /// Log level when RUST_LOG is unset (overrides the config file)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Read the config file (if any), then apply flag overrides and
    /// validate the result.
    pub fn load_config(&self) -> Result<SftConfig> {
        let mut config = match &self.config {
            Some(path) => SftConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => SftConfig::default(),
        };
        self.apply(&mut config);
        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    /// Flags only ever switch behaviour on (or set a value); absent flags
    /// leave the file's setting alone.
    pub fn apply(&self, config: &mut SftConfig) {
        let generation = &mut config.generation;
        if self.no_few_shot {
            generation.few_shot = false;
        }
        if let Some(n) = self.history_length {
            generation.history_length = n;
        }
        if self.only_success {
            generation.only_success = true;
        }
        if self.no_memory {
            generation.use_memory = false;
        }
        if self.strict_alignment {
            generation.strict_alignment = true;
        }
        if let Some(level) = &self.log_level {
            config.general.log_level.clone_from(level);
        }
    }

    /// Where samples are written.
    pub fn output_path(&self, config: &SftConfig) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.directory, config))
    }

    /// The input directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("sftgen").chain(args.iter().copied())).expect("parse")
    }

    #[test]
    fn defaults_leave_config_untouched() {
        let cli = parse(&["runs/alfworld"]);
        let config = cli.load_config().expect("config");
        assert!(config.generation.few_shot);
        assert!(config.generation.use_memory);
        assert_eq!(config.generation.history_length, 10);
        assert_eq!(
            cli.output_path(&config),
            PathBuf::from("runs/alfworld").join("sft_data.jsonl")
        );
    }

    #[test]
    fn flags_override_generation_options() {
        let cli = parse(&[
            "runs",
            "--no-few-shot",
            "--history-length",
            "3",
            "--only-success",
            "--no-memory",
            "--strict-alignment",
            "--log-level",
            "debug",
            "-o",
            "out.jsonl",
        ]);
        let config = cli.load_config().expect("config");
        assert!(!config.generation.few_shot);
        assert_eq!(config.generation.history_length, 3);
        assert!(config.generation.only_success);
        assert!(!config.generation.use_memory);
        assert!(config.generation.strict_alignment);
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(cli.output_path(&config), PathBuf::from("out.jsonl"));
    }

    #[test]
    fn flags_layer_over_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sftgen.toml");
        std::fs::write(
            &path,
            "[generation]\nhistory_length = 4\nonly_success = true\n\n[discovery]\noutput_file_name = \"train.jsonl\"\n",
        )
        .expect("write config");

        let cli = parse(&["runs", "-c", path.to_str().expect("utf-8 path"), "--no-few-shot"]);
        let config = cli.load_config().expect("config");
        assert_eq!(config.generation.history_length, 4);
        assert!(config.generation.only_success);
        assert!(!config.generation.few_shot);
        assert_eq!(cli.output_path(&config), PathBuf::from("runs").join("train.jsonl"));
    }

    #[test]
    fn missing_directory_argument_is_rejected() {
        assert!(Cli::try_parse_from(["sftgen"]).is_err());
    }

    #[test]
    fn negative_history_length_is_rejected() {
        assert!(Cli::try_parse_from(["sftgen", "dir", "--history-length", "-1"]).is_err());
    }
}
