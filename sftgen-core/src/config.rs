//! Configuration for SFT sample generation.
//!
//! Maps directly to `sftgen.toml`. Every key is optional; command-line flags
//! are applied on top of whatever the file provides.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SftError};
use crate::prompt::SystemSection;

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SftConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Sample generation options.
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Input discovery and output naming.
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// Prompt template overrides.
    #[serde(default)]
    pub prompt: PromptConfig,
}

impl SftConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `SftError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| SftError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SftError::io(path, e))?;
        Self::from_toml(&content)
    }

    /// Reject settings that would make discovery or output ambiguous.
    ///
    /// # Errors
    /// Returns `SftError::Config` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let d = &self.discovery;
        if d.memory_marker.trim().is_empty() {
            return Err(SftError::Config("discovery.memory_marker must not be empty".into()));
        }
        if d.results_marker.trim().is_empty() {
            return Err(SftError::Config("discovery.results_marker must not be empty".into()));
        }
        if d.output_file_name.trim().is_empty() {
            return Err(SftError::Config("discovery.output_file_name must not be empty".into()));
        }
        if self.prompt.layout.as_ref().is_some_and(Vec::is_empty) {
            return Err(SftError::Config("prompt.layout must name at least one section".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// How samples are generated from episodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Include the worked examples in the system prompt.
    #[serde(default = "default_true")]
    pub few_shot: bool,
    /// Number of recent `(action, observation)` pairs shown per step.
    #[serde(default = "default_history_length")]
    pub history_length: usize,
    /// Skip episodes whose `success` flag is false.
    #[serde(default)]
    pub only_success: bool,
    /// Load memory sources and render retrieved memories.
    #[serde(default = "default_true")]
    pub use_memory: bool,
    /// Abort on episodes whose arrays break the alignment contract instead
    /// of substituting empty strings.
    #[serde(default)]
    pub strict_alignment: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            few_shot: true,
            history_length: 10,
            only_success: false,
            use_memory: true,
            strict_alignment: false,
        }
    }
}

/// Which files in the input directory are read, and where output goes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// `.jsonl` files whose lower-cased name contains this are memory sources.
    #[serde(default = "default_memory_marker")]
    pub memory_marker: String,
    /// `.json` files whose lower-cased name contains this are results sources.
    #[serde(default = "default_results_marker")]
    pub results_marker: String,
    /// Output file name inside the input directory when no path is given.
    #[serde(default = "default_output_file_name")]
    pub output_file_name: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            memory_marker: "mem".to_string(),
            results_marker: "result".to_string(),
            output_file_name: "sft_data.jsonl".to_string(),
        }
    }
}

/// Prompt template settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    /// TOML file overriding parts of the built-in templates.
    #[serde(default)]
    pub templates: Option<PathBuf>,
    /// System prompt section order. Without a `retrieved_memory` entry the
    /// memory block goes last.
    #[serde(default)]
    pub layout: Option<Vec<SystemSection>>,
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_history_length() -> usize { 10 }
fn default_memory_marker() -> String { "mem".to_string() }
fn default_results_marker() -> String { "result".to_string() }
fn default_output_file_name() -> String { "sft_data.jsonl".to_string() }
