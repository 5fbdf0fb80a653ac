//! Locate memory and results files in an input directory.
//!
//! - memory sources: `*.jsonl` whose lower-cased name contains the memory
//!   marker (default `mem`)
//! - results sources: `*.json` whose lower-cased name contains the results
//!   marker (default `result`)
//!
//! The marker on memory files keeps a previous run's `sft_data.jsonl` from
//! being read back as memory. Both lists are sorted by path so sample order
//! does not depend on directory enumeration order.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::DiscoveryConfig;
use crate::error::{Result, SftError};

/// Input files found in a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sources {
    /// Memory-bank JSONL files, sorted.
    pub memory: Vec<PathBuf>,
    /// Results JSON files, sorted.
    pub results: Vec<PathBuf>,
}

/// How a file name is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Memory-bank JSONL.
    Memory,
    /// Results JSON document.
    Results,
}

/// Classify a file name, or `None` if it is neither kind.
#[must_use]
pub fn classify(file_name: &str, config: &DiscoveryConfig) -> Option<SourceKind> {
    let lower = file_name.to_lowercase();
    if file_name.ends_with(".jsonl") {
        lower
            .contains(&config.memory_marker.to_lowercase())
            .then_some(SourceKind::Memory)
    } else if file_name.ends_with(".json") {
        lower
            .contains(&config.results_marker.to_lowercase())
            .then_some(SourceKind::Results)
    } else {
        None
    }
}

/// Scan `dir` (non-recursively) for input files.
///
/// # Errors
///
/// - [`SftError::NotADirectory`] if `dir` is not a directory
/// - [`SftError::Io`] if it cannot be listed
/// - [`SftError::NoResultsSources`] if no results file is found
pub fn discover(dir: &Path, config: &DiscoveryConfig) -> Result<Sources> {
    if !dir.is_dir() {
        return Err(SftError::NotADirectory(dir.to_path_buf()));
    }

    let mut sources = Sources::default();
    let entries = std::fs::read_dir(dir).map_err(|e| SftError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| SftError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        match classify(name, config) {
            Some(SourceKind::Memory) => sources.memory.push(path),
            Some(SourceKind::Results) => sources.results.push(path),
            None => {}
        }
    }

    sources.memory.sort();
    sources.results.sort();

    if sources.results.is_empty() {
        return Err(SftError::NoResultsSources(dir.to_path_buf()));
    }

    info!(
        dir = %dir.display(),
        memory_files = sources.memory.len(),
        results_files = sources.results.len(),
        "Input files discovered"
    );
    Ok(sources)
}
