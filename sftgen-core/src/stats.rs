//! Run statistics.
//!
//! Reporting only: nothing downstream depends on these numbers.

use std::fmt;
use std::path::PathBuf;

use crate::types::TrainingSample;

/// Tallies for one results source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSummary {
    /// The results file.
    pub path: PathBuf,
    /// Episodes in the file.
    pub episodes: usize,
    /// Episodes with `success == true`.
    pub successful_episodes: usize,
    /// Episodes with `success == false`.
    pub failed_episodes: usize,
    /// Processed episodes that break the alignment contract.
    pub misaligned_episodes: usize,
    /// Samples generated from the file.
    pub samples: usize,
}

/// Aggregate statistics across all sources of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Total samples.
    pub total_samples: usize,
    /// Samples whose episode succeeded.
    pub success_samples: usize,
    /// Samples whose episode failed.
    pub failed_samples: usize,
    /// Samples whose episode had at least one resolved memory.
    pub with_memory: usize,
    /// Samples without any resolved memory.
    pub without_memory: usize,
    /// Episodes seen across all sources.
    pub episodes: usize,
    /// Successful episodes across all sources.
    pub successful_episodes: usize,
    /// Misaligned episodes across all sources.
    pub misaligned_episodes: usize,
}

impl GenerationStats {
    /// Compute sample-level counts from `samples` and fold in the
    /// per-source episode tallies.
    #[must_use]
    pub fn collect(samples: &[TrainingSample], sources: &[SourceSummary]) -> Self {
        let total_samples = samples.len();
        let success_samples = samples.iter().filter(|s| s.metadata.success).count();
        let with_memory = samples.iter().filter(|s| s.metadata.has_memory).count();

        Self {
            total_samples,
            success_samples,
            failed_samples: total_samples - success_samples,
            with_memory,
            without_memory: total_samples - with_memory,
            episodes: sources.iter().map(|s| s.episodes).sum(),
            successful_episodes: sources.iter().map(|s| s.successful_episodes).sum(),
            misaligned_episodes: sources.iter().map(|s| s.misaligned_episodes).sum(),
        }
    }
}

impl fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Statistics ===")?;
        writeln!(f, "Total samples: {}", self.total_samples)?;
        writeln!(f, "  - From successful episodes: {}", self.success_samples)?;
        writeln!(f, "  - From failed episodes: {}", self.failed_samples)?;
        writeln!(f, "  - With memory: {}", self.with_memory)?;
        writeln!(f, "  - Without memory: {}", self.without_memory)?;
        write!(
            f,
            "Episodes: {} ({} successful, {} misaligned)",
            self.episodes, self.successful_episodes, self.misaligned_episodes
        )
    }
}
