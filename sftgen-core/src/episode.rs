//! Recorded episodes as produced by the evaluation harness.
//!
//! ## Alignment contract
//!
//! `observations[0]` is the state before any action, and `observations[i + 1]`
//! is what `actions[i]` produced. `thoughts[i]` is the reasoning behind
//! `actions[i]`. So a well-formed episode has
//! `observations.len() == actions.len() + 1` and
//! `thoughts.len() == actions.len()`. Episodes that break this are still
//! processed (missing entries read as empty strings) unless strict alignment
//! is requested.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SftError};
use crate::io;
use crate::memory::UsedMemoryReference;
use crate::types::{GameId, null_as_default};

/// One recorded episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeResult {
    /// Episode identifier; written back exactly as read, `null` included.
    #[serde(default)]
    pub game_id: GameId,
    /// Task goal; may be empty, in which case it is extracted from the first
    /// observation.
    #[serde(default, deserialize_with = "null_as_default")]
    pub goal: String,
    /// Whether the agent completed the task.
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    /// Actions, one per step. Drives the number of samples.
    #[serde(default, deserialize_with = "null_as_default")]
    pub actions: Vec<String>,
    /// Observations; index 0 precedes the first action.
    #[serde(default, deserialize_with = "null_as_default")]
    pub observations: Vec<String>,
    /// Reasoning text, one per action.
    #[serde(default, deserialize_with = "null_as_default")]
    pub thoughts: Vec<String>,
    /// Memories retrieved upstream for this episode.
    #[serde(default, deserialize_with = "null_as_default")]
    pub used_memories: Vec<UsedMemoryReference>,
}

/// Shape of the array lengths of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    /// Number of actions.
    pub actions: usize,
    /// Number of observations.
    pub observations: usize,
    /// Number of thoughts.
    pub thoughts: usize,
}

impl Alignment {
    /// Whether the lengths satisfy the alignment contract.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        self.observations == self.actions + 1 && self.thoughts == self.actions
    }
}

impl EpisodeResult {
    /// Number of steps (= number of samples the episode yields).
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.actions.len()
    }

    /// Observation at `index`, or `""` if the array is too short.
    #[must_use]
    pub fn observation(&self, index: usize) -> &str {
        self.observations.get(index).map_or("", String::as_str)
    }

    /// Thought at `index`, or `""` if the array is too short.
    #[must_use]
    pub fn thought(&self, index: usize) -> &str {
        self.thoughts.get(index).map_or("", String::as_str)
    }

    /// Array lengths of this episode.
    #[must_use]
    pub fn alignment(&self) -> Alignment {
        Alignment {
            actions: self.actions.len(),
            observations: self.observations.len(),
            thoughts: self.thoughts.len(),
        }
    }

    /// Fail with [`SftError::Misaligned`] if the alignment contract is broken.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn check_alignment(&self) -> Result<()> {
        let shape = self.alignment();
        if shape.is_aligned() {
            return Ok(());
        }
        Err(SftError::Misaligned {
            game_id: self.game_id.to_string(),
            actions: shape.actions,
            observations: shape.observations,
            thoughts: shape.thoughts,
        })
    }
}

/// A results document: `{"results": [episode, ...]}`.
///
/// Other top-level keys (summary statistics, run metadata) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsDocument {
    /// Episodes in recorded order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<EpisodeResult>,
}

impl ResultsDocument {
    /// Read a results file.
    ///
    /// # Errors
    ///
    /// Returns [`SftError::Io`] or [`SftError::Json`].
    pub fn load(path: &Path) -> Result<Self> {
        io::read_json(path)
    }
}
