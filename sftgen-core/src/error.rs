//! Error types for the sftgen core library.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all sftgen operations.
///
/// Missing fields are never errors (they default); everything here aborts
/// the run.
#[derive(Error, Debug)]
pub enum SftError {
    /// A file could not be read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A record or document failed to parse as JSON.
    #[error("Malformed JSON in {}{}: {source}", .path.display(), .line.map(|l| format!(" (line {l})")).unwrap_or_default())]
    Json {
        /// File the record came from.
        path: PathBuf,
        /// 1-based line number for JSONL records, `None` for whole documents.
        line: Option<usize>,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The input location is not a directory.
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The input directory holds no results files.
    #[error("No results files found in {}", .0.display())]
    NoResultsSources(PathBuf),

    /// An episode violates the observation/action alignment contract and
    /// strict alignment is enabled.
    #[error(
        "Episode {game_id} is misaligned: {actions} actions, {observations} observations, {thoughts} thoughts"
    )]
    Misaligned {
        /// Episode identifier.
        game_id: String,
        /// Number of actions.
        actions: usize,
        /// Number of observations (expected `actions + 1`).
        observations: usize,
        /// Number of thoughts (expected `actions`).
        thoughts: usize,
    },
}

impl SftError {
    /// Wrap an I/O error with the path it happened on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, SftError>;
