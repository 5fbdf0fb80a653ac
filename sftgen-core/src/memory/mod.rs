//! Memory records and their resolved per-episode views.
//!
//! A memory bank is a set of [`MemoryRecord`]s, each distilled from a past
//! episode into a handful of [`MemoryItem`] insights. Episodes reference
//! bank entries by id through [`UsedMemoryReference`]s carrying a
//! precomputed similarity; [`resolve`] joins the two into
//! [`RetrievedMemory`] views.

pub mod bank;
pub mod resolver;

pub use bank::MemoryBankIndex;
pub use resolver::resolve;

use serde::{Deserialize, Serialize};

use crate::types::{null_as_default, string_or_empty};

/// An atomic insight extracted from a past episode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryItem {
    /// Short title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// One-line description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Optional longer body; empty when absent.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

/// One step of a remembered trajectory.
///
/// Only `action` and `observation` are interpreted; anything else the
/// producer recorded is kept verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryStep {
    /// Action taken.
    #[serde(default, deserialize_with = "null_as_default")]
    pub action: String,
    /// Observation that followed.
    #[serde(default, deserialize_with = "null_as_default")]
    pub observation: String,
    /// Any other recorded fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A persisted memory-bank entry (one JSONL line).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Bank-unique identifier. Records without a string id are not indexed.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub memory_id: String,
    /// The task goal the memory was extracted from.
    #[serde(default, deserialize_with = "null_as_default")]
    pub query: String,
    /// Whether the source episode succeeded.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_success: bool,
    /// The source episode's trajectory.
    #[serde(default, deserialize_with = "null_as_default")]
    pub trajectory: Vec<TrajectoryStep>,
    /// Distilled insights, in extraction order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub memory_items: Vec<MemoryItem>,
}

/// Per-episode pointer into the memory bank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsedMemoryReference {
    /// Referenced [`MemoryRecord::memory_id`]. A non-string id reads as
    /// empty and never resolves.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub memory_id: String,
    /// Retrieval score computed upstream.
    #[serde(default, deserialize_with = "null_as_default")]
    pub similarity: f64,
}

/// A [`UsedMemoryReference`] joined with the record it points at.
///
/// Rebuilt for every episode; never stored back into the bank.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedMemory {
    /// Record identifier.
    pub memory_id: String,
    /// Similarity taken from the reference, not from the record.
    pub similarity: f64,
    /// Goal of the remembered episode.
    pub query: String,
    /// Whether the remembered episode succeeded.
    pub is_success: bool,
    /// Remembered trajectory.
    pub trajectory: Vec<TrajectoryStep>,
    /// Distilled insights.
    pub memory_items: Vec<MemoryItem>,
}
