//! Core type definitions shared across the pipeline.
//!
//! Input records tolerate missing and `null` fields; output types serialize
//! in the exact field order of the training-data format.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Tolerant field parsing
// ---------------------------------------------------------------------------

/// Deserialize a field, mapping an explicit JSON `null` to `T::default()`.
///
/// Combined with `#[serde(default)]` this makes a field behave the same
/// whether it is absent or `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a string field, reading any non-string value as `""`.
///
/// For identifiers that are only ever looked up: an id of the wrong type
/// can never match, so it behaves like a missing one.
pub(crate) fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        _ => String::new(),
    })
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Episode identifier as recorded by the evaluation harness.
///
/// Usually a string, occasionally a number; any other JSON value (including
/// `null`) is carried as-is. Every form is written back to the output
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GameId {
    /// Textual identifier (the common case).
    Text(String),
    /// Numeric identifier.
    Number(serde_json::Number),
    /// Anything else the producer wrote.
    Other(serde_json::Value),
}

impl Default for GameId {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for GameId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Chat messages
// ---------------------------------------------------------------------------

/// Role of a message, matching the chat-completions `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction.
    System,
    /// User turn.
    User,
    /// Assistant turn (the training target).
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who is speaking.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// System message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// User message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Training samples
// ---------------------------------------------------------------------------

/// Per-sample bookkeeping carried alongside the messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleMetadata {
    /// Episode the sample came from.
    pub game_id: GameId,
    /// Zero-based step index within the episode.
    pub step: usize,
    /// Number of steps (actions) in the episode.
    pub total_steps: usize,
    /// Whether the episode succeeded.
    pub success: bool,
    /// The action taken at this step.
    pub action: String,
    /// Whether at least one memory was resolved for the episode.
    pub has_memory: bool,
}

/// One supervised fine-tuning sample: `[system, user, assistant]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    /// Messages in fixed order: system, user, assistant.
    pub messages: [ChatMessage; 3],
    /// Sample metadata.
    pub metadata: SampleMetadata,
}

impl TrainingSample {
    /// Build a sample from its three message texts.
    #[must_use]
    pub fn new(
        system: impl Into<String>,
        user: impl Into<String>,
        assistant: impl Into<String>,
        metadata: SampleMetadata,
    ) -> Self {
        Self {
            messages: [
                ChatMessage::system(system),
                ChatMessage::user(user),
                ChatMessage::assistant(assistant),
            ],
            metadata,
        }
    }

    /// The system prompt text.
    #[must_use]
    pub fn system(&self) -> &str {
        &self.messages[0].content
    }

    /// The user prompt text.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.messages[1].content
    }

    /// The assistant response text.
    #[must_use]
    pub fn assistant(&self) -> &str {
        &self.messages[2].content
    }
}
