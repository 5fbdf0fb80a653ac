//! # sftgen Core Library
//!
//! Turns recorded agent trajectories (ALFWorld-style evaluation results) plus
//! a bank of previously extracted memories into supervised fine-tuning
//! samples: one `(system, user, assistant)` message triple per step.
//!
//! ## Data flow
//!
//! ```text
//! memory *.jsonl ──► MemoryBankIndex ──┐
//!                                      ▼
//! results *.json ──► EpisodeResult ──► resolve ──► PromptComposer ──► SampleBuilder
//!                                                                        │
//!                                           Pipeline (aggregation) ◄─────┘
//!                                                  │
//!                                                  ▼
//!                                           write_jsonl (output)
//! ```
//!
//! Everything here is synchronous and deterministic: identical inputs and
//! configuration produce byte-identical output.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod discovery;
pub mod episode;
pub mod error;
pub mod io;
pub mod memory;
pub mod pipeline;
pub mod prompt;
pub mod sample;
pub mod stats;
pub mod types;

pub use config::SftConfig;
pub use episode::EpisodeResult;
pub use error::SftError;
pub use memory::{MemoryBankIndex, RetrievedMemory};
pub use pipeline::{GenerationRun, Pipeline};
pub use prompt::PromptComposer;
pub use sample::SampleBuilder;
pub use stats::GenerationStats;
pub use types::*;
