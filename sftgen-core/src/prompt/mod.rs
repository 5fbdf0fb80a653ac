//! Prompt composition for SFT samples.
//!
//! [`PromptComposer`] owns the static template text and the per-run prompt
//! options. Both of its outputs are pure functions of their arguments:
//!
//! - [`PromptComposer::system_prompt`]: once per episode (step-invariant)
//! - [`PromptComposer::user_prompt`]: once per step

pub mod system;
pub mod templates;
pub mod user;

pub use system::{DEFAULT_LAYOUT, SystemSection};
pub use templates::PromptTemplates;
pub use user::{HistoryEntry, extract_task_description, task_description};

use crate::config::GenerationConfig;
use crate::memory::RetrievedMemory;

/// Default number of history entries shown in a user prompt.
pub const DEFAULT_HISTORY_LENGTH: usize = 10;

/// Builds system and user prompts from fixed templates.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    templates: PromptTemplates,
    layout: Vec<SystemSection>,
    few_shot: bool,
    history_length: usize,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self {
            templates: PromptTemplates::builtin(),
            layout: DEFAULT_LAYOUT.to_vec(),
            few_shot: true,
            history_length: DEFAULT_HISTORY_LENGTH,
        }
    }
}

impl PromptComposer {
    /// Built-in templates, few-shot on, history window of 10.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Composer configured from the generation settings.
    #[must_use]
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new()
            .with_few_shot(config.few_shot)
            .with_history_length(config.history_length)
    }

    /// Replace the static template text.
    #[must_use]
    pub fn with_templates(mut self, templates: PromptTemplates) -> Self {
        self.templates = templates;
        self
    }

    /// Replace the system prompt section order.
    #[must_use]
    pub fn with_layout(mut self, layout: impl Into<Vec<SystemSection>>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Enable or disable the worked examples.
    #[must_use]
    pub fn with_few_shot(mut self, few_shot: bool) -> Self {
        self.few_shot = few_shot;
        self
    }

    /// Set how many recent history entries a user prompt shows.
    #[must_use]
    pub fn with_history_length(mut self, history_length: usize) -> Self {
        self.history_length = history_length;
        self
    }

    /// Whether few-shot examples are included.
    #[must_use]
    pub fn few_shot(&self) -> bool {
        self.few_shot
    }

    /// History window length.
    #[must_use]
    pub fn history_length(&self) -> usize {
        self.history_length
    }

    /// System prompt for an episode with the given retrieved memories.
    #[must_use]
    pub fn system_prompt(&self, memories: &[RetrievedMemory]) -> String {
        system::compose(&self.templates, &self.layout, self.few_shot, memories)
    }

    /// User prompt for one step.
    #[must_use]
    pub fn user_prompt(
        &self,
        task: &str,
        history: &[HistoryEntry],
        current_observation: &str,
    ) -> String {
        user::compose(task, history, current_observation, self.history_length)
    }
}
