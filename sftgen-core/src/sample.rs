//! Per-episode sample generation.
//!
//! Walks an episode step by step, rebuilding the conversation the acting
//! model saw at each step:
//!
//! 1. current observation = `observations[step]` (or `""`)
//! 2. user prompt from the history *before* this step
//! 3. assistant = `Think: {thought}\n\nAction: {action}`
//! 4. history += `(actions[step], observations[step + 1] or "")`
//!
//! The number of samples always equals `actions.len()`.

use tracing::debug;

use crate::config::GenerationConfig;
use crate::episode::EpisodeResult;
use crate::error::Result;
use crate::memory::{self, MemoryBankIndex};
use crate::prompt::{HistoryEntry, PromptComposer, task_description};
use crate::types::{SampleMetadata, TrainingSample};

/// Format the assistant turn for one step.
#[must_use]
pub fn assistant_response(thought: &str, action: &str) -> String {
    format!("Think: {thought}\n\nAction: {action}")
}

/// Turns episodes into training samples against a shared memory bank.
#[derive(Debug, Clone, Copy)]
pub struct SampleBuilder<'a> {
    composer: &'a PromptComposer,
    bank: &'a MemoryBankIndex,
    only_success: bool,
    strict_alignment: bool,
}

impl<'a> SampleBuilder<'a> {
    /// Builder keeping every episode and tolerating misaligned arrays.
    #[must_use]
    pub fn new(composer: &'a PromptComposer, bank: &'a MemoryBankIndex) -> Self {
        Self {
            composer,
            bank,
            only_success: false,
            strict_alignment: false,
        }
    }

    /// Apply the episode filter and alignment policy from `config`.
    #[must_use]
    pub fn with_config(self, config: &GenerationConfig) -> Self {
        self.only_success(config.only_success)
            .strict_alignment(config.strict_alignment)
    }

    /// Drop episodes whose `success` flag is false.
    #[must_use]
    pub fn only_success(mut self, only_success: bool) -> Self {
        self.only_success = only_success;
        self
    }

    /// Reject misaligned episodes instead of padding with empty strings.
    #[must_use]
    pub fn strict_alignment(mut self, strict: bool) -> Self {
        self.strict_alignment = strict;
        self
    }

    /// Whether `episode` passes the episode-level filter.
    #[must_use]
    pub fn accepts(&self, episode: &EpisodeResult) -> bool {
        !self.only_success || episode.success
    }

    /// Generate one sample per action of `episode`.
    ///
    /// Filtered episodes yield an empty vector without any step processing.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SftError::Misaligned`] only when strict alignment is
    /// enabled and the episode breaks the contract.
    pub fn build(&self, episode: &EpisodeResult) -> Result<Vec<TrainingSample>> {
        if !self.accepts(episode) {
            return Ok(Vec::new());
        }
        if self.strict_alignment {
            episode.check_alignment()?;
        }

        let memories = memory::resolve(&episode.used_memories, self.bank);
        let has_memory = !memories.is_empty();
        let system_prompt = self.composer.system_prompt(&memories);
        let task = task_description(&episode.goal, &episode.observations);
        let total_steps = episode.step_count();

        let mut history: Vec<HistoryEntry> = Vec::with_capacity(total_steps);
        let mut samples = Vec::with_capacity(total_steps);

        for (step, action) in episode.actions.iter().enumerate() {
            let user_prompt =
                self.composer
                    .user_prompt(task, &history, episode.observation(step));

            samples.push(TrainingSample::new(
                system_prompt.clone(),
                user_prompt,
                assistant_response(episode.thought(step), action),
                SampleMetadata {
                    game_id: episode.game_id.clone(),
                    step,
                    total_steps,
                    success: episode.success,
                    action: action.clone(),
                    has_memory,
                },
            ));

            history.push(HistoryEntry::new(action.as_str(), episode.observation(step + 1)));
        }

        debug!(
            game_id = %episode.game_id,
            steps = total_steps,
            memories = memories.len(),
            "Episode converted"
        );
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryItem, MemoryRecord, UsedMemoryReference};
    use crate::types::GameId;

    fn mug_episode() -> EpisodeResult {
        EpisodeResult {
            game_id: GameId::from("g1"),
            goal: "clean a mug".into(),
            success: true,
            actions: vec!["go to sink 1".into(), "clean mug 1 with sink 1".into()],
            observations: vec![
                "You see a mug.".into(),
                "You are at sink 1.".into(),
                "You clean the mug.".into(),
            ],
            thoughts: vec!["move to sink".into(), "clean it".into()],
            used_memories: Vec::new(),
        }
    }

    #[test]
    fn one_sample_per_action() {
        let composer = PromptComposer::new();
        let bank = MemoryBankIndex::new();
        let samples = SampleBuilder::new(&composer, &bank).build(&mug_episode()).expect("build");

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].assistant(), "Think: move to sink\n\nAction: go to sink 1");
        assert_eq!(samples[1].metadata.step, 1);
        assert_eq!(samples[1].metadata.total_steps, 2);
        assert_eq!(samples[1].metadata.action, "clean mug 1 with sink 1");
        assert!(samples.iter().all(|s| s.metadata.success && !s.metadata.has_memory));
    }

    #[test]
    fn history_pairs_action_with_resulting_observation() {
        let composer = PromptComposer::new();
        let bank = MemoryBankIndex::new();
        let samples = SampleBuilder::new(&composer, &bank).build(&mug_episode()).expect("build");

        assert!(!samples[0].user().contains("Action: go to sink 1"));
        assert!(samples[0].user().contains("Current Observation:\nYou see a mug.\n"));
        assert!(samples[1].user().contains("Action: go to sink 1\nObservation: You are at sink 1.\n"));
        assert!(samples[1].user().contains("Current Observation:\nYou are at sink 1.\n"));
    }

    #[test]
    fn short_arrays_read_as_empty() {
        let mut episode = mug_episode();
        episode.observations.truncate(1);
        episode.thoughts.clear();

        let composer = PromptComposer::new();
        let bank = MemoryBankIndex::new();
        let samples = SampleBuilder::new(&composer, &bank).build(&episode).expect("build");

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].assistant(), "Think: \n\nAction: clean mug 1 with sink 1");
        assert!(samples[1].user().contains("Action: go to sink 1\nObservation: \n"));
        assert!(samples[1].user().contains("Current Observation:\n\n"));
    }

    #[test]
    fn only_success_skips_failed_episodes() {
        let mut episode = mug_episode();
        episode.success = false;
        let composer = PromptComposer::new();
        let bank = MemoryBankIndex::new();

        let builder = SampleBuilder::new(&composer, &bank).only_success(true);
        assert!(!builder.accepts(&episode));
        assert!(builder.build(&episode).expect("build").is_empty());

        let all = SampleBuilder::new(&composer, &bank).build(&episode).expect("build");
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|s| !s.metadata.success));
    }

    #[test]
    fn strict_alignment_rejects_misaligned_episode() {
        let mut episode = mug_episode();
        episode.observations.pop();
        let composer = PromptComposer::new();
        let bank = MemoryBankIndex::new();

        assert!(SampleBuilder::new(&composer, &bank).strict_alignment(true).build(&episode).is_err());
        assert_eq!(SampleBuilder::new(&composer, &bank).build(&episode).expect("tolerant").len(), 2);
    }

    #[test]
    fn resolved_memory_sets_flag_and_system_prompt() {
        let bank = MemoryBankIndex::from_records([MemoryRecord {
            memory_id: "m1".into(),
            memory_items: vec![MemoryItem {
                title: "Sinks clean things".into(),
                description: "Use sinkbasin for cleaning".into(),
                content: String::new(),
            }],
            ..MemoryRecord::default()
        }]);
        let mut episode = mug_episode();
        episode.used_memories = vec![
            UsedMemoryReference { memory_id: "missing".into(), similarity: 0.99 },
            UsedMemoryReference { memory_id: "m1".into(), similarity: 0.42 },
        ];

        let composer = PromptComposer::new();
        let samples = SampleBuilder::new(&composer, &bank).build(&episode).expect("build");
        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|s| s.metadata.has_memory));
        assert!(samples[0].system().contains("[Experience #1] (Similarity: 0.42)"));
        assert!(!samples[0].system().contains("#2"));
        assert_eq!(samples[0].system(), samples[1].system());
    }

    #[test]
    fn goal_falls_back_to_first_observation() {
        let mut episode = mug_episode();
        episode.goal.clear();
        episode.observations[0] = "A kitchen.\nYour task is to: clean some mug.".into();

        let composer = PromptComposer::new();
        let bank = MemoryBankIndex::new();
        let samples = SampleBuilder::new(&composer, &bank).build(&episode).expect("build");
        assert!(samples[0].user().contains("Goal: Your task is to: clean some mug.\n"));
    }
}
