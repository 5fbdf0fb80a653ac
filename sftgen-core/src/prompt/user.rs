//! Per-step user prompt: task, recent history, current observation.

use super::templates::RULE;

/// Task description used when an episode has neither a goal nor an
/// observation to extract one from.
pub const DEFAULT_TASK_DESCRIPTION: &str = "Complete the task.";

/// Marker line searched for in the initial observation.
const TASK_MARKER: &str = "your task is to";

/// One completed step: the action and the observation it produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Action taken.
    pub action: String,
    /// Observation returned by the environment after the action.
    pub observation: String,
}

impl HistoryEntry {
    /// Pair an action with its resulting observation.
    #[must_use]
    pub fn new(action: impl Into<String>, observation: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            observation: observation.into(),
        }
    }
}

/// The most recent `limit` entries of `history`, oldest first.
#[must_use]
pub fn recent_window(history: &[HistoryEntry], limit: usize) -> &[HistoryEntry] {
    &history[history.len().saturating_sub(limit)..]
}

/// Pull the task line out of an initial observation.
///
/// Returns the first line containing "your task is to" (any case), trimmed;
/// otherwise the whole observation, trimmed.
#[must_use]
pub fn extract_task_description(initial_observation: &str) -> &str {
    initial_observation
        .split('\n')
        .find(|line| line.to_lowercase().contains(TASK_MARKER))
        .unwrap_or(initial_observation)
        .trim()
}

/// Pick the task description for an episode: explicit goal, else extracted
/// from the first observation, else [`DEFAULT_TASK_DESCRIPTION`].
#[must_use]
pub fn task_description<'a>(goal: &'a str, observations: &'a [String]) -> &'a str {
    if !goal.is_empty() {
        return goal;
    }
    observations
        .first()
        .map_or(DEFAULT_TASK_DESCRIPTION, |first| extract_task_description(first))
}

/// Render the user prompt for one step.
///
/// `history` is everything before the current step; only the last
/// `history_length` entries are shown. The history header is emitted even
/// when the window is empty.
#[must_use]
pub fn compose(
    task: &str,
    history: &[HistoryEntry],
    current_observation: &str,
    history_length: usize,
) -> String {
    let goal_line = format!("Goal: {task}");
    let history_lines: Vec<String> = recent_window(history, history_length)
        .iter()
        .flat_map(|entry| {
            [
                format!("Action: {}", entry.action),
                format!("Observation: {}", entry.observation),
                String::new(),
            ]
        })
        .collect();

    let mut parts: Vec<&str> = vec![
        RULE,
        "YOUR CURRENT TASK",
        RULE,
        goal_line.as_str(),
        "",
        "Hints:",
        "  - Type 'check valid actions' if you're unsure what to do",
        "  - Type 'inventory' to check what you're carrying",
        "  - Type 'look' to observe your surroundings",
        "",
        RULE,
        "RECENT HISTORY",
        RULE,
    ];
    parts.extend(history_lines.iter().map(String::as_str));
    parts.extend([
        "Current Observation:",
        current_observation,
        "",
        RULE,
        "YOUR TURN",
        RULE,
        "Based on the task goal and current observation, decide your next action.",
        "Remember to use the exact format: Think: ... Action: ...",
    ]);

    parts.join("\n")
}
