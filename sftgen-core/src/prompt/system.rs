//! System prompt assembly.
//!
//! The prompt is an ordered list of [`SystemSection`]s. Retrieved memories
//! have their own positioned slot, so editing the static text can never
//! move or drop the memory block.

use serde::{Deserialize, Serialize};

use super::templates::{PromptTemplates, RULE};
use crate::memory::{MemoryItem, RetrievedMemory};

/// Separator placed between non-empty sections.
const SECTION_SEPARATOR: &str = "\n\n";

/// One block of the system prompt.
///
/// Named in config as `preamble`, `retrieved_memory`, `output_format` and
/// `few_shot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemSection {
    /// [`PromptTemplates::preamble`].
    Preamble,
    /// Rendered [`RetrievedMemory`] list; skipped when there is none.
    RetrievedMemory,
    /// [`PromptTemplates::output_format`].
    OutputFormat,
    /// [`PromptTemplates::few_shot`]; skipped when few-shot is disabled.
    FewShot,
}

/// Default order: memories sit right before the output format so the format
/// reminder stays close to the examples.
pub const DEFAULT_LAYOUT: &[SystemSection] = &[
    SystemSection::Preamble,
    SystemSection::RetrievedMemory,
    SystemSection::OutputFormat,
    SystemSection::FewShot,
];

/// Render the "relevant experience" block.
///
/// Only the distilled insights are shown; goals and trajectories of the
/// remembered episodes are left out. Returns an empty string for an empty
/// list.
#[must_use]
pub fn render_memory_block(memories: &[RetrievedMemory]) -> String {
    if memories.is_empty() {
        return String::new();
    }

    let mut lines: Vec<String> = vec![
        String::new(),
        RULE.to_string(),
        "RELEVANT EXPERIENCE FROM SIMILAR TASKS".to_string(),
        RULE.to_string(),
        "Below are key insights from past interactions that may help with your current task."
            .to_string(),
        "Use them as reference when relevant, but adapt to the specific situation.".to_string(),
    ];

    for (i, memory) in memories.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!(
            "[Experience #{}] (Similarity: {:.2})",
            i + 1,
            memory.similarity
        ));
        lines.extend(memory.memory_items.iter().flat_map(render_item));
    }

    lines.join("\n")
}

fn render_item(item: &MemoryItem) -> Vec<String> {
    let mut out = vec![format!("  • {}: {}", item.title, item.description)];
    if !item.content.is_empty() {
        out.push(format!("    {}", item.content));
    }
    out
}

/// Assemble a system prompt from `layout`.
///
/// Empty sections are skipped entirely. If `layout` has no
/// [`SystemSection::RetrievedMemory`] slot, the memory block is appended
/// after the last section.
#[must_use]
pub fn compose(
    templates: &PromptTemplates,
    layout: &[SystemSection],
    few_shot: bool,
    memories: &[RetrievedMemory],
) -> String {
    let memory_block = render_memory_block(memories);
    let mut blocks: Vec<&str> = layout
        .iter()
        .map(|section| match section {
            SystemSection::Preamble => templates.preamble.as_str(),
            SystemSection::RetrievedMemory => memory_block.as_str(),
            SystemSection::OutputFormat => templates.output_format.as_str(),
            SystemSection::FewShot if few_shot => templates.few_shot.as_str(),
            SystemSection::FewShot => "",
        })
        .collect();

    if !layout.contains(&SystemSection::RetrievedMemory) {
        blocks.push(memory_block.as_str());
    }

    blocks.retain(|block| !block.is_empty());
    blocks.join(SECTION_SEPARATOR)
}
