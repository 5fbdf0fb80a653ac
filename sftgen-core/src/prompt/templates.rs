//! Built-in prompt text and the TOML override loader.
//!
//! The system prompt is assembled from these static blocks plus the
//! per-episode retrieved-memory block (see [`super::system`]). Blocks are
//! separated by one blank line when assembled, so none of them carries
//! leading or trailing blank lines of its own.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SftError};

/// Horizontal rule framing every section header.
pub const RULE: &str = "==================================================";

/// Agent role, environment rules, and the command vocabulary.
pub const PREAMBLE: &str = r#"You are an intelligent agent operating in a household environment. Your goal is to complete tasks by interacting with objects and navigating through rooms.

==================================================
ENVIRONMENT RULES
==================================================
1. You can only carry ONE object at a time
2. Use exact object names with numbers (e.g., "apple 1", "fridge 1")

==================================================
AVAILABLE COMMANDS
==================================================
Navigation:
  - look                          : View current surroundings
  - go to [receptacle]            : Move to a location (e.g., "go to fridge 1")

Object Manipulation:
  - take [object] from [receptacle] : Pick up an object (e.g., "take apple 1 from fridge 1")
  - move [object] to [receptacle]   : Place object (e.g., "move apple 1 to fridge 1")
  - open [receptacle]               : Open a container (e.g., "open fridge 1")
  - close [receptacle]              : Close a container

Object Processing:
  - heat [object] with [receptacle] : Heat with microwave (e.g., "heat egg 1 with microwave 1")
  - cool [object] with [receptacle] : Cool with fridge (e.g., "cool apple 1 with fridge 1")
  - clean [object] with [receptacle]: Clean with sink (e.g., "clean mug 1 with sinkbasin 1")
  - use [object]                    : Use/toggle object (e.g., "use desklamp 1")

Utility:
  - inventory                      : Check what you're carrying
  - examine [object]               : Look at object details
  - check valid actions            : List all currently valid actions"#;

/// Required `Think: ... Action: ...` response format.
pub const OUTPUT_FORMAT: &str = r#"==================================================
OUTPUT FORMAT
==================================================
You MUST respond in EXACTLY this format:

Think: <your reasoning about the current situation and what to do next>

Action: <exact command from the list above>

IMPORTANT:
- Always include both "Think:" and "Action:" sections
- The action must be a valid command with exact object/receptacle names
- If stuck, use "check valid actions" to see available options"#;

/// Two fully worked example episodes.
pub const FEW_SHOT: &str = "==================================================
EXAMPLE DEMONSTRATIONS
==================================================
The following examples show how to complete various tasks:

Example 1: \n
You are in the middle of a room. Looking quickly around you, you see a bed 1, a desk 1, a desklamp 1, a drawer 1.
Your task is to: examine the alarmclock with the desklamp.

Think: I need to find an alarm clock and examine it under the desk lamp. Let me check the desk first.
Action: go to desk 1

> go to desk 1
On the desk 1, you see an alarmclock 1, a pen 1.

Think: Found the alarm clock. Let me pick it up.
Action: take alarmclock 1 from desk 1

> take alarmclock 1 from desk 1
You pick up the alarmclock 1 from the desk 1.

Think: Now I have the alarm clock. I need to use the desk lamp to illuminate and examine it.
Action: use desklamp 1

> use desklamp 1
You turn on the desklamp 1.
Task completed!

---

Example 2: \n
You are in the middle of a room. Looking quickly around you, you see a cabinet 1, a coffeemachine 1, a countertop 1, a fridge 1, a sinkbasin 1.
Your task is to: clean some mug and put it in coffeemachine.

Think: I need to find a mug, clean it in the sink, then put it in the coffee machine. Let me look for a mug.
Action: go to countertop 1

> go to countertop 1
On the countertop 1, you see a mug 1, a knife 1.

Think: I found a mug. Let me pick it up.
Action: take mug 1 from countertop 1

> take mug 1 from countertop 1
You pick up the mug 1 from the countertop 1.

Think: Now I need to clean the mug in the sink.
Action: go to sinkbasin 1

> go to sinkbasin 1
On the sinkbasin 1, you see nothing.

Think: I'm at the sink. Let me clean the mug.
Action: clean mug 1 with sinkbasin 1

> clean mug 1 with sinkbasin 1
You clean the mug 1 using the sinkbasin 1.

Think: The mug is clean. Now I need to put it in the coffee machine.
Action: go to coffeemachine 1

> go to coffeemachine 1
On the coffeemachine 1, you see nothing.

Think: I'm at the coffee machine. Let me put the clean mug here.
Action: move mug 1 to coffeemachine 1

> move mug 1 to coffeemachine 1
You put the mug 1 in/on the coffeemachine 1.
Task completed!
";

/// The static blocks of the system prompt.
///
/// Defaults to the built-in text; any subset can be overridden from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PromptTemplates {
    /// Role, rules, and command vocabulary.
    pub preamble: String,
    /// Response format block.
    pub output_format: String,
    /// Worked examples, used when few-shot is enabled.
    pub few_shot: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            preamble: PREAMBLE.to_string(),
            output_format: OUTPUT_FORMAT.to_string(),
            few_shot: FEW_SHOT.to_string(),
        }
    }
}

/// On-disk shape: a single `[templates]` table.
#[derive(Debug, Deserialize)]
struct TemplateFile {
    #[serde(default)]
    templates: PromptTemplates,
}

impl PromptTemplates {
    /// The compiled-in templates.
    #[must_use]
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Parse overrides from a TOML string.
    ///
    /// ```toml
    /// [templates]
    /// preamble = "You are a kitchen robot."
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`SftError::Config`] if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str::<TemplateFile>(toml_str)
            .map(|file| file.templates)
            .map_err(|e| SftError::Config(format!("invalid prompt templates: {e}")))
    }

    /// Load overrides from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SftError::io(path, e))?;
        Self::from_toml(&content)
    }
}
