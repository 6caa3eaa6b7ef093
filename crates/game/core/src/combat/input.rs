//! Interactive input for the human-controlled player.
//!
//! The controller never reads a terminal directly. Whenever it needs a
//! decision it hands a [`Prompt`] to a [`CombatInput`] and parses the line it
//! gets back; unparseable answers are reported and the same prompt is asked
//! again. Tests drive battles with [`ScriptedInput`].

use std::collections::VecDeque;

use crate::skill::TargetShape;

/// One entry in the skill menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillChoice {
    pub name: String,
    pub description: String,
    pub mana_cost: u32,
    pub target: TargetShape,
    pub affordable: bool,
}

/// One entry in a target menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetChoice {
    pub name: String,
    pub health: u32,
    pub max_health: u32,
}

/// One entry in the item menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemChoice {
    pub name: String,
    pub description: String,
    pub quantity: u32,
}

/// A decision the player must make. Menus are 1-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prompt {
    /// `attack`, `rest`, `items`, `retreat` or `help`.
    Action,
    Skill(Vec<SkillChoice>),
    Target {
        skill: String,
        candidates: Vec<TargetChoice>,
    },
    Item(Vec<ItemChoice>),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("input closed")]
    Closed,
    #[error("failed to read input: {0}")]
    Io(String),
}

/// Source of the player's answers.
pub trait CombatInput {
    /// Blocks until the player answers `prompt` with one line.
    fn read(&mut self, prompt: &Prompt) -> Result<String, InputError>;
}

impl<I: CombatInput + ?Sized> CombatInput for &mut I {
    fn read(&mut self, prompt: &Prompt) -> Result<String, InputError> {
        (**self).read(prompt)
    }
}

/// Replays canned lines. Runs out with [`InputError::Closed`].
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<Prompt>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts asked so far, in order.
    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl CombatInput for ScriptedInput {
    fn read(&mut self, prompt: &Prompt) -> Result<String, InputError> {
        self.prompts.push(prompt.clone());
        self.lines.pop_front().ok_or(InputError::Closed)
    }
}

/// Top-level player commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumString, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Command {
    Attack,
    Rest,
    Items,
    Retreat,
    #[strum(to_string = "help", serialize = "h")]
    Help,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        line.trim().parse().ok()
    }

    pub fn summary(self) -> &'static str {
        match self {
            Command::Attack => "Use a skill from your hand",
            Command::Rest => "Recover 20% max MP and 10% max HP",
            Command::Items => "Use a consumable item",
            Command::Retreat => "Try to flee (33% success rate)",
            Command::Help => "Show this help",
        }
    }
}

/// Parses a 1-based menu answer into a 0-based index below `len`.
pub fn parse_choice(line: &str, len: usize) -> Option<usize> {
    let choice: usize = line.trim().parse().ok()?;
    (1..=len).contains(&choice).then(|| choice - 1)
}
