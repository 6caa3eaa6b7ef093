//! Line-based terminal front end: coloured narration out, commands in.
use std::io::{self, BufRead, Write};

use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use game_core::combat::{InputError, Prompt};
use game_core::{CombatEvent, CombatInput, EventSink};

/// Narration that is not part of a battle (room headers, recruits, summary).
pub trait Narrator: EventSink {
    fn announce(&mut self, line: &str);
}

/// Writes battle events to a terminal, one coloured paragraph per event.
pub struct TerminalPresenter<W: Write> {
    out: W,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, color: Color, bold: bool, text: &dyn std::fmt::Display) -> io::Result<()> {
        if bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        queue!(
            self.out,
            SetForegroundColor(color),
            Print(text),
            ResetColor,
            SetAttribute(Attribute::Reset),
            Print("\n")
        )?;
        self.out.flush()
    }
}

/// Colour and weight for an event.
fn style(event: &CombatEvent) -> (Color, bool) {
    match event {
        CombatEvent::Victory | CombatEvent::LeveledUp { .. } => (Color::Green, true),
        CombatEvent::Defeat => (Color::Red, true),
        CombatEvent::ExperienceGained { .. } | CombatEvent::SkillsLearned { .. } => (Color::Green, false),
        CombatEvent::BattleStarted { .. } | CombatEvent::PlayerTurn { .. } => (Color::Yellow, true),
        CombatEvent::SkillDrawn { .. } | CombatEvent::Help { .. } => (Color::Cyan, false),
        CombatEvent::Effect { .. } => (Color::Magenta, false),
        event if event.is_negative() => (Color::Red, false),
        _ => (Color::Reset, false),
    }
}

impl<W: Write> EventSink for TerminalPresenter<W> {
    fn emit(&mut self, event: CombatEvent) {
        let (color, bold) = style(&event);
        if let Err(e) = self.write_line(color, bold, &event) {
            tracing::warn!(error = %e, "failed to write narration");
        }
    }
}

impl<W: Write> Narrator for TerminalPresenter<W> {
    fn announce(&mut self, line: &str) {
        if let Err(e) = self.write_line(Color::Blue, true, &line) {
            tracing::warn!(error = %e, "failed to write narration");
        }
    }
}

/// Reads the player's answers line by line, printing each menu first.
pub struct StdinInput<R: BufRead, W: Write> {
    reader: R,
    out: W,
}

impl<R: BufRead, W: Write> StdinInput<R, W> {
    pub fn new(reader: R, out: W) -> Self {
        Self { reader, out }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.out)
    }

    fn render(&mut self, prompt: &Prompt) -> io::Result<()> {
        match prompt {
            Prompt::Action => {
                write!(self.out, "\nWhat will you do? (attack, rest, items, retreat, help)\n> ")?;
            }
            Prompt::Skill(choices) => {
                writeln!(self.out, "Your hand:")?;
                for (index, choice) in choices.iter().enumerate() {
                    if !choice.affordable {
                        queue!(self.out, SetAttribute(Attribute::Dim))?;
                    }
                    writeln!(
                        self.out,
                        "{}. {} (Cost: {} MP, Target: {}) - {}",
                        index + 1,
                        choice.name,
                        choice.mana_cost,
                        choice.target.label(),
                        choice.description
                    )?;
                    queue!(self.out, SetAttribute(Attribute::Reset))?;
                }
                write!(self.out, "Choose a skill: ")?;
            }
            Prompt::Target { skill, candidates } => {
                writeln!(self.out, "Choose a target for {skill}:")?;
                for (index, target) in candidates.iter().enumerate() {
                    writeln!(
                        self.out,
                        "{}. {} (HP: {}/{})",
                        index + 1,
                        target.name,
                        target.health,
                        target.max_health
                    )?;
                }
                write!(self.out, "> ")?;
            }
            Prompt::Item(items) => {
                writeln!(self.out, "Your items:")?;
                for (index, item) in items.iter().enumerate() {
                    writeln!(
                        self.out,
                        "{}. {} x{} - {}",
                        index + 1,
                        item.name,
                        item.quantity,
                        item.description
                    )?;
                }
                write!(self.out, "Choose an item: ")?;
            }
        }
        self.out.flush()
    }
}

impl<R: BufRead, W: Write> CombatInput for StdinInput<R, W> {
    fn read(&mut self, prompt: &Prompt) -> Result<String, InputError> {
        self.render(prompt).map_err(|e| InputError::Io(e.to_string()))?;

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => Err(InputError::Closed),
            Ok(_) => Ok(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => Err(InputError::Io(e.to_string())),
        }
    }
}
