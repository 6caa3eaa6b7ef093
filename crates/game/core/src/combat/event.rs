//! Battle narration.
//!
//! Everything that happens in a battle is reported as a [`CombatEvent`]. Each
//! event renders as plain text through `Display`; front ends decide colour,
//! pacing and layout.

use core::fmt;

use crate::skill::SkillOutcome;
use crate::state::EffectTick;

/// Snapshot of one roster line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterLine {
    pub name: String,
    pub health: u32,
    pub max_health: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CombatEvent {
    BattleStarted {
        player: String,
        allies: Vec<String>,
        enemies: Vec<String>,
    },
    /// Start of the player's turn with their current pools.
    PlayerTurn {
        round: u32,
        health: u32,
        max_health: u32,
        mana: u32,
        max_mana: u32,
    },
    /// Living combatants as displayed for target selection.
    Roster {
        enemies: Vec<RosterLine>,
        allies: Vec<RosterLine>,
    },
    Effect {
        actor: String,
        tick: EffectTick,
    },
    SkillDrawn {
        skill: String,
    },
    /// Caster, skill and what happened.
    SkillUsed {
        actor: String,
        skill: String,
        outcome: SkillOutcome,
    },
    Rested {
        actor: String,
        mana: u32,
        health: u32,
    },
    ItemUsed {
        item: String,
        message: String,
    },
    Fled,
    RetreatFailed {
        flavor: String,
        penalty: u32,
    },
    /// A recoverable problem with the chosen action (empty hand, bad input).
    Rejected {
        reason: String,
    },
    Help {
        lines: Vec<String>,
    },
    AllyFell {
        name: String,
    },
    ExperienceGained {
        from: String,
        amount: u32,
        total: u32,
    },
    LeveledUp {
        name: String,
        level: u32,
    },
    SkillsLearned {
        skills: Vec<String>,
    },
    Victory,
    Defeat,
}

impl CombatEvent {
    /// Whether the event reports a setback for the player's side.
    pub fn is_negative(&self) -> bool {
        match self {
            CombatEvent::SkillUsed { outcome, .. } => !outcome.hit(),
            CombatEvent::RetreatFailed { .. }
            | CombatEvent::Rejected { .. }
            | CombatEvent::AllyFell { .. }
            | CombatEvent::Defeat => true,
            _ => false,
        }
    }
}

fn roster_lines(f: &mut fmt::Formatter<'_>, lines: &[RosterLine]) -> fmt::Result {
    for (index, line) in lines.iter().enumerate() {
        writeln!(
            f,
            "{}. {} (HP: {}/{})",
            index + 1,
            line.name,
            line.health,
            line.max_health
        )?;
    }
    Ok(())
}

impl fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatEvent::BattleStarted {
                player,
                allies,
                enemies,
            } => {
                write!(f, "{player}")?;
                if !allies.is_empty() {
                    write!(f, ", {}", allies.join(", "))?;
                }
                write!(f, " face {}!", enemies.join(", "))
            }
            CombatEvent::PlayerTurn {
                round,
                health,
                max_health,
                mana,
                max_mana,
            } => write!(
                f,
                "Round {round}\nHealth: {health}/{max_health}\nMana: {mana}/{max_mana}"
            ),
            CombatEvent::Roster { enemies, allies } => {
                writeln!(f, "Enemies:")?;
                roster_lines(f, enemies)?;
                if !allies.is_empty() {
                    writeln!(f, "Allies:")?;
                    roster_lines(f, allies)?;
                }
                Ok(())
            }
            CombatEvent::Effect { actor, tick } => match tick {
                EffectTick::Ticked { effect, turns } => {
                    let unit = if *turns == 1 { "turn" } else { "turns" };
                    write!(f, "{actor} is {} for {turns} {unit}.", effect.to_lowercase())
                }
                EffectTick::WoreOff { effect } => {
                    write!(f, "{actor} is no longer {}.", effect.to_lowercase())
                }
            },
            CombatEvent::SkillDrawn { skill } => write!(f, "You draw {skill}."),
            CombatEvent::SkillUsed { outcome, .. } => write!(f, "{outcome}"),
            CombatEvent::Rested {
                actor,
                mana,
                health,
            } => write!(f, "{actor} takes a nap. (+{health} HP, +{mana} MP)"),
            CombatEvent::ItemUsed { message, .. } => f.write_str(message),
            CombatEvent::Fled => f.write_str("You manage to flee."),
            CombatEvent::RetreatFailed { flavor, penalty } => {
                write!(f, "{flavor}\nYou lose {penalty} HP.")
            }
            CombatEvent::Rejected { reason } => f.write_str(reason),
            CombatEvent::Help { lines } => f.write_str(&lines.join("\n")),
            CombatEvent::AllyFell { name } => write!(f, "{name} has fallen and leaves the party."),
            CombatEvent::ExperienceGained { from, amount, .. } => {
                write!(f, "{from} is defeated! (+{amount} EXP)")
            }
            CombatEvent::LeveledUp { name, level } => {
                write!(f, "{name} reached level {level}!")
            }
            CombatEvent::SkillsLearned { skills } => {
                write!(f, "New skills learned: {}", skills.join(", "))
            }
            CombatEvent::Victory => f.write_str("Room Clear"),
            CombatEvent::Defeat => f.write_str("You died...\nGame Over!"),
        }
    }
}

/// Receiver of battle narration.
pub trait EventSink {
    fn emit(&mut self, event: CombatEvent);
}

impl EventSink for Vec<CombatEvent> {
    fn emit(&mut self, event: CombatEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: CombatEvent) {
        (**self).emit(event);
    }
}
