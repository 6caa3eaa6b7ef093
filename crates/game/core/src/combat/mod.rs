//! Battle resolution.
//!
//! # Architecture
//!
//! - **Battle**: borrowed roster of the player, their allies and the enemies
//! - **Targeting**: pure mapping from a skill's shape to target handles
//! - **Damage**: fatal-skill estimate driving enemy skill choice
//! - **Controller**: the phase state machine; the only place that reads input
//! - **Events**: narration emitted for front ends
//!
//! # Core Functions
//!
//! - `run_combat`: fight one battle to Victory or Defeat
//! - `plan_targets`: resolve who a skill lands on
//! - `choose_enemy_skill`: lethal skill if any, else random

mod battle;
mod controller;
mod damage;
mod event;
mod input;
mod targeting;

pub use battle::{Allies, Battle, CombatantId, Roster, Side};
pub use controller::{BattleOutcome, Phase, TurnController, run_combat};
pub use damage::{choose_enemy_skill, fatal_skills, is_lethal};
pub use event::{CombatEvent, EventSink, RosterLine};
pub use input::{
    CombatInput, Command, InputError, ItemChoice, Prompt, ScriptedInput, SkillChoice,
    TargetChoice, parse_choice,
};
pub use targeting::{TargetPlan, plan_targets};
