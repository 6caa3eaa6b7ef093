//! Turn-based combat rules shared by every front end.
//!
//! `game-core` models actors, skills and status effects as plain data and
//! resolves battles through [`combat::run_combat`]. It performs no I/O:
//! player decisions arrive through [`combat::CombatInput`], narration leaves
//! through [`combat::EventSink`] and every random roll goes through an
//! [`env::RngOracle`], so a seeded battle replays exactly.
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod progression;
pub mod skill;
pub mod state;

pub use combat::{
    Battle, BattleOutcome, CombatEvent, CombatInput, CombatantId, EventSink, Phase, Prompt,
    ScriptedInput, TurnController, run_combat,
};
pub use config::{Chance, DamageFormula, GameConfig};
pub use env::{
    AllyTemplate, EnemyTemplate, PcgRng, RngOracle, ScriptedRng, SkillOracle, SkillRegistry,
    SpawnError,
};
pub use error::{CombatError, ErrorSeverity, GameError};
pub use progression::{LevelUp, allocate_experience, check_level_up, draw_hand, grant_skills};
pub use skill::{Skill, SkillOutcome, TargetShape, use_skill};
pub use state::{
    Actor, ActorKind, ActorStats, Consumable, EffectTick, Gear, GearSlot, Inventory, Item,
    Profession, Section, StatOp, StatusEffect, StatusEffectSpec,
};
