//! Read-only data and randomness consumed by combat.
//!
//! Oracles expose skill tables and NPC templates; [`RngOracle`] supplies every
//! random roll. Both are passed in explicitly so battles replay exactly under
//! a fixed seed.
mod npc;
mod rng;
mod skills;

pub use npc::{AllyTemplate, EnemyTemplate, SpawnError};
pub use rng::{PcgRng, RngOracle, ScriptedRng, pick, sample_indices};
pub use skills::{SkillOracle, SkillRegistry};
