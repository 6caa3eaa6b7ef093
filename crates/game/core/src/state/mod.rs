//! Actor state representation.
//!
//! Actors, their status effects, inventory and profession tables. Combat
//! mutates these records in place; the surrounding game owns them between
//! battles.
mod actor;
mod inventory;
mod profession;
mod status;

pub use actor::{
    Actor, ActorKind, ActorStats, AllyData, EnemyData, EquipError, PlayerData, RosterError,
};
pub use inventory::{Consumable, Equipment, Gear, GearSlot, Inventory, InventoryEntry, Item};
pub use profession::{GrowthTable, Profession, Section, SectionError, SkillRole};
pub use status::{EffectTick, StatOp, StatusEffect, StatusEffectSpec, apply_ops};
