//! Combat participants.
//!
//! Players, allies and enemies share one [`Actor`] record. What differs
//! between them lives in [`ActorKind`]. Actors are plain data: they hold no
//! RNG or handles and can be snapshotted with the `serde` feature.

use arrayvec::ArrayVec;
use tracing::debug;

use super::inventory::{Consumable, Equipment, Gear, GearSlot, Inventory, Item};
use super::profession::{Profession, Section};
use super::status::{EffectTick, StatOp, StatusEffect, StatusEffectSpec, apply_ops};
use crate::config::GameConfig;
use crate::skill::Skill;

/// Health, mana and combat stats.
///
/// Health and mana stay within `[0, max]`. Attack and defense are signed so
/// debuffs can push them below zero and still reverse exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorStats {
    pub health: u32,
    pub max_health: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub attack: i32,
    pub defense: i32,
}

impl ActorStats {
    pub fn new(health: u32, mana: u32, attack: i32, defense: i32) -> Self {
        Self {
            health,
            max_health: health,
            mana,
            max_mana: mana,
            attack,
            defense,
        }
    }

    /// Heals by `min(amount, max_health - health)` and returns that amount.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let healed = amount.min(self.max_health.saturating_sub(self.health));
        self.health += healed;
        healed
    }

    /// Restores health and mana to their maximums.
    pub fn restore(&mut self) {
        self.health = self.max_health;
        self.mana = self.max_mana;
    }
}

/// Player-only state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerData {
    pub level: u32,
    pub experience: u32,
    pub profession: Profession,
    pub section: Section,
    /// Skills available to choose from this turn. The deck is [`Actor::skills`].
    pub hand: Vec<Skill>,
    pub inventory: Inventory,
    pub equipment: Equipment,
    pub allies: ArrayVec<Box<Actor>, { GameConfig::MAX_ALLIES }>,
    /// New skills to grant when the current battle ends.
    pub owed_skills: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllyData {
    pub profession: Profession,
    pub section: Section,
    pub level: u32,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyData {
    pub exp_reward: u32,
    pub section: Section,
    pub level: u32,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ActorKind {
    Player(PlayerData),
    Ally(AllyData),
    Enemy(EnemyData),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("the party already has {} allies", GameConfig::MAX_ALLIES)]
    Full,
    #[error("only players can recruit allies")]
    NotAPlayer,
    #[error("only allies can be recruited")]
    NotAnAlly,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EquipError {
    #[error("only players carry equipment")]
    NotAPlayer,
    #[error("no equippable item `{0}` in the inventory")]
    NotInInventory(String),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    pub name: String,
    pub stats: ActorStats,
    /// Attached effects in attach order.
    pub effects: Vec<StatusEffect>,
    /// Skill deck.
    pub skills: Vec<Skill>,
    pub kind: ActorKind,
}

impl Actor {
    pub const PLAYER_BASE_HEALTH: u32 = 100;
    pub const PLAYER_BASE_MANA: u32 = 50;
    pub const PLAYER_BASE_ATTACK: i32 = 5;
    pub const PLAYER_BASE_DEFENSE: i32 = 5;

    /// Creates a level-1 player with base stats and the given starting deck.
    pub fn player(
        name: impl Into<String>,
        profession: Profession,
        section: Section,
        starter_skills: Vec<Skill>,
    ) -> Self {
        Self {
            name: name.into(),
            stats: ActorStats::new(
                Self::PLAYER_BASE_HEALTH,
                Self::PLAYER_BASE_MANA,
                Self::PLAYER_BASE_ATTACK,
                Self::PLAYER_BASE_DEFENSE,
            ),
            effects: Vec::new(),
            skills: starter_skills,
            kind: ActorKind::Player(PlayerData {
                level: 1,
                experience: 0,
                profession,
                section,
                hand: Vec::new(),
                inventory: Inventory::new(),
                equipment: Equipment::default(),
                allies: ArrayVec::new(),
                owed_skills: 0,
            }),
        }
    }

    /// Stats for an NPC of `level`: `level * 100` health, `level * 5`
    /// attack and defense. NPC mana is unlimited so the pool is left at 0.
    pub fn npc_stats(level: u32) -> ActorStats {
        let offense = i32::try_from(level.saturating_mul(5)).unwrap_or(i32::MAX);
        ActorStats::new(level.saturating_mul(100), 0, offense, offense)
    }

    pub fn is_alive(&self) -> bool {
        self.stats.health > 0
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, ActorKind::Player(_))
    }

    pub fn as_player(&self) -> Option<&PlayerData> {
        match &self.kind {
            ActorKind::Player(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerData> {
        match &mut self.kind {
            ActorKind::Player(data) => Some(data),
            _ => None,
        }
    }

    /// Profession of a player or ally.
    pub fn profession(&self) -> Option<Profession> {
        match &self.kind {
            ActorKind::Player(data) => Some(data.profession),
            ActorKind::Ally(data) => Some(data.profession),
            ActorKind::Enemy(_) => None,
        }
    }

    /// Experience granted to the player when this actor dies.
    pub fn exp_reward(&self) -> u32 {
        match &self.kind {
            ActorKind::Enemy(data) => data.exp_reward,
            _ => 0,
        }
    }

    /// Allies and enemies never run out of mana.
    pub fn has_unlimited_mana(&self) -> bool {
        !self.is_player()
    }

    /// Applies `amount` of incoming damage after defense.
    ///
    /// Health drops by `max(1, amount - defense)`, floored at 0, and that
    /// value is returned even when it exceeds the remaining health.
    pub fn take_damage(&mut self, amount: i32) -> u32 {
        let mitigated = i64::from(amount) - i64::from(self.stats.defense);
        let damage = u32::try_from(mitigated.max(1)).unwrap_or(u32::MAX);
        self.stats.health = self.stats.health.saturating_sub(damage);
        damage
    }

    /// Heals by `min(amount, max_health - health)`. Negative amounts heal 0.
    pub fn heal(&mut self, amount: i32) -> u32 {
        self.stats.heal(u32::try_from(amount).unwrap_or(0))
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.has_unlimited_mana() || self.stats.mana >= cost
    }

    /// Pays `cost` mana. Returns false, leaving mana untouched, if it is short.
    pub fn spend_mana(&mut self, cost: u32) -> bool {
        if self.has_unlimited_mana() {
            return true;
        }
        if self.stats.mana < cost {
            return false;
        }
        self.stats.mana -= cost;
        true
    }

    /// Attaches a fresh instance of `spec`. Duplicates stack independently.
    pub fn attach_effect(&mut self, spec: &StatusEffectSpec) {
        self.effects.push(spec.instantiate());
    }

    /// Drops all effects without firing their expiry ops.
    pub fn clear_effects(&mut self) {
        self.effects.clear();
    }

    /// Ticks every attached effect once, in attach order.
    pub fn tick_effects(&mut self) -> Vec<EffectTick> {
        let mut ticks = Vec::with_capacity(self.effects.len());
        let mut index = 0;
        while index < self.effects.len() {
            if self.effects[index].is_expiring() {
                let effect = self.effects.remove(index);
                apply_ops(&effect.spec.on_expire, &mut self.stats);
                ticks.push(EffectTick::WoreOff {
                    effect: effect.spec.name,
                });
                continue;
            }

            let effect = &mut self.effects[index];
            let turns = effect.remaining;
            effect.remaining -= 1;
            apply_ops(&effect.spec.on_tick, &mut self.stats);
            let name = effect.spec.name.clone();
            let purges = effect.spec.purges();
            ticks.push(EffectTick::Ticked {
                effect: name,
                turns,
            });

            if purges {
                let keep = self.effects.remove(index);
                ticks.extend(self.purge_effects());
                self.effects.push(keep);
                index = 1;
            } else {
                index += 1;
            }
        }
        ticks
    }

    /// Removes every effect. Expiry ops fire only for effects that have
    /// ticked; an untouched effect has nothing to reverse.
    fn purge_effects(&mut self) -> Vec<EffectTick> {
        let removed = std::mem::take(&mut self.effects);
        removed
            .into_iter()
            .map(|effect| {
                if effect.has_ticked() {
                    apply_ops(&effect.spec.on_expire, &mut self.stats);
                }
                EffectTick::WoreOff {
                    effect: effect.spec.name,
                }
            })
            .collect()
    }

    /// Applies a list of ops, handling [`StatOp::Purge`] against the effect list.
    pub fn apply_ops(&mut self, ops: &[StatOp]) -> Vec<EffectTick> {
        let mut purged = Vec::new();
        for op in ops {
            if *op == StatOp::Purge {
                purged.extend(self.purge_effects());
            } else {
                op.apply(&mut self.stats);
            }
        }
        purged
    }

    /// Restores `ceil(mana% * max_mana)` mana and `floor(health% * max_health)`
    /// health, clamped. Returns `(mana, health)` actually restored.
    pub fn rest(&mut self, config: &GameConfig) -> (u32, u32) {
        let mana_gain = (u64::from(self.stats.max_mana) * u64::from(config.rest_mana_percent))
            .div_ceil(100);
        let health_gain =
            u64::from(self.stats.max_health) * u64::from(config.rest_health_percent) / 100;

        let mana_gain = u32::try_from(mana_gain)
            .unwrap_or(u32::MAX)
            .min(self.stats.max_mana.saturating_sub(self.stats.mana));
        self.stats.mana += mana_gain;
        let health_gain = self.stats.heal(u32::try_from(health_gain).unwrap_or(u32::MAX));
        (mana_gain, health_gain)
    }

    /// Adds an ally to a player's permanent roster.
    pub fn recruit(&mut self, ally: Actor) -> Result<(), RosterError> {
        if !matches!(ally.kind, ActorKind::Ally(_)) {
            return Err(RosterError::NotAnAlly);
        }
        let data = self.as_player_mut().ok_or(RosterError::NotAPlayer)?;
        data.allies
            .try_push(Box::new(ally))
            .map_err(|_| RosterError::Full)?;
        debug!(player = %self.name, "ally recruited");
        Ok(())
    }

    /// Adds an item to a player's inventory. Non-players drop it.
    pub fn give_item(&mut self, item: Item) {
        if let Some(data) = self.as_player_mut() {
            data.inventory.add(item);
        }
    }

    /// Uses the `n`-th stocked consumable (0-based, menu order).
    ///
    /// Returns the consumable and any effects its ops purged, or `None` if
    /// there is no such consumable.
    pub fn consume(&mut self, n: usize) -> Option<(Consumable, Vec<EffectTick>)> {
        let consumable = self.as_player_mut()?.inventory.take_consumable(n)?;
        let purged = self.apply_ops(&consumable.ops);
        debug!(actor = %self.name, item = %consumable.key, "consumable used");
        Some((consumable, purged))
    }

    /// Equips the gear with `key` from the inventory.
    ///
    /// Any gear already in that slot is unequipped back into the inventory
    /// first. Returns the replaced gear's name, if any.
    pub fn equip(&mut self, key: &str) -> Result<Option<String>, EquipError> {
        let data = self.as_player_mut().ok_or(EquipError::NotAPlayer)?;
        let is_gear = data
            .inventory
            .entries()
            .iter()
            .any(|entry| entry.item.key() == key && matches!(entry.item, Item::Gear(_)));
        if !is_gear {
            return Err(EquipError::NotInInventory(key.to_string()));
        }
        let Some(Item::Gear(gear)) = data.inventory.take(key) else {
            return Err(EquipError::NotInInventory(key.to_string()));
        };

        let slot = gear.slot;
        let replaced = self.unequip(slot);
        apply_ops(&gear.equip_ops(), &mut self.stats);
        debug!(actor = %self.name, item = %gear.key, %slot, "gear equipped");
        if let Some(data) = self.as_player_mut() {
            *data.equipment.slot_mut(slot) = Some(gear);
        }
        Ok(replaced.map(|gear| gear.name))
    }

    /// Takes off the gear in `slot`, returning it to the inventory.
    pub fn unequip(&mut self, slot: GearSlot) -> Option<Gear> {
        let data = self.as_player_mut()?;
        let gear = data.equipment.slot_mut(slot).take()?;
        data.inventory.add(Item::Gear(gear.clone()));
        apply_ops(&gear.unequip_ops(), &mut self.stats);
        Some(gear)
    }

    #[cfg(test)]
    pub(crate) fn test_enemy(name: &str, health: u32, defense: i32) -> Self {
        Self {
            name: name.to_string(),
            stats: ActorStats::new(health, 0, 1, defense),
            effects: Vec::new(),
            skills: Vec::new(),
            kind: ActorKind::Enemy(EnemyData {
                exp_reward: 10,
                section: Section::FIRST,
                level: 1,
                description: String::new(),
            }),
        }
    }
}
