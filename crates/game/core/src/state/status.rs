//! Status effects for actors.
//!
//! A [`StatusEffectSpec`] is shared template data (a skill carries one, the
//! content catalog holds many). Attaching it to an actor always goes through
//! [`StatusEffectSpec::instantiate`], so every actor owns an independent
//! [`StatusEffect`] with its own remaining duration.
//!
//! # Lifecycle
//!
//! Effects are ticked once per turn of their holder. While `remaining > 0`
//! a tick runs the `on_tick` ops and decrements `remaining`. The tick that
//! finds `remaining == 0` runs `on_expire` instead and detaches the effect.

use super::actor::ActorStats;

/// One primitive stat change an effect or consumable performs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatOp {
    /// Direct health loss that ignores defense. Floors at 0.
    Damage(u32),
    /// Health gain, clamped to max health.
    Heal(u32),
    /// Mana gain, clamped to max mana.
    RestoreMana(u32),
    Attack(i32),
    Defense(i32),
    /// Changes max health and current health together. Neither drops below 1.
    MaxHealth(i32),
    /// Changes max mana and current mana together. Neither drops below 0.
    MaxMana(i32),
    /// Restores health to max.
    FullHeal,
    /// Removes every other effect on the holder. Those that already ticked
    /// fire their expiry ops.
    Purge,
}

impl StatOp {
    /// Applies this op to a stat block.
    ///
    /// `Purge` needs the holder's effect list and is handled by
    /// [`crate::Actor::tick_effects`]; here it is a no-op.
    pub fn apply(&self, stats: &mut ActorStats) {
        match *self {
            StatOp::Damage(amount) => {
                stats.health = stats.health.saturating_sub(amount);
            }
            StatOp::Heal(amount) => {
                stats.heal(amount);
            }
            StatOp::RestoreMana(amount) => {
                stats.mana = stats.mana.saturating_add(amount).min(stats.max_mana);
            }
            StatOp::Attack(delta) => stats.attack = stats.attack.saturating_add(delta),
            StatOp::Defense(delta) => stats.defense = stats.defense.saturating_add(delta),
            StatOp::MaxHealth(delta) => {
                if delta >= 0 {
                    let delta = delta as u32;
                    stats.max_health = stats.max_health.saturating_add(delta);
                    stats.health = stats.health.saturating_add(delta);
                } else {
                    let loss = delta.unsigned_abs();
                    stats.max_health = stats.max_health.saturating_sub(loss).max(1);
                    let floor = stats.health.min(1);
                    stats.health = stats.health.saturating_sub(loss).max(floor);
                }
                stats.health = stats.health.min(stats.max_health);
            }
            StatOp::MaxMana(delta) => {
                if delta >= 0 {
                    let delta = delta as u32;
                    stats.max_mana = stats.max_mana.saturating_add(delta);
                    stats.mana = stats.mana.saturating_add(delta);
                } else {
                    let loss = delta.unsigned_abs();
                    stats.max_mana = stats.max_mana.saturating_sub(loss);
                    stats.mana = stats.mana.saturating_sub(loss);
                }
                stats.mana = stats.mana.min(stats.max_mana);
            }
            StatOp::FullHeal => stats.health = stats.max_health,
            StatOp::Purge => {}
        }
    }
}

/// Applies a list of ops in order.
pub fn apply_ops(ops: &[StatOp], stats: &mut ActorStats) {
    for op in ops {
        op.apply(stats);
    }
}

/// Template for a status effect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectSpec {
    /// Catalog key (`"poison"`, `"shield"`).
    pub key: String,
    /// Display name (`"Poisoned"`).
    pub name: String,
    /// Number of ticks that run `on_tick` before the effect wears off.
    pub duration: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_tick: Vec<StatOp>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_expire: Vec<StatOp>,
}

impl StatusEffectSpec {
    /// Creates a fresh, independently-ticking instance of this effect.
    pub fn instantiate(&self) -> StatusEffect {
        StatusEffect {
            spec: self.clone(),
            remaining: self.duration,
        }
    }

    pub fn purges(&self) -> bool {
        self.on_tick.contains(&StatOp::Purge)
    }
}

/// A status effect attached to one actor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub spec: StatusEffectSpec,
    /// Ticks left that will still run `on_tick`.
    pub remaining: u32,
}

impl StatusEffect {
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn key(&self) -> &str {
        &self.spec.key
    }

    pub fn is_expiring(&self) -> bool {
        self.remaining == 0
    }

    /// Whether `on_tick` has run at least once.
    pub fn has_ticked(&self) -> bool {
        self.remaining < self.spec.duration
    }
}

/// What happened to one effect during a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EffectTick {
    /// `on_tick` ran. `turns` is the remaining count before this tick.
    Ticked { effect: String, turns: u32 },
    /// `on_expire` ran and the effect was detached.
    WoreOff { effect: String },
}
