//! Skills and skill resolution.
//!
//! A [`Skill`] is immutable data. Using one goes through [`use_skill`], which
//! resolves against any [`Roster`] so a caster may target itself or its own
//! side without aliasing borrows.

use core::fmt;

use tracing::debug;

use crate::combat::{CombatantId, Roster};
use crate::config::DamageFormula;
use crate::env::{RngOracle, pick};
use crate::error::CombatError;
use crate::state::StatusEffectSpec;

/// Which actors a skill lands on.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TargetShape {
    /// The caster only.
    #[strum(serialize = "self")]
    #[cfg_attr(feature = "serde", serde(rename = "self"))]
    Caster,
    SingleEnemy,
    AllEnemies,
    SingleAlly,
    AllAllies,
}

impl TargetShape {
    /// Offensive shapes deal damage; the rest heal.
    pub fn is_offensive(self) -> bool {
        matches!(self, TargetShape::SingleEnemy | TargetShape::AllEnemies)
    }

    /// Human-readable label for menus.
    pub fn label(self) -> &'static str {
        match self {
            TargetShape::Caster => "Self",
            TargetShape::SingleEnemy => "Single Enemy",
            TargetShape::AllEnemies => "All Enemies",
            TargetShape::SingleAlly => "Single Ally",
            TargetShape::AllAllies => "All Allies",
        }
    }
}

#[cfg(feature = "serde")]
fn full_accuracy() -> f64 {
    1.0
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub key: String,
    pub name: String,
    pub description: String,
    /// Damage bonus for offensive skills, heal amount for supportive ones.
    /// May be negative.
    pub power: i32,
    pub mana_cost: u32,
    pub target: TargetShape,
    /// Hit probability in `[0, 1]`.
    #[cfg_attr(feature = "serde", serde(default = "full_accuracy"))]
    pub accuracy: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: Option<StatusEffectSpec>,
}

impl Skill {
    pub fn new(key: impl Into<String>, name: impl Into<String>, power: i32, target: TargetShape) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: String::new(),
            power,
            mana_cost: 0,
            target,
            accuracy: 1.0,
            effect: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_cost(mut self, mana_cost: u32) -> Self {
        self.mana_cost = mana_cost;
        self
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy.clamp(0.0, 1.0);
        self
    }

    pub fn with_effect(mut self, effect: StatusEffectSpec) -> Self {
        self.effect = Some(effect);
        self
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Result of one skill use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkillOutcome {
    /// The caster could not pay. Nothing changed.
    NotEnoughMana { skill: String },
    /// Mana was paid but the accuracy roll failed.
    Missed { message: String },
    /// One narration line per effect applied.
    Hit { lines: Vec<String> },
}

impl SkillOutcome {
    pub fn hit(&self) -> bool {
        matches!(self, SkillOutcome::Hit { .. })
    }

    /// A miss still costs the turn; an unaffordable skill does not.
    pub fn consumes_turn(&self) -> bool {
        !matches!(self, SkillOutcome::NotEnoughMana { .. })
    }
}

impl fmt::Display for SkillOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillOutcome::NotEnoughMana { skill } => write!(f, "Not enough mana to use {skill}!"),
            SkillOutcome::Missed { message } => f.write_str(message),
            SkillOutcome::Hit { lines } => f.write_str(&lines.join("\n")),
        }
    }
}

const MISS_MESSAGES: &[&str] = &[
    "{user} swings wildly and hits nothing but air!",
    "{user} loses focus and the skill fizzles out.",
    "{user} slips at the last moment and misses!",
    "{user}'s aim goes wide!",
    "{user} hesitates and the opening closes.",
];

/// Resolves `skill` cast by `user` on `targets`.
///
/// Mana is checked with `<` and deducted before the accuracy roll, so a miss
/// still costs mana. Offensive shapes deal `formula(attack, power)` through
/// [`crate::Actor::take_damage`]; supportive shapes heal
/// `power + floor(defense / 2)`. Each landed target gets a fresh effect instance.
///
/// # Errors
///
/// [`CombatError::UnknownCombatant`] if `user` or a target is not in the roster.
pub fn use_skill<Ro, R>(
    skill: &Skill,
    user: CombatantId,
    targets: &[CombatantId],
    roster: &mut Ro,
    rng: &mut R,
    formula: DamageFormula,
) -> Result<SkillOutcome, CombatError>
where
    Ro: Roster + ?Sized,
    R: RngOracle + ?Sized,
{
    let caster = roster
        .actor_mut(user)
        .ok_or(CombatError::UnknownCombatant(user))?;

    if !caster.spend_mana(skill.mana_cost) {
        debug!(actor = %caster.name, skill = %skill.key, "not enough mana");
        return Ok(SkillOutcome::NotEnoughMana {
            skill: skill.name.clone(),
        });
    }

    let caster_name = caster.name.clone();
    let attack = caster.stats.attack;
    let defense = caster.stats.defense;

    if rng.next_unit() >= skill.accuracy {
        let template = pick(rng, MISS_MESSAGES).copied().unwrap_or("{user} misses!");
        debug!(actor = %caster_name, skill = %skill.key, "skill missed");
        return Ok(SkillOutcome::Missed {
            message: template.replace("{user}", &caster_name),
        });
    }

    let mut lines = Vec::with_capacity(targets.len() * 2);
    for &id in targets {
        let target = roster
            .actor_mut(id)
            .ok_or(CombatError::UnknownCombatant(id))?;

        if skill.target.is_offensive() {
            let damage = target.take_damage(formula.raw_damage(attack, skill.power));
            lines.push(format!(
                "{caster_name} uses {} on {} for {damage} damage!",
                skill.name, target.name
            ));
        } else {
            let healed = target.heal(skill.power.saturating_add(defense.div_euclid(2)));
            lines.push(format!(
                "{caster_name} uses {} on {} healing {healed} health!",
                skill.name, target.name
            ));
        }

        if let Some(effect) = &skill.effect {
            target.attach_effect(effect);
            lines.push(format!("{} is now {}!", target.name, effect.name));
        }
    }

    debug!(actor = %caster_name, skill = %skill.key, targets = targets.len(), "skill landed");
    Ok(SkillOutcome::Hit { lines })
}
