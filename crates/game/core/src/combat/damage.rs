//! Enemy damage estimation.

use crate::config::DamageFormula;
use crate::env::{RngOracle, pick};
use crate::skill::Skill;

/// Whether `skill` cast with `attack` is estimated to bring `health` to 0.
///
/// Uses the same [`DamageFormula`] as skill resolution but ignores the
/// target's defense. Only offensive skills can be lethal.
pub fn is_lethal(formula: DamageFormula, attack: i32, skill: &Skill, health: u32) -> bool {
    if !skill.target.is_offensive() {
        return false;
    }
    let estimate = formula.raw_damage(attack, skill.power);
    i64::from(estimate) >= i64::from(health)
}

/// Skills in `deck` estimated to kill a target at `health`.
pub fn fatal_skills<'a>(
    deck: &'a [Skill],
    formula: DamageFormula,
    attack: i32,
    health: u32,
) -> Vec<&'a Skill> {
    deck.iter()
        .filter(|skill| is_lethal(formula, attack, skill, health))
        .collect()
}

/// Enemy skill choice: a random lethal skill if any, else a random skill.
///
/// Returns `None` only for an empty deck.
pub fn choose_enemy_skill<'a, R>(
    deck: &'a [Skill],
    formula: DamageFormula,
    attack: i32,
    player_health: u32,
    rng: &mut R,
) -> Option<&'a Skill>
where
    R: RngOracle + ?Sized,
{
    let fatal = fatal_skills(deck, formula, attack, player_health);
    if fatal.is_empty() {
        pick(rng, deck)
    } else {
        pick(rng, &fatal).copied()
    }
}
