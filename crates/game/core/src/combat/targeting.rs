//! Target selection policy.
//!
//! [`plan_targets`] is pure: it maps a skill's shape and the caster's side to
//! either a fixed target list or a set of candidates one of which must be
//! chosen. Who chooses (the human through a prompt, an NPC at random) is the
//! controller's concern.

use super::battle::{Battle, CombatantId, Side};
use crate::env::{RngOracle, pick};
use crate::skill::TargetShape;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetPlan {
    /// The skill lands on exactly these combatants.
    Fixed(Vec<CombatantId>),
    /// Exactly one of these must be chosen.
    ChooseOne(Vec<CombatantId>),
}

impl TargetPlan {
    /// Resolves the plan for an NPC caster: candidates are picked at random.
    ///
    /// Returns an empty list when there is nobody to pick from.
    pub fn resolve_random<R: RngOracle + ?Sized>(self, rng: &mut R) -> Vec<CombatantId> {
        match self {
            TargetPlan::Fixed(targets) => targets,
            TargetPlan::ChooseOne(candidates) => {
                pick(rng, &candidates).copied().into_iter().collect()
            }
        }
    }
}

/// Computes the targets of a `shape` skill cast by `caster`.
///
/// - `Self` is always the caster.
/// - Party casters: `SingleEnemy` chooses among living enemies, `AllEnemies`
///   hits all of them. An ally casting `SingleAlly` always targets the
///   player; the player chooses among the party. `AllAllies` covers living
///   allies and the player.
/// - Enemy casters: `SingleEnemy`/`AllEnemies` aim at the party (player plus
///   living allies). `SingleAlly`/`AllAllies` aim at their own living side.
pub fn plan_targets(shape: TargetShape, caster: CombatantId, battle: &Battle<'_>) -> TargetPlan {
    match (shape, caster.side()) {
        (TargetShape::Caster, _) => TargetPlan::Fixed(vec![caster]),

        (TargetShape::SingleEnemy, Side::Party) => TargetPlan::ChooseOne(battle.living_enemies()),
        (TargetShape::AllEnemies, Side::Party) => TargetPlan::Fixed(battle.living_enemies()),
        (TargetShape::SingleAlly, Side::Party) => match caster {
            CombatantId::Player => TargetPlan::ChooseOne(battle.party()),
            _ => TargetPlan::Fixed(vec![CombatantId::Player]),
        },
        (TargetShape::AllAllies, Side::Party) => TargetPlan::Fixed(battle.party()),

        (TargetShape::SingleEnemy, Side::Enemies) => TargetPlan::ChooseOne(battle.party()),
        (TargetShape::AllEnemies, Side::Enemies) => TargetPlan::Fixed(battle.party()),
        (TargetShape::SingleAlly, Side::Enemies) => TargetPlan::ChooseOne(battle.living_enemies()),
        (TargetShape::AllAllies, Side::Enemies) => TargetPlan::Fixed(battle.living_enemies()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Roster;
    use crate::env::ScriptedRng;
    use crate::state::{Actor, ActorKind, AllyData, Profession, Section};

    fn party_of_two() -> Actor {
        let mut hero = Actor::player("Hero", Profession::Warrior, Section::FIRST, Vec::new());
        for name in ["Squire", "Acolyte"] {
            hero.recruit(Actor {
                name: name.into(),
                stats: Actor::npc_stats(1),
                effects: Vec::new(),
                skills: Vec::new(),
                kind: ActorKind::Ally(AllyData {
                    profession: Profession::Priest,
                    section: Section::FIRST,
                    level: 1,
                    description: String::new(),
                }),
            })
            .unwrap();
        }
        hero
    }

    #[test]
    fn self_always_targets_caster() {
        let mut hero = party_of_two();
        let mut enemies = vec![Actor::test_enemy("Goblin", 10, 0)];
        let battle = Battle::new(&mut hero, &mut enemies);
        for caster in [CombatantId::Player, CombatantId::Ally(1), CombatantId::Enemy(0)] {
            assert_eq!(
                plan_targets(TargetShape::Caster, caster, &battle),
                TargetPlan::Fixed(vec![caster])
            );
        }
    }

    #[test]
    fn dead_enemies_are_never_candidates() {
        let mut hero = party_of_two();
        let mut enemies = vec![
            Actor::test_enemy("Goblin", 0, 0),
            Actor::test_enemy("Imp", 10, 0),
        ];
        let battle = Battle::new(&mut hero, &mut enemies);
        assert_eq!(
            plan_targets(TargetShape::SingleEnemy, CombatantId::Player, &battle),
            TargetPlan::ChooseOne(vec![CombatantId::Enemy(1)])
        );
        assert_eq!(
            plan_targets(TargetShape::AllEnemies, CombatantId::Ally(0), &battle),
            TargetPlan::Fixed(vec![CombatantId::Enemy(1)])
        );
    }

    #[test]
    fn ally_support_defaults_to_player() {
        let mut hero = party_of_two();
        let mut enemies = vec![Actor::test_enemy("Goblin", 10, 0)];
        let battle = Battle::new(&mut hero, &mut enemies);
        assert_eq!(
            plan_targets(TargetShape::SingleAlly, CombatantId::Ally(0), &battle),
            TargetPlan::Fixed(vec![CombatantId::Player])
        );
        assert_eq!(
            plan_targets(TargetShape::AllAllies, CombatantId::Ally(0), &battle),
            TargetPlan::Fixed(vec![
                CombatantId::Ally(0),
                CombatantId::Ally(1),
                CombatantId::Player
            ])
        );
    }

    #[test]
    fn enemies_aim_at_player_and_living_allies() {
        let mut hero = party_of_two();
        let mut enemies = vec![Actor::test_enemy("Goblin", 10, 0)];
        let mut battle = Battle::new(&mut hero, &mut enemies);
        battle.actor_mut(CombatantId::Ally(1)).unwrap().stats.health = 0;

        let plan = plan_targets(TargetShape::SingleEnemy, CombatantId::Enemy(0), &battle);
        assert_eq!(
            plan,
            TargetPlan::ChooseOne(vec![CombatantId::Ally(0), CombatantId::Player])
        );
        assert_eq!(
            plan.resolve_random(&mut ScriptedRng::new([1])),
            [CombatantId::Player]
        );
    }

    #[test]
    fn empty_candidates_resolve_to_no_targets() {
        let plan = TargetPlan::ChooseOne(Vec::new());
        assert!(plan.resolve_random(&mut ScriptedRng::new([0])).is_empty());
    }
}
