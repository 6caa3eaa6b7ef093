//! Invariants that must hold for any actor and any roll.

use game_core::combat::{Battle, CombatInput, InputError, Prompt};
use game_core::{
    Actor, ActorStats, CombatEvent, CombatantId, DamageFormula, EffectTick, GameConfig, PcgRng,
    Profession, Section, Skill, SkillOutcome, SkillRegistry, StatOp, StatusEffectSpec,
    TargetShape, check_level_up, run_combat, use_skill,
};
use game_core::state::{ActorKind, EnemyData};
use proptest::prelude::*;

/// Stats where health never exceeds max health.
fn arb_stats() -> impl Strategy<Value = ActorStats> {
    (1u32..1000, 0u32..500, -50i32..50, -50i32..50).prop_flat_map(
        |(max_health, max_mana, attack, defense)| {
            (0..=max_health, 0..=max_mana).prop_map(move |(health, mana)| ActorStats {
                health,
                max_health,
                mana,
                max_mana,
                attack,
                defense,
            })
        },
    )
}

fn player_with(stats: ActorStats) -> Actor {
    let mut actor = Actor::player("Hero", Profession::Mage, Section::FIRST, Vec::new());
    actor.stats = stats;
    actor
}

fn dummy(name: &str) -> Actor {
    Actor {
        name: name.to_string(),
        stats: ActorStats::new(10_000, 0, 1, 0),
        effects: Vec::new(),
        skills: vec![Skill::new("poke", "Poke", 0, TargetShape::SingleEnemy)],
        kind: ActorKind::Enemy(EnemyData {
            exp_reward: 1,
            section: Section::FIRST,
            level: 1,
            description: String::new(),
        }),
    }
}

proptest! {
    #[test]
    fn heal_never_overheals(stats in arb_stats(), amount in any::<i32>()) {
        let mut actor = player_with(stats);
        let healed = actor.heal(amount);
        prop_assert!(actor.stats.health <= actor.stats.max_health);
        prop_assert_eq!(actor.stats.health, stats.health + healed);
    }

    #[test]
    fn damage_is_at_least_one(stats in arb_stats(), amount in any::<i32>()) {
        prop_assume!(stats.health > 0);
        let mut actor = player_with(stats);
        let damage = actor.take_damage(amount);
        prop_assert!(damage >= 1);
        prop_assert!(actor.stats.health < stats.health);
    }

    #[test]
    fn unaffordable_skill_leaves_mana(stats in arb_stats(), extra in 1u32..100) {
        let mut hero = player_with(stats);
        let skill = Skill::new("bolt", "Bolt", 10, TargetShape::SingleEnemy)
            .with_cost(stats.mana + extra);
        let mut enemies = vec![dummy("Rat")];
        let mut battle = Battle::new(&mut hero, &mut enemies);

        let outcome = use_skill(
            &skill,
            CombatantId::Player,
            &[CombatantId::Enemy(0)],
            &mut battle,
            &mut PcgRng::seeded(1),
            DamageFormula::Additive,
        )
        .unwrap();

        prop_assert!(!outcome.hit());
        let is_short = matches!(outcome, SkillOutcome::NotEnoughMana { .. });
        prop_assert!(is_short);
        prop_assert_eq!(battle.player().stats.mana, stats.mana);
    }

    #[test]
    fn cost_is_deducted_exactly_hit_or_miss(
        stats in arb_stats(),
        accuracy in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let cost = stats.mana / 2;
        let mut hero = player_with(stats);
        let skill = Skill::new("bolt", "Bolt", 10, TargetShape::SingleEnemy)
            .with_cost(cost)
            .with_accuracy(accuracy);
        let mut enemies = vec![dummy("Rat")];
        let mut battle = Battle::new(&mut hero, &mut enemies);

        let outcome = use_skill(
            &skill,
            CombatantId::Player,
            &[CombatantId::Enemy(0)],
            &mut battle,
            &mut PcgRng::seeded(seed),
            DamageFormula::Additive,
        )
        .unwrap();

        prop_assert!(outcome.consumes_turn());
        prop_assert_eq!(battle.player().stats.mana, stats.mana - cost);
    }

    #[test]
    fn effect_counts_down_then_wears_off_once(duration in 1u32..8, damage in 0u32..5) {
        let mut actor = player_with(ActorStats::new(1000, 0, 0, 0));
        actor.attach_effect(&StatusEffectSpec {
            key: "poison".into(),
            name: "Poisoned".into(),
            duration,
            on_tick: vec![StatOp::Damage(damage)],
            on_expire: vec![],
        });

        for expected in (1..=duration).rev() {
            let ticks = actor.tick_effects();
            prop_assert_eq!(
                ticks,
                vec![EffectTick::Ticked { effect: "Poisoned".into(), turns: expected }]
            );
            prop_assert_eq!(actor.effects[0].remaining, expected - 1);
        }

        let ticks = actor.tick_effects();
        prop_assert_eq!(ticks, vec![EffectTick::WoreOff { effect: "Poisoned".into() }]);
        prop_assert!(actor.effects.is_empty());
        prop_assert!(actor.tick_effects().is_empty());
        prop_assert_eq!(actor.stats.health, 1000 - duration * damage);
    }

    #[test]
    fn level_up_keeps_overflow(overflow in 0u32..50, seed in any::<u64>()) {
        let config = GameConfig::default();
        let mut actor = player_with(ActorStats::new(100, 50, 5, 5));
        actor.as_player_mut().unwrap().experience = config.level_threshold + overflow;

        let gained = check_level_up(&mut actor, &mut PcgRng::seeded(seed), &config);

        prop_assert!(gained.is_some());
        let data = actor.as_player().unwrap();
        prop_assert_eq!(data.level, 2);
        prop_assert_eq!(data.experience, overflow);
    }
}

/// Answers every action prompt with `retreat`.
#[derive(Default)]
struct AlwaysRetreat {
    attempts: u32,
}

impl CombatInput for AlwaysRetreat {
    fn read(&mut self, prompt: &Prompt) -> Result<String, InputError> {
        match prompt {
            Prompt::Action => {
                self.attempts += 1;
                Ok("retreat".into())
            }
            _ => Err(InputError::Closed),
        }
    }
}

#[test]
fn retreat_succeeds_about_a_third_of_the_time() {
    let config = GameConfig::default();
    let registry = SkillRegistry::new();
    let mut rng = PcgRng::seeded(0x5eed);
    let mut input = AlwaysRetreat::default();
    let mut fled = 0u32;

    for _ in 0..2_000 {
        let mut hero = player_with(ActorStats::new(100, 50, 5, 5));
        let mut enemies = vec![dummy("Rat")];
        let mut events = Vec::new();
        run_combat(
            &mut hero,
            &mut enemies,
            &config,
            &registry,
            &mut input,
            &mut rng,
            &mut events,
        )
        .unwrap();
        fled += events.iter().filter(|e| **e == CombatEvent::Fled).count() as u32;
    }

    let rate = f64::from(fled) / f64::from(input.attempts);
    assert!(
        (rate - 1.0 / 3.0).abs() < 0.03,
        "retreat success rate {rate:.3} over {} attempts",
        input.attempts
    );
}
