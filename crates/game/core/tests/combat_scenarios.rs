//! Whole battles driven by scripted input and rolls.

use game_core::combat::{InputError, ScriptedInput};
use game_core::state::{AllyData, EnemyData};
use game_core::{
    Actor, ActorKind, ActorStats, BattleOutcome, CombatError, CombatEvent, EffectTick, GameConfig,
    PcgRng, Profession, ScriptedRng, Section, Skill, SkillOutcome, SkillRegistry, StatOp,
    StatusEffectSpec, TargetShape, run_combat,
};

fn hero(deck: Vec<Skill>) -> Actor {
    Actor::player("Hero", Profession::Warrior, Section::FIRST, deck)
}

fn enemy(name: &str, stats: ActorStats, exp_reward: u32, skills: Vec<Skill>) -> Actor {
    Actor {
        name: name.to_string(),
        stats,
        effects: Vec::new(),
        skills,
        kind: ActorKind::Enemy(EnemyData {
            exp_reward,
            section: Section::FIRST,
            level: 1,
            description: String::new(),
        }),
    }
}

fn ally(name: &str, profession: Profession, stats: ActorStats, skills: Vec<Skill>) -> Actor {
    Actor {
        name: name.to_string(),
        stats,
        effects: Vec::new(),
        skills,
        kind: ActorKind::Ally(AllyData {
            profession,
            section: Section::FIRST,
            level: 1,
            description: String::new(),
        }),
    }
}

fn smite() -> Skill {
    Skill::new("smite", "Smite", 100, TargetShape::SingleEnemy)
}

fn poke() -> Skill {
    Skill::new("poke", "Poke", 0, TargetShape::SingleEnemy)
}

/// Damage-over-time effect with no reversal.
fn dot(key: &str, name: &str, duration: u32, damage: u32) -> StatusEffectSpec {
    StatusEffectSpec {
        key: key.into(),
        name: name.into(),
        duration,
        on_tick: vec![StatOp::Damage(damage)],
        on_expire: vec![],
    }
}

fn ticked(actor: &str, effect: &str, turns: u32) -> CombatEvent {
    CombatEvent::Effect {
        actor: actor.into(),
        tick: EffectTick::Ticked {
            effect: effect.into(),
            turns,
        },
    }
}

fn used_by<'a>(events: &'a [CombatEvent], name: &str) -> Vec<&'a SkillOutcome> {
    events
        .iter()
        .filter_map(|event| match event {
            CombatEvent::SkillUsed { actor, outcome, .. } if actor == name => Some(outcome),
            _ => None,
        })
        .collect()
}

#[test]
fn single_strong_skill_wins_the_battle() {
    let mut player = hero(vec![smite()]);
    let mut enemies = vec![enemy("Rat", ActorStats::new(10, 0, 1, 0), 10, vec![poke()])];
    let mut events = Vec::new();

    let outcome = run_combat(
        &mut player,
        &mut enemies,
        &GameConfig::default(),
        &SkillRegistry::new(),
        ScriptedInput::new(["attack", "1", "1"]),
        PcgRng::seeded(7),
        &mut events,
    )
    .unwrap();

    assert_eq!(outcome, BattleOutcome::Victory);
    assert!(enemies.is_empty(), "defeated enemies leave the roster");
    assert_eq!(player.as_player().unwrap().experience, 10);
    assert_eq!(
        used_by(&events, "Hero")[0].to_string(),
        "Hero uses Smite on Rat for 105 damage!"
    );
    assert_eq!(events.last(), Some(&CombatEvent::Victory));
}

#[test]
fn lethal_enemy_ends_battle_before_allies_act() {
    let mut player = hero(Vec::new());
    player.stats.health = 5;
    player
        .recruit(ally(
            "Squire",
            Profession::Warrior,
            ActorStats::new(100, 0, 5, 5),
            vec![smite()],
        ))
        .unwrap();
    let crush = Skill::new("crush", "Crush", 50, TargetShape::SingleEnemy);
    let mut enemies = vec![enemy("Ogre", ActorStats::new(1000, 0, 1, 0), 10, vec![poke(), crush])];
    let mut events = Vec::new();

    // lethal pick, target the player (party is [Squire, Hero]), accuracy roll
    let rng = ScriptedRng::new([0, 1, 0]);
    let outcome = run_combat(
        &mut player,
        &mut enemies,
        &GameConfig::default(),
        &SkillRegistry::new(),
        ScriptedInput::new(["rest"]),
        rng,
        &mut events,
    )
    .unwrap();

    assert_eq!(outcome, BattleOutcome::Defeat);
    assert!(!player.is_alive());
    assert!(used_by(&events, "Squire").is_empty());
    assert_eq!(player.as_player().unwrap().allies.len(), 1);
    assert_eq!(enemies.len(), 1);
    assert_eq!(events.last(), Some(&CombatEvent::Defeat));
}

#[test]
fn failed_retreat_costs_a_tenth_of_current_health() {
    let mut player = hero(Vec::new());
    player.stats.health = 57;
    let mut enemies = vec![enemy("Rat", ActorStats::new(50, 0, 1, 0), 10, vec![poke()])];
    let mut events = Vec::new();

    // retreat fails, flavor, enemy skill, enemy target, enemy accuracy, retreat succeeds
    let rng = ScriptedRng::new([1, 0, 0, 0, 0, 0]);
    let outcome = run_combat(
        &mut player,
        &mut enemies,
        &GameConfig::default(),
        &SkillRegistry::new(),
        ScriptedInput::new(["retreat", "retreat"]),
        rng,
        &mut events,
    )
    .unwrap();

    let failed = events
        .iter()
        .find_map(|event| match event {
            CombatEvent::RetreatFailed { penalty, .. } => Some(*penalty),
            _ => None,
        })
        .unwrap();
    assert_eq!(failed, 5);
    assert_eq!(used_by(&events, "Rat").len(), 1, "the battle went on after the failure");
    assert!(events.iter().any(|event| matches!(
        event,
        CombatEvent::PlayerTurn {
            round: 2,
            health: 51,
            ..
        }
    )));
    assert!(events.contains(&CombatEvent::Fled));
    assert_eq!(outcome, BattleOutcome::Victory);
}

#[test]
fn only_the_defeated_enemy_grants_experience() {
    let mut player = hero(vec![smite()]);
    let mut enemies = vec![
        enemy("Rat", ActorStats::new(10, 0, 1, 0), 30, vec![poke()]),
        enemy("Bat", ActorStats::new(500, 0, 1, 0), 40, vec![poke()]),
    ];
    let mut events = Vec::new();

    let err = run_combat(
        &mut player,
        &mut enemies,
        &GameConfig::default(),
        &SkillRegistry::new(),
        ScriptedInput::new(["attack", "1", "1"]),
        PcgRng::seeded(11),
        &mut events,
    )
    .unwrap_err();

    assert_eq!(err, CombatError::Input(InputError::Closed));
    assert_eq!(player.as_player().unwrap().experience, 30);
    assert_eq!(enemies.len(), 1);
    assert_eq!(enemies[0].name, "Bat");
    assert_eq!(enemies[0].stats.health, 500);
    let gained: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, CombatEvent::ExperienceGained { .. }))
        .collect();
    assert_eq!(
        gained,
        [&CombatEvent::ExperienceGained {
            from: "Rat".into(),
            amount: 30,
            total: 30
        }]
    );
}

#[test]
fn mana_equal_to_cost_is_enough() {
    let mut player = hero(vec![smite().with_cost(30)]);
    player.stats.mana = 30;
    let mut enemies = vec![enemy("Rat", ActorStats::new(10, 0, 1, 0), 10, vec![poke()])];

    let outcome = run_combat(
        &mut player,
        &mut enemies,
        &GameConfig::default(),
        &SkillRegistry::new(),
        ScriptedInput::new(["attack", "1", "1"]),
        PcgRng::seeded(3),
        Vec::new(),
    )
    .unwrap();

    assert_eq!(outcome, BattleOutcome::Victory);
    assert_eq!(player.stats.mana, 0);
}

#[test]
fn unaffordable_skill_keeps_the_turn_and_the_card() {
    let mut player = hero(vec![smite().with_cost(30)]);
    player.stats.mana = 29;
    let mut enemies = vec![enemy("Rat", ActorStats::new(10, 0, 1, 0), 10, vec![poke()])];
    let mut events = Vec::new();

    let err = run_combat(
        &mut player,
        &mut enemies,
        &GameConfig::default(),
        &SkillRegistry::new(),
        ScriptedInput::new(["attack", "1", "1", "rest"]),
        PcgRng::seeded(3),
        &mut events,
    )
    .unwrap_err();

    assert_eq!(err, CombatError::Input(InputError::Closed));
    assert_eq!(
        used_by(&events, "Hero"),
        [&SkillOutcome::NotEnoughMana {
            skill: "Smite".into()
        }]
    );
    assert!(events.iter().any(|event| matches!(event, CombatEvent::Rested { .. })));
    assert_eq!(player.stats.mana, 39);
    assert_eq!(player.as_player().unwrap().hand.len(), 1);
    assert_eq!(enemies[0].stats.health, 10);
}

#[test]
fn invalid_choices_are_asked_again() {
    let mut player = hero(vec![smite()]);
    let mut enemies = vec![enemy("Rat", ActorStats::new(10, 0, 1, 0), 10, vec![poke()])];
    let mut events = Vec::new();
    let mut input = ScriptedInput::new(["attack", "0", "two", "1", "9", "1"]);

    let outcome = run_combat(
        &mut player,
        &mut enemies,
        &GameConfig::default(),
        &SkillRegistry::new(),
        &mut input,
        PcgRng::seeded(5),
        &mut events,
    )
    .unwrap();

    assert_eq!(outcome, BattleOutcome::Victory);
    assert_eq!(input.remaining(), 0);
    let rejected = events
        .iter()
        .filter(|event| matches!(event, CombatEvent::Rejected { .. }))
        .count();
    assert_eq!(rejected, 3);
}

#[test]
fn empty_hand_and_inventory_return_to_action_selection() {
    let mut player = hero(Vec::new());
    let mut enemies = vec![enemy("Rat", ActorStats::new(10, 0, 1, 0), 10, vec![poke()])];
    let mut events = Vec::new();

    let outcome = run_combat(
        &mut player,
        &mut enemies,
        &GameConfig::default(),
        &SkillRegistry::new(),
        ScriptedInput::new(["attack", "items", "retreat"]),
        ScriptedRng::new([0]),
        &mut events,
    )
    .unwrap();

    assert_eq!(outcome, BattleOutcome::Victory);
    let reasons: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            CombatEvent::Rejected { reason } => Some(reason.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(reasons, ["You have no skills in hand.", "You have no usable items."]);
}

#[test]
fn ally_killed_by_enemies_never_acts_and_leaves_the_party() {
    let mut player = hero(Vec::new());
    player
        .recruit(ally(
            "Squire",
            Profession::Warrior,
            ActorStats::new(1, 0, 5, 0),
            vec![smite()],
        ))
        .unwrap();
    let sweep = Skill::new("sweep", "Sweep", 5, TargetShape::AllEnemies);
    let mut enemies = vec![enemy("Ogre", ActorStats::new(1000, 0, 1, 0), 10, vec![sweep])];
    let mut events = Vec::new();

    let err = run_combat(
        &mut player,
        &mut enemies,
        &GameConfig::default(),
        &SkillRegistry::new(),
        ScriptedInput::new(["rest"]),
        PcgRng::seeded(9),
        &mut events,
    )
    .unwrap_err();

    assert_eq!(err, CombatError::Input(InputError::Closed));
    assert!(events.contains(&CombatEvent::AllyFell {
        name: "Squire".into()
    }));
    assert!(used_by(&events, "Squire").is_empty());
    assert!(player.as_player().unwrap().allies.is_empty());
    assert_eq!(player.stats.health, 99);
}

#[test]
fn surviving_ally_can_finish_the_fight() {
    let mut player = hero(Vec::new());
    player
        .recruit(ally(
            "Squire",
            Profession::Warrior,
            ActorStats::new(100, 0, 5, 5),
            vec![smite()],
        ))
        .unwrap();
    let mut enemies = vec![enemy("Rat", ActorStats::new(50, 0, 1, 0), 20, vec![poke()])];

    let outcome = run_combat(
        &mut player,
        &mut enemies,
        &GameConfig::default(),
        &SkillRegistry::new(),
        ScriptedInput::new(["rest"]),
        PcgRng::seeded(13),
        Vec::new(),
    )
    .unwrap();

    assert_eq!(outcome, BattleOutcome::Victory);
    assert_eq!(player.as_player().unwrap().experience, 20);
    assert_eq!(player.as_player().unwrap().allies.len(), 1);
}

#[test]
fn second_level_up_in_a_battle_grants_a_skill_at_the_end() {
    let cleave = Skill::new("cleave", "Cleave", 12, TargetShape::AllEnemies);
    let mut registry = SkillRegistry::new();
    registry.insert_profession(Profession::Warrior, Section::FIRST, [cleave]);

    let mut player = hero(vec![smite()]);
    player
        .recruit(ally(
            "Squire",
            Profession::Warrior,
            ActorStats::new(100, 0, 5, 5),
            vec![smite()],
        ))
        .unwrap();
    let mut enemies = vec![
        enemy("Rat", ActorStats::new(10, 0, 1, 0), 55, vec![poke()]),
        enemy("Bat", ActorStats::new(50, 0, 1, 0), 200, vec![poke()]),
    ];
    let mut events = Vec::new();

    let outcome = run_combat(
        &mut player,
        &mut enemies,
        &GameConfig::default(),
        &registry,
        ScriptedInput::new(["attack", "1", "1"]),
        PcgRng::seeded(17),
        &mut events,
    )
    .unwrap();

    assert_eq!(outcome, BattleOutcome::Victory);
    let data = player.as_player().unwrap();
    assert_eq!(data.level, 3);
    assert_eq!(data.experience, 105);
    assert_eq!(data.owed_skills, 0);
    assert!(player.skills.iter().any(|skill| skill.key == "cleave"));
    assert!(events.contains(&CombatEvent::SkillsLearned {
        skills: vec!["Cleave".into()]
    }));
    let level_ups = events
        .iter()
        .filter(|event| matches!(event, CombatEvent::LeveledUp { .. }))
        .count();
    assert_eq!(level_ups, 2);
}

#[test]
fn player_killed_by_own_poison_loses_before_acting() {
    let mut player = hero(vec![smite()]);
    player.stats.health = 10;
    player.attach_effect(&dot("poison", "Poisoned", 3, 15));
    let mut enemies = vec![enemy("Rat", ActorStats::new(10, 0, 1, 0), 10, vec![poke()])];
    let mut events = Vec::new();

    let outcome = run_combat(
        &mut player,
        &mut enemies,
        &GameConfig::default(),
        &SkillRegistry::new(),
        ScriptedInput::new(Vec::<String>::new()),
        PcgRng::seeded(21),
        &mut events,
    )
    .unwrap();

    assert_eq!(outcome, BattleOutcome::Defeat);
    assert!(!player.is_alive());
    assert!(events.contains(&ticked("Hero", "Poisoned", 3)));
    assert!(used_by(&events, "Hero").is_empty());
    assert!(used_by(&events, "Rat").is_empty());
    assert_eq!(enemies[0].stats.health, 10);
    assert_eq!(events.last(), Some(&CombatEvent::Defeat));
}

#[test]
fn enemy_burned_to_death_never_acts() {
    let mut player = hero(Vec::new());
    let mut rat = enemy("Rat", ActorStats::new(20, 0, 1, 0), 10, vec![poke()]);
    rat.attach_effect(&dot("burn", "Burned", 2, 25));
    let mut enemies = vec![rat];
    let mut events = Vec::new();

    let outcome = run_combat(
        &mut player,
        &mut enemies,
        &GameConfig::default(),
        &SkillRegistry::new(),
        ScriptedInput::new(["rest"]),
        PcgRng::seeded(23),
        &mut events,
    )
    .unwrap();

    assert_eq!(outcome, BattleOutcome::Victory);
    assert!(events.contains(&ticked("Rat", "Burned", 2)));
    assert!(used_by(&events, "Rat").is_empty());
    assert_eq!(player.stats.health, 100);
    assert_eq!(player.as_player().unwrap().experience, 10);
    assert!(enemies.is_empty());
}

#[test]
fn ally_ticks_effects_before_acting() {
    let mut player = hero(Vec::new());
    let mut squire = ally(
        "Squire",
        Profession::Warrior,
        ActorStats::new(100, 0, 5, 5),
        vec![smite()],
    );
    squire.attach_effect(&dot("poison", "Poisoned", 3, 15));
    player.recruit(squire).unwrap();
    let mut enemies = vec![enemy("Rat", ActorStats::new(50, 0, 1, 0), 10, vec![poke()])];
    let mut events = Vec::new();

    let outcome = run_combat(
        &mut player,
        &mut enemies,
        &GameConfig::default(),
        &SkillRegistry::new(),
        ScriptedInput::new(["rest"]),
        PcgRng::seeded(29),
        &mut events,
    )
    .unwrap();

    assert_eq!(outcome, BattleOutcome::Victory);
    let tick_at = events
        .iter()
        .position(|event| *event == ticked("Squire", "Poisoned", 3))
        .unwrap();
    let smite_at = events
        .iter()
        .position(|event| matches!(event, CombatEvent::SkillUsed { actor, .. } if actor == "Squire"))
        .unwrap();
    assert!(tick_at < smite_at);

    let squire = &player.as_player().unwrap().allies[0];
    assert!((84..=85).contains(&squire.stats.health), "health {}", squire.stats.health);
    assert_eq!(squire.effects[0].remaining, 2);
}
