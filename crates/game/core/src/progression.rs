//! Experience, levelling and skill draws.

use tracing::{debug, info};

use crate::config::GameConfig;
use crate::env::{RngOracle, SkillOracle, sample_indices};
use crate::state::Actor;

/// Stat gains rolled for one level-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
    pub health: u32,
    pub mana: u32,
    pub attack: u32,
    pub defense: u32,
}

/// Adds the experience reward of each defeated enemy to the player.
///
/// Returns `(enemy name, reward)` per enemy. Non-players gain nothing.
pub fn allocate_experience(player: &mut Actor, defeated: &[Actor]) -> Vec<(String, u32)> {
    let Some(data) = player.as_player_mut() else {
        return Vec::new();
    };
    defeated
        .iter()
        .map(|enemy| {
            let reward = enemy.exp_reward();
            data.experience = data.experience.saturating_add(reward);
            debug!(enemy = %enemy.name, reward, total = data.experience, "experience allocated");
            (enemy.name.clone(), reward)
        })
        .collect()
}

/// Levels the player up once if they have enough experience.
///
/// The threshold is `level * config.level_threshold`. Experience beyond the
/// threshold carries over. At most one level is gained per call. A level-up
/// rolls profession growth, fully restores health and mana and clears all
/// status effects.
pub fn check_level_up<R>(player: &mut Actor, rng: &mut R, config: &GameConfig) -> Option<LevelUp>
where
    R: RngOracle + ?Sized,
{
    let data = player.as_player_mut()?;
    let threshold = config.experience_for_level(data.level);
    if data.experience < threshold {
        return None;
    }
    data.experience -= threshold;
    data.level += 1;
    let level = data.level;
    let profession = data.profession;

    let growth = profession.growth();
    let gains = LevelUp {
        level,
        health: rng.range(*growth.health.start(), *growth.health.end()),
        mana: rng.range(*growth.mana.start(), *growth.mana.end()),
        attack: rng.range(*growth.attack.start(), *growth.attack.end()),
        defense: rng.range(*growth.defense.start(), *growth.defense.end()),
    };

    let stats = &mut player.stats;
    stats.max_health = stats.max_health.saturating_add(gains.health);
    stats.max_mana = stats.max_mana.saturating_add(gains.mana);
    stats.attack = stats.attack.saturating_add_unsigned(gains.attack);
    stats.defense = stats.defense.saturating_add_unsigned(gains.defense);
    stats.restore();
    player.clear_effects();

    info!(player = %player.name, level, %profession, "level up");
    Some(gains)
}

/// Appends up to `count` new skills to the player's deck.
///
/// Skills come from the player's profession tiers `1..=section`, skipping
/// ones already in the deck, drawn without replacement. A smaller pool is
/// granted whole. Returns the names of the granted skills.
pub fn grant_skills<S, R>(player: &mut Actor, count: usize, skills: &S, rng: &mut R) -> Vec<String>
where
    S: SkillOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    let Some(data) = player.as_player() else {
        return Vec::new();
    };
    if count == 0 {
        return Vec::new();
    }

    let pool: Vec<_> = skills
        .profession_pool(data.profession, data.section)
        .into_iter()
        .filter(|skill| !player.skills.iter().any(|owned| owned.key == skill.key))
        .collect();
    let granted: Vec<_> = sample_indices(rng, pool.len(), count)
        .into_iter()
        .map(|index| pool[index].clone())
        .collect();

    let names = granted.iter().map(|skill| skill.name.clone()).collect();
    debug!(player = %player.name, granted = granted.len(), pool = pool.len(), "skills granted");
    player.skills.extend(granted);
    names
}

/// Moves up to `count` random deck skills into the player's hand, never
/// drawing a skill already in hand. Returns the drawn names.
pub fn draw_hand<R>(player: &mut Actor, count: usize, rng: &mut R) -> Vec<String>
where
    R: RngOracle + ?Sized,
{
    let Some(data) = player.as_player() else {
        return Vec::new();
    };
    let available: Vec<usize> = player
        .skills
        .iter()
        .enumerate()
        .filter(|(_, skill)| !data.hand.iter().any(|held| held.key == skill.key))
        .map(|(index, _)| index)
        .collect();

    let drawn: Vec<_> = sample_indices(rng, available.len(), count)
        .into_iter()
        .map(|pick| player.skills[available[pick]].clone())
        .collect();
    let names = drawn.iter().map(|skill| skill.name.clone()).collect();
    if let Some(data) = player.as_player_mut() {
        data.hand.extend(drawn);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PcgRng, ScriptedRng, SkillRegistry};
    use crate::skill::{Skill, TargetShape};
    use crate::state::{Profession, Section, StatOp, StatusEffectSpec};

    fn skill(key: &str) -> Skill {
        Skill::new(key, key, 5, TargetShape::SingleEnemy)
    }

    fn hero(deck: &[&str]) -> Actor {
        Actor::player(
            "Hero",
            Profession::Rogue,
            Section::new(2).unwrap(),
            deck.iter().map(|key| skill(key)).collect(),
        )
    }

    fn set_experience(actor: &mut Actor, experience: u32) {
        actor.as_player_mut().unwrap().experience = experience;
    }

    #[test]
    fn level_up_keeps_overflow() {
        let mut actor = hero(&[]);
        set_experience(&mut actor, 50 + 7);

        let gains = check_level_up(&mut actor, &mut PcgRng::seeded(3), &GameConfig::default()).unwrap();

        let data = actor.as_player().unwrap();
        assert_eq!(data.level, 2);
        assert_eq!(data.experience, 7);
        assert_eq!(gains.level, 2);
        assert!((50..=79).contains(&gains.health));
        assert!((8..=14).contains(&gains.attack));
    }

    #[test]
    fn no_level_up_below_threshold() {
        let mut actor = hero(&[]);
        set_experience(&mut actor, 49);
        assert!(check_level_up(&mut actor, &mut PcgRng::seeded(3), &GameConfig::default()).is_none());
        assert_eq!(actor.as_player().unwrap().level, 1);
    }

    #[test]
    fn only_one_level_per_check() {
        let mut actor = hero(&[]);
        set_experience(&mut actor, 1000);
        check_level_up(&mut actor, &mut PcgRng::seeded(3), &GameConfig::default());
        let data = actor.as_player().unwrap();
        assert_eq!((data.level, data.experience), (2, 950));
    }

    #[test]
    fn level_up_restores_and_clears_effects() {
        let mut actor = hero(&[]);
        actor.stats.health = 3;
        actor.stats.mana = 0;
        actor.attach_effect(&StatusEffectSpec {
            key: "poison".into(),
            name: "Poisoned".into(),
            duration: 3,
            on_tick: vec![StatOp::Damage(15)],
            on_expire: vec![],
        });
        set_experience(&mut actor, 50);

        let gains = check_level_up(&mut actor, &mut ScriptedRng::new([0, 0, 0, 0]), &GameConfig::default()).unwrap();

        assert_eq!(gains.health, 50);
        assert_eq!(actor.stats.max_health, 150);
        assert_eq!(actor.stats.health, 150);
        assert_eq!(actor.stats.mana, actor.stats.max_mana);
        assert!(actor.effects.is_empty());
    }

    #[test]
    fn granted_skills_are_unique_and_capped_by_pool() {
        let mut registry = SkillRegistry::new();
        registry
            .insert_profession(Profession::Rogue, Section::FIRST, [skill("stab"), skill("feint")])
            .insert_profession(Profession::Rogue, Section::new(2).unwrap(), [skill("garrote")])
            .insert_profession(Profession::Rogue, Section::new(3).unwrap(), [skill("shadowstep")]);
        let mut actor = hero(&["stab"]);

        let granted = grant_skills(&mut actor, 5, &registry, &mut PcgRng::seeded(4));

        assert_eq!(granted.len(), 2);
        let mut keys: Vec<_> = actor.skills.iter().map(|s| s.key.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["feint", "garrote", "stab"]);

        assert!(grant_skills(&mut actor, 1, &registry, &mut PcgRng::seeded(4)).is_empty());
    }

    #[test]
    fn hand_never_holds_duplicates() {
        let mut actor = hero(&["a", "b"]);
        let mut rng = PcgRng::seeded(5);
        assert_eq!(draw_hand(&mut actor, 1, &mut rng).len(), 1);
        assert_eq!(draw_hand(&mut actor, 1, &mut rng).len(), 1);
        assert!(draw_hand(&mut actor, 1, &mut rng).is_empty());

        let hand = &actor.as_player().unwrap().hand;
        assert_eq!(hand.len(), 2);
        assert_ne!(hand[0].key, hand[1].key);
    }
}
