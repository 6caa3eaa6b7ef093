//! NPC templates and spawning.
//!
//! Templates are authored per section in content files and turned into
//! [`Actor`]s right before a battle. Spawning draws the NPC's skill deck from
//! the [`SkillOracle`].

use tracing::debug;

use super::rng::{RngOracle, pick};
use super::skills::SkillOracle;
use crate::config::GameConfig;
use crate::state::{Actor, ActorKind, AllyData, EnemyData, Profession, Section};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub name: String,
    pub description: String,
    pub level: u32,
    pub exp_reward: u32,
    /// Number of skills drawn (with replacement) from the section's enemy pool.
    pub skill_count: usize,
    pub section: Section,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllyTemplate {
    pub name: String,
    pub description: String,
    pub level: u32,
    pub profession: Profession,
    pub section: Section,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error("enemy `{name}` would spawn without skills (section {section} pool is empty or skill_count is 0)")]
    EmptySkillDeck { name: String, section: Section },
}

impl EnemyTemplate {
    /// Spawns the enemy with `skill_count` skills from its section's pool.
    ///
    /// # Errors
    ///
    /// [`SpawnError::EmptySkillDeck`] if the deck would be empty.
    pub fn spawn<S, R>(&self, skills: &S, rng: &mut R) -> Result<Actor, SpawnError>
    where
        S: SkillOracle + ?Sized,
        R: RngOracle + ?Sized,
    {
        let pool = skills.enemy_skills(self.section);
        let deck: Vec<_> = (0..self.skill_count)
            .filter_map(|_| pick(rng, pool).cloned())
            .collect();
        if deck.is_empty() {
            return Err(SpawnError::EmptySkillDeck {
                name: self.name.clone(),
                section: self.section,
            });
        }
        debug!(enemy = %self.name, skills = deck.len(), "enemy spawned");

        Ok(Actor {
            name: self.name.clone(),
            stats: Actor::npc_stats(self.level),
            effects: Vec::new(),
            skills: deck,
            kind: ActorKind::Enemy(EnemyData {
                exp_reward: self.exp_reward,
                section: self.section,
                level: self.level,
                description: self.description.clone(),
            }),
        })
    }
}

impl AllyTemplate {
    /// Spawns the ally with a random number of skills (in
    /// `config.ally_skill_count`, drawn with replacement) from its
    /// profession's tiers up to its section.
    pub fn spawn<S, R>(&self, skills: &S, rng: &mut R, config: &GameConfig) -> Actor
    where
        S: SkillOracle + ?Sized,
        R: RngOracle + ?Sized,
    {
        let pool = skills.profession_pool(self.profession, self.section);
        let (min, max) = config.ally_skill_count;
        let count = rng.range(min as u32, max as u32) as usize;
        let deck: Vec<_> = (0..count)
            .filter_map(|_| pick(rng, &pool).map(|skill| (*skill).clone()))
            .collect();
        debug!(ally = %self.name, profession = %self.profession, skills = deck.len(), "ally spawned");

        Actor {
            name: self.name.clone(),
            stats: Actor::npc_stats(self.level),
            effects: Vec::new(),
            skills: deck,
            kind: ActorKind::Ally(AllyData {
                profession: self.profession,
                section: self.section,
                level: self.level,
                description: self.description.clone(),
            }),
        }
    }
}
