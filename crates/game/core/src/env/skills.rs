//! Read-only skill tables.
//!
//! Skills are looked up by `(profession, section)` for players and allies and
//! by section for enemies. The registry is passed explicitly into actor
//! construction and skill draws; nothing reads it from global state.

use std::collections::HashMap;

use crate::skill::Skill;
use crate::state::{Profession, Section};

/// Oracle providing skill pools.
pub trait SkillOracle {
    /// Skills introduced for `profession` at exactly tier `section`.
    fn profession_skills(&self, profession: Profession, section: Section) -> &[Skill];

    /// Skills enemies of `section` draw their decks from.
    fn enemy_skills(&self, section: Section) -> &[Skill];

    /// Deck every new player starts with.
    fn starter_skills(&self) -> &[Skill];

    /// Union of a profession's tiers `1..=section`, in tier order.
    fn profession_pool(&self, profession: Profession, section: Section) -> Vec<&Skill> {
        section
            .up_to()
            .flat_map(|tier| self.profession_skills(profession, tier))
            .collect()
    }
}

/// In-memory [`SkillOracle`] filled from content catalogs or tests.
#[derive(Clone, Debug, Default)]
pub struct SkillRegistry {
    profession: HashMap<(Profession, Section), Vec<Skill>>,
    enemy: HashMap<Section, Vec<Skill>>,
    starter: Vec<Skill>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends skills to a profession tier.
    pub fn insert_profession(
        &mut self,
        profession: Profession,
        section: Section,
        skills: impl IntoIterator<Item = Skill>,
    ) -> &mut Self {
        self.profession
            .entry((profession, section))
            .or_default()
            .extend(skills);
        self
    }

    /// Appends skills to a section's enemy pool.
    pub fn insert_enemy(&mut self, section: Section, skills: impl IntoIterator<Item = Skill>) -> &mut Self {
        self.enemy.entry(section).or_default().extend(skills);
        self
    }

    pub fn set_starter(&mut self, skills: Vec<Skill>) -> &mut Self {
        self.starter = skills;
        self
    }

    /// Total number of skills across all tables.
    pub fn len(&self) -> usize {
        self.profession.values().map(Vec::len).sum::<usize>()
            + self.enemy.values().map(Vec::len).sum::<usize>()
            + self.starter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SkillOracle for SkillRegistry {
    fn profession_skills(&self, profession: Profession, section: Section) -> &[Skill] {
        self.profession
            .get(&(profession, section))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn enemy_skills(&self, section: Section) -> &[Skill] {
        self.enemy.get(&section).map(Vec::as_slice).unwrap_or(&[])
    }

    fn starter_skills(&self) -> &[Skill] {
        &self.starter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::TargetShape;

    fn skill(key: &str) -> Skill {
        Skill::new(key, key, 10, TargetShape::SingleEnemy)
    }

    #[test]
    fn pool_unions_tiers_up_to_section() {
        let mut registry = SkillRegistry::new();
        registry
            .insert_profession(Profession::Mage, Section::FIRST, [skill("spark")])
            .insert_profession(Profession::Mage, Section::new(2).unwrap(), [skill("fireball")])
            .insert_profession(Profession::Mage, Section::new(3).unwrap(), [skill("meteor")])
            .insert_profession(Profession::Rogue, Section::FIRST, [skill("stab")]);

        let pool: Vec<_> = registry
            .profession_pool(Profession::Mage, Section::new(2).unwrap())
            .into_iter()
            .map(|s| s.key.as_str())
            .collect();
        assert_eq!(pool, ["spark", "fireball"]);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn missing_tables_are_empty() {
        let registry = SkillRegistry::new();
        assert!(registry.enemy_skills(Section::FIRST).is_empty());
        assert!(registry.profession_pool(Profession::Priest, Section::new(4).unwrap()).is_empty());
        assert!(registry.is_empty());
    }
}
