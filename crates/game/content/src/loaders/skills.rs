//! Skill table loader.
//!
//! Skills name their status effect by catalog key; the loader resolves every
//! key against an [`EffectCatalog`] so a battle never sees a dangling one.

use std::path::Path;

use game_core::{Profession, Section, Skill, SkillRegistry, TargetShape};
use serde::Deserialize;

use crate::loaders::{EffectCatalog, LoadResult, parse_ron, read_file};

const EMBEDDED: &str = include_str!("../../data/skills.ron");

fn full_accuracy() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
struct SkillDef {
    key: String,
    name: String,
    #[serde(default)]
    description: String,
    power: i32,
    #[serde(default)]
    mana_cost: u32,
    target: TargetShape,
    #[serde(default = "full_accuracy")]
    accuracy: f64,
    #[serde(default)]
    effect: Option<String>,
}

impl SkillDef {
    fn into_skill(self, effects: &EffectCatalog) -> LoadResult<Skill> {
        if !(0.0..=1.0).contains(&self.accuracy) {
            anyhow::bail!(
                "Skill '{}' has accuracy {} outside [0, 1]",
                self.key,
                self.accuracy
            );
        }
        let mut skill = Skill::new(self.key, self.name, self.power, self.target)
            .with_description(self.description)
            .with_cost(self.mana_cost)
            .with_accuracy(self.accuracy);
        if let Some(key) = self.effect {
            let spec = effects.resolve(&key, &skill.key)?;
            skill = skill.with_effect(spec.clone());
        }
        Ok(skill)
    }
}

#[derive(Debug, Deserialize)]
struct ProfessionTier {
    profession: Profession,
    section: Section,
    skills: Vec<SkillDef>,
}

#[derive(Debug, Deserialize)]
struct EnemyTier {
    section: Section,
    skills: Vec<SkillDef>,
}

#[derive(Debug, Deserialize)]
struct SkillFile {
    starter: Vec<SkillDef>,
    #[serde(default)]
    professions: Vec<ProfessionTier>,
    #[serde(default)]
    enemies: Vec<EnemyTier>,
}

/// Loader for the skill tables (`skills.ron`).
pub struct SkillLoader;

impl SkillLoader {
    pub fn load(path: &Path, effects: &EffectCatalog) -> LoadResult<SkillRegistry> {
        Self::parse(&read_file(path)?, effects)
    }

    pub fn embedded(effects: &EffectCatalog) -> LoadResult<SkillRegistry> {
        Self::parse(EMBEDDED, effects)
    }

    pub fn parse(content: &str, effects: &EffectCatalog) -> LoadResult<SkillRegistry> {
        let file: SkillFile = parse_ron(content, "skill table")?;
        let convert = |defs: Vec<SkillDef>| -> LoadResult<Vec<Skill>> {
            defs.into_iter().map(|def| def.into_skill(effects)).collect()
        };

        let mut registry = SkillRegistry::new();
        registry.set_starter(convert(file.starter)?);
        for tier in file.professions {
            registry.insert_profession(tier.profession, tier.section, convert(tier.skills)?);
        }
        for tier in file.enemies {
            registry.insert_enemy(tier.section, convert(tier.skills)?);
        }

        tracing::debug!(skills = registry.len(), "skill tables loaded");
        Ok(registry)
    }
}
