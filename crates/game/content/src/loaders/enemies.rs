//! Enemy and boss template loader.

use std::collections::HashMap;
use std::path::Path;

use game_core::{EnemyTemplate, Section};
use serde::Deserialize;

use crate::loaders::{LoadResult, parse_ron, read_file};

const EMBEDDED: &str = include_str!("../../data/enemies.ron");

#[derive(Debug, Deserialize)]
struct EnemyDef {
    name: String,
    description: String,
    level: u32,
    exp: u32,
    skills: usize,
}

impl EnemyDef {
    fn into_template(self, section: Section) -> EnemyTemplate {
        EnemyTemplate {
            name: self.name,
            description: self.description,
            level: self.level,
            exp_reward: self.exp,
            skill_count: self.skills,
            section,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SectionDef {
    section: Section,
    enemies: Vec<EnemyDef>,
    #[serde(default)]
    bosses: Vec<EnemyDef>,
}

#[derive(Debug, Deserialize)]
struct EnemyFile {
    sections: Vec<SectionDef>,
}

/// Enemy templates grouped by section.
#[derive(Clone, Debug, Default)]
pub struct EnemyCatalog {
    enemies: HashMap<Section, Vec<EnemyTemplate>>,
    bosses: HashMap<Section, Vec<EnemyTemplate>>,
}

impl EnemyCatalog {
    /// Regular enemies of a section.
    pub fn enemies(&self, section: Section) -> &[EnemyTemplate] {
        self.enemies.get(&section).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn bosses(&self, section: Section) -> &[EnemyTemplate] {
        self.bosses.get(&section).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Finds a template by name in any section.
    pub fn find(&self, name: &str) -> Option<&EnemyTemplate> {
        self.enemies
            .values()
            .chain(self.bosses.values())
            .flatten()
            .find(|template| template.name == name)
    }
}

/// Loader for enemy templates (`enemies.ron`).
pub struct EnemyLoader;

impl EnemyLoader {
    pub fn load(path: &Path) -> LoadResult<EnemyCatalog> {
        Self::parse(&read_file(path)?)
    }

    pub fn embedded() -> LoadResult<EnemyCatalog> {
        Self::parse(EMBEDDED)
    }

    /// Parses the catalog. Templates that would spawn with an empty deck
    /// (`skills: 0`) are rejected here rather than mid-battle.
    pub fn parse(content: &str) -> LoadResult<EnemyCatalog> {
        let file: EnemyFile = parse_ron(content, "enemy catalog")?;
        let mut catalog = EnemyCatalog::default();

        for def in file.sections {
            let section = def.section;
            for enemy in def.enemies.iter().chain(&def.bosses) {
                if enemy.skills == 0 {
                    anyhow::bail!("Enemy '{}' must know at least one skill", enemy.name);
                }
            }
            catalog
                .enemies
                .entry(section)
                .or_default()
                .extend(def.enemies.into_iter().map(|e| e.into_template(section)));
            catalog
                .bosses
                .entry(section)
                .or_default()
                .extend(def.bosses.into_iter().map(|e| e.into_template(section)));
        }

        Ok(catalog)
    }
}
