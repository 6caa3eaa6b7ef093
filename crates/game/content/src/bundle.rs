//! Every catalog a session needs, loaded in one place.

use std::path::Path;

use game_core::{
    Actor, GameConfig, Item, Profession, RngOracle, Section, SkillOracle, SkillRegistry, SpawnError,
};
use tracing::{debug, warn};

use crate::encounter::{EncounterKind, spawn_encounter};
use crate::loaders::{
    AllyLoader, AllyRoster, ConfigLoader, EffectCatalog, EffectLoader, EnemyCatalog, EnemyLoader,
    ItemCatalog, ItemLoader, LoadResult, SkillLoader,
};

/// Loaded game content.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── effects.ron
/// ├── skills.ron
/// ├── enemies.ron
/// ├── allies.ron
/// └── items.ron
/// ```
///
/// Any file missing from the directory falls back to the embedded copy.
#[derive(Clone, Debug)]
pub struct ContentBundle {
    pub config: GameConfig,
    pub effects: EffectCatalog,
    pub skills: SkillRegistry,
    pub enemies: EnemyCatalog,
    pub allies: AllyRoster,
    pub items: ItemCatalog,
}

impl ContentBundle {
    /// Content shipped with the game.
    pub fn embedded() -> LoadResult<Self> {
        let effects = EffectLoader::embedded()?;
        Ok(Self {
            config: ConfigLoader::embedded()?,
            skills: SkillLoader::embedded(&effects)?,
            enemies: EnemyLoader::embedded()?,
            allies: AllyLoader::embedded()?,
            items: ItemLoader::embedded()?,
            effects,
        })
    }

    /// Loads content from `data_dir`, file by file.
    pub fn from_dir(data_dir: &Path) -> LoadResult<Self> {
        let effects = overlay(data_dir, "effects.ron", EffectLoader::load, EffectLoader::embedded)?;
        let skills = overlay(
            data_dir,
            "skills.ron",
            |path| SkillLoader::load(path, &effects),
            || SkillLoader::embedded(&effects),
        )?;
        Ok(Self {
            config: overlay(data_dir, "config.toml", ConfigLoader::load, ConfigLoader::embedded)?,
            enemies: overlay(data_dir, "enemies.ron", EnemyLoader::load, EnemyLoader::embedded)?,
            allies: overlay(data_dir, "allies.ron", AllyLoader::load, AllyLoader::embedded)?,
            items: overlay(data_dir, "items.ron", ItemLoader::load, ItemLoader::embedded)?,
            skills,
            effects,
        })
    }

    /// Builds a level-1 player with the starter deck and starter kit. Gear in
    /// the kit is equipped right away.
    pub fn new_player<R>(
        &self,
        name: impl Into<String>,
        profession: Profession,
        section: Section,
        rng: &mut R,
    ) -> Actor
    where
        R: RngOracle + ?Sized,
    {
        let mut player = Actor::player(name, profession, section, self.skills.starter_skills().to_vec());
        for (item, quantity) in self.items.starter_kit(rng) {
            let gear_key = matches!(item, Item::Gear(_)).then(|| item.key().to_string());
            for _ in 0..quantity {
                player.give_item(item.clone());
            }
            if let Some(key) = gear_key
                && let Err(e) = player.equip(&key)
            {
                warn!(item = %key, error = %e, "starter gear could not be equipped");
            }
        }
        debug!(player = %player.name, profession = %profession, "player created");
        player
    }

    /// Spawns the enemies of one room.
    pub fn encounter<R>(
        &self,
        kind: EncounterKind,
        section: Section,
        rng: &mut R,
    ) -> Result<Vec<Actor>, SpawnError>
    where
        R: RngOracle + ?Sized,
    {
        spawn_encounter(&self.enemies, &self.skills, kind, section, rng)
    }

    /// Rolls the roster's recruit chance and, on success, spawns an ally.
    pub fn recruit_roll<R>(&self, section: Section, rng: &mut R) -> Option<Actor>
    where
        R: RngOracle + ?Sized,
    {
        let template = self.allies.maybe_roll(section, rng)?;
        Some(template.spawn(&self.skills, rng, &self.config))
    }
}

/// Loads `data_dir/file` when it exists, else the embedded catalog.
fn overlay<T>(
    data_dir: &Path,
    file: &str,
    load: impl FnOnce(&Path) -> LoadResult<T>,
    embedded: impl FnOnce() -> LoadResult<T>,
) -> LoadResult<T> {
    let path = data_dir.join(file);
    if path.is_file() {
        debug!(path = %path.display(), "loading content override");
        load(&path)
    } else {
        embedded()
    }
}
