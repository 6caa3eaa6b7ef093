//! Encounter rolls: which enemies a room holds.

use game_core::env::{pick, sample_indices};
use game_core::{Actor, EnemyTemplate, RngOracle, Section, SkillOracle, SpawnError};
use tracing::debug;

use crate::loaders::EnemyCatalog;

/// Kind of hostile room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EncounterKind {
    /// One or two regular enemies.
    Fight,
    /// Three or four regular enemies.
    Challenge,
    /// Usually one boss, sometimes two.
    Boss,
}

impl EncounterKind {
    /// Boss count is picked from this list, so two bosses show up one time
    /// in five.
    const BOSS_COUNTS: [usize; 5] = [1, 1, 1, 1, 2];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fight => "fight",
            Self::Challenge => "challenge",
            Self::Boss => "boss",
        }
    }

    fn roll_count<R>(self, rng: &mut R) -> usize
    where
        R: RngOracle + ?Sized,
    {
        match self {
            Self::Fight => rng.range(1, 2) as usize,
            Self::Challenge => rng.range(3, 4) as usize,
            Self::Boss => pick(rng, &Self::BOSS_COUNTS).copied().unwrap_or(1),
        }
    }
}

/// Picks the templates for one encounter, without repeats.
///
/// When the section pool is smaller than the rolled count, every template
/// in the pool is used.
pub fn roll_encounter<'a, R>(
    catalog: &'a EnemyCatalog,
    kind: EncounterKind,
    section: Section,
    rng: &mut R,
) -> Vec<&'a EnemyTemplate>
where
    R: RngOracle + ?Sized,
{
    let pool = match kind {
        EncounterKind::Fight | EncounterKind::Challenge => catalog.enemies(section),
        EncounterKind::Boss => catalog.bosses(section),
    };
    let count = kind.roll_count(rng);
    sample_indices(rng, pool.len(), count)
        .into_iter()
        .map(|index| &pool[index])
        .collect()
}

/// Rolls an encounter and spawns every enemy in it.
pub fn spawn_encounter<S, R>(
    catalog: &EnemyCatalog,
    skills: &S,
    kind: EncounterKind,
    section: Section,
    rng: &mut R,
) -> Result<Vec<Actor>, SpawnError>
where
    S: SkillOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    let templates = roll_encounter(catalog, kind, section, rng);
    let enemies = templates
        .into_iter()
        .map(|template| template.spawn(skills, rng))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(kind = kind.as_str(), section = section.get(), count = enemies.len(), "encounter spawned");
    Ok(enemies)
}
