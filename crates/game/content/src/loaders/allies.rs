//! Ally roster loader.
//!
//! Allies are not authored one by one. A roster holds name and description
//! pools plus a level range per section, and [`AllyRoster::roll`] assembles
//! a template from them.

use std::collections::BTreeMap;
use std::path::Path;

use game_core::env::pick;
use game_core::{AllyTemplate, Chance, Profession, RngOracle, Section};
use serde::Deserialize;

use crate::loaders::{LoadResult, parse_ron, read_file};

const EMBEDDED: &str = include_str!("../../data/allies.ron");

/// Pools that recruitable allies are rolled from.
#[derive(Clone, Debug, Deserialize)]
pub struct AllyRoster {
    /// Odds that an ally waits in a room.
    pub chance: Chance,
    names: Vec<String>,
    descriptions: BTreeMap<Profession, Vec<String>>,
    /// Inclusive level range per section.
    levels: BTreeMap<Section, (u32, u32)>,
}

impl AllyRoster {
    /// Rolls an ally for `section`: a random name, a random profession among
    /// those with descriptions, and a level in the section's range.
    ///
    /// Returns `None` when the roster has nothing for `section`.
    pub fn roll<R>(&self, section: Section, rng: &mut R) -> Option<AllyTemplate>
    where
        R: RngOracle + ?Sized,
    {
        let &(min, max) = self.levels.get(&section)?;
        let name = pick(rng, &self.names)?.clone();
        let professions: Vec<Profession> = self.descriptions.keys().copied().collect();
        let profession = *pick(rng, &professions)?;
        let description = self
            .descriptions
            .get(&profession)
            .and_then(|pool| pick(rng, pool))
            .cloned()
            .unwrap_or_default();
        let level = rng.range(min, max);

        Some(AllyTemplate {
            name,
            description,
            level,
            profession,
            section,
        })
    }

    /// Rolls [`Self::chance`] first and only then an ally.
    pub fn maybe_roll<R>(&self, section: Section, rng: &mut R) -> Option<AllyTemplate>
    where
        R: RngOracle + ?Sized,
    {
        if rng.chance(self.chance) {
            self.roll(section, rng)
        } else {
            None
        }
    }
}

/// Loader for the ally roster (`allies.ron`).
pub struct AllyLoader;

impl AllyLoader {
    pub fn load(path: &Path) -> LoadResult<AllyRoster> {
        Self::parse(&read_file(path)?)
    }

    pub fn embedded() -> LoadResult<AllyRoster> {
        Self::parse(EMBEDDED)
    }

    pub fn parse(content: &str) -> LoadResult<AllyRoster> {
        let roster: AllyRoster = parse_ron(content, "ally roster")?;
        if roster.names.is_empty() {
            anyhow::bail!("Ally roster has no names");
        }
        if roster.descriptions.values().any(Vec::is_empty) {
            anyhow::bail!("Every profession in the ally roster needs a description");
        }
        if let Some((section, _)) = roster.levels.iter().find(|(_, (min, max))| min > max || *min == 0) {
            anyhow::bail!("Ally level range for section {} is invalid", section.get());
        }
        Ok(roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{PcgRng, ScriptedRng};

    #[test]
    fn rolled_levels_stay_in_section_range() {
        let roster = AllyLoader::embedded().unwrap();
        let mut rng = PcgRng::seeded(7);
        let expected = [(1, 1, 2), (2, 2, 4), (3, 4, 6), (4, 6, 8)];
        for (section, min, max) in expected {
            let section = Section::new(section).unwrap();
            for _ in 0..50 {
                let ally = roster.roll(section, &mut rng).unwrap();
                assert!((min..=max).contains(&ally.level), "level {} in section {}", ally.level, section.get());
                assert_eq!(ally.section, section);
                assert!(!ally.description.is_empty());
            }
        }
    }

    #[test]
    fn failed_chance_rolls_nothing() {
        let roster = AllyLoader::embedded().unwrap();
        // 1/2 chance: below(2) == 1 fails.
        let mut rng = ScriptedRng::new([1]);
        assert!(roster.maybe_roll(Section::FIRST, &mut rng).is_none());
    }

    #[test]
    fn missing_section_rolls_nothing() {
        let roster = AllyLoader::parse(
            r#"(
                chance: (numerator: 1, denominator: 1),
                names: ["Nyssa"],
                descriptions: { priest: ["Keeps the lamp lit."] },
                levels: { 1: (1, 2) },
            )"#,
        )
        .unwrap();
        let mut rng = PcgRng::seeded(3);
        assert!(roster.roll(Section::new(2).unwrap(), &mut rng).is_none());

        let ally = roster.maybe_roll(Section::FIRST, &mut rng).unwrap();
        assert_eq!(ally.name, "Nyssa");
        assert_eq!(ally.profession, Profession::Priest);
    }

    #[test]
    fn inverted_level_range_is_rejected() {
        let err = AllyLoader::parse(
            r#"(
                chance: (numerator: 1, denominator: 2),
                names: ["Kael"],
                descriptions: { rogue: ["Quiet."] },
                levels: { 3: (6, 4) },
            )"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("section 3"));
    }
}
