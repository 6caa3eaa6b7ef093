//! Professions and sections.
//!
//! Profession-specific behaviour (stat growth on level-up, preferred skill
//! role for NPC allies) is looked up from tables here instead of being
//! branched on at every call site.

use core::fmt;
use core::ops::RangeInclusive;

use crate::config::GameConfig;

/// Class of a player or ally.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Profession {
    Warrior,
    Mage,
    Rogue,
    Priest,
}

/// Whether a skill is meant for the enemy side or for the caster's own side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkillRole {
    Offense,
    Support,
}

/// Random stat gains granted on each level-up (inclusive ranges).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrowthTable {
    pub health: RangeInclusive<u32>,
    pub mana: RangeInclusive<u32>,
    pub attack: RangeInclusive<u32>,
    pub defense: RangeInclusive<u32>,
}

impl Profession {
    /// Level-up growth ranges for this profession.
    ///
    /// Warriors favour defense and health, mages mana and attack, rogues
    /// attack, priests health and mana.
    pub fn growth(self) -> GrowthTable {
        match self {
            Profession::Warrior => GrowthTable {
                health: 70..=99,
                mana: 10..=19,
                attack: 1..=4,
                defense: 5..=9,
            },
            Profession::Mage => GrowthTable {
                health: 30..=59,
                mana: 30..=49,
                attack: 5..=9,
                defense: 1..=4,
            },
            Profession::Rogue => GrowthTable {
                health: 50..=79,
                mana: 10..=19,
                attack: 8..=14,
                defense: 1..=4,
            },
            Profession::Priest => GrowthTable {
                health: 70..=99,
                mana: 30..=49,
                attack: 1..=4,
                defense: 3..=7,
            },
        }
    }

    /// Role an NPC ally of this profession prefers when picking a skill.
    pub fn preferred_role(self) -> SkillRole {
        match self {
            Profession::Priest => SkillRole::Support,
            Profession::Warrior | Profession::Mage | Profession::Rogue => SkillRole::Offense,
        }
    }
}

/// Difficulty/progression bracket (1–4) scoping enemies, loot and skills.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct Section(u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("section {0} is outside 1..={max}", max = GameConfig::MAX_SECTION)]
pub struct SectionError(pub u8);

impl Section {
    pub const FIRST: Section = Section(1);

    pub fn new(value: u8) -> Result<Self, SectionError> {
        if (1..=GameConfig::MAX_SECTION).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SectionError(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All sections from the first up to and including this one.
    pub fn up_to(self) -> impl Iterator<Item = Section> {
        (1..=self.0).map(Section)
    }

    /// The next section, if there is one.
    pub fn next(self) -> Option<Section> {
        Section::new(self.0 + 1).ok()
    }
}

impl TryFrom<u8> for Section {
    type Error = SectionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Section::new(value)
    }
}

impl From<Section> for u8 {
    fn from(section: Section) -> Self {
        section.0
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
