//! Client configuration loaded from the environment.
use std::env;
use std::path::PathBuf;

use game_core::{Profession, Section};

/// Settings for one play session.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub player_name: String,
    pub profession: Profession,
    pub section: Section,
    /// Fixed RNG seed; a time-based seed is used when unset.
    pub seed: Option<u64>,
    /// Directory whose content files override the embedded ones.
    pub data_dir: Option<PathBuf>,
    /// Regular fights before the challenge and boss rooms.
    pub encounters: usize,
    /// Where the player snapshot is written after each battle.
    pub save_path: Option<PathBuf>,
    pub session_id: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            player_name: "Adventurer".to_string(),
            profession: Profession::Warrior,
            section: Section::FIRST,
            seed: None,
            data_dir: None,
            encounters: 3,
            save_path: None,
            session_id: None,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PLAYER_NAME` - Player character name (default: Adventurer)
    /// - `PLAYER_PROFESSION` - warrior, mage, rogue or priest (default: warrior)
    /// - `GAME_SECTION` - Section 1-4 to play (default: 1)
    /// - `GAME_SEED` - RNG seed for a reproducible run
    /// - `GAME_DATA_DIR` - Directory with content overrides
    /// - `GAME_ENCOUNTERS` - Fights before the challenge room (default: 3)
    /// - `GAME_SAVE_PATH` - JSON snapshot path
    /// - `GAME_SESSION_ID` - Session identifier for log files (default: auto-generated)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from any key lookup. Unparseable values keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(name) = lookup("PLAYER_NAME").filter(|name| !name.trim().is_empty()) {
            config.player_name = name.trim().to_string();
        }

        if let Some(value) = lookup("PLAYER_PROFESSION") {
            match value.trim().parse::<Profession>() {
                Ok(profession) => config.profession = profession,
                Err(_) => tracing::warn!("Ignoring unknown PLAYER_PROFESSION={}", value),
            }
        }

        if let Some(section) = parse::<u8>(&lookup, "GAME_SECTION") {
            match Section::new(section) {
                Ok(section) => config.section = section,
                Err(e) => tracing::warn!("Ignoring GAME_SECTION: {}", e),
            }
        }

        config.seed = parse(&lookup, "GAME_SEED");
        config.data_dir = lookup("GAME_DATA_DIR").map(PathBuf::from);

        if let Some(encounters) = parse::<usize>(&lookup, "GAME_ENCOUNTERS") {
            config.encounters = encounters;
        }

        config.save_path = lookup("GAME_SAVE_PATH").map(PathBuf::from);
        config.session_id = lookup("GAME_SESSION_ID");

        config
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}
