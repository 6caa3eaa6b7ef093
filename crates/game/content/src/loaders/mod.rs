//! Content loaders for reading game data from files.
//!
//! Every catalog ships embedded in the binary and can be replaced by a file
//! of the same name in a data directory (see [`crate::ContentBundle`]).

pub mod allies;
pub mod config;
pub mod effects;
pub mod enemies;
pub mod items;
pub mod skills;

pub use allies::{AllyLoader, AllyRoster};
pub use config::ConfigLoader;
pub use effects::{EffectCatalog, EffectLoader};
pub use enemies::{EnemyCatalog, EnemyLoader};
pub use items::{ItemCatalog, ItemLoader};
pub use skills::SkillLoader;

use std::path::Path;

use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Parses a RON document, naming `what` in the error.
pub(crate) fn parse_ron<T: DeserializeOwned>(content: &str, what: &str) -> LoadResult<T> {
    ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse {} RON: {}", what, e))
}
