//! Data-driven content definitions and loaders.
//!
//! This crate houses static game content and provides loaders for RON/TOML data files:
//! - Game configuration (TOML)
//! - Status effects, skill tables, enemy templates, ally roster and items (RON)
//!
//! Every file is embedded at build time and can be overridden from a data
//! directory through [`ContentBundle::from_dir`]. Content is consumed through
//! game-core's oracles and templates and never appears in battle logic.

mod bundle;
mod encounter;
pub mod loaders;

pub use bundle::ContentBundle;
pub use encounter::{EncounterKind, roll_encounter, spawn_encounter};
pub use loaders::{
    AllyLoader, AllyRoster, ConfigLoader, EffectCatalog, EffectLoader, EnemyCatalog, EnemyLoader,
    ItemCatalog, ItemLoader, LoadResult, SkillLoader,
};
