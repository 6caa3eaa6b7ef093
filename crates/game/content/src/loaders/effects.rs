//! Status-effect catalog loader.

use std::collections::HashMap;
use std::path::Path;

use game_core::StatusEffectSpec;
use serde::Deserialize;

use crate::loaders::{LoadResult, parse_ron, read_file};

const EMBEDDED: &str = include_str!("../../data/effects.ron");

#[derive(Debug, Deserialize)]
struct EffectFile {
    effects: Vec<StatusEffectSpec>,
}

/// Effect templates by key. Skills refer to effects by key.
#[derive(Clone, Debug, Default)]
pub struct EffectCatalog {
    effects: HashMap<String, StatusEffectSpec>,
}

impl EffectCatalog {
    pub fn get(&self, key: &str) -> Option<&StatusEffectSpec> {
        self.effects.get(key)
    }

    /// Looks up `key`, failing with the key and the referrer in the message.
    pub fn resolve(&self, key: &str, referrer: &str) -> LoadResult<&StatusEffectSpec> {
        self.get(key)
            .ok_or_else(|| anyhow::anyhow!("Unknown effect '{}' referenced by '{}'", key, referrer))
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Loader for the status-effect catalog (`effects.ron`).
pub struct EffectLoader;

impl EffectLoader {
    pub fn load(path: &Path) -> LoadResult<EffectCatalog> {
        Self::parse(&read_file(path)?)
    }

    pub fn embedded() -> LoadResult<EffectCatalog> {
        Self::parse(EMBEDDED)
    }

    /// Parses a catalog. Duplicate keys are an error.
    pub fn parse(content: &str) -> LoadResult<EffectCatalog> {
        let file: EffectFile = parse_ron(content, "effect catalog")?;
        let mut effects = HashMap::with_capacity(file.effects.len());
        for spec in file.effects {
            if spec.duration == 0 {
                anyhow::bail!("Effect '{}' must last at least one turn", spec.key);
            }
            if let Some(previous) = effects.insert(spec.key.clone(), spec) {
                anyhow::bail!("Duplicate effect key '{}'", previous.key);
            }
        }
        Ok(EffectCatalog { effects })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::StatOp;

    #[test]
    fn embedded_catalog_has_every_effect() {
        let catalog = EffectLoader::embedded().unwrap();
        for key in [
            "poison",
            "burn",
            "shield",
            "motivate",
            "vulnerable",
            "exposed",
            "mana_restore",
            "frostbite",
            "purify",
            "full_heal",
            "blessing",
        ] {
            assert!(catalog.get(key).is_some(), "missing effect {key}");
        }
        let poison = catalog.get("poison").unwrap();
        assert_eq!(poison.duration, 3);
        assert_eq!(poison.on_tick, [StatOp::Damage(15)]);
        assert!(catalog.get("purify").unwrap().purges());
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = EffectLoader::parse(
            r#"(effects: [
                (key: "burn", name: "Burned", duration: 2, on_tick: [damage(25)]),
                (key: "burn", name: "Scorched", duration: 1),
            ])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Duplicate effect key 'burn'"));
    }

    #[test]
    fn unknown_key_names_the_referrer() {
        let catalog = EffectLoader::embedded().unwrap();
        let err = catalog.resolve("petrify", "gaze").unwrap_err();
        assert_eq!(err.to_string(), "Unknown effect 'petrify' referenced by 'gaze'");
    }
}
