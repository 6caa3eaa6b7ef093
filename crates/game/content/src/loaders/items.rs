//! Item catalog loader.

use std::collections::HashMap;
use std::path::Path;

use game_core::{Consumable, Gear, GearSlot, Item, RngOracle};
use serde::Deserialize;

use crate::loaders::{LoadResult, parse_ron, read_file};

const EMBEDDED: &str = include_str!("../../data/items.ron");

/// Gear blueprint. The boost is rolled when the piece is forged.
#[derive(Clone, Debug, Deserialize)]
pub struct GearDef {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub slot: GearSlot,
    /// Inclusive boost range.
    pub boost: (u32, u32),
}

impl GearDef {
    pub fn forge<R>(&self, rng: &mut R) -> Gear
    where
        R: RngOracle + ?Sized,
    {
        let (min, max) = self.boost;
        Gear {
            key: self.key.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            slot: self.slot,
            boost: rng.range(min, max),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
struct KitEntry {
    item: String,
    quantity: u32,
}

#[derive(Debug, Deserialize)]
struct ItemFile {
    consumables: Vec<Consumable>,
    #[serde(default)]
    gear: Vec<GearDef>,
    #[serde(default)]
    starter_kit: Vec<KitEntry>,
}

/// Consumables and gear blueprints by key.
#[derive(Clone, Debug, Default)]
pub struct ItemCatalog {
    consumables: HashMap<String, Consumable>,
    gear: HashMap<String, GearDef>,
    starter_kit: Vec<KitEntry>,
}

impl ItemCatalog {
    pub fn consumable(&self, key: &str) -> Option<&Consumable> {
        self.consumables.get(key)
    }

    pub fn gear(&self, key: &str) -> Option<&GearDef> {
        self.gear.get(key)
    }

    /// Builds one item by key. Gear gets a freshly rolled boost.
    pub fn item<R>(&self, key: &str, rng: &mut R) -> Option<Item>
    where
        R: RngOracle + ?Sized,
    {
        if let Some(consumable) = self.consumable(key) {
            return Some(Item::Consumable(consumable.clone()));
        }
        self.gear(key).map(|def| Item::Gear(def.forge(rng)))
    }

    /// Items a new player starts with, with quantities.
    pub fn starter_kit<R>(&self, rng: &mut R) -> Vec<(Item, u32)>
    where
        R: RngOracle + ?Sized,
    {
        self.starter_kit
            .iter()
            .filter_map(|entry| Some((self.item(&entry.item, rng)?, entry.quantity)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.consumables.len() + self.gear.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Loader for the item catalog (`items.ron`).
pub struct ItemLoader;

impl ItemLoader {
    pub fn load(path: &Path) -> LoadResult<ItemCatalog> {
        Self::parse(&read_file(path)?)
    }

    pub fn embedded() -> LoadResult<ItemCatalog> {
        Self::parse(EMBEDDED)
    }

    /// Parses the catalog. Keys are unique across consumables and gear, and
    /// every starter kit entry must name a known item.
    pub fn parse(content: &str) -> LoadResult<ItemCatalog> {
        let file: ItemFile = parse_ron(content, "item catalog")?;
        let mut catalog = ItemCatalog::default();

        for consumable in file.consumables {
            let key = consumable.key.clone();
            if catalog.consumables.insert(key.clone(), consumable).is_some() {
                anyhow::bail!("Duplicate item key '{}'", key);
            }
        }
        for def in file.gear {
            if def.boost.0 > def.boost.1 {
                anyhow::bail!("Gear '{}' has an empty boost range", def.key);
            }
            let key = def.key.clone();
            if catalog.consumables.contains_key(&key) || catalog.gear.insert(key.clone(), def).is_some() {
                anyhow::bail!("Duplicate item key '{}'", key);
            }
        }
        for entry in &file.starter_kit {
            if !catalog.consumables.contains_key(&entry.item) && !catalog.gear.contains_key(&entry.item) {
                anyhow::bail!("Starter kit names unknown item '{}'", entry.item);
            }
        }
        catalog.starter_kit = file.starter_kit;

        Ok(catalog)
    }
}
