//! Player inventory and equipment slots.
//!
//! Items are plain data. A consumable carries the [`StatOp`]s it performs;
//! a piece of gear carries a single boost that equipping applies and
//! unequipping reverses.

use super::status::StatOp;

/// A single-use item.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Consumable {
    pub key: String,
    pub name: String,
    pub description: String,
    pub ops: Vec<StatOp>,
    /// Narration shown on use. Scrolls without one are simply torn.
    #[cfg_attr(feature = "serde", serde(default))]
    pub consume_message: Option<String>,
}

impl Consumable {
    pub fn consume_message(&self) -> String {
        self.consume_message
            .clone()
            .unwrap_or_else(|| format!("You tear the {}.", self.name))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GearSlot {
    Weapon,
    Armor,
}

/// An equippable weapon or armor piece with a rolled boost.
///
/// Weapons add `boost` attack and `10 * boost` max/current mana.
/// Armor adds `boost` defense and `10 * boost` max/current health.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gear {
    pub key: String,
    pub name: String,
    pub description: String,
    pub slot: GearSlot,
    pub boost: u32,
}

impl Gear {
    const POOL_MULTIPLIER: i32 = 10;

    fn signed_boost(&self) -> i32 {
        i32::try_from(self.boost).unwrap_or(i32::MAX)
    }

    /// Ops applied when the gear is put on.
    pub fn equip_ops(&self) -> [StatOp; 2] {
        let boost = self.signed_boost();
        let pool = boost.saturating_mul(Self::POOL_MULTIPLIER);
        match self.slot {
            GearSlot::Weapon => [StatOp::Attack(boost), StatOp::MaxMana(pool)],
            GearSlot::Armor => [StatOp::Defense(boost), StatOp::MaxHealth(pool)],
        }
    }

    /// Ops applied when the gear is taken off.
    ///
    /// Current mana and health are floored by [`StatOp::MaxMana`] and
    /// [`StatOp::MaxHealth`], so removing gear never leaves negative pools.
    pub fn unequip_ops(&self) -> [StatOp; 2] {
        let boost = self.signed_boost();
        let pool = boost.saturating_mul(Self::POOL_MULTIPLIER);
        match self.slot {
            GearSlot::Weapon => [StatOp::Attack(-boost), StatOp::MaxMana(-pool)],
            GearSlot::Armor => [StatOp::Defense(-boost), StatOp::MaxHealth(-pool)],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Item {
    Consumable(Consumable),
    Gear(Gear),
}

impl Item {
    pub fn key(&self) -> &str {
        match self {
            Item::Consumable(c) => &c.key,
            Item::Gear(g) => &g.key,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Item::Consumable(c) => &c.name,
            Item::Gear(g) => &g.name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Item::Consumable(c) => &c.description,
            Item::Gear(g) => &g.description,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryEntry {
    pub item: Item,
    pub quantity: u32,
}

/// Item → quantity map that keeps pickup order for menus.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    entries: Vec<InventoryEntry>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one copy of an item. Identical items stack.
    pub fn add(&mut self, item: Item) {
        self.add_many(item, 1);
    }

    pub fn add_many(&mut self, item: Item, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.entries.iter_mut().find(|entry| entry.item == item) {
            Some(entry) => entry.quantity = entry.quantity.saturating_add(quantity),
            None => self.entries.push(InventoryEntry { item, quantity }),
        }
    }

    /// Removes one copy of the item with `key`, returning it.
    pub fn take(&mut self, key: &str) -> Option<Item> {
        let index = self.entries.iter().position(|e| e.item.key() == key)?;
        Some(self.take_at(index))
    }

    fn take_at(&mut self, index: usize) -> Item {
        let entry = &mut self.entries[index];
        entry.quantity -= 1;
        if entry.quantity == 0 {
            self.entries.remove(index).item
        } else {
            entry.item.clone()
        }
    }

    pub fn quantity(&self, key: &str) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.item.key() == key)
            .map(|e| e.quantity)
            .sum()
    }

    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stocked consumables in menu order, with their quantities.
    pub fn consumables(&self) -> impl Iterator<Item = (&Consumable, u32)> {
        self.entries.iter().filter_map(|entry| match &entry.item {
            Item::Consumable(c) => Some((c, entry.quantity)),
            Item::Gear(_) => None,
        })
    }

    /// Removes one copy of the `n`-th stocked consumable (0-based, menu order).
    pub fn take_consumable(&mut self, n: usize) -> Option<Consumable> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| matches!(entry.item, Item::Consumable(_)))
            .map(|(index, _)| index)
            .nth(n)?;
        match self.take_at(index) {
            Item::Consumable(consumable) => Some(consumable),
            Item::Gear(_) => None,
        }
    }
}

/// Weapon and armor slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    pub weapon: Option<Gear>,
    pub armor: Option<Gear>,
}

impl Equipment {
    pub fn slot_mut(&mut self, slot: GearSlot) -> &mut Option<Gear> {
        match slot {
            GearSlot::Weapon => &mut self.weapon,
            GearSlot::Armor => &mut self.armor,
        }
    }
}
