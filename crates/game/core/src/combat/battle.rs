//! Battle roster.
//!
//! A [`Battle`] borrows the player and the enemy list for the duration of a
//! fight. The player's allies are moved out of the permanent roster when the
//! battle starts and moved back when it is dropped, so every exit path
//! (victory, defeat, error) leaves the player's roster consistent.

use core::fmt;

use arrayvec::ArrayVec;
use tracing::debug;

use crate::config::GameConfig;
use crate::state::Actor;

/// Which side of the fight an actor is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The player and their allies.
    Party,
    Enemies,
}

/// Stable handle to a combatant for the length of a phase.
///
/// Indices refer to positions in the battle's ally and enemy lists. Dead
/// enemies are only removed during bookkeeping, so handles taken at the start
/// of a phase stay valid through it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CombatantId {
    Player,
    Ally(usize),
    Enemy(usize),
}

impl CombatantId {
    pub fn side(self) -> Side {
        match self {
            CombatantId::Player | CombatantId::Ally(_) => Side::Party,
            CombatantId::Enemy(_) => Side::Enemies,
        }
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatantId::Player => f.write_str("player"),
            CombatantId::Ally(index) => write!(f, "ally#{index}"),
            CombatantId::Enemy(index) => write!(f, "enemy#{index}"),
        }
    }
}

/// Lookup of actors by [`CombatantId`].
pub trait Roster {
    fn actor(&self, id: CombatantId) -> Option<&Actor>;
    fn actor_mut(&mut self, id: CombatantId) -> Option<&mut Actor>;
}

pub type Allies = ArrayVec<Box<Actor>, { GameConfig::MAX_ALLIES }>;

pub struct Battle<'a> {
    player: &'a mut Actor,
    allies: Allies,
    enemies: &'a mut Vec<Actor>,
}

impl<'a> Battle<'a> {
    /// Starts a battle, moving the player's allies into it.
    pub fn new(player: &'a mut Actor, enemies: &'a mut Vec<Actor>) -> Self {
        let allies = player
            .as_player_mut()
            .map(|data| core::mem::take(&mut data.allies))
            .unwrap_or_default();
        Self {
            player,
            allies,
            enemies,
        }
    }

    pub fn player(&self) -> &Actor {
        &*self.player
    }

    pub fn player_mut(&mut self) -> &mut Actor {
        &mut *self.player
    }

    pub fn enemy(&self, index: usize) -> Option<&Actor> {
        self.enemies.get(index)
    }

    pub fn enemy_mut(&mut self, index: usize) -> Option<&mut Actor> {
        self.enemies.get_mut(index)
    }

    pub fn ally(&self, index: usize) -> Option<&Actor> {
        self.allies.get(index).map(Box::as_ref)
    }

    pub fn enemies(&self) -> &[Actor] {
        self.enemies.as_slice()
    }

    pub fn allies(&self) -> impl Iterator<Item = &Actor> {
        self.allies.iter().map(Box::as_ref)
    }

    /// Handles of enemies with health above 0, in roster order.
    pub fn living_enemies(&self) -> Vec<CombatantId> {
        self.enemies
            .iter()
            .enumerate()
            .filter(|(_, enemy)| enemy.is_alive())
            .map(|(index, _)| CombatantId::Enemy(index))
            .collect()
    }

    /// Handles of allies with health above 0, in roster order.
    pub fn living_allies(&self) -> Vec<CombatantId> {
        self.allies
            .iter()
            .enumerate()
            .filter(|(_, ally)| ally.is_alive())
            .map(|(index, _)| CombatantId::Ally(index))
            .collect()
    }

    /// Living allies followed by the player.
    pub fn party(&self) -> Vec<CombatantId> {
        let mut party = self.living_allies();
        party.push(CombatantId::Player);
        party
    }

    pub fn all_enemies_dead(&self) -> bool {
        self.enemies.iter().all(|enemy| !enemy.is_alive())
    }

    /// Removes dead allies from the battle. Since the battle holds the
    /// player's roster, they are gone from it permanently.
    pub fn prune_fallen_allies(&mut self) -> Vec<String> {
        let mut fallen = Vec::new();
        self.allies.retain(|ally| {
            if ally.is_alive() {
                true
            } else {
                fallen.push(ally.name.clone());
                false
            }
        });
        if !fallen.is_empty() {
            debug!(?fallen, "pruned fallen allies");
        }
        fallen
    }

    /// Removes dead enemies from the roster and returns them.
    pub fn remove_dead_enemies(&mut self) -> Vec<Actor> {
        let (dead, living): (Vec<_>, Vec<_>) = core::mem::take(&mut *self.enemies)
            .into_iter()
            .partition(|enemy| !enemy.is_alive());
        *self.enemies = living;
        dead
    }

    /// Forces every enemy's health to 0.
    pub fn rout_enemies(&mut self) {
        for enemy in self.enemies.iter_mut() {
            enemy.stats.health = 0;
        }
    }
}

impl Roster for Battle<'_> {
    fn actor(&self, id: CombatantId) -> Option<&Actor> {
        match id {
            CombatantId::Player => Some(&*self.player),
            CombatantId::Ally(index) => self.ally(index),
            CombatantId::Enemy(index) => self.enemy(index),
        }
    }

    fn actor_mut(&mut self, id: CombatantId) -> Option<&mut Actor> {
        match id {
            CombatantId::Player => Some(&mut *self.player),
            CombatantId::Ally(index) => self.allies.get_mut(index).map(Box::as_mut),
            CombatantId::Enemy(index) => self.enemy_mut(index),
        }
    }
}

impl Drop for Battle<'_> {
    fn drop(&mut self) {
        let allies = core::mem::take(&mut self.allies);
        if let Some(data) = self.player.as_player_mut() {
            data.allies = allies;
        }
    }
}
