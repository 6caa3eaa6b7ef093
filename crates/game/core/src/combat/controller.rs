//! Turn controller.
//!
//! Drives one battle through `PlayerTurn → EnemyTurn → AllyTurn` rounds until
//! it reaches [`Phase::Victory`] or [`Phase::Defeat`]. The controller owns no
//! game state: actors are borrowed for the duration of [`TurnController::run`]
//! and mutated in place, so callers inspect them afterwards exactly as they
//! would without the returned [`BattleOutcome`].
//!
//! Phases iterate over a snapshot of combatant handles taken when the phase
//! starts. Dead enemies are removed only during bookkeeping and fallen
//! allies only at phase checkpoints, so handles stay valid within a phase.

use strum::IntoEnumIterator;
use tracing::{debug, error, info};

use super::battle::{Battle, CombatantId, Roster};
use super::damage::choose_enemy_skill;
use super::event::{CombatEvent, EventSink, RosterLine};
use super::input::{
    CombatInput, Command, ItemChoice, Prompt, SkillChoice, TargetChoice, parse_choice,
};
use super::targeting::{TargetPlan, plan_targets};
use crate::config::GameConfig;
use crate::env::{RngOracle, SkillOracle, pick};
use crate::error::CombatError;
use crate::progression::{allocate_experience, check_level_up, draw_hand, grant_skills};
use crate::skill::{Skill, use_skill};
use crate::state::{Actor, EffectTick, SkillRole};

/// Controller state between steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    PlayerTurn,
    EnemyTurn,
    AllyTurn,
    Victory,
    Defeat,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::PlayerTurn => "player_turn",
            Phase::EnemyTurn => "enemy_turn",
            Phase::AllyTurn => "ally_turn",
            Phase::Victory => "victory",
            Phase::Defeat => "defeat",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Victory | Phase::Defeat)
    }
}

/// How a battle ended. Fleeing counts as a victory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleOutcome {
    Victory,
    Defeat,
}

const RETREAT_FAILURE_MESSAGES: &[&str] = &[
    "You turn to run and trip over your own feet.",
    "The way out is blocked!",
    "You hesitate a moment too long.",
    "An enemy cuts off your escape.",
    "You slip on the damp stone floor.",
];

/// Runs battles against a fixed configuration and skill tables.
///
/// `input`, `rng` and `events` are taken by value; pass `&mut` references to
/// keep using them after the battle.
pub struct TurnController<'c, S: ?Sized, I, R, E> {
    config: &'c GameConfig,
    skills: &'c S,
    input: I,
    rng: R,
    events: E,
    round: u32,
    level_ups: u32,
}

impl<'c, S, I, R, E> TurnController<'c, S, I, R, E>
where
    S: SkillOracle + ?Sized,
    I: CombatInput,
    R: RngOracle,
    E: EventSink,
{
    pub fn new(config: &'c GameConfig, skills: &'c S, input: I, rng: R, events: E) -> Self {
        Self {
            config,
            skills,
            input,
            rng,
            events,
            round: 0,
            level_ups: 0,
        }
    }

    /// Rounds started in the current or most recent battle.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn into_parts(self) -> (I, R, E) {
        (self.input, self.rng, self.events)
    }

    /// Fights `enemies` with `player` and their allies until one side wins.
    ///
    /// On return every defeated enemy has been removed from `enemies`, fallen
    /// allies are gone from the player's roster and owed skills are granted.
    ///
    /// # Errors
    ///
    /// - [`CombatError::NoEnemies`] if `enemies` is empty.
    /// - [`CombatError::EmptySkillDeck`] if an enemy has no skill to use.
    /// - [`CombatError::Input`] if the input source closes.
    pub fn run(
        &mut self,
        player: &mut Actor,
        enemies: &mut Vec<Actor>,
    ) -> Result<BattleOutcome, CombatError> {
        if enemies.is_empty() {
            return Err(CombatError::NoEnemies);
        }
        self.round = 0;
        self.level_ups = 0;

        let mut battle = Battle::new(player, enemies);
        self.events.emit(CombatEvent::BattleStarted {
            player: battle.player().name.clone(),
            allies: battle.allies().map(|ally| ally.name.clone()).collect(),
            enemies: battle.enemies().iter().map(|enemy| enemy.name.clone()).collect(),
        });
        info!(
            player = %battle.player().name,
            allies = battle.living_allies().len(),
            enemies = battle.enemies().len(),
            "battle started"
        );

        let mut phase = Phase::PlayerTurn;
        while !phase.is_terminal() {
            phase = match phase {
                Phase::PlayerTurn => self.player_turn(&mut battle)?,
                Phase::EnemyTurn => self.enemy_turn(&mut battle)?,
                Phase::AllyTurn => self.ally_turn(&mut battle)?,
                Phase::Victory | Phase::Defeat => phase,
            };
            debug!(round = self.round, phase = phase.as_str(), "phase transition");
        }

        let outcome = if phase == Phase::Victory {
            BattleOutcome::Victory
        } else {
            BattleOutcome::Defeat
        };
        self.finish(&mut battle, outcome);
        Ok(outcome)
    }

    // ===== player turn =====

    fn player_turn(&mut self, battle: &mut Battle<'_>) -> Result<Phase, CombatError> {
        self.round += 1;
        let player = battle.player_mut();
        self.events.emit(CombatEvent::PlayerTurn {
            round: self.round,
            health: player.stats.health,
            max_health: player.stats.max_health,
            mana: player.stats.mana,
            max_mana: player.stats.max_mana,
        });

        let name = player.name.clone();
        let ticks = player.tick_effects();
        self.emit_ticks(&name, ticks);
        if !battle.player().is_alive() {
            info!(round = self.round, "player succumbed to status effects");
            return Ok(Phase::Defeat);
        }

        let drawn = draw_hand(
            battle.player_mut(),
            self.config.skills_drawn_per_turn,
            &mut self.rng,
        );
        for skill in drawn {
            self.events.emit(CombatEvent::SkillDrawn { skill });
        }
        self.events.emit(roster(battle));

        loop {
            let line = self.input.read(&Prompt::Action)?;
            let Some(command) = Command::parse(&line) else {
                self.events.emit(CombatEvent::Rejected {
                    reason: format!(
                        "Unknown command `{}`. Type `help` for a list of commands.",
                        line.trim()
                    ),
                });
                continue;
            };
            debug!(round = self.round, %command, "player command");

            let acted = match command {
                Command::Help => {
                    self.events.emit(CombatEvent::Help { lines: help_lines() });
                    false
                }
                Command::Attack => self.attack(battle)?,
                Command::Rest => {
                    let player = battle.player_mut();
                    let (mana, health) = player.rest(self.config);
                    let actor = player.name.clone();
                    self.events.emit(CombatEvent::Rested { actor, mana, health });
                    true
                }
                Command::Items => self.use_item(battle)?,
                Command::Retreat => {
                    self.retreat(battle);
                    true
                }
            };
            if acted {
                break;
            }
        }

        if !battle.player().is_alive() {
            return Ok(Phase::Defeat);
        }
        self.bookkeeping(battle);
        Ok(if battle.all_enemies_dead() {
            Phase::Victory
        } else {
            Phase::EnemyTurn
        })
    }

    /// Returns whether the turn was spent.
    fn attack(&mut self, battle: &mut Battle<'_>) -> Result<bool, CombatError> {
        let player = battle.player();
        let hand = player
            .as_player()
            .map(|data| data.hand.clone())
            .unwrap_or_default();
        if hand.is_empty() {
            self.reject("You have no skills in hand.");
            return Ok(false);
        }

        let choices = hand
            .iter()
            .map(|skill| SkillChoice {
                name: skill.name.clone(),
                description: skill.description.clone(),
                mana_cost: skill.mana_cost,
                target: skill.target,
                affordable: player.can_afford(skill.mana_cost),
            })
            .collect();
        let index = self.choose(&Prompt::Skill(choices), hand.len())?;
        let skill = &hand[index];

        let targets = match plan_targets(skill.target, CombatantId::Player, battle) {
            TargetPlan::Fixed(targets) => targets,
            TargetPlan::ChooseOne(candidates) if candidates.is_empty() => {
                self.reject("There is nobody to target.");
                return Ok(false);
            }
            TargetPlan::ChooseOne(candidates) => {
                let prompt = Prompt::Target {
                    skill: skill.name.clone(),
                    candidates: candidates
                        .iter()
                        .filter_map(|&id| battle.actor(id))
                        .map(|actor| TargetChoice {
                            name: actor.name.clone(),
                            health: actor.stats.health,
                            max_health: actor.stats.max_health,
                        })
                        .collect(),
                };
                let choice = self.choose(&prompt, candidates.len())?;
                vec![candidates[choice]]
            }
        };

        let outcome = use_skill(
            skill,
            CombatantId::Player,
            &targets,
            battle,
            &mut self.rng,
            self.config.damage_formula,
        )?;
        let spent = outcome.consumes_turn();
        self.events.emit(CombatEvent::SkillUsed {
            actor: battle.player().name.clone(),
            skill: skill.name.clone(),
            outcome,
        });

        if spent
            && let Some(data) = battle.player_mut().as_player_mut()
            && index < data.hand.len()
        {
            data.hand.remove(index);
        }
        Ok(spent)
    }

    fn use_item(&mut self, battle: &mut Battle<'_>) -> Result<bool, CombatError> {
        let choices: Vec<ItemChoice> = battle
            .player()
            .as_player()
            .map(|data| {
                data.inventory
                    .consumables()
                    .map(|(item, quantity)| ItemChoice {
                        name: item.name.clone(),
                        description: item.description.clone(),
                        quantity,
                    })
                    .collect()
            })
            .unwrap_or_default();
        if choices.is_empty() {
            self.reject("You have no usable items.");
            return Ok(false);
        }

        let len = choices.len();
        let index = self.choose(&Prompt::Item(choices), len)?;
        let player = battle.player_mut();
        let Some((item, purged)) = player.consume(index) else {
            return Ok(false);
        };
        let name = player.name.clone();
        self.events.emit(CombatEvent::ItemUsed {
            item: item.name.clone(),
            message: item.consume_message(),
        });
        self.emit_ticks(&name, purged);
        Ok(true)
    }

    fn retreat(&mut self, battle: &mut Battle<'_>) {
        if self.rng.chance(self.config.retreat_chance) {
            battle.rout_enemies();
            info!(round = self.round, "player fled");
            self.events.emit(CombatEvent::Fled);
            return;
        }

        let player = battle.player_mut();
        let penalty = u64::from(player.stats.health)
            * u64::from(self.config.retreat_penalty_percent)
            / 100;
        let penalty = u32::try_from(penalty).unwrap_or(u32::MAX);
        player.stats.health = player.stats.health.saturating_sub(penalty);
        let flavor = pick(&mut self.rng, RETREAT_FAILURE_MESSAGES)
            .copied()
            .unwrap_or("You fail to escape!");
        debug!(round = self.round, penalty, "retreat failed");
        self.events.emit(CombatEvent::RetreatFailed {
            flavor: flavor.to_string(),
            penalty,
        });
    }

    // ===== enemy turn =====

    fn enemy_turn(&mut self, battle: &mut Battle<'_>) -> Result<Phase, CombatError> {
        let formula = self.config.damage_formula;
        for id in battle.living_enemies() {
            let Some(enemy) = battle.actor_mut(id) else {
                continue;
            };
            let name = enemy.name.clone();
            let ticks = enemy.tick_effects();
            let alive = enemy.is_alive();
            self.emit_ticks(&name, ticks);
            if !alive {
                debug!(actor = %name, "enemy died to status effects");
                continue;
            }

            let player_health = battle.player().stats.health;
            let skill = battle.actor(id).and_then(|enemy| {
                choose_enemy_skill(
                    &enemy.skills,
                    formula,
                    enemy.stats.attack,
                    player_health,
                    &mut self.rng,
                )
                .cloned()
            });
            let Some(skill) = skill else {
                error!(actor = %name, "enemy has no skills");
                return Err(CombatError::EmptySkillDeck { actor: name });
            };
            debug!(actor = %name, skill = %skill.key, "enemy chose skill");

            let targets = plan_targets(skill.target, id, battle).resolve_random(&mut self.rng);
            let outcome = use_skill(&skill, id, &targets, battle, &mut self.rng, formula)?;
            self.events.emit(CombatEvent::SkillUsed {
                actor: name,
                skill: skill.name,
                outcome,
            });

            if !battle.player().is_alive() {
                info!(round = self.round, "player defeated");
                return Ok(Phase::Defeat);
            }
        }

        self.prune_allies(battle);
        Ok(Phase::AllyTurn)
    }

    // ===== ally turn =====

    fn ally_turn(&mut self, battle: &mut Battle<'_>) -> Result<Phase, CombatError> {
        let formula = self.config.damage_formula;
        self.prune_allies(battle);

        for id in battle.living_allies() {
            if battle.all_enemies_dead() {
                break;
            }
            let Some(ally) = battle.actor_mut(id) else {
                continue;
            };
            let name = ally.name.clone();
            let ticks = ally.tick_effects();
            let alive = ally.is_alive();
            self.emit_ticks(&name, ticks);
            if !alive {
                continue;
            }

            let skill = battle
                .actor(id)
                .and_then(|ally| choose_ally_skill(ally, &mut self.rng).cloned());
            let Some(skill) = skill else {
                debug!(actor = %name, "ally has no skills");
                continue;
            };
            let targets = plan_targets(skill.target, id, battle).resolve_random(&mut self.rng);
            if targets.is_empty() {
                continue;
            }
            let outcome = use_skill(&skill, id, &targets, battle, &mut self.rng, formula)?;
            self.events.emit(CombatEvent::SkillUsed {
                actor: name,
                skill: skill.name,
                outcome,
            });
        }

        self.prune_allies(battle);
        self.bookkeeping(battle);
        Ok(if battle.all_enemies_dead() {
            Phase::Victory
        } else {
            Phase::PlayerTurn
        })
    }

    // ===== bookkeeping =====

    /// Removes dead enemies, awards their experience and checks for a level-up.
    fn bookkeeping(&mut self, battle: &mut Battle<'_>) {
        let defeated = battle.remove_dead_enemies();
        let player = battle.player_mut();
        let mut total = player.as_player().map_or(0, |data| data.experience);
        for (from, amount) in allocate_experience(player, &defeated) {
            total = total.saturating_add(amount);
            self.events.emit(CombatEvent::ExperienceGained {
                from,
                amount,
                total,
            });
        }

        let Some(level_up) = check_level_up(player, &mut self.rng, self.config) else {
            return;
        };
        self.level_ups += 1;
        if self.level_ups > 1
            && let Some(data) = player.as_player_mut()
        {
            data.owed_skills += 1;
        }
        self.events.emit(CombatEvent::LeveledUp {
            name: player.name.clone(),
            level: level_up.level,
        });
    }

    fn finish(&mut self, battle: &mut Battle<'_>, outcome: BattleOutcome) {
        let player = battle.player_mut();
        let owed = player
            .as_player_mut()
            .map_or(0, |data| core::mem::take(&mut data.owed_skills));
        if owed > 0 {
            let skills = grant_skills(player, owed as usize, self.skills, &mut self.rng);
            if !skills.is_empty() {
                self.events.emit(CombatEvent::SkillsLearned { skills });
            }
        }

        self.events.emit(match outcome {
            BattleOutcome::Victory => CombatEvent::Victory,
            BattleOutcome::Defeat => CombatEvent::Defeat,
        });
        info!(rounds = self.round, ?outcome, "battle over");
    }

    // ===== helpers =====

    /// Asks `prompt` until the answer is a valid 1-based choice below `len`.
    fn choose(&mut self, prompt: &Prompt, len: usize) -> Result<usize, CombatError> {
        loop {
            let line = self.input.read(prompt)?;
            if let Some(index) = parse_choice(&line, len) {
                return Ok(index);
            }
            self.reject(&format!("Invalid choice. Enter a number from 1 to {len}."));
        }
    }

    fn reject(&mut self, reason: &str) {
        self.events.emit(CombatEvent::Rejected {
            reason: reason.to_string(),
        });
    }

    fn emit_ticks(&mut self, actor: &str, ticks: Vec<EffectTick>) {
        for tick in ticks {
            self.events.emit(CombatEvent::Effect {
                actor: actor.to_string(),
                tick,
            });
        }
    }

    fn prune_allies(&mut self, battle: &mut Battle<'_>) {
        for name in battle.prune_fallen_allies() {
            info!(ally = %name, "ally fell");
            self.events.emit(CombatEvent::AllyFell { name });
        }
    }
}

/// Runs one battle with a throwaway [`TurnController`].
pub fn run_combat<S, I, R, E>(
    player: &mut Actor,
    enemies: &mut Vec<Actor>,
    config: &GameConfig,
    skills: &S,
    input: I,
    rng: R,
    events: E,
) -> Result<BattleOutcome, CombatError>
where
    S: SkillOracle + ?Sized,
    I: CombatInput,
    R: RngOracle,
    E: EventSink,
{
    TurnController::new(config, skills, input, rng, events).run(player, enemies)
}

/// Ally skill choice: a random skill matching the profession's preferred
/// role, or any skill if the deck has none.
fn choose_ally_skill<'a, R>(ally: &'a Actor, rng: &mut R) -> Option<&'a Skill>
where
    R: RngOracle + ?Sized,
{
    let role = ally
        .profession()
        .map_or(SkillRole::Offense, |profession| profession.preferred_role());
    let preferred: Vec<&Skill> = ally
        .skills
        .iter()
        .filter(|skill| skill.target.is_offensive() == (role == SkillRole::Offense))
        .collect();
    if preferred.is_empty() {
        pick(rng, &ally.skills)
    } else {
        pick(rng, &preferred).copied()
    }
}

fn help_lines() -> Vec<String> {
    let mut lines = vec!["Commands:".to_string()];
    lines.extend(
        Command::iter().map(|command| format!("  {:<8} {}", command.to_string(), command.summary())),
    );
    lines
}

fn roster(battle: &Battle<'_>) -> CombatEvent {
    let line = |actor: &Actor| RosterLine {
        name: actor.name.clone(),
        health: actor.stats.health,
        max_health: actor.stats.max_health,
    };
    CombatEvent::Roster {
        enemies: battle
            .enemies()
            .iter()
            .filter(|enemy| enemy.is_alive())
            .map(line)
            .collect(),
        allies: battle
            .allies()
            .filter(|ally| ally.is_alive())
            .map(line)
            .collect(),
    }
}
