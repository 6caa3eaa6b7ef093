//! One run through a section: a few fights, a challenge room, then the boss.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use game_content::{ContentBundle, EncounterKind};
use game_core::{Actor, BattleOutcome, CombatInput, RngOracle, run_combat};
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::terminal::Narrator;

/// How a session ended.
#[derive(Debug)]
pub struct SessionReport {
    pub rooms_cleared: usize,
    pub outcome: BattleOutcome,
    pub player: Actor,
}

/// Room order: `encounters` fights, one challenge, one boss.
pub fn plan_rooms(encounters: usize) -> Vec<EncounterKind> {
    let mut rooms = vec![EncounterKind::Fight; encounters];
    rooms.extend([EncounterKind::Challenge, EncounterKind::Boss]);
    rooms
}

/// Plays a session until the boss falls or the player does.
///
/// Returns early with the combat error if input closes mid-battle.
pub fn run_session<I, N, R>(
    config: &ClientConfig,
    content: &ContentBundle,
    input: &mut I,
    narrator: &mut N,
    rng: &mut R,
) -> Result<SessionReport>
where
    I: CombatInput,
    N: Narrator,
    R: RngOracle,
{
    let section = config.section;
    let mut player = content.new_player(&config.player_name, config.profession, section, rng);
    narrator.announce(&format!(
        "{} the {} enters section {}.",
        player.name,
        config.profession,
        section.get()
    ));

    if let Some(ally) = content.recruit_roll(section, rng) {
        let name = ally.name.clone();
        match player.recruit(ally) {
            Ok(()) => narrator.announce(&format!("{name} joins your party.")),
            Err(e) => warn!(ally = %name, error = %e, "ally could not join"),
        }
    }

    let mut rooms_cleared = 0;
    for (index, kind) in plan_rooms(config.encounters).into_iter().enumerate() {
        let mut enemies = content.encounter(kind, section, rng)?;
        if enemies.is_empty() {
            warn!(room = index + 1, kind = kind.as_str(), "no enemies for room, skipping");
            continue;
        }
        narrator.announce(&format!("Room {}: {}", index + 1, kind.as_str()));

        let outcome = run_combat(
            &mut player,
            &mut enemies,
            &content.config,
            &content.skills,
            &mut *input,
            &mut *rng,
            &mut *narrator,
        )?;

        if let Some(path) = &config.save_path {
            save_snapshot(path, &player)?;
        }
        if outcome == BattleOutcome::Defeat {
            info!(rooms_cleared, "session lost");
            return Ok(SessionReport {
                rooms_cleared,
                outcome,
                player,
            });
        }
        rooms_cleared += 1;
    }

    info!(rooms_cleared, "session won");
    Ok(SessionReport {
        rooms_cleared,
        outcome: BattleOutcome::Victory,
        player,
    })
}

/// Writes the player as pretty JSON, creating parent directories.
pub fn save_snapshot(path: &Path, player: &Actor) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(player).context("Failed to serialize player")?;
    fs::write(path, json).with_context(|| format!("Failed to write snapshot {}", path.display()))?;
    Ok(())
}
