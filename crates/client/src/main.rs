//! Dungeon game client binary.
//!
//! ```bash
//! PLAYER_PROFESSION=mage GAME_SEED=7 cargo run -p dungeon-client
//! ```

use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use dungeon_client::{ClientConfig, Narrator, StdinInput, TerminalPresenter, logging, run_session};
use game_content::ContentBundle;
use game_core::combat::InputError;
use game_core::{BattleOutcome, CombatError, PcgRng};

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _guard = logging::setup_logging(config.session_id.as_deref())?;

    let content = match &config.data_dir {
        Some(dir) => ContentBundle::from_dir(dir)?,
        None => ContentBundle::embedded()?,
    };

    let seed = config.seed.unwrap_or_else(time_seed);
    tracing::info!(seed, player = %config.player_name, profession = %config.profession, "starting session");
    let mut rng = PcgRng::seeded(seed);

    let mut input = StdinInput::new(io::stdin().lock(), io::stdout());
    let mut presenter = TerminalPresenter::new(io::stdout());

    match run_session(&config, &content, &mut input, &mut presenter, &mut rng) {
        Ok(report) => {
            let summary = match report.outcome {
                BattleOutcome::Victory => format!(
                    "Section cleared! {} rooms, level {}.",
                    report.rooms_cleared,
                    report.player.as_player().map_or(1, |p| p.level)
                ),
                BattleOutcome::Defeat => format!("You fell after clearing {} rooms.", report.rooms_cleared),
            };
            presenter.announce(&summary);
            Ok(())
        }
        Err(e) if matches!(e.downcast_ref::<CombatError>(), Some(CombatError::Input(InputError::Closed))) => {
            tracing::info!("input closed, leaving");
            presenter.announce("Farewell.");
            Ok(())
        }
        Err(e) => {
            tracing::error!("session failed: {:#}", e);
            Err(e)
        }
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
