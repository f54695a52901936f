//! Sidescroll headless runner
//!
//! Plays a level pack with a scripted "run right and jump" input, feeding
//! sound events through the mixer and frames through a render sink. Useful
//! for smoke-testing custom level packs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use sidescroll::audio::{LogSink, Mixer};
use sidescroll::consts::*;
use sidescroll::renderer::{Frame, LastFrame, RenderSink};
use sidescroll::sim::{GameEvent, GameState, Key, KeyState, Phase, TickInput, tick};
use sidescroll::{LevelPack, Settings};

/// Host frame time; deliberately not a multiple of the sim step
const FRAME_DT: f32 = 1.0 / 50.0;
/// Jump cadence for the scripted input
const JUMP_EVERY: u64 = 45;
const JUMP_HOLD: u64 = 12;

/// Headless platformer runner
#[derive(Debug, Parser)]
#[command(version, about)]
struct Options {
    /// Level pack JSON (built-in levels when omitted)
    #[arg(long)]
    levels: Option<PathBuf>,
    /// Settings JSON; unreadable files fall back to defaults
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Seed for cosmetic randomness
    #[arg(long, default_value_t = 12345)]
    seed: u64,
    /// Simulation ticks to run before stopping
    #[arg(long, default_value_t = 60 * 60 * 3)]
    ticks: u64,
}

fn load_pack(path: Option<&Path>) -> Result<LevelPack> {
    let Some(path) = path else {
        return Ok(LevelPack::builtin());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading level pack {}", path.display()))?;
    LevelPack::from_json(&json).with_context(|| format!("parsing level pack {}", path.display()))
}

/// Scripted player: always run right, hop on a fixed cadence, confirm any prompt
fn scripted_input(state: &GameState, sim_ticks: u64) -> TickInput {
    let mut keys = KeyState::new().with(Key::Right).with(Key::Run);
    if sim_ticks % JUMP_EVERY < JUMP_HOLD {
        keys.set(Key::Jump, true);
    }
    let confirm = matches!(state.phase(), Phase::Ready | Phase::LevelComplete);
    TickInput {
        keys,
        pause: false,
        confirm,
    }
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Sidescroll (headless) starting...");

    let options = Options::parse();
    let settings = options
        .settings
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();
    let pack = load_pack(options.levels.as_deref())?;
    log::info!("{} level(s) loaded", pack.levels().len());

    let mut state = GameState::new(Arc::new(pack), options.seed);
    state.apply_settings(&settings);

    let mixer = Mixer::from_settings(&settings);
    let mut audio = LogSink::default();
    mixer.sync_music(&mut audio);
    let mut screen = LastFrame::default();

    let mut accumulator = 0.0;
    let mut sim_ticks = 0u64;
    while sim_ticks < options.ticks {
        accumulator += FRAME_DT;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = scripted_input(&state, sim_ticks);
            tick(&mut state, &input);
            accumulator -= SIM_DT;
            substeps += 1;
            sim_ticks += 1;
        }

        let events = state.drain_events();
        mixer.dispatch(&events, &mut audio);
        for event in &events {
            match event {
                GameEvent::LevelLoaded { level, name } => log::info!("Level {level}: {name}"),
                GameEvent::LevelCompleted(summary) => log::info!(
                    "Cleared {} for {} (time bonus {})",
                    summary.name,
                    summary.level_score,
                    summary.time_bonus
                ),
                _ => {}
            }
        }
        screen.present(&Frame::capture_with(&state, &settings));

        if matches!(state.phase(), Phase::GameOver | Phase::GameComplete) {
            break;
        }
    }

    let session = &state.session;
    log::info!(
        "Stopped after {} ticks in {:?}: level {}, score {}, coins {}, lives {}",
        sim_ticks,
        state.phase(),
        session.level,
        session.score,
        session.coins,
        session.lives
    );
    log::info!("{} sounds played, {} frames presented", audio.played, screen.presented);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let options = Options::try_parse_from(["sidescroll"]).unwrap();
        assert_eq!(options.seed, 12345);
        assert_eq!(options.ticks, 10800);
        assert!(options.levels.is_none());
        assert!(options.settings.is_none());
    }

    #[test]
    fn test_options_flags() {
        let options = Options::try_parse_from([
            "sidescroll",
            "--levels",
            "pack.json",
            "--seed",
            "7",
            "--ticks",
            "600",
        ])
        .unwrap();
        assert_eq!(options.levels, Some(PathBuf::from("pack.json")));
        assert_eq!(options.seed, 7);
        assert_eq!(options.ticks, 600);
    }

    #[test]
    fn test_options_reject_bad_input() {
        assert!(Options::try_parse_from(["sidescroll", "--seed", "abc"]).is_err());
        assert!(Options::try_parse_from(["sidescroll", "--warp"]).is_err());
    }
}
