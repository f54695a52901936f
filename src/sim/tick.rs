//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Input is read
//! once at the top of the tick; removals happen once at the bottom.

use super::clock::Phase;
use super::completion::level_finished;
use super::enemy::EnemyContext;
use super::input::{Key, KeyState, TickInput};
use super::interaction::{hurt_player, resolve_player, resolve_shells};
use super::particle::update_particles;
use super::state::{EndReason, GameState};
use crate::audio::SoundEffect;
use crate::consts::*;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    let keys = input.keys;
    let pause = input.pause || pressed(&keys, &state.prev_keys, Key::Pause);
    let confirm = input.confirm || pressed(&keys, &state.prev_keys, Key::Confirm);
    state.prev_keys = keys;

    // Handle pause toggle
    if pause {
        state.clock.toggle_pause();
        match state.clock.phase {
            Phase::Paused => log::info!("Paused"),
            Phase::Running => log::info!("Resumed"),
            _ => {}
        }
    }

    match state.clock.phase {
        Phase::Ready => {
            if confirm {
                state.start();
            }
        }
        Phase::Running => step(state, &keys),
        Phase::LevelComplete => tick_results(state, confirm),
        Phase::Paused | Phase::GameOver | Phase::GameComplete => {}
    }
}

/// Newly pressed this tick
fn pressed(keys: &KeyState, prev: &KeyState, key: Key) -> bool {
    keys.is_held(key) && !prev.is_held(key)
}

/// One Running tick
fn step(state: &mut GameState, keys: &KeyState) {
    let second_elapsed = state.clock.advance();

    if state.player.apply_input(keys) {
        state.play(SoundEffect::Jump);
    }
    state.player.integrate();

    // Enemies and walking items resolve their own solids
    let solids = state.solids();
    let ctx = EnemyContext {
        solids: &solids,
        world_width: state.world_width,
        player_x: state.player.body.pos.x,
    };
    for enemy in state.enemies.iter_mut() {
        enemy.update(&ctx);
    }
    resolve_shells(state);
    for item in state.collectibles.iter_mut() {
        item.update(&solids, state.world_width);
    }

    for block in state.question_blocks.iter_mut() {
        block.tick();
    }
    for brick in state.brick_blocks.iter_mut() {
        brick.tick();
    }
    if let Some(pole) = state.flagpole.as_mut() {
        pole.tick();
    }
    if let Some(door) = state.exit_door.as_mut() {
        door.tick();
    }
    update_particles(&mut state.particles);

    resolve_player(state);
    state.player.tick_timers();

    // Level countdown; an expired timer hurts once per second
    if second_elapsed {
        state.session.time_remaining = state.session.time_remaining.saturating_sub(1);
        if state.session.time_remaining == 0 {
            log::debug!("out of time");
            hurt_player(state);
        }
    }

    if level_finished(state.flagpole.as_ref(), state.exit_door.as_ref()) {
        state.complete_level();
    }

    if state.clock.phase == Phase::Running {
        if state.session.lives == 0 {
            state.end_session(EndReason::OutOfLives);
        } else if state.player.body.pos.y > KILL_PLANE_Y {
            state.end_session(EndReason::FellOutOfWorld);
        }
    }

    // Tick boundary: drop everything marked for removal
    state.enemies.retain(|e| !e.is_removable());
    state.collectibles.retain(|c| !c.collected);
}

/// Results screen: let the fireworks play out, then wait for Confirm
fn tick_results(state: &mut GameState, confirm: bool) {
    update_particles(&mut state.particles);
    state.results_ticks = state.results_ticks.saturating_sub(1);
    if state.results_ticks == 0 && confirm {
        state.advance_level();
    }
}
