//! Per-tick interaction pass
//!
//! Player contacts resolve in a fixed order: platforms, bricks, question
//! blocks, enemies, collectibles, flagpole, exit door. Within each group
//! targets resolve in list order and a later resolution may override an
//! earlier one in the same tick.

use glam::Vec2;

use super::block::BlockContents;
use super::collectible::{Collectible, CollectibleKind, MushroomKind};
use super::collision::{Side, overlaps};
use super::enemy::DamageSource;
use super::particle::Tint;
use super::player::PowerTier;
use super::state::GameState;
use crate::audio::SoundEffect;
use crate::consts::*;

/// Run every player interaction group in order
pub fn resolve_player(state: &mut GameState) {
    resolve_platforms(state);
    resolve_bricks(state);
    resolve_question_blocks(state);
    resolve_enemies(state);
    resolve_collectibles(state);
    resolve_flagpole(state);
    resolve_exit_door(state);
}

fn resolve_platforms(state: &mut GameState) {
    for platform in &state.platforms {
        state.player.resolve_against(platform);
    }
}

fn resolve_bricks(state: &mut GameState) {
    for i in 0..state.brick_blocks.len() {
        let Some(rect) = state.brick_blocks[i].solid() else {
            continue;
        };
        if state.player.resolve_against(&rect) != Side::Bottom {
            continue;
        }
        if state.brick_blocks[i].hit(state.player.tier) {
            log::debug!("brick {} broken", state.brick_blocks[i].id);
            state.session.add_score(BRICK_SCORE);
            state.burst(rect.center(), Tint::Brown);
            state.play(SoundEffect::BrickBreak);
        }
    }
}

fn resolve_question_blocks(state: &mut GameState) {
    for i in 0..state.question_blocks.len() {
        let rect = state.question_blocks[i].rect;
        if state.player.resolve_against(&rect) != Side::Bottom {
            continue;
        }
        match state.question_blocks[i].hit() {
            Some(BlockContents::Coin) => {
                state.session.add_coin();
                state.session.add_score(COIN_SCORE);
                state.burst(Vec2::new(rect.center().x, rect.top()), Tint::Gold);
                state.play(SoundEffect::Coin);
            }
            Some(contents) => {
                let kind = if contents == BlockContents::Fire {
                    MushroomKind::Fire
                } else {
                    MushroomKind::Super
                };
                let id = state.next_entity_id();
                let pos = Vec2::new(rect.x, rect.y - BLOCK_ITEM_RISE);
                log::debug!("question block spawned {kind:?} mushroom {id}");
                state.collectibles.push(Collectible::mushroom(id, pos, kind));
            }
            None => {}
        }
    }
}

/// Items pop out this far above their block
const BLOCK_ITEM_RISE: f32 = 32.0;

fn resolve_enemies(state: &mut GameState) {
    for i in 0..state.enemies.len() {
        let enemy = &state.enemies[i];
        if !enemy.is_touchable() {
            continue;
        }
        let player_box = state.player.aabb();
        let enemy_box = enemy.aabb();
        if !overlaps(&player_box, &enemy_box) {
            continue;
        }

        let stomp = state.player.body.vel.y > 0.0 && player_box.top() < enemy_box.top();
        let tier = state.player.tier;

        if stomp && !(enemy.is_spiky() && tier != PowerTier::Fire) {
            let outcome = state.enemies[i].take_damage(DamageSource::Stomp { tier });
            state.player.bounce_off_enemy();
            if outcome.took_effect() {
                state.session.add_score(STOMP_SCORE);
                state.burst(enemy_box.center(), Tint::Gold);
                state.play(SoundEffect::EnemyDefeat);
                state.score_popup(Vec2::new(enemy_box.x, enemy_box.y), STOMP_SCORE);
            }
            continue;
        }

        // Stomping a plant without fire power lands on its teeth
        if stomp || enemy.harms_on_contact() {
            hurt_player(state);
        }
    }
}

/// Damage the player unless the invulnerability window is open
pub fn hurt_player(state: &mut GameState) {
    if state.player.take_damage(&mut state.session) {
        log::debug!(
            "player hit: tier {:?}, lives {}",
            state.player.tier,
            state.session.lives
        );
        state.play(SoundEffect::Damage);
    }
}

fn resolve_collectibles(state: &mut GameState) {
    let player_box = state.player.aabb();
    for i in 0..state.collectibles.len() {
        let item = &mut state.collectibles[i];
        if item.collected || !overlaps(&player_box, &item.aabb()) {
            continue;
        }
        item.collected = true;
        let center = item.aabb().center();
        let kind = item.kind;

        match kind {
            CollectibleKind::Coin => {
                state.session.add_coin();
                state.session.add_score(COIN_SCORE);
                state.burst(center, Tint::Gold);
                state.play(SoundEffect::Coin);
            }
            CollectibleKind::Mushroom(kind) => {
                match kind {
                    MushroomKind::Super => state.player.grow_big(&mut state.session),
                    MushroomKind::Fire => state.player.get_fire_power(&mut state.session),
                }
                state.burst(center, Tint::Green);
                state.play(SoundEffect::Powerup);
            }
        }
    }
}

fn resolve_flagpole(state: &mut GameState) {
    let player_box = state.player.aabb();
    let Some(pole) = state.flagpole.as_mut() else {
        return;
    };
    if !overlaps(&player_box, &pole.rect) {
        return;
    }
    let Some(bonus) = pole.activate(player_box.top()) else {
        return;
    };
    let origin = pole.fireworks_origin();
    let popup = Vec2::new(pole.rect.x, player_box.top());

    log::info!("Flagpole reached, bonus {bonus}");
    state.session.add_score(bonus);
    state.play(SoundEffect::LevelComplete);
    state.fireworks(origin);
    state.score_popup(popup, bonus);
}

fn resolve_exit_door(state: &mut GameState) {
    let player_box = state.player.aabb();
    let flag_done = state.flagpole.as_ref().is_none_or(|f| f.is_complete());
    let Some(door) = state.exit_door.as_mut() else {
        return;
    };
    if !overlaps(&player_box, &door.rect) || !door.activate(flag_done) {
        return;
    }

    log::info!("Exit reached, bonus {EXIT_DOOR_BONUS}");
    state.session.add_score(EXIT_DOOR_BONUS);
    state.play(SoundEffect::LevelComplete);
}

/// Kicked shells take out every other live enemy they touch
pub fn resolve_shells(state: &mut GameState) {
    let shells: Vec<(u32, _)> = state
        .enemies
        .iter()
        .filter(|e| e.is_kicked_shell())
        .map(|e| (e.id, e.aabb()))
        .collect();

    for (shell_id, shell_box) in shells {
        for i in 0..state.enemies.len() {
            let target = &state.enemies[i];
            if target.id == shell_id || !target.is_touchable() {
                continue;
            }
            if !overlaps(&shell_box, &target.aabb()) {
                continue;
            }
            let center = target.aabb().center();
            if state.enemies[i].take_damage(DamageSource::Shell).took_effect() {
                log::debug!("shell {shell_id} took out enemy {}", state.enemies[i].id);
                state.session.add_score(STOMP_SCORE);
                state.burst(center, Tint::Gold);
                state.play(SoundEffect::EnemyDefeat);
            }
        }
    }
}
