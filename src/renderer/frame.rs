//! Render snapshot
//!
//! A `Frame` is a pure read of the game state: camera, HUD numbers and
//! one sprite per visible entity in draw order. Hosts either consume the
//! sprites directly or ask for a flat triangle list via `vertices()`.

use glam::Vec2;
use serde::Serialize;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::aabb::Aabb;
use crate::sim::clock::Phase;
use crate::sim::collectible::{CollectibleKind, MushroomKind};
use crate::sim::completion::{ExitKind, FLAGPOLE_WIDTH};
use crate::sim::enemy::{EnemyKind, KoopaColor, PlantCycle, ShellState};
use crate::sim::particle::{ParticleKind, Tint};
use crate::sim::player::PowerTier;
use crate::sim::state::{GameState, LevelSummary};

const FLAG_SIZE: Vec2 = Vec2::new(32.0, 24.0);
const COIN_SEGMENTS: u32 = 12;

/// Horizontal scroll: the player is kept a third of the way into the view
pub fn camera_x(player_x: f32) -> f32 {
    (player_x - VIEW_WIDTH / 3.0).max(0.0)
}

/// Numbers shown in the HUD strip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub coins: u32,
    pub lives: u32,
    pub time_remaining: u32,
    pub level: u32,
    pub level_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SpriteKind {
    Platform,
    Brick,
    QuestionBlock { used: bool },
    Flagpole,
    Flag,
    Exit(ExitKind),
    Coin,
    Mushroom(MushroomKind),
    Goomba { squished: bool },
    Koopa { color: KoopaColor, shell: ShellState },
    Piranha,
    Player { tier: PowerTier },
}

/// One drawable entity in world space
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub rect: Aabb,
    /// -1 facing left, 1 facing right
    pub facing: i8,
    /// Animation frame
    pub frame: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleSprite {
    pub pos: Vec2,
    pub size: f32,
    pub tint: Tint,
    pub alpha: f32,
    /// Firework trail, oldest first
    pub trail: Vec<Vec2>,
    /// Score popup text value
    pub popup: Option<u64>,
}

/// Everything a host needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Background the host clears to before drawing
    pub clear_color: [f32; 4],
    pub camera_x: f32,
    pub phase: Phase,
    pub hud: Hud,
    pub sprites: Vec<Sprite>,
    pub particles: Vec<ParticleSprite>,
    /// Shown on the results screen
    pub results: Option<LevelSummary>,
}

impl Frame {
    /// Snapshot with default settings
    pub fn capture(state: &GameState) -> Self {
        Self::capture_with(state, &Settings::default())
    }

    pub fn capture_with(state: &GameState, settings: &Settings) -> Self {
        let player = &state.player;
        let mut sprites = Vec::new();

        for rect in &state.platforms {
            sprites.push(still(SpriteKind::Platform, *rect));
        }
        for brick in state.brick_blocks.iter().filter(|b| !b.broken) {
            let rect = brick.rect.translated(Vec2::new(0.0, brick.bounce_offset()));
            sprites.push(still(SpriteKind::Brick, rect));
        }
        for block in &state.question_blocks {
            let rect = block.rect.translated(Vec2::new(0.0, block.bounce_offset()));
            sprites.push(still(SpriteKind::QuestionBlock { used: block.used }, rect));
        }

        if let Some(pole) = &state.flagpole {
            sprites.push(still(SpriteKind::Flagpole, pole.rect));
            let flag = Aabb::new(
                pole.rect.left() + FLAGPOLE_WIDTH,
                pole.flag_y,
                FLAG_SIZE.x,
                FLAG_SIZE.y,
            );
            sprites.push(still(SpriteKind::Flag, flag));
        }
        if let Some(door) = &state.exit_door {
            sprites.push(still(SpriteKind::Exit(door.kind), door.rect));
        }

        for item in &state.collectibles {
            let kind = match item.kind {
                CollectibleKind::Coin => SpriteKind::Coin,
                CollectibleKind::Mushroom(kind) => SpriteKind::Mushroom(kind),
            };
            sprites.push(Sprite {
                kind,
                rect: item.aabb(),
                facing: item.body.direction,
                frame: 0,
            });
        }

        for enemy in &state.enemies {
            let kind = match &enemy.kind {
                EnemyKind::Goomba => SpriteKind::Goomba { squished: enemy.dead },
                EnemyKind::Koopa { color, shell, .. } => SpriteKind::Koopa {
                    color: *color,
                    shell: *shell,
                },
                EnemyKind::Piranha { cycle, .. } => {
                    if *cycle == PlantCycle::Hidden || enemy.dead {
                        continue;
                    }
                    SpriteKind::Piranha
                }
            };
            sprites.push(Sprite {
                kind,
                rect: enemy.aabb(),
                facing: enemy.body.direction,
                frame: enemy.anim_frame,
            });
        }

        if settings.reduced_motion || !player.flicker_hidden() {
            sprites.push(Sprite {
                kind: SpriteKind::Player { tier: player.tier },
                rect: player.aabb(),
                facing: player.body.direction,
                frame: player.anim_frame,
            });
        }

        let particles = if settings.particles {
            state
                .particles
                .iter()
                .map(|p| ParticleSprite {
                    pos: p.pos,
                    size: p.size,
                    tint: p.tint,
                    alpha: p.alpha(),
                    trail: match &p.kind {
                        ParticleKind::Firework { trail } => trail.clone(),
                        _ => Vec::new(),
                    },
                    popup: match p.kind {
                        ParticleKind::ScorePopup { value } => Some(value),
                        _ => None,
                    },
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            clear_color: colors::SKY,
            camera_x: camera_x(player.body.pos.x),
            phase: state.phase(),
            hud: Hud {
                score: state.session.score,
                coins: state.session.coins,
                lives: state.session.lives,
                time_remaining: state.session.time_remaining,
                level: state.session.level,
                level_name: state.level_name.clone(),
            },
            sprites,
            particles,
            results: state.summary.clone(),
        }
    }

    /// Whether a world-space rect intersects the viewport
    pub fn is_visible(&self, rect: &Aabb) -> bool {
        rect.right() > self.camera_x && rect.left() < self.camera_x + VIEW_WIDTH
    }

    /// Flat triangle list in screen pixels, culled to the viewport.
    /// Popup text is left to the host.
    pub fn vertices(&self) -> Vec<Vertex> {
        let mut out = Vec::new();

        for sprite in self.sprites.iter().filter(|s| self.is_visible(&s.rect)) {
            let color = sprite_color(sprite.kind);
            match sprite.kind {
                SpriteKind::Coin => {
                    let radius = sprite.rect.width.min(sprite.rect.height) * 0.5;
                    shapes::disc(&mut out, sprite.rect.center(), radius, self.camera_x, color, COIN_SEGMENTS);
                }
                _ => shapes::rect(&mut out, &sprite.rect, self.camera_x, color),
            }
        }

        for p in self.particles.iter().filter(|p| p.popup.is_none()) {
            let color = shapes::faded(tint_color(p.tint), p.alpha);
            shapes::trail(&mut out, &p.trail, p.size, self.camera_x, color);
            let half = p.size * 0.5;
            let square = Aabb::new(p.pos.x - half, p.pos.y - half, p.size, p.size);
            shapes::rect(&mut out, &square, self.camera_x, color);
        }

        out
    }

    /// `vertices()` as raw bytes, ready for a vertex buffer of stride `Vertex::STRIDE`
    pub fn vertex_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.vertices()).to_vec()
    }
}

fn still(kind: SpriteKind, rect: Aabb) -> Sprite {
    Sprite {
        kind,
        rect,
        facing: 1,
        frame: 0,
    }
}

pub fn sprite_color(kind: SpriteKind) -> [f32; 4] {
    match kind {
        SpriteKind::Platform => colors::GROUND,
        SpriteKind::Brick => colors::BRICK,
        SpriteKind::QuestionBlock { used: false } => colors::QUESTION,
        SpriteKind::QuestionBlock { used: true } => colors::QUESTION_USED,
        SpriteKind::Flagpole => colors::POLE,
        SpriteKind::Flag => colors::FLAG,
        SpriteKind::Exit(ExitKind::Door) => colors::DOOR,
        SpriteKind::Exit(ExitKind::Pipe) => colors::PIPE,
        SpriteKind::Exit(ExitKind::Portal) => colors::PORTAL,
        SpriteKind::Coin => colors::COIN,
        SpriteKind::Mushroom(MushroomKind::Super) => colors::MUSHROOM_SUPER,
        SpriteKind::Mushroom(MushroomKind::Fire) => colors::MUSHROOM_FIRE,
        SpriteKind::Goomba { .. } => colors::GOOMBA,
        SpriteKind::Koopa {
            color: KoopaColor::Green,
            ..
        } => colors::KOOPA_GREEN,
        SpriteKind::Koopa {
            color: KoopaColor::Red,
            ..
        } => colors::KOOPA_RED,
        SpriteKind::Piranha => colors::PIRANHA,
        SpriteKind::Player {
            tier: PowerTier::Fire,
        } => colors::PLAYER_FIRE,
        SpriteKind::Player { .. } => colors::PLAYER_SMALL,
    }
}

pub fn tint_color(tint: Tint) -> [f32; 4] {
    match tint {
        Tint::Gold => colors::GOLD,
        Tint::Brown => colors::BROWN,
        Tint::Green => colors::GREEN,
        Tint::Red => colors::RED,
        Tint::Blue => colors::BLUE,
        Tint::Magenta => colors::MAGENTA,
        Tint::Cyan => colors::CYAN,
        Tint::White => colors::WHITE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::Enemy;

    fn count(frame: &Frame, pred: impl Fn(&SpriteKind) -> bool) -> usize {
        frame.sprites.iter().filter(|s| pred(&s.kind)).count()
    }

    #[test]
    fn test_camera_follows_player() {
        assert_eq!(camera_x(100.0), 0.0);
        assert_eq!(camera_x(400.0), 0.0);
        assert_eq!(camera_x(1000.0), 600.0);
    }

    #[test]
    fn test_capture_hud_and_player() {
        let state = GameState::with_builtin_levels(7);
        let frame = Frame::capture(&state);
        assert_eq!(frame.camera_x, 0.0);
        assert_eq!(frame.phase, Phase::Ready);
        assert_eq!(frame.hud.level, 1);
        assert_eq!(frame.hud.lives, STARTING_LIVES);
        assert_eq!(frame.hud.level_name, state.level_name);
        assert_eq!(
            count(&frame, |k| matches!(k, SpriteKind::Player { tier: PowerTier::Small })),
            1
        );
        assert!(frame.results.is_none());
    }

    #[test]
    fn test_broken_bricks_not_drawn() {
        let mut state = GameState::with_builtin_levels(7);
        let bricks = state.brick_blocks.len();
        assert!(bricks > 0);
        state.brick_blocks[0].broken = true;
        let frame = Frame::capture(&state);
        assert_eq!(count(&frame, |k| *k == SpriteKind::Brick), bricks - 1);
    }

    #[test]
    fn test_hidden_plant_not_drawn() {
        let mut state = GameState::with_builtin_levels(7);
        state.enemies.clear();
        let id = state.next_entity_id();
        state.enemies.push(Enemy::piranha(id, Vec2::new(300.0, 400.0)));
        let frame = Frame::capture(&state);
        assert_eq!(count(&frame, |k| *k == SpriteKind::Piranha), 0);
    }

    #[test]
    fn test_damage_flicker_respects_reduced_motion() {
        let mut state = GameState::with_builtin_levels(7);
        state.player.damaged = true;
        state.player.invulnerable_ticks = 8;
        assert!(state.player.flicker_hidden());

        let is_player = |k: &SpriteKind| matches!(k, SpriteKind::Player { .. });
        assert_eq!(count(&Frame::capture(&state), is_player), 0);

        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert_eq!(count(&Frame::capture_with(&state, &settings), is_player), 1);
    }

    #[test]
    fn test_particles_toggle() {
        let mut state = GameState::with_builtin_levels(7);
        state.burst(Vec2::new(200.0, 200.0), Tint::Gold);
        assert_eq!(Frame::capture(&state).particles.len(), 6);

        let settings = Settings {
            particles: false,
            ..Default::default()
        };
        assert!(Frame::capture_with(&state, &settings).particles.is_empty());
    }

    #[test]
    fn test_vertices_culled_to_view() {
        let mut state = GameState::with_builtin_levels(7);
        state.platforms = vec![
            Aabb::new(0.0, 500.0, 100.0, 40.0),
            Aabb::new(5000.0, 500.0, 100.0, 40.0),
        ];
        state.brick_blocks.clear();
        state.question_blocks.clear();
        state.collectibles.clear();
        state.enemies.clear();
        state.flagpole = None;
        state.exit_door = None;

        let frame = Frame::capture(&state);
        // One platform plus the player
        assert_eq!(frame.vertices().len(), 2 * 6);
        assert_eq!(frame.vertex_bytes().len(), 2 * 6 * Vertex::STRIDE);
        assert_eq!(frame.clear_color, colors::SKY);
    }
}
