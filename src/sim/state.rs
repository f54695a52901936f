//! Game state and level lifecycle
//!
//! Owns every entity arena, the session counters, the clock and the
//! outgoing event queue. Level transitions tear down and rebuild all
//! arenas; nothing from a previous level survives a load.

use std::sync::Arc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::block::{BrickBlock, QuestionBlock};
use super::clock::{Phase, SimClock};
use super::collectible::{Collectible, MushroomKind};
use super::completion::{ExitDoor, Flagpole};
use super::enemy::Enemy;
use super::input::KeyState;
use super::particle::{self, BURST_COUNT, Particle, Tint};
use super::player::Player;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::levels::{CollectibleSpawn, EnemySpawn, LevelPack, LevelProvider};
use crate::settings::Settings;

/// Results screen stays up at least this long (4 seconds)
pub const RESULTS_DELAY_TICKS: u32 = 240;

/// Counters owned by the enclosing session and read back by the HUD
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub score: u64,
    pub coins: u32,
    pub lives: u32,
    /// Seconds left on the level countdown
    pub time_remaining: u32,
    /// 1-based index of the current level
    pub level: u32,
}

impl Session {
    pub fn new(lives: u32) -> Self {
        Self {
            score: 0,
            coins: 0,
            lives,
            time_remaining: 0,
            level: 1,
        }
    }

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
    }

    pub fn add_coin(&mut self) {
        self.coins += 1;
    }

    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }
}

/// Why the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    OutOfLives,
    FellOutOfWorld,
}

/// Results of a cleared level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub level: u32,
    pub name: String,
    /// Points earned during the level, time bonus included
    pub level_score: u64,
    pub time_bonus: u64,
    /// Shown on the results screen only, never added to the score
    pub lives_bonus: u64,
}

/// Outgoing notifications for the host (audio, effects, UI)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundEffect),
    ParticleBurst { pos: Vec2, tint: Tint, count: usize },
    Fireworks { pos: Vec2 },
    LevelLoaded { level: u32, name: String },
    LevelCompleted(LevelSummary),
    SessionEnded { reason: EndReason, final_score: u64 },
    AllLevelsCleared { final_score: u64 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for the cosmetic RNG
    pub seed: u64,
    pub rng: Pcg32,
    pub session: Session,
    pub clock: SimClock,
    pub player: Player,
    pub level_name: String,
    pub world_width: f32,
    pub platforms: Vec<Aabb>,
    /// Arenas, ascending by id
    pub enemies: Vec<Enemy>,
    pub question_blocks: Vec<QuestionBlock>,
    pub brick_blocks: Vec<BrickBlock>,
    pub collectibles: Vec<Collectible>,
    pub particles: Vec<Particle>,
    pub flagpole: Option<Flagpole>,
    pub exit_door: Option<ExitDoor>,
    /// Particle cap (from settings)
    pub max_particles: usize,
    /// Score when the current level began
    pub level_start_score: u64,
    /// Filled in by `complete_level`
    pub summary: Option<LevelSummary>,
    /// Ticks before the results screen accepts Confirm
    pub results_ticks: u32,
    /// Keys held on the previous tick (edge detection)
    pub prev_keys: KeyState,
    events: Vec<GameEvent>,
    levels: Arc<dyn LevelProvider>,
    next_id: u32,
}

impl GameState {
    /// New session on the first level of `levels`, waiting in `Ready`
    pub fn new(levels: Arc<dyn LevelProvider>, seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            session: Session::new(STARTING_LIVES),
            clock: SimClock::new(),
            player: Player::new(Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y), VIEW_WIDTH),
            level_name: String::new(),
            world_width: VIEW_WIDTH,
            platforms: Vec::new(),
            enemies: Vec::new(),
            question_blocks: Vec::new(),
            brick_blocks: Vec::new(),
            collectibles: Vec::new(),
            particles: Vec::new(),
            flagpole: None,
            exit_door: None,
            max_particles: Settings::default().max_particles(),
            level_start_score: 0,
            summary: None,
            results_ticks: 0,
            prev_keys: KeyState::new(),
            events: Vec::new(),
            levels,
            next_id: 1,
        };
        state.load_level(1);
        state
    }

    /// New session on the stock levels
    pub fn with_builtin_levels(seed: u64) -> Self {
        Self::new(Arc::new(LevelPack::builtin()), seed)
    }

    /// Take the particle cap from player settings; excess particles are dropped oldest first
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.max_particles = settings.max_particles();
        let excess = self.particles.len().saturating_sub(self.max_particles);
        self.particles.drain(..excess);
    }

    pub fn levels(&self) -> &dyn LevelProvider {
        self.levels.as_ref()
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Leave `Ready` and start the clock
    pub fn start(&mut self) {
        self.clock.start();
    }

    pub fn phase(&self) -> Phase {
        self.clock.phase
    }

    /// Tear down the current level and build level `index` (1-based)
    pub fn load_level(&mut self, index: u32) {
        let total = self.levels.total_levels();
        let index = if (1..=total).contains(&index) { index } else { 1 };
        let level = self.levels.level(index);

        self.enemies.clear();
        self.question_blocks.clear();
        self.brick_blocks.clear();
        self.collectibles.clear();
        self.particles.clear();
        self.next_id = 1;

        self.level_name = level.name.clone();
        self.world_width = level.world_width;
        self.platforms = level.platforms.clone();

        for spawn in &level.enemies {
            let id = self.next_entity_id();
            let enemy = match *spawn {
                EnemySpawn::Goomba { x, y } => Enemy::goomba(id, Vec2::new(x, y)),
                EnemySpawn::Koopa { x, y, color } => Enemy::koopa(id, Vec2::new(x, y), color),
                EnemySpawn::Piranha { x, y } => Enemy::piranha(id, Vec2::new(x, y)),
            };
            self.enemies.push(enemy);
        }
        for spawn in &level.collectibles {
            let id = self.next_entity_id();
            let collectible = match *spawn {
                CollectibleSpawn::Coin { x, y } => Collectible::coin(id, Vec2::new(x, y)),
                CollectibleSpawn::Mushroom { x, y } => {
                    Collectible::mushroom(id, Vec2::new(x, y), MushroomKind::Super)
                }
                CollectibleSpawn::FireMushroom { x, y } => {
                    Collectible::mushroom(id, Vec2::new(x, y), MushroomKind::Fire)
                }
            };
            self.collectibles.push(collectible);
        }
        for spawn in &level.question_blocks {
            let id = self.next_entity_id();
            self.question_blocks
                .push(QuestionBlock::new(id, spawn.x, spawn.y, spawn.contents));
        }
        for spawn in &level.brick_blocks {
            let id = self.next_entity_id();
            self.brick_blocks.push(BrickBlock::new(id, spawn.x, spawn.y));
        }
        self.flagpole = level.flagpole.map(|f| Flagpole::new(f.x, f.y));
        self.exit_door = level.exit_door.map(|d| ExitDoor::new(d.x, d.y, d.kind));

        self.player = Player::new(Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y), level.world_width);
        self.clock.reset();
        self.session.level = index;
        self.session.time_remaining = level.time_limit;
        self.level_start_score = self.session.score;
        self.summary = None;
        self.results_ticks = 0;

        log::info!(
            "Level {index} - {} loaded: {} platforms, {} enemies, {} collectibles",
            level.name,
            self.platforms.len(),
            self.enemies.len(),
            self.collectibles.len()
        );
        self.emit(GameEvent::LevelLoaded {
            level: index,
            name: level.name,
        });
    }

    /// Move on to the next level, or finish the game after the last one
    pub fn advance_level(&mut self) {
        let next = self.session.level + 1;
        if next > self.levels.total_levels() {
            log::info!("All levels cleared, final score {}", self.session.score);
            self.clock.stop(Phase::GameComplete);
            self.emit(GameEvent::AllLevelsCleared {
                final_score: self.session.score,
            });
            return;
        }
        self.load_level(next);
        self.clock.start();
    }

    /// Fresh session from level 1
    /// Fresh session on level 1; the cosmetic RNG restarts from the seed so
    /// a reset run replays exactly like a new one
    pub fn reset(&mut self) {
        log::info!("Session reset (seed {})", self.seed);
        self.session = Session::new(STARTING_LIVES);
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.load_level(1);
    }

    /// Close out the level: stop the clock, award the time bonus and post the
    /// summary. Only the first call has any effect.
    pub fn complete_level(&mut self) {
        if self.summary.is_some() {
            return;
        }

        let time_bonus = self.session.time_remaining as u64 * TIME_BONUS_PER_SECOND;
        self.session.add_score(time_bonus);

        let summary = LevelSummary {
            level: self.session.level,
            name: self.level_name.clone(),
            level_score: self.session.score.saturating_sub(self.level_start_score),
            time_bonus,
            lives_bonus: self.session.lives as u64 * LIVES_BONUS_PER_LIFE,
        };
        log::info!(
            "Level {} complete: {} points (time bonus {})",
            summary.level,
            summary.level_score,
            summary.time_bonus
        );

        self.clock.stop(Phase::LevelComplete);
        self.results_ticks = RESULTS_DELAY_TICKS;
        self.summary = Some(summary.clone());
        self.emit(GameEvent::LevelCompleted(summary));
    }

    /// Terminal failure; reported once
    pub fn end_session(&mut self, reason: EndReason) {
        if self.clock.phase == Phase::GameOver {
            return;
        }
        log::info!("Game over ({reason:?}), final score {}", self.session.score);
        self.clock.stop(Phase::GameOver);
        self.play(SoundEffect::GameOver);
        self.emit(GameEvent::SessionEnded {
            reason,
            final_score: self.session.score,
        });
    }

    /// Platforms plus every block still standing
    pub fn solids(&self) -> Vec<Aabb> {
        let mut solids = Vec::with_capacity(
            self.platforms.len() + self.question_blocks.len() + self.brick_blocks.len(),
        );
        solids.extend_from_slice(&self.platforms);
        solids.extend(self.question_blocks.iter().map(|b| b.rect));
        solids.extend(self.brick_blocks.iter().filter_map(BrickBlock::solid));
        solids
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn play(&mut self, sound: SoundEffect) {
        self.emit(GameEvent::Sound(sound));
    }

    /// Spark burst plus its notification
    pub fn burst(&mut self, pos: Vec2, tint: Tint) {
        particle::spawn_burst(
            &mut self.particles,
            &mut self.rng,
            pos,
            tint,
            BURST_COUNT,
            self.max_particles,
        );
        self.emit(GameEvent::ParticleBurst {
            pos,
            tint,
            count: BURST_COUNT,
        });
    }

    pub fn fireworks(&mut self, pos: Vec2) {
        particle::spawn_fireworks(&mut self.particles, &mut self.rng, pos, self.max_particles);
        self.emit(GameEvent::Fireworks { pos });
    }

    pub fn score_popup(&mut self, pos: Vec2, value: u64) {
        particle::spawn_score_popup(&mut self.particles, pos, value, self.max_particles);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Hand queued events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_loads_first_level() {
        let state = GameState::with_builtin_levels(1);
        assert_eq!(state.phase(), Phase::Ready);
        assert_eq!(state.session.level, 1);
        assert_eq!(state.session.time_remaining, 400);
        assert_eq!(state.session.lives, STARTING_LIVES);
        assert_eq!(state.level_name, "Green Hill");
        assert_eq!(state.enemies.len(), 3);
        assert_eq!(state.collectibles.len(), 4);
        assert!(state.flagpole.is_some());
        assert_eq!(state.player.body.pos, Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y));
    }

    #[test]
    fn test_load_level_rebuilds_everything() {
        let mut state = GameState::with_builtin_levels(1);
        state.enemies[0].dead = true;
        state.collectibles.clear();
        state.session.score = 700;

        state.load_level(2);
        assert_eq!(state.session.level, 2);
        assert_eq!(state.level_name, "Underground Caves");
        assert_eq!(state.enemies.len(), 5);
        assert!(state.enemies.iter().all(Enemy::is_alive));
        assert_eq!(state.collectibles.len(), 6);
        assert_eq!(state.session.time_remaining, 350);
        assert_eq!(state.session.score, 700);
        assert_eq!(state.level_start_score, 700);

        let ids: Vec<u32> = state.enemies.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_out_of_range_level_loads_first() {
        let mut state = GameState::with_builtin_levels(1);
        state.load_level(42);
        assert_eq!(state.session.level, 1);
        assert_eq!(state.level_name, "Green Hill");
    }

    #[test]
    fn test_complete_level_once() {
        let mut state = GameState::with_builtin_levels(1);
        state.start();
        state.session.score = 1000;
        state.level_start_score = 400;
        state.session.time_remaining = 100;
        state.drain_events();

        state.complete_level();
        state.complete_level();

        assert_eq!(state.session.score, 1000 + 100 * TIME_BONUS_PER_SECOND);
        assert_eq!(state.phase(), Phase::LevelComplete);
        let summary = state.summary.clone().unwrap();
        assert_eq!(summary.level_score, 600 + 5000);
        assert_eq!(summary.lives_bonus, 3 * LIVES_BONUS_PER_LIFE);

        let completions = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::LevelCompleted(_)))
            .count();
        assert_eq!(completions, 1);
    }

    #[test]
    fn test_advance_past_last_level_completes_game() {
        let mut state = GameState::with_builtin_levels(1);
        state.load_level(3);
        state.advance_level();
        assert_eq!(state.phase(), Phase::GameComplete);
        assert!(
            state
                .events()
                .iter()
                .any(|e| matches!(e, GameEvent::AllLevelsCleared { .. }))
        );
    }

    #[test]
    fn test_advance_starts_next_level_running() {
        let mut state = GameState::with_builtin_levels(1);
        state.advance_level();
        assert_eq!(state.session.level, 2);
        assert_eq!(state.phase(), Phase::Running);
    }

    #[test]
    fn test_reset_restores_session() {
        let mut state = GameState::with_builtin_levels(1);
        state.load_level(3);
        state.session.score = 9000;
        state.session.lives = 1;
        state.session.coins = 12;
        state.reset();
        assert_eq!(state.session, Session {
            score: 0,
            coins: 0,
            lives: STARTING_LIVES,
            time_remaining: 400,
            level: 1,
        });
    }

    #[test]
    fn test_session_end_reported_once() {
        let mut state = GameState::with_builtin_levels(1);
        state.start();
        state.drain_events();
        state.end_session(EndReason::OutOfLives);
        state.end_session(EndReason::FellOutOfWorld);
        let events = state.drain_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], GameEvent::Sound(SoundEffect::GameOver));
        assert!(matches!(
            events[1],
            GameEvent::SessionEnded {
                reason: EndReason::OutOfLives,
                ..
            }
        ));
    }

    #[test]
    fn test_broken_bricks_are_not_solid() {
        let mut state = GameState::with_builtin_levels(1);
        let before = state.solids().len();
        state.brick_blocks[0].broken = true;
        assert_eq!(state.solids().len(), before - 1);
    }

    #[test]
    fn test_apply_settings_trims_particles() {
        let mut state = GameState::with_builtin_levels(1);
        for _ in 0..4 {
            state.burst(Vec2::new(100.0, 100.0), Tint::Gold);
        }
        assert_eq!(state.particles.len(), 24);

        let low = Settings {
            particles: false,
            ..Default::default()
        };
        state.apply_settings(&low);
        assert!(state.particles.is_empty());
        state.burst(Vec2::new(100.0, 100.0), Tint::Gold);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_reset_replays_cosmetic_rng() {
        let mut fresh = GameState::with_builtin_levels(42);
        let mut replay = GameState::with_builtin_levels(42);
        replay.burst(Vec2::new(10.0, 10.0), Tint::Gold);
        replay.reset();

        fresh.burst(Vec2::new(300.0, 200.0), Tint::Red);
        replay.burst(Vec2::new(300.0, 200.0), Tint::Red);
        let a: Vec<Vec2> = fresh.particles.iter().map(|p| p.vel).collect();
        let b: Vec<Vec2> = replay.particles.iter().map(|p| p.vel).collect();
        assert_eq!(a, b);
    }
}
