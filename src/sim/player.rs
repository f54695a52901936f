//! The player-controlled actor
//!
//! Power tier (Small/Big/Fire) crossed with a damaged/invulnerable flag,
//! plus the grounded/jumping sub-state that gates jumps.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::body::PhysicsBody;
use super::collision::Side;
use super::input::{Key, KeyState};
use super::state::Session;
use crate::consts::POWERUP_SCORE;

pub const PLAYER_WIDTH: f32 = 32.0;
pub const SMALL_HEIGHT: f32 = 32.0;
pub const BIG_HEIGHT: f32 = 48.0;

pub const WALK_SPEED: f32 = 5.0;
pub const RUN_MULTIPLIER: f32 = 1.5;
pub const MAX_SPEED: f32 = 8.0;
pub const JUMP_POWER: f32 = 15.0;
pub const PLAYER_GRAVITY: f32 = 0.8;
/// Upward speed after stomping an enemy (softer than a jump)
pub const STOMP_BOUNCE: f32 = 8.0;
/// Invulnerability window after a hit (2 seconds at 60 Hz)
pub const INVULNERABILITY_TICKS: u32 = 120;
pub const KNOCKBACK_X: f32 = 8.0;
pub const KNOCKBACK_Y: f32 = 10.0;

/// Player upgrade level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum PowerTier {
    #[default]
    Small,
    Big,
    Fire,
}

impl PowerTier {
    /// One step down the ladder (Fire -> Big -> Small)
    pub fn demoted(self) -> Self {
        match self {
            PowerTier::Fire => PowerTier::Big,
            PowerTier::Big | PowerTier::Small => PowerTier::Small,
        }
    }

    pub fn height(self) -> f32 {
        match self {
            PowerTier::Small => SMALL_HEIGHT,
            PowerTier::Big | PowerTier::Fire => BIG_HEIGHT,
        }
    }

    /// Big and Fire can smash bricks
    pub fn can_break_bricks(self) -> bool {
        self != PowerTier::Small
    }
}

/// The player's actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: PhysicsBody,
    pub tier: PowerTier,
    /// Set by a jump, cleared once the apex is passed or on landing
    pub jumping: bool,
    pub running: bool,
    /// Inside the post-hit invulnerability window
    pub damaged: bool,
    pub invulnerable_ticks: u32,
    /// Walk cycle frame (cosmetic)
    pub anim_frame: u8,
    anim_timer: u8,
    world_width: f32,
}

impl Player {
    pub fn new(spawn: Vec2, world_width: f32) -> Self {
        Self {
            body: PhysicsBody::new(spawn, Vec2::new(PLAYER_WIDTH, SMALL_HEIGHT), PLAYER_GRAVITY),
            tier: PowerTier::Small,
            jumping: false,
            running: false,
            damaged: false,
            invulnerable_ticks: 0,
            anim_frame: 0,
            anim_timer: 0,
            world_width,
        }
    }

    pub fn aabb(&self) -> Aabb {
        self.body.aabb()
    }

    pub fn is_grounded(&self) -> bool {
        self.body.grounded
    }

    /// Map held keys onto horizontal velocity and trigger jumps.
    ///
    /// Returns true when a jump started this tick.
    pub fn apply_input(&mut self, keys: &KeyState) -> bool {
        self.body.vel.x = 0.0;
        self.running = false;

        let run = keys.is_held(Key::Run);
        let speed = if run {
            (WALK_SPEED * RUN_MULTIPLIER).min(MAX_SPEED)
        } else {
            WALK_SPEED
        };

        // Right is checked last so it wins when both are held
        if keys.is_held(Key::Left) {
            self.body.vel.x = -speed;
            self.body.direction = -1;
            self.running = run;
        }
        if keys.is_held(Key::Right) {
            self.body.vel.x = speed;
            self.body.direction = 1;
            self.running = run;
        }

        if keys.is_held(Key::Jump) && self.body.grounded && !self.jumping {
            self.jump();
            return true;
        }
        false
    }

    fn jump(&mut self) {
        self.body.vel.y = -JUMP_POWER;
        self.body.grounded = false;
        self.jumping = true;
    }

    /// Move one tick and keep the player inside the horizontal world span
    pub fn integrate(&mut self) {
        self.body.integrate();

        if self.body.vel.y > 0.0 {
            self.jumping = false;
        }

        let max_x = (self.world_width - self.body.size.x).max(0.0);
        if self.body.pos.x < 0.0 {
            self.body.pos.x = 0.0;
            self.body.vel.x = 0.0;
        } else if self.body.pos.x > max_x {
            self.body.pos.x = max_x;
            self.body.vel.x = 0.0;
        }
    }

    /// Resolve against one solid; multiple solids resolve independently in list order
    pub fn resolve_against(&mut self, solid: &Aabb) -> Side {
        let side = self.body.resolve_against(solid);
        if side == Side::Top {
            self.jumping = false;
        }
        side
    }

    /// Apply a hit. Returns false while invulnerable.
    ///
    /// A powered-up player drops one tier; a small player costs the session
    /// a life. Knockback applies either way.
    pub fn take_damage(&mut self, session: &mut Session) -> bool {
        if self.damaged {
            return false;
        }

        self.damaged = true;
        self.invulnerable_ticks = INVULNERABILITY_TICKS;

        if self.tier == PowerTier::Small {
            session.lose_life();
        } else {
            self.set_tier(self.tier.demoted());
        }

        self.body.vel.x = -(self.body.direction as f32) * KNOCKBACK_X;
        self.body.vel.y = -KNOCKBACK_Y;
        true
    }

    /// Small hop after landing on an enemy
    pub fn bounce_off_enemy(&mut self) {
        self.body.vel.y = -STOMP_BOUNCE;
    }

    /// Upgrade to at least Big; always awards the power-up score
    pub fn grow_big(&mut self, session: &mut Session) {
        if self.tier < PowerTier::Big {
            self.set_tier(PowerTier::Big);
        }
        session.add_score(POWERUP_SCORE);
    }

    /// Upgrade to Fire; always awards the power-up score
    pub fn get_fire_power(&mut self, session: &mut Session) {
        if self.tier < PowerTier::Fire {
            self.set_tier(PowerTier::Fire);
        }
        session.add_score(POWERUP_SCORE);
    }

    fn set_tier(&mut self, tier: PowerTier) {
        self.tier = tier;
        self.body.resize_keep_feet(tier.height());
    }

    /// Per-tick countdowns: invulnerability window and walk animation
    pub fn tick_timers(&mut self) {
        if self.damaged {
            self.invulnerable_ticks = self.invulnerable_ticks.saturating_sub(1);
            if self.invulnerable_ticks == 0 {
                self.damaged = false;
            }
        }

        let frame_len = if self.running { 4 } else { 8 };
        self.anim_timer += 1;
        if self.anim_timer >= frame_len {
            self.anim_frame = (self.anim_frame + 1) % 3;
            self.anim_timer = 0;
        }
    }

    /// Damage flicker: hidden on alternating 8-tick spans while invulnerable
    pub fn flicker_hidden(&self) -> bool {
        self.damaged && (self.invulnerable_ticks / 8) % 2 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded_player() -> Player {
        let mut player = Player::new(Vec2::new(100.0, 400.0), 2000.0);
        player.body.grounded = true;
        player
    }

    #[test]
    fn test_walk_and_run_speeds() {
        let mut player = grounded_player();
        player.apply_input(&KeyState::new().with(Key::Right));
        assert_eq!(player.body.vel.x, WALK_SPEED);
        assert_eq!(player.body.direction, 1);

        player.apply_input(&KeyState::new().with(Key::Left).with(Key::Run));
        assert_eq!(player.body.vel.x, -7.5);
        assert_eq!(player.body.direction, -1);
        assert!(player.running);

        player.apply_input(&KeyState::new());
        assert_eq!(player.body.vel.x, 0.0);
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut player = grounded_player();
        assert!(player.apply_input(&KeyState::new().with(Key::Jump)));
        assert_eq!(player.body.vel.y, -JUMP_POWER);
        assert!(!player.is_grounded());
        assert!(player.jumping);

        // Still holding jump mid-air does nothing
        let vy = player.body.vel.y;
        assert!(!player.apply_input(&KeyState::new().with(Key::Jump)));
        assert_eq!(player.body.vel.y, vy);
    }

    #[test]
    fn test_jumping_clears_after_apex() {
        let mut player = grounded_player();
        player.apply_input(&KeyState::new().with(Key::Jump));
        for _ in 0..20 {
            player.integrate();
        }
        assert!(player.body.vel.y > 0.0);
        assert!(!player.jumping);
    }

    #[test]
    fn test_small_damage_costs_one_life() {
        let mut session = Session::new(3);
        let mut player = grounded_player();

        assert!(player.take_damage(&mut session));
        assert_eq!(session.lives, 2);
        assert_eq!(player.tier, PowerTier::Small);
        assert!(player.damaged);

        // Immune during the window
        assert!(!player.take_damage(&mut session));
        assert_eq!(session.lives, 2);

        for _ in 0..INVULNERABILITY_TICKS - 1 {
            player.tick_timers();
            assert!(player.damaged);
        }
        player.tick_timers();
        assert!(!player.damaged);
    }

    #[test]
    fn test_damage_demotes_one_tier() {
        let mut session = Session::new(3);
        let mut player = grounded_player();
        player.get_fire_power(&mut session);
        assert_eq!(player.tier, PowerTier::Fire);

        player.take_damage(&mut session);
        assert_eq!(player.tier, PowerTier::Big);
        assert_eq!(session.lives, 3);

        player.damaged = false;
        player.take_damage(&mut session);
        assert_eq!(player.tier, PowerTier::Small);
        assert_eq!(player.body.size.y, SMALL_HEIGHT);
        assert_eq!(session.lives, 3);
    }

    #[test]
    fn test_knockback_opposes_facing() {
        let mut session = Session::new(3);
        let mut player = grounded_player();
        player.body.direction = 1;
        player.take_damage(&mut session);
        assert_eq!(player.body.vel, Vec2::new(-KNOCKBACK_X, -KNOCKBACK_Y));
    }

    #[test]
    fn test_upgrades_are_monotonic_but_always_score() {
        let mut session = Session::new(3);
        let mut player = grounded_player();
        let feet = player.body.bottom();

        player.get_fire_power(&mut session);
        assert_eq!(player.tier, PowerTier::Fire);
        assert_eq!(player.body.bottom(), feet);

        player.grow_big(&mut session);
        assert_eq!(player.tier, PowerTier::Fire);
        assert_eq!(session.score, 2 * POWERUP_SCORE);
    }

    #[test]
    fn test_world_clamp() {
        let mut player = Player::new(Vec2::new(2.0, 100.0), 500.0);
        player.body.vel.x = -5.0;
        player.integrate();
        assert_eq!(player.body.pos.x, 0.0);

        player.body.pos.x = 466.0;
        player.body.vel.x = 5.0;
        player.integrate();
        assert_eq!(player.body.pos.x, 500.0 - PLAYER_WIDTH);
    }
}
