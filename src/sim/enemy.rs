//! Enemy state machines
//!
//! A closed set of variants sharing one physics body and one capability
//! surface (`update`, `take_damage`, `is_alive`). The variant sub-state is
//! only ever written from inside this module; the interaction pass calls
//! `take_damage` and reads the result.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::body::PhysicsBody;
use super::collision::Side;
use super::player::PowerTier;
use crate::consts::KILL_PLANE_Y;

pub const ENEMY_GRAVITY: f32 = 0.8;

pub const GOOMBA_SIZE: Vec2 = Vec2::new(24.0, 24.0);
pub const GOOMBA_SPEED: f32 = 1.0;
pub const GOOMBA_SQUISHED_HEIGHT: f32 = 12.0;
/// Squished goombas linger this long before removal (500 ms)
pub const GOOMBA_SQUISH_TICKS: u32 = 30;
/// Ground probe offsets: ahead of the leading edge, and below the feet
pub const LEDGE_PROBE_AHEAD: f32 = 5.0;
pub const LEDGE_PROBE_BELOW: f32 = 10.0;

pub const KOOPA_SIZE: Vec2 = Vec2::new(24.0, 32.0);
pub const KOOPA_SPEED: f32 = 1.5;
pub const KOOPA_SHELL_HEIGHT: f32 = 16.0;
pub const KOOPA_KICK_SPEED: f32 = 8.0;
/// Re-emerge countdown once shelled (5 seconds)
pub const KOOPA_SHELL_TICKS: u32 = 300;
/// A freshly kicked shell can't hurt anyone who is still touching it
pub const KICK_GRACE_TICKS: u32 = 10;

pub const PIRANHA_SIZE: Vec2 = Vec2::new(24.0, 32.0);
/// Distance the head travels out of the pipe
pub const PIRANHA_RISE: f32 = 48.0;
pub const PIRANHA_HIDDEN_TICKS: u32 = 60;
pub const PIRANHA_EMERGE_TICKS: u32 = 60;
pub const PIRANHA_EXPOSED_TICKS: u32 = 120;
pub const PIRANHA_RETREAT_TICKS: u32 = 60;
/// Player closer than this (horizontally) keeps the plant in its pipe
pub const PIRANHA_PROXIMITY: f32 = 50.0;
/// Only the first ticks of an emergence can still be cancelled
pub const PIRANHA_EARLY_EMERGE_TICKS: u32 = 30;

/// Koopa shell sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShellState {
    Walking,
    Shelled,
    Kicked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KoopaColor {
    #[default]
    Green,
    Red,
}

/// Piranha plant emergence cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlantCycle {
    Hidden,
    Emerging,
    Exposed,
    Retreating,
}

/// Variant tag plus variant-specific sub-state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    Goomba,
    Koopa {
        color: KoopaColor,
        shell: ShellState,
        /// Ticks left before a stationary shell re-emerges
        shell_timer: u32,
    },
    Piranha {
        cycle: PlantCycle,
        /// Ticks left in the current cycle phase
        cycle_timer: u32,
        /// Head position while fully retracted
        pipe_y: f32,
        /// Head position while fully exposed
        max_height: f32,
    },
}

/// What dealt the damage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    /// Player landed on top
    Stomp { tier: PowerTier },
    /// A kicked shell ran into it
    Shell,
}

/// Effect of a `take_damage` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Nothing changed
    Immune,
    /// State changed but the enemy lives on (koopa shell transitions)
    Stunned,
    /// The enemy is dead
    Defeated,
}

impl DamageOutcome {
    pub fn took_effect(self) -> bool {
        self != DamageOutcome::Immune
    }
}

/// World data an enemy may read during its update
#[derive(Debug, Clone, Copy)]
pub struct EnemyContext<'a> {
    /// Platforms and intact blocks
    pub solids: &'a [Aabb],
    pub world_width: f32,
    pub player_x: f32,
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub body: PhysicsBody,
    pub kind: EnemyKind,
    pub dead: bool,
    /// Grace ticks left before a dead enemy leaves the active set
    pub removal_ticks: u32,
    /// Ticks left before a freshly kicked shell turns lethal
    pub kick_grace: u32,
    pub anim_frame: u8,
    anim_timer: u8,
}

impl Enemy {
    fn with_kind(id: u32, pos: Vec2, size: Vec2, gravity: f32, speed: f32, kind: EnemyKind) -> Self {
        let mut body = PhysicsBody::new(pos, size, gravity);
        body.direction = -1;
        body.vel.x = -speed;
        Self {
            id,
            body,
            kind,
            dead: false,
            removal_ticks: 0,
            kick_grace: 0,
            anim_frame: 0,
            anim_timer: 0,
        }
    }

    pub fn goomba(id: u32, pos: Vec2) -> Self {
        Self::with_kind(id, pos, GOOMBA_SIZE, ENEMY_GRAVITY, GOOMBA_SPEED, EnemyKind::Goomba)
    }

    pub fn koopa(id: u32, pos: Vec2, color: KoopaColor) -> Self {
        let kind = EnemyKind::Koopa {
            color,
            shell: ShellState::Walking,
            shell_timer: 0,
        };
        Self::with_kind(id, pos, KOOPA_SIZE, ENEMY_GRAVITY, KOOPA_SPEED, kind)
    }

    /// A plant anchored at a pipe mouth; `pos` is its nominal spawn point
    pub fn piranha(id: u32, pos: Vec2) -> Self {
        let pipe_y = pos.y + 16.0;
        let kind = EnemyKind::Piranha {
            cycle: PlantCycle::Hidden,
            cycle_timer: PIRANHA_HIDDEN_TICKS,
            pipe_y,
            max_height: pipe_y - PIRANHA_RISE,
        };
        let mut enemy = Self::with_kind(id, Vec2::new(pos.x, pipe_y), PIRANHA_SIZE, 0.0, 0.0, kind);
        enemy.body.direction = 1;
        enemy
    }

    pub fn aabb(&self) -> Aabb {
        self.body.aabb()
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Dead and past its grace period
    pub fn is_removable(&self) -> bool {
        self.dead && self.removal_ticks == 0
    }

    /// Can the player currently touch it (a retracted plant is out of reach)
    pub fn is_touchable(&self) -> bool {
        match self.kind {
            EnemyKind::Piranha { cycle, .. } => !self.dead && cycle != PlantCycle::Hidden,
            _ => !self.dead,
        }
    }

    /// Does side contact hurt the player
    pub fn harms_on_contact(&self) -> bool {
        match self.kind {
            EnemyKind::Koopa { shell, .. } => match shell {
                ShellState::Walking => self.is_touchable(),
                ShellState::Shelled => false,
                ShellState::Kicked => self.is_touchable() && self.kick_grace == 0,
            },
            _ => self.is_touchable(),
        }
    }

    /// Landing on it hurts instead of stomping (plants the stomp can't kill)
    pub fn is_spiky(&self) -> bool {
        matches!(self.kind, EnemyKind::Piranha { .. })
    }

    pub fn is_kicked_shell(&self) -> bool {
        !self.dead
            && matches!(
                self.kind,
                EnemyKind::Koopa {
                    shell: ShellState::Kicked,
                    ..
                }
            )
    }

    /// Advance one tick
    pub fn update(&mut self, ctx: &EnemyContext) {
        if self.dead {
            self.removal_ticks = self.removal_ticks.saturating_sub(1);
            return;
        }

        if matches!(self.kind, EnemyKind::Piranha { .. }) {
            self.update_plant(ctx.player_x);
            self.animate();
            return;
        }

        self.kick_grace = self.kick_grace.saturating_sub(1);
        self.body.integrate();
        self.bounce_off_solids(ctx.solids);

        if self.body.pos.y > KILL_PLANE_Y {
            log::debug!("enemy {} fell out of the world", self.id);
            self.dead = true;
            self.removal_ticks = 0;
            return;
        }

        match self.kind {
            EnemyKind::Goomba => {
                self.keep_in_world(ctx.world_width);
                if self.body.grounded && !self.has_ground_ahead(ctx.solids) {
                    self.body.reverse();
                }
            }
            EnemyKind::Koopa { .. } => {
                self.tick_shell();
                self.keep_in_world(ctx.world_width);
            }
            EnemyKind::Piranha { .. } => {}
        }

        self.animate();
    }

    /// Land on solids, turn around on walls
    fn bounce_off_solids(&mut self, solids: &[Aabb]) {
        for solid in solids {
            let vx = self.body.vel.x;
            match self.body.resolve_against(solid) {
                Side::Left | Side::Right => {
                    self.body.vel.x = -vx;
                    self.body.direction = -self.body.direction;
                }
                _ => {}
            }
        }
    }

    /// Turn away from the world edges (direction always points inward after)
    fn keep_in_world(&mut self, world_width: f32) {
        let max_x = (world_width - self.body.size.x).max(0.0);
        if self.body.pos.x <= 0.0 {
            self.body.pos.x = 0.0;
            self.body.face(1);
        } else if self.body.pos.x >= max_x {
            self.body.pos.x = max_x;
            self.body.face(-1);
        }
    }

    /// Probe a point just ahead of the leading edge and just below the feet
    fn has_ground_ahead(&self, solids: &[Aabb]) -> bool {
        let probe = self.ground_probe();
        solids.iter().any(|s| s.contains_point(probe))
    }

    pub fn ground_probe(&self) -> Vec2 {
        let x = if self.body.direction > 0 {
            self.body.pos.x + self.body.size.x + LEDGE_PROBE_AHEAD
        } else {
            self.body.pos.x - LEDGE_PROBE_AHEAD
        };
        Vec2::new(x, self.body.bottom() + LEDGE_PROBE_BELOW)
    }

    fn tick_shell(&mut self) {
        let EnemyKind::Koopa {
            shell, shell_timer, ..
        } = &mut self.kind
        else {
            return;
        };
        if *shell != ShellState::Shelled {
            return;
        }

        *shell_timer = shell_timer.saturating_sub(1);
        if *shell_timer == 0 && self.body.vel.x == 0.0 {
            *shell = ShellState::Walking;
            self.body.resize_keep_feet(KOOPA_SIZE.y);
            self.body.vel.x = self.body.direction as f32 * KOOPA_SPEED;
        }
    }

    fn update_plant(&mut self, player_x: f32) {
        let Self { kind, body, .. } = self;
        let EnemyKind::Piranha {
            cycle,
            cycle_timer,
            pipe_y,
            max_height,
        } = kind
        else {
            return;
        };

        let near = (player_x - body.pos.x).abs() < PIRANHA_PROXIMITY;
        let early = match cycle {
            PlantCycle::Hidden => true,
            PlantCycle::Emerging => {
                PIRANHA_EMERGE_TICKS - *cycle_timer < PIRANHA_EARLY_EMERGE_TICKS
            }
            _ => false,
        };
        if near && early {
            *cycle = PlantCycle::Hidden;
            *cycle_timer = PIRANHA_HIDDEN_TICKS;
            body.pos.y = *pipe_y;
            return;
        }

        *cycle_timer = cycle_timer.saturating_sub(1);
        match *cycle {
            PlantCycle::Hidden => {
                body.pos.y = *pipe_y;
                if *cycle_timer == 0 {
                    *cycle = PlantCycle::Emerging;
                    *cycle_timer = PIRANHA_EMERGE_TICKS;
                }
            }
            PlantCycle::Emerging => {
                let progress = 1.0 - *cycle_timer as f32 / PIRANHA_EMERGE_TICKS as f32;
                body.pos.y = *pipe_y - PIRANHA_RISE * progress;
                if *cycle_timer == 0 {
                    *cycle = PlantCycle::Exposed;
                    *cycle_timer = PIRANHA_EXPOSED_TICKS;
                    body.pos.y = *max_height;
                }
            }
            PlantCycle::Exposed => {
                body.pos.y = *max_height;
                if *cycle_timer == 0 {
                    *cycle = PlantCycle::Retreating;
                    *cycle_timer = PIRANHA_RETREAT_TICKS;
                }
            }
            PlantCycle::Retreating => {
                let progress = 1.0 - *cycle_timer as f32 / PIRANHA_RETREAT_TICKS as f32;
                body.pos.y = *max_height + PIRANHA_RISE * progress;
                if *cycle_timer == 0 {
                    *cycle = PlantCycle::Hidden;
                    *cycle_timer = PIRANHA_HIDDEN_TICKS;
                    body.pos.y = *pipe_y;
                }
            }
        }
    }

    fn animate(&mut self) {
        self.anim_timer += 1;
        if self.anim_timer >= 15 {
            self.anim_frame = (self.anim_frame + 1) % 2;
            self.anim_timer = 0;
        }
    }

    /// Apply damage and report what happened
    pub fn take_damage(&mut self, source: DamageSource) -> DamageOutcome {
        if self.dead {
            return DamageOutcome::Immune;
        }

        match &mut self.kind {
            EnemyKind::Goomba => {
                self.dead = true;
                self.removal_ticks = GOOMBA_SQUISH_TICKS;
                self.body.vel.x = 0.0;
                self.body.resize_keep_feet(GOOMBA_SQUISHED_HEIGHT);
                DamageOutcome::Defeated
            }
            EnemyKind::Koopa {
                shell, shell_timer, ..
            } => {
                if source == DamageSource::Shell {
                    self.dead = true;
                    self.removal_ticks = 0;
                    return DamageOutcome::Defeated;
                }
                match shell {
                    ShellState::Walking => {
                        *shell = ShellState::Shelled;
                        *shell_timer = KOOPA_SHELL_TICKS;
                        self.body.vel.x = 0.0;
                        self.body.resize_keep_feet(KOOPA_SHELL_HEIGHT);
                        DamageOutcome::Stunned
                    }
                    ShellState::Shelled => {
                        *shell = ShellState::Kicked;
                        self.kick_grace = KICK_GRACE_TICKS;
                        self.body.vel.x = self.body.direction as f32 * KOOPA_KICK_SPEED;
                        DamageOutcome::Stunned
                    }
                    ShellState::Kicked => DamageOutcome::Immune,
                }
            }
            EnemyKind::Piranha { .. } => {
                let lethal = match source {
                    DamageSource::Stomp { tier } => tier == PowerTier::Fire,
                    DamageSource::Shell => true,
                };
                if lethal {
                    self.dead = true;
                    self.removal_ticks = 0;
                    DamageOutcome::Defeated
                } else {
                    DamageOutcome::Immune
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_STOMP: DamageSource = DamageSource::Stomp {
        tier: PowerTier::Small,
    };

    fn ground() -> Vec<Aabb> {
        vec![Aabb::new(0.0, 560.0, 600.0, 40.0)]
    }

    fn ctx(solids: &[Aabb]) -> EnemyContext<'_> {
        EnemyContext {
            solids,
            world_width: 1200.0,
            player_x: -1000.0,
        }
    }

    fn shell_state(enemy: &Enemy) -> ShellState {
        match enemy.kind {
            EnemyKind::Koopa { shell, .. } => shell,
            _ => panic!("not a koopa"),
        }
    }

    fn plant_cycle(enemy: &Enemy) -> PlantCycle {
        match enemy.kind {
            EnemyKind::Piranha { cycle, .. } => cycle,
            _ => panic!("not a plant"),
        }
    }

    #[test]
    fn test_goomba_lands_and_patrols() {
        let solids = ground();
        let mut goomba = Enemy::goomba(1, Vec2::new(300.0, 530.0));
        for _ in 0..20 {
            goomba.update(&ctx(&solids));
        }
        assert!(goomba.body.grounded);
        assert_eq!(goomba.body.bottom(), 560.0);
        assert!(goomba.body.pos.x < 300.0);
    }

    #[test]
    fn test_goomba_turns_at_ledge() {
        let solids = vec![Aabb::new(100.0, 560.0, 100.0, 40.0)];
        // Resting at the left lip, walking left: the probe hangs over the void
        let mut goomba = Enemy::goomba(1, Vec2::new(101.0, 536.0));
        assert_eq!(goomba.body.direction, -1);
        goomba.update(&ctx(&solids));
        assert!(goomba.body.grounded);
        assert_eq!(goomba.body.direction, 1);
        assert!(goomba.body.vel.x > 0.0);
    }

    #[test]
    fn test_goomba_turns_at_world_edge() {
        let solids = ground();
        let mut goomba = Enemy::goomba(1, Vec2::new(0.5, 536.0));
        goomba.update(&ctx(&solids));
        assert_eq!(goomba.body.pos.x, 0.0);
        assert_eq!(goomba.body.direction, 1);
        goomba.update(&ctx(&solids));
        assert_eq!(goomba.body.direction, 1);
    }

    #[test]
    fn test_goomba_squish_then_removal() {
        let solids = ground();
        let mut goomba = Enemy::goomba(1, Vec2::new(300.0, 536.0));
        assert_eq!(goomba.take_damage(SMALL_STOMP), DamageOutcome::Defeated);
        assert!(!goomba.is_alive());
        assert_eq!(goomba.body.size.y, GOOMBA_SQUISHED_HEIGHT);
        assert_eq!(goomba.body.bottom(), 560.0);
        assert!(!goomba.is_removable());

        for _ in 0..GOOMBA_SQUISH_TICKS {
            goomba.update(&ctx(&solids));
        }
        assert!(goomba.is_removable());
        assert_eq!(goomba.take_damage(SMALL_STOMP), DamageOutcome::Immune);
    }

    #[test]
    fn test_koopa_walk_shell_kick() {
        let mut koopa = Enemy::koopa(1, Vec2::new(300.0, 528.0), KoopaColor::Green);
        assert_eq!(koopa.take_damage(SMALL_STOMP), DamageOutcome::Stunned);
        assert_eq!(shell_state(&koopa), ShellState::Shelled);
        assert_eq!(koopa.body.vel.x, 0.0);
        assert_eq!(koopa.body.size.y, KOOPA_SHELL_HEIGHT);

        assert_eq!(koopa.take_damage(SMALL_STOMP), DamageOutcome::Stunned);
        assert_eq!(shell_state(&koopa), ShellState::Kicked);
        assert_eq!(koopa.body.vel.x, -KOOPA_KICK_SPEED);

        assert_eq!(koopa.take_damage(SMALL_STOMP), DamageOutcome::Immune);
        assert_eq!(shell_state(&koopa), ShellState::Kicked);
        assert_eq!(koopa.body.vel.x, -KOOPA_KICK_SPEED);
        assert!(koopa.is_alive());
    }

    #[test]
    fn test_koopa_reemerges_facing_prior_direction() {
        let solids = ground();
        let mut koopa = Enemy::koopa(1, Vec2::new(300.0, 528.0), KoopaColor::Red);
        koopa.take_damage(SMALL_STOMP);
        for _ in 0..KOOPA_SHELL_TICKS - 1 {
            koopa.update(&ctx(&solids));
            assert_eq!(shell_state(&koopa), ShellState::Shelled);
        }
        koopa.update(&ctx(&solids));
        assert_eq!(shell_state(&koopa), ShellState::Walking);
        assert_eq!(koopa.body.size.y, KOOPA_SIZE.y);
        assert_eq!(koopa.body.vel.x, -KOOPA_SPEED);
        assert_eq!(koopa.body.direction, -1);
    }

    #[test]
    fn test_shell_kills_koopa_outright() {
        let mut koopa = Enemy::koopa(1, Vec2::new(300.0, 528.0), KoopaColor::Green);
        assert_eq!(koopa.take_damage(DamageSource::Shell), DamageOutcome::Defeated);
        assert!(koopa.is_removable());
    }

    #[test]
    fn test_enemy_falls_out_of_world() {
        let mut goomba = Enemy::goomba(1, Vec2::new(300.0, 650.0));
        for _ in 0..30 {
            goomba.update(&ctx(&[]));
        }
        assert!(!goomba.is_alive());
        assert!(goomba.is_removable());
    }

    #[test]
    fn test_plant_full_cycle() {
        let mut plant = Enemy::piranha(1, Vec2::new(500.0, 480.0));
        let pipe_y = 496.0;
        assert_eq!(plant.body.pos.y, pipe_y);
        assert!(!plant.is_touchable());

        for _ in 0..PIRANHA_HIDDEN_TICKS {
            plant.update(&ctx(&[]));
        }
        assert_eq!(plant_cycle(&plant), PlantCycle::Emerging);

        for _ in 0..PIRANHA_EMERGE_TICKS {
            plant.update(&ctx(&[]));
        }
        assert_eq!(plant_cycle(&plant), PlantCycle::Exposed);
        assert_eq!(plant.body.pos.y, pipe_y - PIRANHA_RISE);
        assert!(plant.is_touchable());

        for _ in 0..PIRANHA_EXPOSED_TICKS {
            plant.update(&ctx(&[]));
        }
        assert_eq!(plant_cycle(&plant), PlantCycle::Retreating);

        for _ in 0..PIRANHA_RETREAT_TICKS {
            plant.update(&ctx(&[]));
        }
        assert_eq!(plant_cycle(&plant), PlantCycle::Hidden);
        assert_eq!(plant.body.pos.y, pipe_y);
    }

    #[test]
    fn test_plant_stays_hidden_near_player() {
        let mut plant = Enemy::piranha(1, Vec2::new(500.0, 480.0));
        let near = EnemyContext {
            solids: &[],
            world_width: 1200.0,
            player_x: 520.0,
        };
        for _ in 0..PIRANHA_HIDDEN_TICKS * 3 {
            plant.update(&near);
        }
        assert_eq!(plant_cycle(&plant), PlantCycle::Hidden);

        // Late in an emergence the player can no longer cancel it
        let mut plant = Enemy::piranha(2, Vec2::new(500.0, 480.0));
        for _ in 0..PIRANHA_HIDDEN_TICKS + PIRANHA_EARLY_EMERGE_TICKS {
            plant.update(&ctx(&[]));
        }
        assert_eq!(plant_cycle(&plant), PlantCycle::Emerging);
        plant.update(&near);
        assert_eq!(plant_cycle(&plant), PlantCycle::Emerging);
    }

    #[test]
    fn test_plant_only_dies_to_fire_or_shell() {
        let mut plant = Enemy::piranha(1, Vec2::new(500.0, 480.0));
        assert_eq!(plant.take_damage(SMALL_STOMP), DamageOutcome::Immune);
        assert_eq!(
            plant.take_damage(DamageSource::Stomp {
                tier: PowerTier::Big
            }),
            DamageOutcome::Immune
        );
        assert!(plant.is_alive());
        assert_eq!(
            plant.take_damage(DamageSource::Stomp {
                tier: PowerTier::Fire
            }),
            DamageOutcome::Defeated
        );
        assert!(plant.is_removable());
    }
}
