//! Shared physics body for the player, enemies and walking items
//!
//! Velocity/gravity integration plus the landing, ceiling and wall responses
//! that follow a side classification.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::collision::{Side, classify_side};
use crate::consts::TERMINAL_VELOCITY;

/// Position, velocity and ground state of a moving entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsBody {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Added to `vel.y` every tick
    pub gravity: f32,
    /// Recomputed every tick from contacts; never carried over stale
    pub grounded: bool,
    /// Facing: -1 left, +1 right
    pub direction: i8,
    /// Position before the most recent integrate (used to classify contacts)
    #[serde(skip)]
    pub prior_pos: Vec2,
}

impl PhysicsBody {
    pub fn new(pos: Vec2, size: Vec2, gravity: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            gravity,
            grounded: false,
            direction: 1,
            prior_pos: pos,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    pub fn prior_aabb(&self) -> Aabb {
        Aabb::from_pos_size(self.prior_pos, self.size)
    }

    /// One tick of motion: horizontal move, gravity, vertical move, terminal clamp.
    ///
    /// A body resting on a surface sinks into it by exactly one gravity step
    /// and is picked up by the same tick's landing check. The clamp applies
    /// after the move, so the tick that crosses terminal speed travels the
    /// unclamped distance.
    pub fn integrate(&mut self) {
        self.prior_pos = self.pos;
        self.grounded = false;

        self.pos.x += self.vel.x;
        self.vel.y += self.gravity;
        self.pos.y += self.vel.y;
        self.vel.y = self.vel.y.min(TERMINAL_VELOCITY);
    }

    /// Classify this body's contact with a solid and apply the response
    pub fn resolve_against(&mut self, solid: &Aabb) -> Side {
        let side = classify_side(&self.aabb(), solid, &self.prior_aabb(), self.vel);
        self.apply_contact(side, solid);
        side
    }

    /// Snap out of `solid` through `side` and cancel velocity into it
    pub fn apply_contact(&mut self, side: Side, solid: &Aabb) {
        match side {
            Side::Top => {
                self.pos.y = solid.top() - self.size.y;
                self.vel.y = 0.0;
                self.grounded = true;
            }
            Side::Bottom => {
                self.pos.y = solid.bottom();
                self.vel.y = 0.0;
            }
            Side::Left => {
                self.pos.x = solid.left() - self.size.x;
                self.vel.x = 0.0;
            }
            Side::Right => {
                self.pos.x = solid.right();
                self.vel.x = 0.0;
            }
            Side::None => {}
        }
    }

    /// Flip horizontal travel and facing
    pub fn reverse(&mut self) {
        self.vel.x = -self.vel.x;
        self.direction = -self.direction;
    }

    /// Send the body travelling toward `direction` at its current speed
    pub fn face(&mut self, direction: i8) {
        self.direction = direction.signum();
        self.vel.x = self.vel.x.abs() * self.direction as f32;
    }

    /// Change height while keeping the feet where they are
    pub fn resize_keep_feet(&mut self, height: f32) {
        let bottom = self.pos.y + self.size.y;
        self.size.y = height;
        self.pos.y = bottom - height;
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}
