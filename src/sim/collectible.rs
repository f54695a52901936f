//! Pickups: static coins and walking mushrooms

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::body::PhysicsBody;
use super::collision::Side;

pub const COIN_SIZE: f32 = 20.0;
pub const MUSHROOM_SIZE: f32 = 24.0;
pub const MUSHROOM_SPEED: f32 = 2.0;
pub const MUSHROOM_GRAVITY: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MushroomKind {
    /// Grows the player to Big
    Super,
    /// Grants Fire power
    Fire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Coin,
    Mushroom(MushroomKind),
}

/// A collectible entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    pub body: PhysicsBody,
    /// Picked up; dropped from the arena at the end of the tick
    pub collected: bool,
}

impl Collectible {
    pub fn coin(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            kind: CollectibleKind::Coin,
            body: PhysicsBody::new(pos, Vec2::splat(COIN_SIZE), 0.0),
            collected: false,
        }
    }

    pub fn mushroom(id: u32, pos: Vec2, kind: MushroomKind) -> Self {
        let mut body = PhysicsBody::new(pos, Vec2::splat(MUSHROOM_SIZE), MUSHROOM_GRAVITY);
        body.vel.x = MUSHROOM_SPEED;
        Self {
            id,
            kind: CollectibleKind::Mushroom(kind),
            body,
            collected: false,
        }
    }

    pub fn aabb(&self) -> Aabb {
        self.body.aabb()
    }

    /// Move walking items; coins stay put
    pub fn update(&mut self, solids: &[Aabb], world_width: f32) {
        if self.collected || matches!(self.kind, CollectibleKind::Coin) {
            return;
        }

        self.body.integrate();
        for solid in solids {
            let vx = self.body.vel.x;
            if matches!(
                self.body.resolve_against(solid),
                Side::Left | Side::Right
            ) {
                self.body.vel.x = -vx;
                self.body.direction = -self.body.direction;
            }
        }

        let max_x = (world_width - self.body.size.x).max(0.0);
        if self.body.pos.x <= 0.0 {
            self.body.pos.x = 0.0;
            self.body.face(1);
        } else if self.body.pos.x >= max_x {
            self.body.pos.x = max_x;
            self.body.face(-1);
        }
    }
}
