//! Collision detection for axis-aligned boxes
//!
//! Overlap testing plus penetration-side classification. Everything here is
//! a pure function of the boxes and the mover's velocity; the response
//! (snapping, zeroing velocity) lives on [`PhysicsBody`](super::body::PhysicsBody).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;

/// Slack used when comparing a prior edge against a target edge
pub const CONTACT_EPSILON: f32 = 0.01;

/// Which face of the static target the mover has penetrated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Mover came down onto the target's top face (landing)
    Top,
    /// Mover rose into the target's underside (ceiling bump)
    Bottom,
    /// Mover pushed into the target's left face while moving right
    Left,
    /// Mover pushed into the target's right face while moving left
    Right,
    /// No contact
    None,
}

/// Strict AABB intersection; touching edges do not overlap
#[inline]
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// Classify which face of `target` the `mover` penetrated.
///
/// `prior` is the mover's box before this tick's integration and `vel` the
/// velocity it moved with. Velocity sign is the primary discriminator:
/// a falling mover whose top edge is above the target's top edge lands,
/// even when a lateral resolution would also fit. When velocity gives no
/// answer the axis of least penetration decides.
pub fn classify_side(mover: &Aabb, target: &Aabb, prior: &Aabb, vel: Vec2) -> Side {
    if !overlaps(mover, target) {
        return Side::None;
    }

    if vel.y > 0.0 && mover.top() < target.top() {
        return Side::Top;
    }
    if vel.y < 0.0 && prior.top() >= target.bottom() - CONTACT_EPSILON {
        return Side::Bottom;
    }
    if vel.x > 0.0 && prior.right() <= target.left() + CONTACT_EPSILON {
        return Side::Left;
    }
    if vel.x < 0.0 && prior.left() >= target.right() - CONTACT_EPSILON {
        return Side::Right;
    }

    least_penetration_side(mover, target)
}

/// Face with the shallowest overlap; ties resolve Top, Bottom, Left, Right
fn least_penetration_side(mover: &Aabb, target: &Aabb) -> Side {
    let candidates = [
        (Side::Top, mover.bottom() - target.top()),
        (Side::Bottom, target.bottom() - mover.top()),
        (Side::Left, mover.right() - target.left()),
        (Side::Right, target.right() - mover.left()),
    ];

    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.1 < best.1 {
            best = *candidate;
        }
    }
    best.0
}
