//! Axis-aligned bounding boxes
//!
//! The sole collision primitive. Screen coordinates: origin at the top-left,
//! x grows to the right and y grows downward, so a box's "top" is its
//! smallest y.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Smallest extent a box may have (keeps width/height strictly positive)
pub const MIN_EXTENT: f32 = 0.01;

/// An axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(MIN_EXTENT),
            height: height.max(MIN_EXTENT),
        }
    }

    /// Build a box from a top-left position and a size vector
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive point test (edges count as inside)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Same box shifted by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
            ..*self
        }
    }
}
