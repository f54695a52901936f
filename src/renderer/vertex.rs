//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Byte stride for a tightly packed vertex buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// Colors for game elements
pub mod colors {
    pub const SKY: [f32; 4] = [0.36, 0.58, 0.99, 1.0];
    pub const GROUND: [f32; 4] = [0.55, 0.27, 0.07, 1.0];
    pub const BRICK: [f32; 4] = [0.8, 0.4, 0.1, 1.0];
    pub const QUESTION: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const QUESTION_USED: [f32; 4] = [0.55, 0.45, 0.3, 1.0];
    pub const PLAYER_SMALL: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const PLAYER_FIRE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const GOOMBA: [f32; 4] = [0.55, 0.27, 0.07, 1.0];
    pub const KOOPA_GREEN: [f32; 4] = [0.0, 0.6, 0.0, 1.0];
    pub const KOOPA_RED: [f32; 4] = [0.8, 0.0, 0.0, 1.0];
    pub const PIRANHA: [f32; 4] = [0.2, 0.7, 0.2, 1.0];
    pub const COIN: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const MUSHROOM_SUPER: [f32; 4] = [0.9, 0.1, 0.1, 1.0];
    pub const MUSHROOM_FIRE: [f32; 4] = [1.0, 0.55, 0.0, 1.0];
    pub const POLE: [f32; 4] = [0.13, 0.55, 0.13, 1.0];
    pub const FLAG: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const DOOR: [f32; 4] = [0.4, 0.2, 0.05, 1.0];
    pub const PIPE: [f32; 4] = [0.0, 0.7, 0.0, 1.0];
    pub const PORTAL: [f32; 4] = [0.6, 0.2, 0.9, 1.0];

    pub const GOLD: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const BROWN: [f32; 4] = [0.55, 0.27, 0.07, 1.0];
    pub const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    pub const MAGENTA: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
    pub const CYAN: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}
