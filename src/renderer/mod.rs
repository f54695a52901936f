//! Rendering module
//!
//! The simulation is never drawn directly. Each frame the host captures a
//! `Frame` snapshot and hands it to whatever `RenderSink` it owns (canvas,
//! GPU pipeline, terminal, test recorder).

pub mod frame;
pub mod shapes;
pub mod vertex;

pub use frame::{Frame, Hud, ParticleSprite, Sprite, SpriteKind, camera_x};
pub use vertex::Vertex;

/// Consumer of render snapshots
pub trait RenderSink {
    fn present(&mut self, frame: &Frame);
}

/// Keeps only the most recent frame; handy for headless runs and tests
#[derive(Debug, Default)]
pub struct LastFrame {
    pub frame: Option<Frame>,
    pub presented: u64,
}

impl RenderSink for LastFrame {
    fn present(&mut self, frame: &Frame) {
        self.frame = Some(frame.clone());
        self.presented += 1;
    }
}
