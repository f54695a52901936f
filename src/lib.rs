//! Sidescroll - a 2D side-scrolling platformer simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, state machines, level lifecycle)
//! - `levels`: Level data provider (built-in pack and JSON packs)
//! - `renderer`: Read-only render snapshot of the simulation
//! - `audio`: Named sound events and the sink that consumes them
//! - `settings`: Player-facing configuration

pub mod audio;
pub mod levels;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use levels::{LevelDescriptor, LevelPack, LevelProvider};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Logic ticks per second
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Visible viewport (the camera window over the level)
    pub const VIEW_WIDTH: f32 = 1200.0;
    pub const VIEW_HEIGHT: f32 = 600.0;
    /// Anything whose top edge passes this line has fallen out of the world
    pub const KILL_PLANE_Y: f32 = VIEW_HEIGHT + 100.0;
    /// Vertical speed cap applied to every physics body
    pub const TERMINAL_VELOCITY: f32 = 20.0;

    /// Player spawn point at level start
    pub const PLAYER_SPAWN_X: f32 = 100.0;
    pub const PLAYER_SPAWN_Y: f32 = VIEW_HEIGHT - 200.0;
    /// Lives at the start of a session
    pub const STARTING_LIVES: u32 = 3;

    /// Score table
    pub const STOMP_SCORE: u64 = 100;
    pub const COIN_SCORE: u64 = 200;
    pub const BRICK_SCORE: u64 = 50;
    pub const POWERUP_SCORE: u64 = 1000;
    pub const EXIT_DOOR_BONUS: u64 = 2000;
    pub const TIME_BONUS_PER_SECOND: u64 = 50;
    pub const LIVES_BONUS_PER_LIFE: u64 = 1000;
}
