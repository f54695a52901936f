//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (integer tick counters, no wall clock)
//! - Seeded RNG only (and only for cosmetic particles)
//! - Stable iteration order (arenas ascending by entity ID)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod block;
pub mod body;
pub mod clock;
pub mod collectible;
pub mod collision;
pub mod completion;
pub mod enemy;
pub mod input;
pub mod interaction;
pub mod particle;
pub mod player;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use block::{BlockContents, BrickBlock, QuestionBlock};
pub use body::PhysicsBody;
pub use clock::{Phase, SimClock};
pub use collectible::{Collectible, CollectibleKind, MushroomKind};
pub use collision::{Side, classify_side, overlaps};
pub use completion::{CompletionState, ExitDoor, ExitKind, Flagpole};
pub use enemy::{DamageOutcome, DamageSource, Enemy, EnemyKind, KoopaColor, PlantCycle, ShellState};
pub use input::{Key, KeyState, TickInput};
pub use particle::{Particle, ParticleKind, Tint};
pub use player::{Player, PowerTier};
pub use state::{EndReason, GameEvent, GameState, LevelSummary, Session};
pub use tick::tick;
