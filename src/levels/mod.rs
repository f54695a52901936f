//! Level data provider
//!
//! A [`LevelPack`] holds the descriptors for every level of a session. The
//! built-in pack ships three levels; hosts can load their own from JSON.

mod builtin;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::aabb::Aabb;
use crate::sim::block::BlockContents;
use crate::sim::completion::ExitKind;
use crate::sim::enemy::KoopaColor;

/// Errors raised while loading or validating a level pack
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level pack is empty")]
    Empty,
    #[error("level pack JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level {id} ({name}): {reason}")]
    Invalid { id: u32, name: String, reason: String },
}

/// Enemy placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EnemySpawn {
    Goomba {
        x: f32,
        y: f32,
    },
    Koopa {
        x: f32,
        y: f32,
        #[serde(default)]
        color: KoopaColor,
    },
    #[serde(alias = "piranhaplant")]
    Piranha {
        x: f32,
        y: f32,
    },
}

/// Free-standing pickup placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CollectibleSpawn {
    Coin { x: f32, y: f32 },
    Mushroom { x: f32, y: f32 },
    #[serde(alias = "fire")]
    FireMushroom { x: f32, y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuestionBlockSpawn {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub contents: BlockContents,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrickSpawn {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlagpoleSpawn {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExitDoorSpawn {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub kind: ExitKind,
}

/// Everything needed to build one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    pub id: u32,
    pub name: String,
    /// Countdown budget in seconds
    pub time_limit: u32,
    /// Horizontal extent of the playable world
    pub world_width: f32,
    pub platforms: Vec<Aabb>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub collectibles: Vec<CollectibleSpawn>,
    #[serde(default)]
    pub question_blocks: Vec<QuestionBlockSpawn>,
    #[serde(default)]
    pub brick_blocks: Vec<BrickSpawn>,
    #[serde(default)]
    pub flagpole: Option<FlagpoleSpawn>,
    #[serde(default)]
    pub exit_door: Option<ExitDoorSpawn>,
}

impl LevelDescriptor {
    /// Geometry sanity checks
    pub fn validate(&self) -> Result<(), LevelError> {
        let invalid = |reason: String| LevelError::Invalid {
            id: self.id,
            name: self.name.clone(),
            reason,
        };

        if self.world_width <= 0.0 {
            return Err(invalid(format!("world width {} is not positive", self.world_width)));
        }
        if self.platforms.is_empty() {
            return Err(invalid("no platforms".to_string()));
        }
        // Deserialized boxes bypass the clamping constructor
        if let Some((i, p)) = self
            .platforms
            .iter()
            .enumerate()
            .find(|(_, p)| p.width <= 0.0 || p.height <= 0.0)
        {
            return Err(invalid(format!(
                "platform {i} has non-positive size {}x{}",
                p.width, p.height
            )));
        }
        if self.flagpole.is_none() && self.exit_door.is_none() {
            return Err(invalid("no flagpole or exit door".to_string()));
        }
        Ok(())
    }
}

/// Source of level descriptors, indexed from 1
pub trait LevelProvider: fmt::Debug + Send + Sync {
    /// Descriptor for `index`; out-of-range indices fall back to level 1
    fn level(&self, index: u32) -> LevelDescriptor;

    fn total_levels(&self) -> u32;

    fn name(&self, index: u32) -> String {
        self.level(index).name
    }
}

/// An ordered, validated set of levels
#[derive(Debug, Clone)]
pub struct LevelPack {
    levels: Vec<LevelDescriptor>,
}

impl Default for LevelPack {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelPack {
    /// The three stock levels
    pub fn builtin() -> Self {
        Self {
            levels: builtin::levels(),
        }
    }

    pub fn new(levels: Vec<LevelDescriptor>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::Empty);
        }
        for level in &levels {
            level.validate()?;
        }
        Ok(Self { levels })
    }

    /// Parse a JSON array of level descriptors
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let levels: Vec<LevelDescriptor> = serde_json::from_str(json)?;
        Self::new(levels)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(&self.levels)?)
    }

    pub fn levels(&self) -> &[LevelDescriptor] {
        &self.levels
    }
}

impl LevelProvider for LevelPack {
    fn level(&self, index: u32) -> LevelDescriptor {
        let slot = index
            .checked_sub(1)
            .and_then(|i| self.levels.get(i as usize));
        match slot {
            Some(level) => level.clone(),
            None => {
                log::warn!(
                    "level {index} out of range (1..={}), falling back to level 1",
                    self.levels.len()
                );
                self.levels[0].clone()
            }
        }
    }

    fn total_levels(&self) -> u32 {
        self.levels.len() as u32
    }
}
