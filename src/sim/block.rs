//! Question blocks and bricks

use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::player::PowerTier;

pub const BLOCK_SIZE: f32 = 32.0;
/// Cosmetic bump after every hit
pub const BOUNCE_TICKS: u32 = 10;
const BOUNCE_AMPLITUDE: f32 = 5.0;

/// What a question block dispenses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockContents {
    #[default]
    Coin,
    Mushroom,
    #[serde(alias = "fireflower")]
    Fire,
}

/// One-shot `?` block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBlock {
    pub id: u32,
    pub rect: Aabb,
    pub contents: BlockContents,
    pub used: bool,
    pub bounce_ticks: u32,
}

impl QuestionBlock {
    pub fn new(id: u32, x: f32, y: f32, contents: BlockContents) -> Self {
        Self {
            id,
            rect: Aabb::new(x, y, BLOCK_SIZE, BLOCK_SIZE),
            contents,
            used: false,
            bounce_ticks: 0,
        }
    }

    /// Bump the block. Dispenses its contents on the first hit only.
    pub fn hit(&mut self) -> Option<BlockContents> {
        self.bounce_ticks = BOUNCE_TICKS;
        if self.used {
            return None;
        }
        self.used = true;
        Some(self.contents)
    }

    pub fn tick(&mut self) {
        self.bounce_ticks = self.bounce_ticks.saturating_sub(1);
    }

    pub fn bounce_offset(&self) -> f32 {
        bounce_offset(self.bounce_ticks)
    }
}

/// Breakable brick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickBlock {
    pub id: u32,
    pub rect: Aabb,
    pub broken: bool,
    pub bounce_ticks: u32,
}

impl BrickBlock {
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self {
            id,
            rect: Aabb::new(x, y, BLOCK_SIZE, BLOCK_SIZE),
            broken: false,
            bounce_ticks: 0,
        }
    }

    /// Bump from below. Returns true if this hit broke the brick.
    pub fn hit(&mut self, tier: PowerTier) -> bool {
        if self.broken {
            return false;
        }
        if tier.can_break_bricks() {
            self.broken = true;
            return true;
        }
        self.bounce_ticks = BOUNCE_TICKS;
        false
    }

    /// Collision box, absent once broken
    pub fn solid(&self) -> Option<Aabb> {
        (!self.broken).then_some(self.rect)
    }

    pub fn tick(&mut self) {
        self.bounce_ticks = self.bounce_ticks.saturating_sub(1);
    }

    pub fn bounce_offset(&self) -> f32 {
        bounce_offset(self.bounce_ticks)
    }
}

/// Vertical draw offset for a bumped block (negative is up)
fn bounce_offset(ticks: u32) -> f32 {
    if ticks == 0 {
        return 0.0;
    }
    -(ticks as f32 * 0.5).sin().abs() * BOUNCE_AMPLITUDE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_block_dispenses_once() {
        let mut block = QuestionBlock::new(1, 0.0, 0.0, BlockContents::Mushroom);
        assert_eq!(block.hit(), Some(BlockContents::Mushroom));
        assert!(block.used);
        assert_eq!(block.hit(), None);
        assert!(block.used);
    }

    #[test]
    fn test_every_hit_restarts_bounce() {
        let mut block = QuestionBlock::new(1, 0.0, 0.0, BlockContents::Coin);
        block.hit();
        for _ in 0..4 {
            block.tick();
        }
        assert_eq!(block.bounce_ticks, BOUNCE_TICKS - 4);
        block.hit();
        assert_eq!(block.bounce_ticks, BOUNCE_TICKS);
        for _ in 0..BOUNCE_TICKS {
            block.tick();
        }
        assert_eq!(block.bounce_offset(), 0.0);
    }

    #[test]
    fn test_small_player_cannot_break_brick() {
        let mut brick = BrickBlock::new(1, 64.0, 64.0);
        for _ in 0..5 {
            assert!(!brick.hit(PowerTier::Small));
        }
        assert!(!brick.broken);
        assert_eq!(brick.bounce_ticks, BOUNCE_TICKS);
        assert!(brick.solid().is_some());
    }

    #[test]
    fn test_big_player_breaks_brick_once() {
        let mut brick = BrickBlock::new(1, 64.0, 64.0);
        assert!(brick.hit(PowerTier::Big));
        assert!(brick.broken);
        assert!(brick.solid().is_none());
        assert!(!brick.hit(PowerTier::Fire));

        let mut brick = BrickBlock::new(2, 0.0, 0.0);
        assert!(brick.hit(PowerTier::Fire));
    }
}
