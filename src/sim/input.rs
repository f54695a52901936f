//! Polled keyboard state
//!
//! The host refreshes held keys whenever it likes; the simulation reads the
//! map once at the start of every tick.

use serde::{Deserialize, Serialize};

/// Logical keys the simulation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Jump,
    Run,
    Pause,
    Confirm,
}

impl Key {
    const ALL: [Key; 6] = [
        Key::Left,
        Key::Right,
        Key::Jump,
        Key::Run,
        Key::Pause,
        Key::Confirm,
    ];

    /// Map a DOM-style `KeyboardEvent.code` onto a logical key
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyA" | "ArrowLeft" => Some(Key::Left),
            "KeyD" | "ArrowRight" => Some(Key::Right),
            "Space" | "KeyW" | "ArrowUp" => Some(Key::Jump),
            "ShiftLeft" | "ShiftRight" => Some(Key::Run),
            "KeyP" | "Escape" => Some(Key::Pause),
            "Enter" => Some(Key::Confirm),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        1 << (Key::ALL.iter().position(|k| *k == self).unwrap_or(0) as u8)
    }
}

/// Held/not-held map over [`Key`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    held: u8,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper, handy for scripted input
    pub fn with(mut self, key: Key) -> Self {
        self.set(key, true);
        self
    }

    pub fn set(&mut self, key: Key, held: bool) {
        if held {
            self.held |= key.bit();
        } else {
            self.held &= !key.bit();
        }
    }

    /// Record a raw key code; unknown codes are ignored
    pub fn set_code(&mut self, code: &str, held: bool) {
        if let Some(key) = Key::from_code(code) {
            self.set(key, held);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held & key.bit() != 0
    }

    pub fn clear(&mut self) {
        self.held = 0;
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Held movement/action keys
    pub keys: KeyState,
    /// Pause toggle (edge-triggered by the host)
    pub pause: bool,
    /// Continue past the level results screen
    pub confirm: bool,
}

impl TickInput {
    pub fn held(keys: KeyState) -> Self {
        Self {
            keys,
            ..Default::default()
        }
    }
}
