//! Sound events and the mixer that routes them
//!
//! The simulation only names sounds. Synthesis belongs to whatever
//! `AudioSink` the host plugs in; the `Mixer` applies volume and mute on
//! the way out and never feeds anything back into the game.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::state::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoundEffect {
    /// Player left the ground
    Jump,
    /// Coin collected (pickup or question block)
    Coin,
    /// Enemy stomped or hit by a shell
    EnemyDefeat,
    /// Mushroom collected
    Powerup,
    /// Session over
    GameOver,
    /// Brick smashed
    BrickBreak,
    /// Player hurt
    Damage,
    /// Flag or exit reached
    LevelComplete,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 8] = [
        SoundEffect::Jump,
        SoundEffect::Coin,
        SoundEffect::EnemyDefeat,
        SoundEffect::Powerup,
        SoundEffect::GameOver,
        SoundEffect::BrickBreak,
        SoundEffect::Damage,
        SoundEffect::LevelComplete,
    ];

    /// Name hosts key their sound banks on
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Jump => "jump",
            SoundEffect::Coin => "coin",
            SoundEffect::EnemyDefeat => "enemyDefeat",
            SoundEffect::Powerup => "powerup",
            SoundEffect::GameOver => "gameOver",
            SoundEffect::BrickBreak => "brickBreak",
            SoundEffect::Damage => "damage",
            SoundEffect::LevelComplete => "levelComplete",
        }
    }
}

/// Anything that can actually make noise
pub trait AudioSink {
    /// `volume` is already mixed, in 0.0..=1.0 and never zero
    fn play(&mut self, effect: SoundEffect, volume: f32);

    /// Background music level; sinks without music ignore it
    fn set_music_volume(&mut self, _volume: f32) {}
}

/// Sink that only logs; used by the headless runner
#[derive(Debug, Default)]
pub struct LogSink {
    pub played: u64,
}

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        self.played += 1;
        log::debug!("sound {} at {:.2}", effect.as_str(), volume);
    }

    fn set_music_volume(&mut self, volume: f32) {
        log::debug!("music at {volume:.2}");
    }
}

/// Volume and mute stage between the game and a sink
#[derive(Debug, Clone)]
pub struct Mixer {
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

impl Mixer {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut mixer = Self::new();
        mixer.set_master_volume(settings.master_volume);
        mixer.set_sfx_volume(settings.sfx_volume);
        mixer.set_music_volume(settings.music_volume);
        mixer.set_muted(settings.muted);
        mixer
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Push the current music level to the sink
    pub fn sync_music(&self, sink: &mut dyn AudioSink) {
        sink.set_music_volume(self.effective_music_volume());
    }

    /// Play a single effect, dropped when silent
    pub fn play(&self, effect: SoundEffect, sink: &mut dyn AudioSink) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        sink.play(effect, vol);
    }

    /// Route every sound event in a drained batch; other events are ignored
    pub fn dispatch(&self, events: &[GameEvent], sink: &mut dyn AudioSink) {
        for event in events {
            if let GameEvent::Sound(effect) = event {
                self.play(*effect, sink);
            }
        }
    }
}
