//! Single authoritative simulation clock
//!
//! The 60 Hz tick counter also drives the one-second level countdown: every
//! `SIM_HZ` running ticks make one second. Pausing freezes both without
//! losing the partial second.

use serde::{Deserialize, Serialize};

use crate::consts::SIM_HZ;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Level loaded, waiting for the host to start
    Ready,
    Running,
    Paused,
    /// Results screen between levels
    LevelComplete,
    GameOver,
    /// Every level cleared
    GameComplete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimClock {
    pub phase: Phase,
    /// Total ticks advanced while Running
    pub ticks: u64,
    /// Running ticks since the last whole second
    sub_second: u32,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            phase: Phase::Ready,
            ticks: 0,
            sub_second: 0,
        }
    }

    pub fn start(&mut self) {
        if self.phase == Phase::Ready {
            self.phase = Phase::Running;
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Toggle between Running and Paused; other phases ignore it
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            other => other,
        };
    }

    /// Count one tick. Returns true when it completes a second.
    pub fn advance(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.ticks += 1;
        self.sub_second += 1;
        if self.sub_second >= SIM_HZ {
            self.sub_second = 0;
            return true;
        }
        false
    }

    /// Leave Running for a terminal or between-level phase
    pub fn stop(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Fresh clock for a newly loaded level
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
