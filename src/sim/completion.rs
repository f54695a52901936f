//! Level-completion sequencer: flagpole and exit door
//!
//! Both objects run `Idle -> Activated -> Complete`. Activation is
//! idempotent and every countdown starts from the first activation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;

pub const FLAGPOLE_WIDTH: f32 = 8.0;
pub const FLAGPOLE_HEIGHT: f32 = 300.0;
pub const FLAG_DESCENT_SPEED: f32 = 3.0;
/// Flag rests this far above the pole base
pub const FLAG_REST_OFFSET: f32 = 50.0;
/// 3 seconds from first touch
pub const FLAGPOLE_COMPLETE_TICKS: u32 = 180;
pub const FLAGPOLE_MAX_BONUS: i64 = 5000;
pub const FLAGPOLE_MIN_BONUS: i64 = 100;
pub const FLAGPOLE_BONUS_PER_PIXEL: i64 = 10;

pub const EXIT_DOOR_WIDTH: f32 = 48.0;
pub const EXIT_DOOR_HEIGHT: f32 = 64.0;
/// 2 seconds from activation
pub const EXIT_DOOR_COMPLETE_TICKS: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompletionState {
    #[default]
    Idle,
    Activated,
    Complete,
}

/// End-of-level flagpole
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flagpole {
    pub rect: Aabb,
    pub state: CompletionState,
    /// Top of the flag cloth
    pub flag_y: f32,
    /// Ticks left until Complete, counted from the first activation
    pub complete_ticks: u32,
    /// Bonus awarded by the first activation
    pub bonus: u64,
}

impl Flagpole {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            rect: Aabb::new(x, y, FLAGPOLE_WIDTH, FLAGPOLE_HEIGHT),
            state: CompletionState::Idle,
            flag_y: y,
            complete_ticks: 0,
            bonus: 0,
        }
    }

    /// Grab the pole at `contact_y`. Returns the bonus on the first call only.
    ///
    /// Higher grabs score more: `5000 - 10 * depth`, floored at 100.
    pub fn activate(&mut self, contact_y: f32) -> Option<u64> {
        if self.state != CompletionState::Idle {
            return None;
        }

        let depth = (contact_y.clamp(self.rect.top(), self.rect.bottom()) - self.rect.top()) as i64;
        let bonus = (FLAGPOLE_MAX_BONUS - FLAGPOLE_BONUS_PER_PIXEL * depth).max(FLAGPOLE_MIN_BONUS);

        self.state = CompletionState::Activated;
        self.complete_ticks = FLAGPOLE_COMPLETE_TICKS;
        self.bonus = bonus as u64;
        log::debug!("flagpole grabbed at y={contact_y:.0}, bonus {bonus}");
        Some(self.bonus)
    }

    pub fn tick(&mut self) {
        if self.state != CompletionState::Activated {
            return;
        }

        let rest_y = self.rect.bottom() - FLAG_REST_OFFSET;
        self.flag_y = (self.flag_y + FLAG_DESCENT_SPEED).min(rest_y);

        self.complete_ticks = self.complete_ticks.saturating_sub(1);
        if self.complete_ticks == 0 {
            self.state = CompletionState::Complete;
        }
    }

    pub fn is_activated(&self) -> bool {
        self.state != CompletionState::Idle
    }

    pub fn is_complete(&self) -> bool {
        self.state == CompletionState::Complete
    }

    /// Where the celebration fireworks burst
    pub fn fireworks_origin(&self) -> Vec2 {
        Vec2::new(self.rect.x + 50.0, self.rect.y + 100.0)
    }
}

/// Visual style of the exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitKind {
    #[default]
    Door,
    Pipe,
    Portal,
}

/// Level exit, usable once the flagpole (if any) has finished
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitDoor {
    pub rect: Aabb,
    pub kind: ExitKind,
    pub state: CompletionState,
    pub complete_ticks: u32,
}

impl ExitDoor {
    pub fn new(x: f32, y: f32, kind: ExitKind) -> Self {
        Self {
            rect: Aabb::new(x, y, EXIT_DOOR_WIDTH, EXIT_DOOR_HEIGHT),
            kind,
            state: CompletionState::Idle,
            complete_ticks: 0,
        }
    }

    /// Enter the door. `flag_done` is true when there is no flagpole or it
    /// has completed. Returns true on the activating call only.
    pub fn activate(&mut self, flag_done: bool) -> bool {
        if !flag_done || self.state != CompletionState::Idle {
            return false;
        }
        self.state = CompletionState::Activated;
        self.complete_ticks = EXIT_DOOR_COMPLETE_TICKS;
        log::debug!("exit {:?} entered", self.kind);
        true
    }

    pub fn tick(&mut self) {
        if self.state != CompletionState::Activated {
            return;
        }
        self.complete_ticks = self.complete_ticks.saturating_sub(1);
        if self.complete_ticks == 0 {
            self.state = CompletionState::Complete;
        }
    }

    pub fn is_activated(&self) -> bool {
        self.state != CompletionState::Idle
    }

    pub fn is_complete(&self) -> bool {
        self.state == CompletionState::Complete
    }
}

/// Has the level's completion protocol finished
pub fn level_finished(flagpole: Option<&Flagpole>, door: Option<&ExitDoor>) -> bool {
    let flag_done = flagpole.is_none_or(Flagpole::is_complete);
    match door {
        Some(door) => flag_done && door.is_complete(),
        None => flagpole.is_some() && flag_done,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flagpole_bonus_by_height() {
        let mut pole = Flagpole::new(100.0, 200.0);
        assert_eq!(pole.activate(200.0), Some(5000));

        let mut pole = Flagpole::new(100.0, 200.0);
        assert_eq!(pole.activate(300.0), Some(4000));

        let mut pole = Flagpole::new(100.0, 200.0);
        assert_eq!(pole.activate(490.0), Some(2100));

        // Bonus floor
        let mut pole = Flagpole::new(100.0, 0.0);
        pole.rect.height = 1000.0;
        assert_eq!(pole.activate(900.0), Some(100));
    }

    #[test]
    fn test_flagpole_activation_is_idempotent_and_timed_from_first() {
        let mut pole = Flagpole::new(100.0, 200.0);
        assert!(pole.activate(250.0).is_some());
        for _ in 0..100 {
            pole.tick();
        }
        assert!(pole.activate(250.0).is_none());
        for _ in 0..FLAGPOLE_COMPLETE_TICKS - 101 {
            pole.tick();
        }
        assert!(!pole.is_complete());
        pole.tick();
        assert!(pole.is_complete());
    }

    #[test]
    fn test_flag_descends_to_rest() {
        let mut pole = Flagpole::new(100.0, 200.0);
        pole.activate(200.0);
        pole.tick();
        assert_eq!(pole.flag_y, 203.0);
        for _ in 0..FLAGPOLE_COMPLETE_TICKS {
            pole.tick();
        }
        assert_eq!(pole.flag_y, 450.0);
    }

    #[test]
    fn test_door_waits_for_flag() {
        let mut door = ExitDoor::new(500.0, 400.0, ExitKind::Pipe);
        assert!(!door.activate(false));
        assert!(!door.is_activated());
        assert!(door.activate(true));
        assert!(!door.activate(true));
        for _ in 0..EXIT_DOOR_COMPLETE_TICKS {
            door.tick();
        }
        assert!(door.is_complete());
    }

    #[test]
    fn test_level_finished_rules() {
        let mut pole = Flagpole::new(0.0, 0.0);
        let mut door = ExitDoor::new(0.0, 0.0, ExitKind::Door);
        assert!(!level_finished(None, None));
        assert!(!level_finished(Some(&pole), None));

        pole.state = CompletionState::Complete;
        assert!(level_finished(Some(&pole), None));
        assert!(!level_finished(Some(&pole), Some(&door)));

        door.state = CompletionState::Complete;
        assert!(level_finished(Some(&pole), Some(&door)));
        assert!(level_finished(None, Some(&door)));
    }
}
