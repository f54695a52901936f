//! Short-lived visual tokens: sparks, fireworks and score popups
//!
//! Particles never affect gameplay. They integrate once per tick and are
//! dropped at the tick boundary once their life runs out.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const BURST_COUNT: usize = 6;
pub const FIREWORK_COUNT: usize = 20;
pub const FIREWORK_TRAIL: usize = 8;

const SPARK_LIFE: u32 = 30;
const SPARK_GRAVITY: f32 = 0.3;
const FIREWORK_LIFE: u32 = 60;
const FIREWORK_DRAG: f32 = 0.98;
const POPUP_LIFE: u32 = 45;
const POPUP_RISE: f32 = 1.0;

/// Palette slot; the renderer maps it to an actual colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    Gold,
    Brown,
    Green,
    Red,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Tint {
    /// Firework palette
    pub const FIREWORKS: [Tint; 6] = [
        Tint::Gold,
        Tint::Red,
        Tint::Green,
        Tint::Blue,
        Tint::Magenta,
        Tint::Cyan,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ParticleKind {
    Spark,
    /// Recent positions, oldest first
    Firework { trail: Vec<Vec2> },
    /// Floating "+100"
    ScorePopup { value: u64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub tint: Tint,
    /// Ticks left
    pub life: u32,
    pub max_life: u32,
    pub size: f32,
    pub kind: ParticleKind,
}

impl Particle {
    pub fn update(&mut self) {
        match &mut self.kind {
            ParticleKind::Spark => {
                self.pos += self.vel;
                self.vel.y += SPARK_GRAVITY;
            }
            ParticleKind::Firework { trail } => {
                trail.push(self.pos);
                if trail.len() > FIREWORK_TRAIL {
                    trail.remove(0);
                }
                self.pos += self.vel;
                self.vel.y += SPARK_GRAVITY;
                self.vel *= FIREWORK_DRAG;
            }
            ParticleKind::ScorePopup { .. } => {
                self.pos.y -= POPUP_RISE;
            }
        }
        self.life = self.life.saturating_sub(1);
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Remaining life as 0..=1, used for fade-out
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        self.life as f32 / self.max_life as f32
    }
}

/// Push, evicting the oldest particle once `cap` is reached
fn push_capped(particles: &mut Vec<Particle>, particle: Particle, cap: usize) {
    if cap == 0 {
        return;
    }
    while particles.len() >= cap {
        particles.remove(0);
    }
    particles.push(particle);
}

/// Spray `count` sparks upward from `pos`
pub fn spawn_burst(
    particles: &mut Vec<Particle>,
    rng: &mut impl Rng,
    pos: Vec2,
    tint: Tint,
    count: usize,
    cap: usize,
) {
    for _ in 0..count {
        let particle = Particle {
            pos,
            vel: Vec2::new(rng.random_range(-5.0..5.0), rng.random_range(-10.0..-2.0)),
            tint,
            life: SPARK_LIFE,
            max_life: SPARK_LIFE,
            size: rng.random_range(2.0..6.0),
            kind: ParticleKind::Spark,
        };
        push_capped(particles, particle, cap);
    }
}

/// Celebration burst in random palette colours
pub fn spawn_fireworks(particles: &mut Vec<Particle>, rng: &mut impl Rng, origin: Vec2, cap: usize) {
    for _ in 0..FIREWORK_COUNT {
        let tint = Tint::FIREWORKS[rng.random_range(0..Tint::FIREWORKS.len())];
        let particle = Particle {
            pos: origin,
            vel: Vec2::new(rng.random_range(-10.0..10.0), rng.random_range(-10.0..10.0)),
            tint,
            life: FIREWORK_LIFE,
            max_life: FIREWORK_LIFE,
            size: rng.random_range(3.0..9.0),
            kind: ParticleKind::Firework {
                trail: Vec::with_capacity(FIREWORK_TRAIL + 1),
            },
        };
        push_capped(particles, particle, cap);
    }
}

pub fn spawn_score_popup(particles: &mut Vec<Particle>, pos: Vec2, value: u64, cap: usize) {
    let particle = Particle {
        pos,
        vel: Vec2::ZERO,
        tint: Tint::White,
        life: POPUP_LIFE,
        max_life: POPUP_LIFE,
        size: 12.0,
        kind: ParticleKind::ScorePopup { value },
    };
    push_capped(particles, particle, cap);
}

/// Integrate every particle and drop the expired ones
pub fn update_particles(particles: &mut Vec<Particle>) {
    for particle in particles.iter_mut() {
        particle.update();
    }
    particles.retain(Particle::is_alive);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_burst_ranges() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut particles = Vec::new();
        spawn_burst(&mut particles, &mut rng, Vec2::new(10.0, 10.0), Tint::Gold, BURST_COUNT, 100);
        assert_eq!(particles.len(), BURST_COUNT);
        for p in &particles {
            assert!((-5.0..5.0).contains(&p.vel.x));
            assert!((-10.0..-2.0).contains(&p.vel.y));
            assert!((2.0..6.0).contains(&p.size));
            assert_eq!(p.life, 30);
        }
    }

    #[test]
    fn test_particles_expire() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut particles = Vec::new();
        spawn_burst(&mut particles, &mut rng, Vec2::ZERO, Tint::Brown, 3, 100);
        spawn_score_popup(&mut particles, Vec2::new(0.0, 100.0), 100, 100);
        for _ in 0..29 {
            update_particles(&mut particles);
        }
        assert_eq!(particles.len(), 4);
        update_particles(&mut particles);
        assert_eq!(particles.len(), 1);
        assert_eq!(particles[0].pos.y, 70.0);
        for _ in 0..15 {
            update_particles(&mut particles);
        }
        assert!(particles.is_empty());
    }

    #[test]
    fn test_firework_trail_is_bounded() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut particles = Vec::new();
        spawn_fireworks(&mut particles, &mut rng, Vec2::new(500.0, 200.0), 100);
        assert_eq!(particles.len(), FIREWORK_COUNT);
        for _ in 0..20 {
            update_particles(&mut particles);
        }
        for p in &particles {
            match &p.kind {
                ParticleKind::Firework { trail } => assert_eq!(trail.len(), FIREWORK_TRAIL),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut particles = Vec::new();
        spawn_score_popup(&mut particles, Vec2::ZERO, 1, 4);
        spawn_burst(&mut particles, &mut rng, Vec2::ZERO, Tint::Gold, 6, 4);
        assert_eq!(particles.len(), 4);
        assert!(particles.iter().all(|p| matches!(p.kind, ParticleKind::Spark)));
    }

    #[test]
    fn test_same_seed_same_particles() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        spawn_fireworks(&mut a, &mut Pcg32::seed_from_u64(9), Vec2::ZERO, 100);
        spawn_fireworks(&mut b, &mut Pcg32::seed_from_u64(9), Vec2::ZERO, 100);
        let va: Vec<Vec2> = a.iter().map(|p| p.vel).collect();
        let vb: Vec<Vec2> = b.iter().map(|p| p.vel).collect();
        assert_eq!(va, vb);
    }
}
