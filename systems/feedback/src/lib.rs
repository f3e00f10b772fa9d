#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns gameplay events into cosmetic particle bursts.
//!
//! Every burst is drawn from a seeded ChaCha stream so identical event
//! sequences always produce identical particles.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sky_chaser_core::{Command, Event, JumpKind, ParticleSeed, PlayerSnapshot, Rgb};

const COIN_GOLD: [Rgb; 2] = [Rgb::new(255, 215, 0), Rgb::new(255, 240, 120)];
const DAMAGE_RED: [Rgb; 2] = [Rgb::new(220, 40, 40), Rgb::new(255, 90, 60)];
const DUST_WHITE: [Rgb; 1] = [Rgb::new(255, 255, 255)];
const DOUBLE_CYAN: [Rgb; 2] = [Rgb::new(0, 255, 255), Rgb::new(150, 255, 255)];
const ROPE_GREY: [Rgb; 2] = [Rgb::new(200, 200, 200), Rgb::new(150, 150, 150)];
const CELEBRATION: [Rgb; 5] = [
    Rgb::new(255, 215, 0),
    Rgb::new(255, 105, 180),
    Rgb::new(0, 255, 255),
    Rgb::new(124, 252, 0),
    Rgb::new(255, 255, 255),
];

/// Shape of a single particle burst.
#[derive(Clone, Copy, Debug)]
struct Burst {
    count: usize,
    palette: &'static [Rgb],
    speed: (f32, f32),
    size: (f32, f32),
    life: (u32, u32),
    lift: f32,
}

const COIN_BURST: Burst = Burst {
    count: 12,
    palette: &COIN_GOLD,
    speed: (1.0, 3.0),
    size: (3.0, 5.0),
    life: (20, 35),
    lift: 1.0,
};

const DAMAGE_BURST: Burst = Burst {
    count: 16,
    palette: &DAMAGE_RED,
    speed: (1.5, 4.0),
    size: (3.0, 6.0),
    life: (25, 40),
    lift: 0.0,
};

const JUMP_BURST: Burst = Burst {
    count: 6,
    palette: &DUST_WHITE,
    speed: (0.5, 1.5),
    size: (2.0, 4.0),
    life: (12, 20),
    lift: 0.5,
};

const DOUBLE_JUMP_BURST: Burst = Burst {
    count: 10,
    palette: &DOUBLE_CYAN,
    speed: (1.0, 2.5),
    size: (2.0, 4.0),
    life: (15, 25),
    lift: 0.5,
};

const GRAPPLE_BURST: Burst = Burst {
    count: 8,
    palette: &ROPE_GREY,
    speed: (0.5, 2.0),
    size: (2.0, 3.0),
    life: (10, 20),
    lift: 0.0,
};

const CELEBRATION_BURST: Burst = Burst {
    count: 24,
    palette: &CELEBRATION,
    speed: (2.0, 5.0),
    size: (3.0, 6.0),
    life: (40, 60),
    lift: 2.0,
};

/// Feedback system emitting [`Command::SpawnParticles`] for notable events.
#[derive(Clone, Debug)]
pub struct Feedback {
    rng: ChaCha8Rng,
}

impl Feedback {
    /// Creates a feedback system drawing from the provided seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Consumes world events and emits at most one particle command.
    ///
    /// `player` locates celebrations that carry no position of their own.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: Option<&PlayerSnapshot>,
        out: &mut Vec<Command>,
    ) {
        let mut particles = Vec::new();

        for event in events {
            let request = match event {
                Event::CoinCollected { position, .. } => Some((*position, COIN_BURST)),
                Event::PlayerDamaged { position, .. } => Some((*position, DAMAGE_BURST)),
                Event::Jumped {
                    feet,
                    kind: JumpKind::Ground,
                } => Some((*feet, JUMP_BURST)),
                Event::Jumped {
                    feet,
                    kind: JumpKind::Double,
                } => Some((*feet, DOUBLE_JUMP_BURST)),
                Event::GrappleAttached { anchor, .. } => Some((*anchor, GRAPPLE_BURST)),
                Event::LevelCompleted { .. } => {
                    player.map(|player| (player.center(), CELEBRATION_BURST))
                }
                _ => None,
            };

            if let Some((origin, burst)) = request {
                self.scatter(origin, burst, &mut particles);
            }
        }

        if !particles.is_empty() {
            out.push(Command::SpawnParticles { particles });
        }
    }

    fn scatter(&mut self, origin: Vec2, burst: Burst, out: &mut Vec<ParticleSeed>) {
        for _ in 0..burst.count {
            let angle = self.rng.gen_range(0.0..TAU);
            let speed = self.rng.gen_range(burst.speed.0..=burst.speed.1);
            let velocity = Vec2::new(angle.cos(), angle.sin()) * speed - Vec2::new(0.0, burst.lift);
            let color = burst.palette[self.rng.gen_range(0..burst.palette.len())];
            out.push(ParticleSeed {
                position: origin,
                velocity,
                color,
                size: self.rng.gen_range(burst.size.0..=burst.size.1),
                life: self.rng.gen_range(burst.life.0..=burst.life.1),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sky_chaser_core::CoinId;

    #[test]
    fn silent_frames_emit_nothing() {
        let mut feedback = Feedback::new(7);
        let mut out = Vec::new();
        feedback.handle(&[Event::GrappleReleased], None, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn coin_burst_is_golden_and_centered() {
        let mut feedback = Feedback::new(7);
        let mut out = Vec::new();
        let position = Vec2::new(140.0, 427.5);
        feedback.handle(
            &[Event::CoinCollected {
                coin: CoinId::new(0),
                position,
                score: 10,
            }],
            None,
            &mut out,
        );

        let [Command::SpawnParticles { particles }] = out.as_slice() else {
            panic!("expected a single particle command, got {out:?}");
        };
        assert_eq!(particles.len(), 12);
        for particle in particles {
            assert_eq!(particle.position, position);
            assert!(COIN_GOLD.contains(&particle.color));
            assert!(particle.life >= 20 && particle.life <= 35);
        }
    }
}
