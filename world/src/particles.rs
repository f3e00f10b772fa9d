//! Cosmetic particles with no gameplay effect.

use glam::Vec2;
use sky_chaser_core::{tuning, ParticleSeed, Rgb};

/// Single short-lived visual particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    position: Vec2,
    velocity: Vec2,
    color: Rgb,
    size: f32,
    max_size: f32,
    life: u32,
    max_life: u32,
}

impl Particle {
    fn from_seed(seed: ParticleSeed) -> Self {
        Self {
            position: seed.position,
            velocity: seed.velocity,
            color: seed.color,
            size: seed.size,
            max_size: seed.size,
            life: seed.life,
            max_life: seed.life,
        }
    }

    /// Center of the particle in world coordinates.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Particle color.
    #[must_use]
    pub const fn color(&self) -> Rgb {
        self.color
    }

    /// Current edge length.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Steps left before the particle disappears.
    #[must_use]
    pub const fn life(&self) -> u32 {
        self.life
    }

    /// Remaining life as a fraction in `0.0..=1.0`.
    #[must_use]
    pub fn life_fraction(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }

    fn advance(&mut self) {
        self.position += self.velocity;
        self.velocity.y += tuning::PARTICLE_GRAVITY;
        self.life = self.life.saturating_sub(1);
        self.size = self.max_size * self.life_fraction();
    }
}

/// Owns every live particle of a session.
#[derive(Clone, Debug, Default)]
pub(crate) struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub(crate) fn spawn(&mut self, seeds: impl IntoIterator<Item = ParticleSeed>) {
        self.particles.extend(
            seeds
                .into_iter()
                .filter(|seed| seed.life > 0 && seed.size > 0.0)
                .map(Particle::from_seed),
        );
    }

    pub(crate) fn advance(&mut self) {
        for particle in &mut self.particles {
            particle.advance();
        }
        self.particles.retain(|particle| particle.life > 0);
    }

    pub(crate) fn particles(&self) -> &[Particle] {
        &self.particles
    }
}
