#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stellar Explorer: a free-flying ship drifting through a procedurally
//! generated galaxy.
//!
//! The explorer shares the fixed 60 Hz step and [`HeldActions`] vocabulary of
//! the platformer: left and right rotate the ship and up fires the thruster.

use glam::Vec2;
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sky_chaser_core::{tuning as shared, HeldActions, Rgb};

/// Fixed constants of the explorer, expressed per simulation step.
pub mod tuning {
    use glam::Vec2;

    /// Where the ship starts and where the camera keeps it on screen.
    pub const SHIP_START: Vec2 = Vec2::new(400.0, 300.0);
    /// Distance covered per thrusting step.
    pub const SHIP_SPEED: f32 = 5.0;
    /// Degrees rotated per step while a turn key is held.
    pub const TURN_RATE_DEGREES: f32 = 5.0;
    /// Fuel consumed per thrusting step.
    pub const FUEL_BURN: f32 = 0.1;
    /// Fuel of a full tank.
    pub const FULL_TANK: f32 = 100.0;
    /// Health of an undamaged hull.
    pub const FULL_HULL: f32 = 100.0;
    /// Size of the ship's hull before rotation.
    pub const SHIP_SIZE: Vec2 = Vec2::new(30.0, 20.0);

    /// Extent of the region planets are scattered over.
    pub const GALAXY_SIZE: Vec2 = Vec2::new(1600.0, 1200.0);
    /// Number of planets generated when no count is configured.
    pub const DEFAULT_PLANET_COUNT: usize = 20;
    /// Smallest planet radius.
    pub const MIN_PLANET_RADIUS: u32 = 20;
    /// Largest planet radius.
    pub const MAX_PLANET_RADIUS: u32 = 50;
    /// Darkest value of a planet color channel.
    pub const MIN_PLANET_CHANNEL: u8 = 50;
    /// Brightest value of a planet color channel.
    pub const MAX_PLANET_CHANNEL: u8 = 200;
    /// Fewest resources a planet holds.
    pub const MIN_RESOURCES: u32 = 10;
    /// Most resources a planet holds.
    pub const MAX_RESOURCES: u32 = 100;

    /// Stars sprinkled over the screen each frame.
    pub const STAR_COUNT: usize = 100;
    /// Pixel width of the HUD bars per unit of fuel or health.
    pub const BAR_SCALE: f32 = 2.0;
}

/// Player-controlled ship.
#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    position: Vec2,
    angle_degrees: f32,
    fuel: f32,
    health: f32,
}

impl Default for Ship {
    fn default() -> Self {
        Self {
            position: tuning::SHIP_START,
            angle_degrees: 0.0,
            fuel: tuning::FULL_TANK,
            health: tuning::FULL_HULL,
        }
    }
}

impl Ship {
    /// Center of the ship in galaxy coordinates.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Heading in degrees, counter-clockwise on screen.
    #[must_use]
    pub const fn angle_degrees(&self) -> f32 {
        self.angle_degrees
    }

    /// Remaining fuel.
    #[must_use]
    pub const fn fuel(&self) -> f32 {
        self.fuel
    }

    /// Remaining hull integrity.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Unit vector the thruster pushes along, in screen space.
    #[must_use]
    pub fn heading(&self) -> Vec2 {
        let radians = self.angle_degrees.to_radians();
        Vec2::new(radians.cos(), -radians.sin())
    }

    /// Applies one step of steering and thrust. Returns whether the thruster fired.
    pub fn steer(&mut self, held: HeldActions) -> bool {
        if held.left {
            self.angle_degrees -= tuning::TURN_RATE_DEGREES;
        }
        if held.right {
            self.angle_degrees += tuning::TURN_RATE_DEGREES;
        }

        if !held.up || self.fuel <= 0.0 {
            return false;
        }

        self.position += self.heading() * tuning::SHIP_SPEED;
        self.fuel = (self.fuel - tuning::FUEL_BURN).max(0.0);
        true
    }
}

/// Procedurally generated planet.
#[derive(Clone, Debug, PartialEq)]
pub struct Planet {
    position: Vec2,
    radius: f32,
    color: Rgb,
    resources: u32,
}

impl Planet {
    /// Center of the planet in galaxy coordinates.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Radius of the planet.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Surface color.
    #[must_use]
    pub const fn color(&self) -> Rgb {
        self.color
    }

    /// Resource units held by the planet.
    #[must_use]
    pub const fn resources(&self) -> u32 {
        self.resources
    }
}

/// Scatters `count` planets over the galaxy using the provided random source.
pub fn generate_galaxy<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Planet> {
    fn channel<R: Rng + ?Sized>(rng: &mut R) -> u8 {
        rng.gen_range(tuning::MIN_PLANET_CHANNEL..=tuning::MAX_PLANET_CHANNEL)
    }

    (0..count)
        .map(|_| {
            let x = rng.gen_range(0..=tuning::GALAXY_SIZE.x as u32) as f32;
            let y = rng.gen_range(0..=tuning::GALAXY_SIZE.y as u32) as f32;
            let radius =
                rng.gen_range(tuning::MIN_PLANET_RADIUS..=tuning::MAX_PLANET_RADIUS) as f32;
            let color = Rgb::new(channel(rng), channel(rng), channel(rng));
            Planet {
                position: Vec2::new(x, y),
                radius,
                color,
                resources: rng.gen_range(tuning::MIN_RESOURCES..=tuning::MAX_RESOURCES),
            }
        })
        .collect()
}

/// Running explorer session.
#[derive(Clone, Debug)]
pub struct Explorer {
    ship: Ship,
    planets: Vec<Planet>,
    rng: ChaCha8Rng,
    steps: u64,
    terminated: bool,
}

impl Explorer {
    /// Generates a galaxy of `planet_count` planets from `seed`.
    #[must_use]
    pub fn new(seed: u64, planet_count: usize) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let planets = generate_galaxy(&mut rng, planet_count);
        info!("generated galaxy of {planet_count} planets from seed {seed:#x}");
        Self {
            ship: Ship::default(),
            planets,
            rng,
            steps: 0,
            terminated: false,
        }
    }

    /// Advances the ship by one fixed step. Ignored once terminated.
    pub fn step(&mut self, held: HeldActions) {
        if self.terminated {
            return;
        }

        self.steps = self.steps.saturating_add(1);
        let was_fueled = self.ship.fuel > 0.0;
        let _ = self.ship.steer(held);
        if was_fueled && self.ship.fuel <= 0.0 {
            info!("fuel exhausted after {} steps", self.steps);
        }
    }

    /// Ends the session.
    pub fn end(&mut self) {
        if !self.terminated {
            info!("explorer session ended after {} steps", self.steps);
            self.terminated = true;
        }
    }

    /// Reports whether the session has ended.
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// The player's ship.
    #[must_use]
    pub const fn ship(&self) -> &Ship {
        &self.ship
    }

    /// Planets of the galaxy.
    #[must_use]
    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    /// Galaxy coordinate shown at the top-left corner of the screen.
    #[must_use]
    pub fn camera(&self) -> Vec2 {
        self.ship.position - tuning::SHIP_START
    }

    /// Fresh twinkling star positions in screen coordinates.
    pub fn stars(&mut self) -> Vec<Vec2> {
        let width = shared::VIEWPORT_WIDTH as u32;
        let height = shared::VIEWPORT_HEIGHT as u32;
        (0..tuning::STAR_COUNT)
            .map(|_| {
                Vec2::new(
                    self.rng.gen_range(0..=width) as f32,
                    self.rng.gen_range(0..=height) as f32,
                )
            })
            .collect()
    }
}
