//! Wires the Stellar Explorer toy to the rendering contract.

use glam::Vec2;
use sky_chaser_core::HeldActions;
use sky_chaser_rendering::{Color, FrameInput, FrameOutcome, HudBar, Scene, Visual};
use stellar_explorer::{tuning, Explorer};

const DEEP_SPACE: Color = Color::from_rgb_u8(0, 0, 20);
const STAR_WHITE: Color = Color::from_rgb_u8(255, 255, 255);
const SHIP_CYAN: Color = Color::from_rgb_u8(0, 255, 255);
const FUEL_ORANGE: Color = Color::from_rgb_u8(255, 165, 0);
const HEALTH_RED: Color = Color::from_rgb_u8(255, 0, 0);

const BAR_HEIGHT: f32 = 20.0;

#[derive(Debug)]
pub(crate) struct ExplorerSession {
    explorer: Explorer,
}

impl ExplorerSession {
    pub(crate) fn new(seed: u64, planet_count: usize) -> Self {
        Self {
            explorer: Explorer::new(seed, planet_count),
        }
    }

    /// Advances the ship one step and redraws the galaxy around it.
    pub(crate) fn frame(&mut self, input: &FrameInput, scene: &mut Scene) -> FrameOutcome {
        if input.cancel {
            self.explorer.end();
        }
        if self.explorer.is_terminated() {
            return FrameOutcome::Exit;
        }

        self.explorer.step(HeldActions {
            left: input.left_held,
            right: input.right_held,
            up: input.up_held,
        });
        self.populate(scene);
        FrameOutcome::Continue
    }

    fn populate(&mut self, scene: &mut Scene) {
        scene.clear();
        scene.clear_color = DEEP_SPACE;
        scene.camera = self.explorer.camera();

        for star in self.explorer.stars() {
            scene.push_screen(
                star,
                Visual::Circle {
                    radius: 1.0,
                    color: STAR_WHITE,
                },
            );
        }

        for planet in self.explorer.planets() {
            scene.push_world(
                planet.position(),
                Visual::Circle {
                    radius: planet.radius(),
                    color: planet.color().into(),
                },
            );
        }

        let ship = self.explorer.ship();
        scene.push_screen(
            tuning::SHIP_START,
            Visual::RotatedRectangle {
                size: tuning::SHIP_SIZE,
                rotation_degrees: ship.angle_degrees(),
                color: SHIP_CYAN,
            },
        );

        scene.hud.bars.extend([
            HudBar {
                position: Vec2::new(10.0, 10.0),
                size: Vec2::new(ship.fuel() * tuning::BAR_SCALE, BAR_HEIGHT),
                color: FUEL_ORANGE,
            },
            HudBar {
                position: Vec2::new(10.0, 40.0),
                size: Vec2::new(ship.health() * tuning::BAR_SCALE, BAR_HEIGHT),
                color: HEALTH_RED,
            },
        ]);
    }
}
