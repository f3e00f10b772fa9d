//! Wires the Sky Chaser world and its systems to the rendering contract.

use glam::Vec2;
use sky_chaser_core::{
    ControlFrame, Event, GameState, HeldActions, Outcome, PlayerSnapshot, Trigger,
};
use sky_chaser_rendering::{
    Color, FrameInput, FrameOutcome, HudText, MenuAction, Overlay, Scene, Viewport, Visual,
};
use sky_chaser_system_controls::Controls;
use sky_chaser_system_feedback::Feedback;
use sky_chaser_world::{self as world, query, World};

const SKY_BLUE: Color = Color::from_rgb_u8(135, 206, 235);
const PLATFORM_BROWN: Color = Color::from_rgb_u8(139, 69, 19);
const COIN_YELLOW: Color = Color::from_rgb_u8(255, 255, 0);
const ENEMY_RED: Color = Color::from_rgb_u8(255, 0, 0);
const PLAYER_PINK: Color = Color::from_rgb_u8(255, 100, 100);
const ROPE_GREY: Color = Color::from_rgb_u8(100, 100, 100);
const ANCHOR_RING: Color = Color::from_rgb_u8(200, 200, 200);
const ANCHOR_CORE: Color = Color::from_rgb_u8(150, 150, 150);
const HUD_WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

const HUD_FONT_SIZE: f32 = 32.0;
const COIN_BOB_AMPLITUDE: f32 = 3.0;
const BLINK_PERIOD_STEPS: u32 = 5;

/// Sky Chaser session driven one fixed step per rendered frame.
#[derive(Debug)]
pub(crate) struct PlatformerSession {
    world: World,
    controls: Controls,
    feedback: Feedback,
    events: Vec<Event>,
    viewport: Viewport,
}

impl PlatformerSession {
    pub(crate) fn new(seed: u64, viewport: Viewport) -> Self {
        Self {
            world: World::new(),
            controls: Controls::new(),
            feedback: Feedback::new(seed),
            events: Vec::new(),
            viewport,
        }
    }

    /// Advances one step and describes the result in `scene`.
    pub(crate) fn frame(&mut self, input: &FrameInput, scene: &mut Scene) -> FrameOutcome {
        let frame = self.control_frame(input);
        self.step(&frame);
        self.populate(scene);

        if query::is_terminated(&self.world) {
            FrameOutcome::Exit
        } else {
            FrameOutcome::Continue
        }
    }

    fn control_frame(&self, input: &FrameInput) -> ControlFrame {
        let mut frame = ControlFrame::held(HeldActions {
            left: input.left_held,
            right: input.right_held,
            up: input.up_held,
        });

        let keys = [
            (input.start, Trigger::Start),
            (input.jump, Trigger::Jump),
            (input.grapple, Trigger::GrappleNearest),
            (input.release, Trigger::ReleaseGrapple),
            (input.restart, Trigger::Restart),
            (input.next_level, Trigger::NextLevel),
            (input.cancel, Trigger::Cancel),
        ];
        for (pressed, trigger) in keys {
            if pressed {
                frame.triggers.push(trigger);
            }
        }

        if input.pointer_pressed {
            if let Some(pointer) = input.pointer {
                frame.triggers.push(Trigger::PointerPressed {
                    world: pointer + Vec2::new(0.0, query::camera_offset(&self.world)),
                });
            }
        }

        if let Some(action) = input.menu_action {
            frame.triggers.push(match action {
                MenuAction::Start => Trigger::Start,
                MenuAction::Restart => Trigger::Restart,
                MenuAction::NextLevel => Trigger::NextLevel,
                MenuAction::Quit => Trigger::Cancel,
            });
        }

        frame
    }

    fn step(&mut self, frame: &ControlFrame) {
        let player = query::player(&self.world);
        let mut commands = Vec::new();
        self.controls.handle(
            &self.events,
            frame,
            player.as_ref(),
            query::grapple_anchors(&self.world),
            &mut commands,
        );

        self.events.clear();
        for command in commands {
            world::apply(&mut self.world, command, &mut self.events);
        }

        let player = query::player(&self.world);
        let mut effects = Vec::new();
        self.feedback.handle(&self.events, player.as_ref(), &mut effects);
        for command in effects {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    fn populate(&self, scene: &mut Scene) {
        scene.clear();
        scene.clear_color = SKY_BLUE;
        scene.camera = Vec2::new(0.0, query::camera_offset(&self.world));

        let player = query::player(&self.world);
        self.push_level(scene, player.as_ref());
        if let Some(player) = player {
            self.push_hud(scene, &player);
        }
        scene.overlay = self.overlay();
    }

    fn push_level(&self, scene: &mut Scene, player: Option<&PlayerSnapshot>) {
        for platform in query::platforms(&self.world) {
            let bounds = platform.bounds();
            scene.push_world(
                bounds.position(),
                Visual::Rectangle {
                    size: bounds.size(),
                    color: PLATFORM_BROWN,
                },
            );
        }

        for coin in query::coins(&self.world) {
            let bob = Vec2::new(0.0, coin.hover_phase().sin() * COIN_BOB_AMPLITUDE);
            scene.push_world(
                coin.bounds().center() + bob,
                Visual::Circle {
                    radius: coin.bounds().width() / 2.0,
                    color: COIN_YELLOW,
                },
            );
        }

        for enemy in query::enemies(&self.world) {
            let bounds = enemy.bounds();
            scene.push_world(
                bounds.position(),
                Visual::Rectangle {
                    size: bounds.size(),
                    color: ENEMY_RED,
                },
            );
        }

        if let Some(player) = player {
            if let Some(anchor) = player.grapple_anchor {
                scene.push_world(
                    player.center(),
                    Visual::Line {
                        to: anchor,
                        thickness: 3.0,
                        color: ROPE_GREY,
                    },
                );
            }

            if !blinked_out(player) {
                scene.push_world(
                    player.bounds.position(),
                    Visual::Rectangle {
                        size: player.bounds.size(),
                        color: PLAYER_PINK,
                    },
                );
            }
        }

        for anchor in query::grapple_anchors(&self.world) {
            scene.push_world(
                *anchor,
                Visual::Ring {
                    radius: 10.0,
                    thickness: 2.0,
                    color: ANCHOR_RING,
                },
            );
            scene.push_world(
                *anchor,
                Visual::Circle {
                    radius: 5.0,
                    color: ANCHOR_CORE,
                },
            );
        }

        for particle in query::particles(&self.world) {
            let color = Color::from(particle.color()).with_alpha(particle.life_fraction());
            scene.push_world(
                particle.position(),
                Visual::Circle {
                    radius: particle.size(),
                    color,
                },
            );
        }
    }

    fn push_hud(&self, scene: &mut Scene, player: &PlayerSnapshot) {
        let width = self.viewport.width();
        let level = query::level_index(&self.world).map_or(0, |level| level.number());
        let lines = [
            (format!("Score: {}", player.score), Vec2::new(20.0, 40.0)),
            (format!("Lives: {}", player.lives), Vec2::new(width - 120.0, 40.0)),
            (
                format!("Level: {level}/{}", query::level_count()),
                Vec2::new(20.0, 75.0),
            ),
            (
                format!("Coins: {}", query::coins_remaining(&self.world)),
                Vec2::new(width - 120.0, 75.0),
            ),
        ];

        scene
            .hud
            .texts
            .extend(lines.into_iter().map(|(text, position)| HudText {
                text,
                position,
                font_size: HUD_FONT_SIZE,
                color: HUD_WHITE,
            }));
    }

    fn overlay(&self) -> Option<Overlay> {
        let viewport = self.viewport;
        match query::game_state(&self.world) {
            GameState::Playing => None,
            GameState::Menu => Some(Overlay::centered(
                viewport,
                query::welcome_banner(&self.world),
                vec!["Press Enter to start".to_owned()],
                &[(MenuAction::Start, "Start"), (MenuAction::Quit, "Quit")],
            )),
            GameState::GameOver => {
                let title = match query::outcome(&self.world) {
                    Some(Outcome::Victory) => "YOU WIN!",
                    _ => "GAME OVER",
                };
                Some(Overlay::centered(
                    viewport,
                    title,
                    vec!["Press R to restart".to_owned()],
                    &[(MenuAction::Restart, "Restart"), (MenuAction::Quit, "Quit")],
                ))
            }
            GameState::LevelComplete => Some(Overlay::centered(
                viewport,
                "LEVEL COMPLETE!",
                vec!["Press N for next level".to_owned()],
                &[
                    (MenuAction::NextLevel, "Next Level"),
                    (MenuAction::Quit, "Quit"),
                ],
            )),
        }
    }
}

/// Invulnerable players flicker so the grace period is visible.
fn blinked_out(player: &PlayerSnapshot) -> bool {
    player.is_invulnerable() && (player.invulnerable_steps / BLINK_PERIOD_STEPS) % 2 == 1
}
