#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Sky Chaser.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! The adapter therefore depends on macroquad without its default `audio`
//! feature; nothing in Sky Chaser plays sound.

use std::time::{Duration, Instant};

use anyhow::Result;
use glam::Vec2;
use log::{debug, info};
use macroquad::math::Vec2 as MacroquadVec2;
use macroquad::{
    color::{BLACK, WHITE},
    input::{
        is_key_down, is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
    },
};
use sky_chaser_rendering::{
    Color, FrameInput, FrameOutcome, Hud, MenuAction, Overlay, Presentation, RenderingBackend,
    Scene, Visual,
};

/// Tracks overlay button clicks so they can be merged with keyboard input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct OverlayInputState {
    menu_action_latched: Option<MenuAction>,
}

impl OverlayInputState {
    /// Returns the latched button choice, clearing it so the action fires once.
    pub fn take_menu_action(&mut self) -> Option<MenuAction> {
        self.menu_action_latched.take()
    }

    /// Records that an overlay button was clicked this frame.
    pub fn register_menu_action(&mut self, action: MenuAction) {
        self.menu_action_latched = Some(action);
    }
}

/// Keyboard state observed during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct KeyboardShortcuts {
    /// `Left` or `A` is held.
    left_held: bool,
    /// `Right` or `D` is held.
    right_held: bool,
    /// `Up` is held.
    up_held: bool,
    /// `Up`, `W` or `Space` went down.
    jump: bool,
    /// `Q` shoots the grapple at the nearest anchor.
    grapple: bool,
    /// `E` lets go of the rope.
    release: bool,
    /// `Enter` starts from the title menu.
    start: bool,
    /// `R` restarts after the session ended.
    restart: bool,
    /// `N` continues to the next level.
    next_level: bool,
    /// `Escape` backs out of the current screen.
    cancel: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let left_held = is_key_down(KeyCode::Left) || is_key_down(KeyCode::A);
        let right_held = is_key_down(KeyCode::Right) || is_key_down(KeyCode::D);
        let up_held = is_key_down(KeyCode::Up);
        let jump = is_key_pressed(KeyCode::Up)
            || is_key_pressed(KeyCode::W)
            || is_key_pressed(KeyCode::Space);

        Self {
            left_held,
            right_held,
            up_held,
            jump,
            grapple: is_key_pressed(KeyCode::Q),
            release: is_key_pressed(KeyCode::E),
            start: is_key_pressed(KeyCode::Enter),
            restart: is_key_pressed(KeyCode::R),
            next_level: is_key_pressed(KeyCode::N),
            cancel: is_key_pressed(KeyCode::Escape),
        }
    }
}

/// Pointer state observed during a single frame, already clamped to the window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PointerSample {
    position: Vec2,
    pressed: bool,
}

/// Combines device state into the adapter-neutral frame input.
///
/// Clicks landing on a button of the visible overlay are reported through the
/// latch on the following frame rather than as a raw pointer press.
fn gather_frame_input(
    keyboard: KeyboardShortcuts,
    pointer: PointerSample,
    overlay: Option<&Overlay>,
    menu_action: Option<MenuAction>,
) -> FrameInput {
    let on_button = overlay
        .and_then(|overlay| overlay.button_at(pointer.position))
        .is_some();

    FrameInput {
        left_held: keyboard.left_held,
        right_held: keyboard.right_held,
        up_held: keyboard.up_held,
        jump: keyboard.jump,
        grapple: keyboard.grapple,
        release: keyboard.release,
        start: keyboard.start,
        restart: keyboard.restart,
        next_level: keyboard.next_level,
        cancel: keyboard.cancel,
        pointer: Some(pointer.position),
        pointer_pressed: pointer.pressed && !on_button,
        menu_action,
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    update: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    update_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsMetrics {
    per_second: f32,
    avg_update: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns averages once one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.update_accum += breakdown.update;
        self.render_accum += breakdown.render;

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let metrics = FpsMetrics {
            per_second: frames as f32 / seconds,
            avg_update: self.update_accum / frames,
            avg_render: self.render_accum / frames,
        };
        *self = Self::default();
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameOutcome + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            viewport,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: viewport.width().round() as i32,
            window_height: viewport.height().round() as i32,
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        info!(
            "opening {}x{} window",
            viewport.width(),
            viewport.height()
        );

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut fps_counter = FpsCounter::default();
            let mut overlay_input = OverlayInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                let (mouse_x, mouse_y) = mouse_position();
                let pointer = PointerSample {
                    position: viewport.clamp(Vec2::new(mouse_x, mouse_y)),
                    pressed: is_mouse_button_pressed(MouseButton::Left),
                };

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = gather_frame_input(
                    keyboard,
                    pointer,
                    scene.overlay.as_ref(),
                    overlay_input.take_menu_action(),
                );

                let update_start = Instant::now();
                let outcome = update_scene(frame_dt, frame_input, &mut scene);
                let update_duration = update_start.elapsed();
                if outcome == FrameOutcome::Exit {
                    debug!("scene requested exit");
                    break;
                }

                let render_start = Instant::now();
                macroquad::window::clear_background(to_macroquad_color(scene.clear_color));
                draw_items(&scene);
                draw_hud(&scene.hud);
                if let Some(overlay) = &scene.overlay {
                    if let Some(action) = draw_overlay(overlay, pointer, viewport.width()) {
                        overlay_input.register_menu_action(action);
                    }
                }
                let render_duration = render_start.elapsed();

                let metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    update: update_duration,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        avg_update,
                        avg_render,
                    }) = metrics
                    {
                        info!(
                            "FPS: {:.2} | update: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            avg_update.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        info!("window closed");
        Ok(())
    }
}

fn draw_items(scene: &Scene) {
    for item in &scene.items {
        let origin = scene.resolve(item.anchor);
        match item.visual {
            Visual::Rectangle { size, color } => {
                macroquad::shapes::draw_rectangle(
                    origin.x,
                    origin.y,
                    size.x,
                    size.y,
                    to_macroquad_color(color),
                );
            }
            Visual::Circle { radius, color } => {
                macroquad::shapes::draw_circle(origin.x, origin.y, radius, to_macroquad_color(color));
            }
            Visual::Ring {
                radius,
                thickness,
                color,
            } => {
                macroquad::shapes::draw_circle_lines(
                    origin.x,
                    origin.y,
                    radius,
                    thickness,
                    to_macroquad_color(color),
                );
            }
            Visual::Line {
                to,
                thickness,
                color,
            } => {
                let end = origin + (to - anchor_position(item.anchor));
                macroquad::shapes::draw_line(
                    origin.x,
                    origin.y,
                    end.x,
                    end.y,
                    thickness,
                    to_macroquad_color(color),
                );
            }
            Visual::RotatedRectangle {
                size,
                rotation_degrees,
                color,
            } => {
                let [a, b, c, d] = rotated_corners(origin, size, rotation_degrees);
                let fill = to_macroquad_color(color);
                macroquad::shapes::draw_triangle(to_mq(a), to_mq(b), to_mq(c), fill);
                macroquad::shapes::draw_triangle(to_mq(a), to_mq(c), to_mq(d), fill);
            }
        }
    }
}

fn anchor_position(anchor: sky_chaser_rendering::Anchor) -> Vec2 {
    match anchor {
        sky_chaser_rendering::Anchor::World(position)
        | sky_chaser_rendering::Anchor::Screen(position) => position,
    }
}

/// Corners of a rectangle centered on `center` and turned counter-clockwise on screen.
fn rotated_corners(center: Vec2, size: Vec2, rotation_degrees: f32) -> [Vec2; 4] {
    let radians = rotation_degrees.to_radians();
    // Screen y grows downwards, so a counter-clockwise turn negates the sine.
    let along = Vec2::new(radians.cos(), -radians.sin());
    let across = Vec2::new(radians.sin(), radians.cos());
    let half = size / 2.0;

    [
        center - along * half.x - across * half.y,
        center + along * half.x - across * half.y,
        center + along * half.x + across * half.y,
        center - along * half.x + across * half.y,
    ]
}

fn draw_hud(hud: &Hud) {
    for bar in &hud.bars {
        macroquad::shapes::draw_rectangle(
            bar.position.x,
            bar.position.y,
            bar.size.x.max(0.0),
            bar.size.y,
            to_macroquad_color(bar.color),
        );
    }

    for text in &hud.texts {
        draw_label(
            &text.text,
            text.position,
            text.font_size,
            to_macroquad_color(text.color),
        );
    }
}

const OVERLAY_DIM: macroquad::color::Color = macroquad::color::Color::new(0.0, 0.0, 0.0, 0.6);
const TITLE_FONT_SIZE: f32 = 48.0;
const LINE_FONT_SIZE: f32 = 24.0;
const BUTTON_FONT_SIZE: f32 = 26.0;

/// Draws the overlay and returns the action of a button clicked this frame.
fn draw_overlay(overlay: &Overlay, pointer: PointerSample, width: f32) -> Option<MenuAction> {
    let screen_width = macroquad::window::screen_width();
    let screen_height = macroquad::window::screen_height();
    macroquad::shapes::draw_rectangle(0.0, 0.0, screen_width, screen_height, OVERLAY_DIM);

    let mut baseline = screen_height / 2.0 - 40.0;
    draw_centered(&overlay.title, baseline, TITLE_FONT_SIZE, WHITE, width);
    for line in &overlay.lines {
        baseline += 36.0;
        draw_centered(line, baseline, LINE_FONT_SIZE, WHITE, width);
    }

    let mut clicked = None;
    for button in &overlay.buttons {
        let hovered = button.contains(pointer.position);
        let fill = if hovered {
            Color::from_rgb_u8(70, 130, 180).lighten(0.25)
        } else {
            Color::from_rgb_u8(70, 130, 180)
        };
        macroquad::shapes::draw_rectangle(
            button.position.x,
            button.position.y,
            button.size.x,
            button.size.y,
            to_macroquad_color(fill),
        );
        macroquad::shapes::draw_rectangle_lines(
            button.position.x,
            button.position.y,
            button.size.x,
            button.size.y,
            2.0,
            BLACK,
        );

        let dimensions =
            macroquad::text::measure_text(&button.label, None, BUTTON_FONT_SIZE as u16, 1.0);
        let label_origin = Vec2::new(
            button.position.x + (button.size.x - dimensions.width) / 2.0,
            button.position.y + (button.size.y + dimensions.height) / 2.0,
        );
        draw_label(&button.label, label_origin, BUTTON_FONT_SIZE, WHITE);

        if hovered && pointer.pressed {
            clicked = Some(button.action);
        }
    }

    clicked
}

fn draw_centered(
    text: &str,
    baseline: f32,
    font_size: f32,
    color: macroquad::color::Color,
    width: f32,
) {
    let dimensions = macroquad::text::measure_text(text, None, font_size as u16, 1.0);
    let left = (width - dimensions.width) / 2.0;
    draw_label(text, Vec2::new(left, baseline), font_size, color);
}

fn draw_label(text: &str, position: Vec2, font_size: f32, color: macroquad::color::Color) {
    let _ = macroquad::text::draw_text(text, position.x, position.y, font_size, color);
}

fn to_mq(point: Vec2) -> MacroquadVec2 {
    MacroquadVec2::new(point.x, point.y)
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
