#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Sky Chaser adapters.
//!
//! Sessions describe each frame as a [`Scene`]: an ordered draw list, a HUD
//! and an optional modal [`Overlay`]. Backends rasterise scenes and report
//! device input back as [`FrameInput`]. Nothing in this crate draws pixels.

use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec2;
use sky_chaser_core::Rgb;
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with the provided opacity.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::from_rgb_u8(rgb.red(), rgb.green(), rgb.blue())
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Choices offered by overlay buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Start playing from the title menu.
    Start,
    /// Start over after the session ended.
    Restart,
    /// Continue to the next level.
    NextLevel,
    /// Leave the current screen.
    Quit,
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Move left is held.
    pub left_held: bool,
    /// Move right is held.
    pub right_held: bool,
    /// Up is held.
    pub up_held: bool,
    /// A jump key was pressed on this frame.
    pub jump: bool,
    /// The grapple-nearest key was pressed on this frame.
    pub grapple: bool,
    /// The release-grapple key was pressed on this frame.
    pub release: bool,
    /// The start key was pressed on this frame.
    pub start: bool,
    /// The restart key was pressed on this frame.
    pub restart: bool,
    /// The next-level key was pressed on this frame.
    pub next_level: bool,
    /// The cancel key was pressed on this frame.
    pub cancel: bool,
    /// Cursor position in screen units, clamped to the viewport.
    pub pointer: Option<Vec2>,
    /// The primary pointer button was pressed outside any overlay button.
    pub pointer_pressed: bool,
    /// Overlay button clicked since the previous frame.
    pub menu_action: Option<MenuAction>,
}

/// Coordinate space a draw item is positioned in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    /// World coordinates, shifted by the scene camera.
    World(Vec2),
    /// Screen coordinates, unaffected by the camera.
    Screen(Vec2),
}

/// Primitive shape drawn at an [`Anchor`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Visual {
    /// Axis-aligned filled rectangle; the anchor is its upper-left corner.
    Rectangle {
        /// Width and height.
        size: Vec2,
        /// Fill color.
        color: Color,
    },
    /// Filled circle; the anchor is its center.
    Circle {
        /// Circle radius.
        radius: f32,
        /// Fill color.
        color: Color,
    },
    /// Circle outline; the anchor is its center.
    Ring {
        /// Ring radius.
        radius: f32,
        /// Stroke width.
        thickness: f32,
        /// Stroke color.
        color: Color,
    },
    /// Line segment starting at the anchor.
    Line {
        /// End point in the same space as the anchor.
        to: Vec2,
        /// Stroke width.
        thickness: f32,
        /// Stroke color.
        color: Color,
    },
    /// Filled rectangle rotated around its center; the anchor is that center.
    RotatedRectangle {
        /// Width and height before rotation.
        size: Vec2,
        /// Counter-clockwise rotation in degrees.
        rotation_degrees: f32,
        /// Fill color.
        color: Color,
    },
}

/// Single entry of a scene's draw list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawItem {
    /// Where the visual is placed.
    pub anchor: Anchor,
    /// What is drawn.
    pub visual: Visual,
}

/// Line of HUD text.
#[derive(Clone, Debug, PartialEq)]
pub struct HudText {
    /// Text content.
    pub text: String,
    /// Baseline-left position in screen units.
    pub position: Vec2,
    /// Font size in pixels.
    pub font_size: f32,
    /// Text color.
    pub color: Color,
}

/// Horizontal HUD gauge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudBar {
    /// Upper-left corner in screen units.
    pub position: Vec2,
    /// Current width and height of the bar.
    pub size: Vec2,
    /// Fill color.
    pub color: Color,
}

/// Heads-up display drawn above the draw list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hud {
    /// Text lines.
    pub texts: Vec<HudText>,
    /// Gauges.
    pub bars: Vec<HudBar>,
}

/// Clickable overlay button.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayButton {
    /// Choice reported when the button is clicked.
    pub action: MenuAction,
    /// Caption.
    pub label: String,
    /// Upper-left corner in screen units.
    pub position: Vec2,
    /// Width and height in screen units.
    pub size: Vec2,
}

impl OverlayButton {
    /// Reports whether the screen point lies on the button.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let far = self.position + self.size;
        point.x >= self.position.x
            && point.y >= self.position.y
            && point.x <= far.x
            && point.y <= far.y
    }
}

const BUTTON_SIZE: Vec2 = Vec2::new(220.0, 44.0);
const BUTTON_GAP: f32 = 16.0;

/// Modal panel shown over the scene for menus and end screens.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    /// Headline.
    pub title: String,
    /// Additional lines below the headline.
    pub lines: Vec<String>,
    /// Buttons from top to bottom.
    pub buttons: Vec<OverlayButton>,
}

impl Overlay {
    /// Lays out a centered overlay with one button per action.
    #[must_use]
    pub fn centered<T>(
        viewport: Viewport,
        title: T,
        lines: Vec<String>,
        actions: &[(MenuAction, &str)],
    ) -> Self
    where
        T: Into<String>,
    {
        let left = (viewport.width() - BUTTON_SIZE.x) / 2.0;
        let top = viewport.height() / 2.0 + 40.0 + lines.len() as f32 * 30.0;
        let buttons = actions
            .iter()
            .enumerate()
            .map(|(slot, (action, label))| OverlayButton {
                action: *action,
                label: (*label).to_owned(),
                position: Vec2::new(left, top + slot as f32 * (BUTTON_SIZE.y + BUTTON_GAP)),
                size: BUTTON_SIZE,
            })
            .collect();

        Self {
            title: title.into(),
            lines,
            buttons,
        }
    }

    /// Returns the action of the button under the screen point, if any.
    #[must_use]
    pub fn button_at(&self, point: Vec2) -> Option<MenuAction> {
        self.buttons
            .iter()
            .find(|button| button.contains(point))
            .map(|button| button.action)
    }
}

/// Scene description for a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Solid color used to clear the frame.
    pub clear_color: Color,
    /// World coordinate shown at the top-left corner of the screen.
    pub camera: Vec2,
    /// Draw list in back-to-front order.
    pub items: Vec<DrawItem>,
    /// HUD drawn above the draw list.
    pub hud: Hud,
    /// Modal overlay drawn above everything else.
    pub overlay: Option<Overlay>,
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new(clear_color: Color) -> Self {
        Self {
            clear_color,
            camera: Vec2::ZERO,
            items: Vec::new(),
            hud: Hud::default(),
            overlay: None,
        }
    }

    /// Drops all content while keeping the clear color.
    pub fn clear(&mut self) {
        self.camera = Vec2::ZERO;
        self.items.clear();
        self.hud = Hud::default();
        self.overlay = None;
    }

    /// Appends a visual positioned in world coordinates.
    pub fn push_world(&mut self, position: Vec2, visual: Visual) {
        self.items.push(DrawItem {
            anchor: Anchor::World(position),
            visual,
        });
    }

    /// Appends a visual positioned in screen coordinates.
    pub fn push_screen(&mut self, position: Vec2, visual: Visual) {
        self.items.push(DrawItem {
            anchor: Anchor::Screen(position),
            visual,
        });
    }

    /// Converts a world point into screen units using the scene camera.
    #[must_use]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.camera
    }

    /// Converts a screen point into world units using the scene camera.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.camera
    }

    /// Resolves an anchor into screen units.
    #[must_use]
    pub fn resolve(&self, anchor: Anchor) -> Vec2 {
        match anchor {
            Anchor::World(position) => self.world_to_screen(position),
            Anchor::Screen(position) => position,
        }
    }
}

/// Visible screen area in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    /// Creates a viewport with strictly positive extents.
    pub fn new(width: f32, height: f32) -> Result<Self, RenderingError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(RenderingError::InvalidViewport { width, height });
        }

        Ok(Self { width, height })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Limits a screen point to the viewport.
    #[must_use]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(Vec2::ZERO, Vec2::new(self.width, self.height))
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Size of the window.
    pub viewport: Viewport,
    /// Initial scene content.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, viewport: Viewport, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            viewport,
            scene,
        }
    }
}

/// What a backend should do after updating a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Render the frame and keep going.
    Continue,
    /// Close the window.
    Exit,
}

/// Rendering backend capable of presenting Sky Chaser scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the elapsed frame time,
    /// per-frame input captured by the adapter, and rebuilds the scene before
    /// it is rendered. Returning [`FrameOutcome::Exit`] closes the window.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameOutcome + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RenderingError {
    /// Viewports need a positive width and height.
    #[error("viewport must have positive extents (received {width}x{height})")]
    InvalidViewport {
        /// Width that failed validation.
        width: f32,
        /// Height that failed validation.
        height: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0).expect("valid viewport")
    }

    #[test]
    fn viewport_rejects_empty_extents() {
        assert_eq!(
            Viewport::new(0.0, 600.0),
            Err(RenderingError::InvalidViewport {
                width: 0.0,
                height: 600.0
            })
        );
    }

    #[test]
    fn viewport_clamps_points_outside_the_window() {
        assert_eq!(
            viewport().clamp(Vec2::new(-20.0, 900.0)),
            Vec2::new(0.0, 600.0)
        );
    }

    #[test]
    fn overlay_hit_testing_finds_stacked_buttons() {
        let overlay = Overlay::centered(
            viewport(),
            "Sky Chaser",
            Vec::new(),
            &[(MenuAction::Start, "Start"), (MenuAction::Quit, "Quit")],
        );

        let first = &overlay.buttons[0];
        let second = &overlay.buttons[1];
        assert!(second.position.y > first.position.y + first.size.y);

        let inside_first = first.position + first.size / 2.0;
        let inside_second = second.position + Vec2::new(1.0, 1.0);
        assert_eq!(overlay.button_at(inside_first), Some(MenuAction::Start));
        assert_eq!(overlay.button_at(inside_second), Some(MenuAction::Quit));
        assert_eq!(overlay.button_at(Vec2::ZERO), None);
    }

    #[test]
    fn scene_camera_converts_between_spaces() {
        let mut scene = Scene::new(Color::from_rgb_u8(135, 206, 235));
        scene.camera = Vec2::new(0.0, -300.0);
        let world = Vec2::new(100.0, -250.0);
        assert_eq!(scene.world_to_screen(world), Vec2::new(100.0, 50.0));
        assert_eq!(scene.screen_to_world(Vec2::new(100.0, 50.0)), world);
        assert_eq!(scene.resolve(Anchor::Screen(world)), world);
    }

    #[test]
    fn colors_convert_from_core_rgb() {
        let color = Color::from(Rgb::new(255, 0, 51));
        assert_eq!(color, Color::new(1.0, 0.0, 0.2, 1.0));
        assert_eq!(color.with_alpha(2.0).alpha, 1.0);
    }
}
