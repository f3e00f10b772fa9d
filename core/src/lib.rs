#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Sky Chaser engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters translate device input into
//! a [`ControlFrame`], systems turn frames and [`Event`] streams into
//! [`Command`] batches, and the world executes those commands via its `apply`
//! entry point before broadcasting new events. Every simulation constant is
//! tuned for a fixed 60 Hz step and lives in [`tuning`].

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Sky Chaser.";

/// Fixed simulation constants expressed per simulation step.
pub mod tuning {
    use glam::Vec2;

    /// Number of simulation steps executed per second.
    pub const STEP_RATE: u32 = 60;
    /// Width of the visible play area in world units.
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    /// Height of the visible play area in world units.
    pub const VIEWPORT_HEIGHT: f32 = 600.0;

    /// Downward acceleration applied every step while the player is not grappling.
    pub const GRAVITY: f32 = 0.8;
    /// Maximum downward speed reached while falling.
    pub const TERMINAL_VELOCITY: f32 = 20.0;
    /// Vertical velocity assigned by a jump. Negative values point up.
    pub const JUMP_STRENGTH: f32 = -16.0;
    /// Horizontal speed applied while a direction is held.
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Collision box of the player.
    pub const PLAYER_SIZE: Vec2 = Vec2::new(30.0, 50.0);
    /// Lives granted at the start of a session.
    pub const STARTING_LIVES: u32 = 3;
    /// Number of steps the player stays immune after taking damage.
    pub const INVULNERABILITY_STEPS: u32 = 60;
    /// Velocity applied by enemy contact; the horizontal part opposes the facing direction.
    pub const KNOCKBACK: Vec2 = Vec2::new(10.0, -5.0);

    /// Maximum distance between the player center and an anchor for a grapple to attach.
    pub const GRAPPLE_RANGE: f32 = 200.0;
    /// Tension gained per unit of rope extension.
    pub const GRAPPLE_STIFFNESS: f32 = 0.1;
    /// Multiplicative damping applied to both velocity components while the rope is taut.
    pub const GRAPPLE_DAMPING: f32 = 0.99;

    /// Score awarded per collected coin.
    pub const COIN_VALUE: u32 = 10;
    /// Collision box of a coin.
    pub const COIN_SIZE: Vec2 = Vec2::new(15.0, 15.0);
    /// Hover phase advanced per step for coin animation.
    pub const COIN_HOVER_RATE: f32 = 0.1;

    /// Collision box of an enemy.
    pub const ENEMY_SIZE: Vec2 = Vec2::new(30.0, 30.0);
    /// Horizontal patrol speed of an enemy.
    pub const ENEMY_SPEED: f32 = 2.0;

    /// Downward acceleration applied to particles each step.
    pub const PARTICLE_GRAVITY: f32 = 0.1;

    /// Fraction of the remaining distance the camera covers per step.
    pub const CAMERA_EASING: f32 = 0.1;
}

/// Describes the active phase of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Title screen shown before play starts.
    Menu,
    /// Simulation is running.
    Playing,
    /// The session ended either by clearing the final level or running out of lives.
    GameOver,
    /// Every coin of a non-final level has been collected.
    LevelComplete,
}

/// Reason a session reached [`GameState::GameOver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The final level was cleared.
    Victory,
    /// The player ran out of lives.
    Defeat,
}

/// Horizontal direction the player last moved toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Facing toward decreasing x.
    Left,
    /// Facing toward increasing x.
    Right,
}

impl Facing {
    /// Unit sign of the direction along the x axis.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Which jump the player performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JumpKind {
    /// Jump started while standing on a platform.
    Ground,
    /// Mid-air jump that consumed the double-jump charge.
    Double,
}

/// What hurt the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageCause {
    /// Contact with a patrolling enemy.
    Enemy,
    /// Falling below the level's lower bound.
    Fall,
}

/// Reasons a grapple activation may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum GrappleRejection {
    /// A rope is already attached.
    AlreadyGrappling,
    /// The anchor lies at or beyond [`tuning::GRAPPLE_RANGE`].
    OutOfRange {
        /// Distance between the player center and the requested anchor.
        distance: f32,
    },
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates a new identifier with the provided numeric value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Retrieves the numeric representation of the identifier.
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }
        }
    };
}

entity_id!(
    /// Unique identifier assigned to a platform within a level.
    PlatformId
);
entity_id!(
    /// Unique identifier assigned to a coin within a level.
    CoinId
);
entity_id!(
    /// Unique identifier assigned to an enemy within a level.
    EnemyId
);

/// Zero-based index of a built-in level layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelIndex(u32);

impl LevelIndex {
    /// The first level of every session.
    pub const FIRST: Self = Self(0);

    /// Creates a new level index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the zero-based index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// One-based number shown to players.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.0 + 1
    }

    /// Index of the level that follows this one.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Errors raised when constructing geometry with invalid extents.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum GeometryError {
    /// Width and height must both be strictly positive.
    #[error("bounding box extents must be positive (received {width}x{height})")]
    NonPositiveExtent {
        /// Width that failed validation.
        width: f32,
        /// Height that failed validation.
        height: f32,
    },
}

/// Axis-aligned bounding box anchored at its upper-left corner.
///
/// The y axis grows downward, so `top < bottom` for every valid box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    position: Vec2,
    size: Vec2,
}

impl Aabb {
    /// Creates a box from its upper-left corner and extents.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Result<Self, GeometryError> {
        Self::from_position_and_size(Vec2::new(x, y), Vec2::new(width, height))
    }

    /// Creates a box from a corner vector and a size vector.
    pub fn from_position_and_size(position: Vec2, size: Vec2) -> Result<Self, GeometryError> {
        // NaN extents fail both comparisons and are rejected too.
        if !(size.x > 0.0 && size.y > 0.0) {
            return Err(GeometryError::NonPositiveExtent {
                width: size.x,
                height: size.y,
            });
        }

        Ok(Self { position, size })
    }

    /// Upper-left corner of the box.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Width and height of the box.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.size.x
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.size.y
    }

    /// Smallest x coordinate covered by the box.
    #[must_use]
    pub fn left(&self) -> f32 {
        self.position.x
    }

    /// Largest x coordinate covered by the box.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.position.x + self.size.x
    }

    /// Smallest y coordinate covered by the box.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.position.y
    }

    /// Largest y coordinate covered by the box.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }

    /// Geometric center of the box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Moves the box so its upper-left corner sits at `position`.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Shifts the box by the provided offset.
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }

    /// Moves the box horizontally so its left edge sits at `x`.
    pub fn set_left(&mut self, x: f32) {
        self.position.x = x;
    }

    /// Moves the box horizontally so its right edge sits at `x`.
    pub fn set_right(&mut self, x: f32) {
        self.position.x = x - self.size.x;
    }

    /// Moves the box vertically so its top edge sits at `y`.
    pub fn set_top(&mut self, y: f32) {
        self.position.y = y;
    }

    /// Moves the box vertically so its bottom edge sits at `y`.
    pub fn set_bottom(&mut self, y: f32) {
        self.position.y = y - self.size.y;
    }

    /// Reports whether two boxes share interior area. Touching edges do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Reports whether the point lies inside the box or on its edge.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }
}

/// Opaque color applied to world entities and particles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Logical actions held down during a step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeldActions {
    /// Move toward decreasing x.
    pub left: bool,
    /// Move toward increasing x.
    pub right: bool,
    /// Up is held. Presses are reported separately as [`Trigger::Jump`].
    pub up: bool,
}

/// Discrete actions that occurred since the previous step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Trigger {
    /// Jump key pressed.
    Jump,
    /// Grapple toward the closest anchor within range.
    GrappleNearest,
    /// Release an attached grapple.
    ReleaseGrapple,
    /// Pointer button pressed at a world-space location.
    PointerPressed {
        /// Pointer position converted into world coordinates.
        world: Vec2,
    },
    /// Start a session from the menu.
    Start,
    /// Restart after the session ended.
    Restart,
    /// Continue to the next level.
    NextLevel,
    /// Escape/cancel.
    Cancel,
}

/// Per-step snapshot of player intent consumed by the controls system.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlFrame {
    /// Actions held for the duration of the step.
    pub held: HeldActions,
    /// Edge-triggered actions in the order they occurred.
    pub triggers: Vec<Trigger>,
}

impl ControlFrame {
    /// Creates a frame that only carries held actions.
    #[must_use]
    pub fn held(held: HeldActions) -> Self {
        Self {
            held,
            triggers: Vec::new(),
        }
    }

    /// Appends a trigger to the frame.
    #[must_use]
    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.triggers.push(trigger);
        self
    }
}

/// Initial state of a particle requested by a feedback system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSeed {
    /// Spawn position in world coordinates.
    pub position: Vec2,
    /// Initial velocity in world units per step.
    pub velocity: Vec2,
    /// Particle color.
    pub color: Rgb,
    /// Initial edge length, shrinking as life runs out.
    pub size: f32,
    /// Lifetime in steps.
    pub life: u32,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Starts a fresh session from the menu.
    StartGame,
    /// Advances the simulation by one fixed step.
    Tick {
        /// Actions held during the step.
        held: HeldActions,
    },
    /// Requests a jump or double jump.
    Jump,
    /// Requests attaching the grapple to the provided anchor.
    AttachGrapple {
        /// Anchor point in world coordinates.
        anchor: Vec2,
    },
    /// Detaches the grapple.
    ReleaseGrapple,
    /// Adds cosmetic particles to the world.
    SpawnParticles {
        /// Particles to create.
        particles: Vec<ParticleSeed>,
    },
    /// Loads the next level after a level was completed.
    AdvanceLevel,
    /// Starts over from the first level with fresh lives and score.
    RestartGame,
    /// Abandons the running session and returns to the menu.
    ReturnToMenu,
    /// Terminates the session.
    EndSession,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A simulation step was executed.
    TimeAdvanced {
        /// Number of steps executed since the world was created.
        step: u64,
    },
    /// The session moved into a new phase.
    GameStateChanged {
        /// Phase before the transition.
        from: GameState,
        /// Phase after the transition.
        to: GameState,
    },
    /// A level layout replaced the previous one.
    LevelLoaded {
        /// Index of the loaded layout.
        level: LevelIndex,
    },
    /// The player left the ground or performed a double jump.
    Jumped {
        /// Bottom-center of the player when the jump started.
        feet: Vec2,
        /// Which jump was performed.
        kind: JumpKind,
    },
    /// A rope was attached.
    GrappleAttached {
        /// Anchor point of the rope.
        anchor: Vec2,
        /// Rope rest length captured at activation.
        rest_length: f32,
    },
    /// A grapple request was refused.
    GrappleRejected {
        /// Anchor point that was requested.
        anchor: Vec2,
        /// Why the request failed.
        reason: GrappleRejection,
    },
    /// The rope was detached.
    GrappleReleased,
    /// The player picked up a coin.
    CoinCollected {
        /// Identifier of the collected coin.
        coin: CoinId,
        /// Center of the coin at pickup.
        position: Vec2,
        /// Player score after the pickup.
        score: u32,
    },
    /// The player lost a life.
    PlayerDamaged {
        /// Center of the player when the damage landed.
        position: Vec2,
        /// Lives remaining after the damage.
        lives: u32,
        /// Source of the damage.
        cause: DamageCause,
    },
    /// The player was moved back to the level spawn point.
    PlayerRespawned {
        /// Upper-left corner of the player after respawning.
        position: Vec2,
    },
    /// Every coin of the level was collected.
    LevelCompleted {
        /// Index of the completed level.
        level: LevelIndex,
    },
    /// The session ended.
    GameOver {
        /// Whether the player won or lost.
        outcome: Outcome,
    },
    /// The session was terminated and adapters should exit.
    SessionEnded,
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Collision box of the player.
    pub bounds: Aabb,
    /// Velocity in world units per step.
    pub velocity: Vec2,
    /// Direction the player faces.
    pub facing: Facing,
    /// Whether the player stands on a platform.
    pub on_ground: bool,
    /// Whether a mid-air jump is still available.
    pub can_double_jump: bool,
    /// Anchor of the attached rope, if any.
    pub grapple_anchor: Option<Vec2>,
    /// Lives remaining.
    pub lives: u32,
    /// Accumulated score.
    pub score: u32,
    /// Steps of invulnerability remaining; zero when vulnerable.
    pub invulnerable_steps: u32,
}

impl PlayerSnapshot {
    /// Center of the player's collision box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    /// Reports whether a rope is currently attached.
    #[must_use]
    pub const fn is_grappling(&self) -> bool {
        self.grapple_anchor.is_some()
    }

    /// Reports whether damage is currently ignored.
    #[must_use]
    pub const fn is_invulnerable(&self) -> bool {
        self.invulnerable_steps > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_rejects_non_positive_extents() {
        assert!(matches!(
            Aabb::new(0.0, 0.0, 0.0, 10.0),
            Err(GeometryError::NonPositiveExtent { .. })
        ));
        assert!(Aabb::new(0.0, 0.0, 10.0, -1.0).is_err());
        assert!(Aabb::new(0.0, 0.0, f32::NAN, 1.0).is_err());
    }

    #[test]
    fn touching_boxes_do_not_overlap() {
        let floor = Aabb::new(0.0, 100.0, 200.0, 20.0).expect("valid box");
        let resting = Aabb::new(10.0, 50.0, 30.0, 50.0).expect("valid box");
        assert!(!resting.overlaps(&floor));

        let sunk = Aabb::new(10.0, 50.5, 30.0, 50.0).expect("valid box");
        assert!(sunk.overlaps(&floor));
        assert!(floor.overlaps(&sunk));
    }

    #[test]
    fn edge_setters_preserve_extents() {
        let mut bounds = Aabb::new(0.0, 0.0, 30.0, 50.0).expect("valid box");
        bounds.set_right(100.0);
        bounds.set_bottom(400.0);
        assert_eq!(bounds.position(), Vec2::new(70.0, 350.0));
        assert_eq!(bounds.size(), Vec2::new(30.0, 50.0));
        assert_eq!(bounds.center(), Vec2::new(85.0, 375.0));
    }

    #[test]
    fn level_index_numbers_from_one() {
        assert_eq!(LevelIndex::FIRST.number(), 1);
        assert_eq!(LevelIndex::FIRST.next(), LevelIndex::new(1));
    }

    #[test]
    fn control_frames_round_trip_through_bincode() {
        let frame = ControlFrame::held(HeldActions {
            left: true,
            ..HeldActions::default()
        })
        .with_trigger(Trigger::PointerPressed {
            world: Vec2::new(120.0, -40.0),
        })
        .with_trigger(Trigger::Jump);

        let bytes = bincode::serialize(&frame).expect("serialize");
        let restored: ControlFrame = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, frame);
    }
}
