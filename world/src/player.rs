//! Player physics, grapple rope and damage bookkeeping.

use glam::Vec2;
use sky_chaser_core::{
    tuning, Aabb, Facing, GeometryError, GrappleRejection, HeldActions, JumpKind, PlayerSnapshot,
};

use crate::{entities::Platform, levels::LevelBounds};

#[derive(Clone, Copy, Debug, PartialEq)]
struct Grapple {
    anchor: Vec2,
    rest_length: f32,
}

/// What happened to the player during a fixed step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum StepOutcome {
    /// The player moved and stayed inside the level.
    Moved,
    /// The player dropped below the level and was returned to the spawn point.
    Fell {
        /// Center of the player before the respawn.
        position: Vec2,
        /// Whether the fall cost a life.
        damaged: bool,
        /// Whether an attached rope was cut by the respawn.
        released_grapple: bool,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Player {
    bounds: Aabb,
    velocity: Vec2,
    facing: Facing,
    on_ground: bool,
    can_double_jump: bool,
    grapple: Option<Grapple>,
    lives: u32,
    score: u32,
    invulnerable_steps: u32,
}

impl Player {
    pub(crate) fn new(spawn: Vec2) -> Result<Self, GeometryError> {
        Ok(Self {
            bounds: Aabb::from_position_and_size(spawn, tuning::PLAYER_SIZE)?,
            velocity: Vec2::ZERO,
            facing: Facing::Right,
            on_ground: false,
            can_double_jump: false,
            grapple: None,
            lives: tuning::STARTING_LIVES,
            score: 0,
            invulnerable_steps: 0,
        })
    }

    /// Same lives and score, fresh body at `spawn`. Used when a new level loads.
    pub(crate) fn carried_over(&self, spawn: Vec2) -> Result<Self, GeometryError> {
        let mut player = Self::new(spawn)?;
        player.lives = self.lives;
        player.score = self.score;
        Ok(player)
    }

    pub(crate) fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    pub(crate) const fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub(crate) const fn lives(&self) -> u32 {
        self.lives
    }

    pub(crate) const fn score(&self) -> u32 {
        self.score
    }

    pub(crate) const fn is_invulnerable(&self) -> bool {
        self.invulnerable_steps > 0
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            bounds: self.bounds,
            velocity: self.velocity,
            facing: self.facing,
            on_ground: self.on_ground,
            can_double_jump: self.can_double_jump,
            grapple_anchor: self.grapple.map(|grapple| grapple.anchor),
            lives: self.lives,
            score: self.score,
            invulnerable_steps: self.invulnerable_steps,
        }
    }

    pub(crate) fn count_down_invulnerability(&mut self) {
        self.invulnerable_steps = self.invulnerable_steps.saturating_sub(1);
    }

    /// Advances the player by one fixed step.
    pub(crate) fn update(
        &mut self,
        held: HeldActions,
        platforms: &[Platform],
        bounds: &LevelBounds,
        spawn: Vec2,
    ) -> StepOutcome {
        self.count_down_invulnerability();
        self.steer(held);
        self.accelerate();

        self.bounds.translate(Vec2::new(self.velocity.x, 0.0));
        self.resolve_horizontal(platforms);

        self.on_ground = false;
        self.bounds.translate(Vec2::new(0.0, self.velocity.y));
        self.resolve_vertical(platforms);

        if self.bounds.top() > bounds.bottom {
            let position = self.center();
            let damaged = self.take_damage();
            self.bounds.set_position(spawn);
            self.velocity.y = 0.0;
            let released_grapple = self.end_grapple();
            return StepOutcome::Fell {
                position,
                damaged,
                released_grapple,
            };
        }

        StepOutcome::Moved
    }

    fn steer(&mut self, held: HeldActions) {
        self.velocity.x = 0.0;
        if held.left {
            self.velocity.x = -tuning::PLAYER_SPEED;
            self.facing = Facing::Left;
        }
        if held.right {
            self.velocity.x = tuning::PLAYER_SPEED;
            self.facing = Facing::Right;
        }
    }

    fn accelerate(&mut self) {
        let Some(grapple) = self.grapple else {
            self.velocity.y = (self.velocity.y + tuning::GRAVITY).min(tuning::TERMINAL_VELOCITY);
            return;
        };

        let to_anchor = grapple.anchor - self.center();
        let distance = to_anchor.length();
        if distance > grapple.rest_length {
            let tension = (distance - grapple.rest_length) * tuning::GRAPPLE_STIFFNESS;
            self.velocity += to_anchor / distance * tension;
            self.velocity *= tuning::GRAPPLE_DAMPING;
        }
    }

    fn resolve_horizontal(&mut self, platforms: &[Platform]) {
        let hits: Vec<Aabb> = self.overlapping(platforms);
        for platform in hits {
            if self.velocity.x > 0.0 {
                self.bounds.set_right(platform.left());
            } else if self.velocity.x < 0.0 {
                self.bounds.set_left(platform.right());
            }
        }
    }

    fn resolve_vertical(&mut self, platforms: &[Platform]) {
        let hits: Vec<Aabb> = self.overlapping(platforms);
        for platform in hits {
            if self.velocity.y > 0.0 {
                self.bounds.set_bottom(platform.top());
                self.velocity.y = 0.0;
                self.on_ground = true;
                self.can_double_jump = true;
            } else if self.velocity.y < 0.0 {
                self.bounds.set_top(platform.bottom());
                self.velocity.y = 0.0;
            }
        }
    }

    fn overlapping(&self, platforms: &[Platform]) -> Vec<Aabb> {
        platforms
            .iter()
            .map(|platform| *platform.bounds())
            .filter(|bounds| self.bounds.overlaps(bounds))
            .collect()
    }

    pub(crate) fn jump(&mut self) -> Option<JumpKind> {
        if self.on_ground {
            self.velocity.y = tuning::JUMP_STRENGTH;
            self.on_ground = false;
            Some(JumpKind::Ground)
        } else if self.can_double_jump {
            self.velocity.y = tuning::JUMP_STRENGTH;
            self.can_double_jump = false;
            Some(JumpKind::Double)
        } else {
            None
        }
    }

    /// Attaches the rope and returns its rest length.
    pub(crate) fn start_grapple(&mut self, anchor: Vec2) -> Result<f32, GrappleRejection> {
        if self.grapple.is_some() {
            return Err(GrappleRejection::AlreadyGrappling);
        }

        let distance = self.center().distance(anchor);
        if distance >= tuning::GRAPPLE_RANGE {
            return Err(GrappleRejection::OutOfRange { distance });
        }

        self.grapple = Some(Grapple {
            anchor,
            rest_length: distance,
        });
        Ok(distance)
    }

    /// Detaches the rope. Returns `false` when none was attached.
    pub(crate) fn end_grapple(&mut self) -> bool {
        self.grapple.take().is_some()
    }

    /// Costs a life unless invulnerable. Returns whether the damage landed.
    pub(crate) fn take_damage(&mut self) -> bool {
        if self.is_invulnerable() {
            return false;
        }

        self.lives = self.lives.saturating_sub(1);
        self.invulnerable_steps = tuning::INVULNERABILITY_STEPS;
        true
    }

    /// Pushes the player away from the way they face.
    pub(crate) fn knock_back(&mut self) {
        self.velocity.x = -self.facing.sign() * tuning::KNOCKBACK.x;
        self.velocity.y = tuning::KNOCKBACK.y;
    }

    pub(crate) fn collect_coin(&mut self) -> u32 {
        self.score = self.score.saturating_add(tuning::COIN_VALUE);
        self.score
    }

    #[cfg(test)]
    pub(crate) fn teleport(&mut self, position: Vec2) {
        self.bounds.set_position(position);
    }

    #[cfg(test)]
    pub(crate) fn set_lives(&mut self, lives: u32) {
        self.lives = lives;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sky_chaser_core::PlatformId;

    const SPAWN: Vec2 = Vec2::new(100.0, 100.0);

    fn bounds() -> LevelBounds {
        LevelBounds {
            top: 0.0,
            bottom: 600.0,
        }
    }

    fn floor() -> Vec<Platform> {
        vec![Platform::new(
            PlatformId::new(0),
            Aabb::new(0.0, 560.0, 800.0, 40.0).expect("valid floor"),
        )]
    }

    fn standing_player() -> Player {
        let mut player = Player::new(Vec2::new(100.0, 510.0)).expect("player");
        let _ = player.update(HeldActions::default(), &floor(), &bounds(), SPAWN);
        player
    }

    #[test]
    fn resting_player_stays_grounded() {
        let mut player = standing_player();
        for _ in 0..10 {
            assert_eq!(
                player.update(HeldActions::default(), &floor(), &bounds(), SPAWN),
                StepOutcome::Moved
            );
            let snapshot = player.snapshot();
            assert!(snapshot.on_ground);
            assert_eq!(snapshot.velocity.y, 0.0);
            assert_eq!(snapshot.bounds.bottom(), 560.0);
        }
    }

    #[test]
    fn right_wins_when_both_directions_are_held() {
        let mut player = standing_player();
        let held = HeldActions {
            left: true,
            right: true,
            up: false,
        };
        let _ = player.update(held, &floor(), &bounds(), SPAWN);
        assert_eq!(player.snapshot().velocity.x, tuning::PLAYER_SPEED);
        assert_eq!(player.snapshot().facing, Facing::Right);
    }

    #[test]
    fn jump_then_double_jump_then_nothing() {
        let mut player = standing_player();
        assert_eq!(player.jump(), Some(JumpKind::Ground));
        assert_eq!(player.snapshot().velocity.y, tuning::JUMP_STRENGTH);
        let _ = player.update(HeldActions::default(), &floor(), &bounds(), SPAWN);
        assert_eq!(player.jump(), Some(JumpKind::Double));
        assert_eq!(player.snapshot().velocity.y, tuning::JUMP_STRENGTH);
        assert_eq!(player.jump(), None);
    }

    #[test]
    fn fall_speed_is_capped() {
        let mut player = Player::new(Vec2::new(100.0, -5_000.0)).expect("player");
        for _ in 0..100 {
            let _ = player.update(HeldActions::default(), &[], &bounds(), SPAWN);
            assert!(player.snapshot().velocity.y <= tuning::TERMINAL_VELOCITY);
        }
    }

    #[test]
    fn rest_length_is_distance_at_activation() {
        let mut player = standing_player();
        let center = player.center();
        let anchor = center + Vec2::new(90.0, -120.0);
        let rest = player.start_grapple(anchor).expect("in range");
        assert!((rest - 150.0).abs() < 1e-4);
        assert_eq!(
            player.start_grapple(anchor),
            Err(GrappleRejection::AlreadyGrappling)
        );
        assert!(player.end_grapple());
        assert!(!player.end_grapple());
    }

    #[test]
    fn anchors_at_range_are_rejected() {
        let mut player = standing_player();
        let anchor = player.center() + Vec2::new(0.0, -250.0);
        assert!(matches!(
            player.start_grapple(anchor),
            Err(GrappleRejection::OutOfRange { .. })
        ));
        let at_limit = player.center() + Vec2::new(tuning::GRAPPLE_RANGE, 0.0);
        assert!(player.start_grapple(at_limit).is_err());
    }

    #[test]
    fn slack_rope_applies_no_force() {
        let mut player = Player::new(Vec2::new(300.0, 200.0)).expect("player");
        let anchor = player.center() + Vec2::new(0.0, -100.0);
        let _ = player.start_grapple(anchor).expect("in range");
        let _ = player.update(HeldActions::default(), &[], &bounds(), SPAWN);
        assert_eq!(player.snapshot().velocity, Vec2::ZERO);
        assert_eq!(player.snapshot().bounds.position(), Vec2::new(300.0, 200.0));
    }

    #[test]
    fn damage_is_ignored_while_invulnerable() {
        let mut player = standing_player();
        assert!(player.take_damage());
        assert_eq!(player.lives(), 2);
        assert!(!player.take_damage());
        assert_eq!(player.lives(), 2);

        for _ in 0..tuning::INVULNERABILITY_STEPS {
            player.count_down_invulnerability();
        }
        assert!(player.take_damage());
        assert_eq!(player.lives(), 1);
    }

    #[test]
    fn lives_never_drop_below_zero() {
        let mut player = standing_player();
        for _ in 0..5 {
            let _ = player.take_damage();
            for _ in 0..tuning::INVULNERABILITY_STEPS {
                player.count_down_invulnerability();
            }
        }
        assert_eq!(player.lives(), 0);
    }

    #[test]
    fn knockback_opposes_facing() {
        let mut player = standing_player();
        player.knock_back();
        assert_eq!(player.snapshot().velocity, Vec2::new(-10.0, -5.0));
    }

    #[test]
    fn walls_stop_the_player_without_zeroing_speed() {
        let mut platforms = floor();
        let wall = Aabb::new(300.0, 460.0, 40.0, 100.0).expect("valid wall");
        platforms.push(Platform::new(PlatformId::new(1), wall));
        let mut player = standing_player();
        let right = HeldActions {
            right: true,
            ..HeldActions::default()
        };
        for _ in 0..60 {
            let _ = player.update(right, &platforms, &bounds(), SPAWN);
        }

        let snapshot = player.snapshot();
        assert_eq!(snapshot.bounds.right(), 300.0);
        assert_eq!(snapshot.velocity.x, tuning::PLAYER_SPEED);
        assert!(!snapshot.bounds.overlaps(&wall));
        assert!(snapshot.on_ground);
    }

    #[test]
    fn ceiling_cuts_a_jump_short() {
        let mut platforms = floor();
        let ceiling = Aabb::new(80.0, 440.0, 100.0, 20.0).expect("valid ceiling");
        platforms.push(Platform::new(PlatformId::new(1), ceiling));
        let mut player = standing_player();
        assert_eq!(player.jump(), Some(JumpKind::Ground));

        let mut bumped = false;
        for _ in 0..10 {
            let _ = player.update(HeldActions::default(), &platforms, &bounds(), SPAWN);
            let snapshot = player.snapshot();
            assert!(!snapshot.bounds.overlaps(&ceiling));
            if snapshot.bounds.top() == 460.0 {
                assert_eq!(snapshot.velocity.y, 0.0);
                bumped = true;
                break;
            }
        }
        assert!(bumped, "the jump never reached the ceiling");
        assert!(!player.snapshot().on_ground);
    }

    #[test]
    fn walking_past_the_floor_end_falls_out() {
        let mut player = standing_player();
        let left = HeldActions {
            left: true,
            ..HeldActions::default()
        };
        let fell = (0..100).find_map(|_| match player.update(left, &floor(), &bounds(), SPAWN) {
            StepOutcome::Moved => None,
            fell @ StepOutcome::Fell { .. } => Some(fell),
        });

        assert!(matches!(fell, Some(StepOutcome::Fell { damaged: true, .. })));
        assert_eq!(player.snapshot().bounds.position(), SPAWN);
        assert_eq!(player.snapshot().lives, 2);
    }

    #[test]
    fn falling_out_respawns_once() {
        let mut player = Player::new(Vec2::new(100.0, 600.0)).expect("player");
        let outcome = player.update(HeldActions::default(), &[], &bounds(), SPAWN);
        assert!(matches!(
            outcome,
            StepOutcome::Fell {
                damaged: true,
                released_grapple: false,
                ..
            }
        ));
        let snapshot = player.snapshot();
        assert_eq!(snapshot.bounds.position(), SPAWN);
        assert_eq!(snapshot.velocity.y, 0.0);
        assert_eq!(snapshot.lives, 2);
    }

    #[test]
    fn carried_over_keeps_progress() {
        let mut player = standing_player();
        let _ = player.collect_coin();
        let _ = player.take_damage();
        let next = player.carried_over(SPAWN).expect("player");
        assert_eq!(next.score(), tuning::COIN_VALUE);
        assert_eq!(next.lives(), 2);
        assert!(!next.is_invulnerable());
        assert_eq!(next.bounds().position(), SPAWN);
    }
}
